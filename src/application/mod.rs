//! Application layer - the turn loop.
//!
//! Orchestrates one user turn end-to-end across the ports: routing via the
//! coordinator, at most one operation execution, and final reply
//! composition.

pub mod turn;

pub use turn::{SubmitTurnCommand, SubmitTurnHandler, SubmitTurnResult, TurnError, TurnPhase};
