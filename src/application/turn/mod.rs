//! Turn handling.

mod phase;
mod submit_turn;

pub use phase::TurnPhase;
pub use submit_turn::{SubmitTurnCommand, SubmitTurnHandler, SubmitTurnResult, TurnError};
