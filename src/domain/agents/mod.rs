//! Agents - capability-scoped conversational participants.
//!
//! Each agent is an instruction policy (rendered with live session state)
//! plus the subset of operations it may request; the subset lives in the
//! operation registry. Instruction text is configuration: it shapes
//! conversation, while every correctness rule is enforced by the operation
//! layer regardless of whether instructions are followed.

mod instructions;
mod kind;

pub use instructions::instructions_for;
pub use kind::AgentKind;
