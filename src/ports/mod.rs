//! Ports - interfaces to external collaborators.
//!
//! The reasoning engine and session persistence are the system's two
//! external dependencies; both are traits so adapters can be swapped
//! without touching the domain or the turn loop.

mod reasoning;
mod session_store;

pub use reasoning::{
    DelegateDescriptor, InferenceOutcome, InferenceRequest, ReasoningEngine, ReasoningError,
};
pub use session_store::{SessionStore, SessionStoreError};
