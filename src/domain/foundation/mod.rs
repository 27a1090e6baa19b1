//! Foundation - shared value objects used across the domain.

mod ids;
mod timestamp;

pub use ids::{SessionId, UserId};
pub use timestamp::Timestamp;
