//! Operations - the closed, side-effecting surface agents may request.
//!
//! Agents never mutate session state directly: they emit an
//! [`OperationCall`] by name, the registry validates it against a static
//! schema and the requesting agent's scope, and only then executes it.
//! Every correctness-bearing business rule (ownership uniqueness, the
//! 30-day refund window, the append-only log) lives here, not in
//! instruction text.

mod call;
mod executors;
mod outcome;
mod registry;

pub use call::{OperationCall, OperationDefinition};
pub use outcome::{OperationError, OperationOutcome};
pub use registry::{OperationRegistry, CURRENT_TIME, PURCHASE_COURSE, REFUND_COURSE};

/// Refund eligibility window, measured from the purchase timestamp.
pub const REFUND_WINDOW_DAYS: i64 = 30;
