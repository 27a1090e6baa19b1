//! Operation executors - the actual state transitions.
//!
//! Each executor checks every precondition before touching state, so a
//! failure never leaves a partial mutation behind and re-invoking after a
//! failure is always safe.

use chrono::Duration;

use crate::domain::catalog::Catalog;
use crate::domain::foundation::Timestamp;
use crate::domain::session::{LogAction, SessionState};

use super::outcome::OperationError;
use super::REFUND_WINDOW_DAYS;

/// Purchases a course, recording ownership and a log entry.
pub(super) fn purchase_course(
    state: &mut SessionState,
    catalog: &Catalog,
    course_id: &str,
    now: Timestamp,
) -> Result<serde_json::Value, OperationError> {
    let item = catalog
        .find(course_id)
        .ok_or_else(|| OperationError::CourseNotFound {
            course_id: course_id.to_string(),
        })?;

    if state.owns(course_id) {
        return Err(OperationError::AlreadyOwned {
            course_id: course_id.to_string(),
        });
    }

    state.record_purchase(course_id, now);
    state.append_log(LogAction::Purchase, course_id, now);

    Ok(serde_json::json!({
        "course_id": course_id,
        "name": item.name,
        "price": item.price,
        "purchased_at": now.to_display_string(),
        "message": format!("Successfully purchased {}!", item.name),
    }))
}

/// Refunds a course if owned and inside the refund window.
///
/// Removes every record matching the id so stale duplicates (only possible
/// through a corrupted store) cannot survive a refund.
pub(super) fn refund_course(
    state: &mut SessionState,
    catalog: &Catalog,
    course_id: &str,
    now: Timestamp,
) -> Result<serde_json::Value, OperationError> {
    let item = catalog
        .find(course_id)
        .ok_or_else(|| OperationError::CourseNotFound {
            course_id: course_id.to_string(),
        })?;

    let record = state
        .find_purchase(course_id)
        .ok_or_else(|| OperationError::NotOwned {
            course_id: course_id.to_string(),
        })?;

    // Strictly greater than the window is ineligible; exactly 30 days still
    // qualifies.
    let age = now.duration_since(&record.purchased_at);
    if age > Duration::days(REFUND_WINDOW_DAYS) {
        return Err(OperationError::RefundWindowExpired {
            course_id: course_id.to_string(),
            window_days: REFUND_WINDOW_DAYS,
        });
    }

    state.remove_owned(course_id);
    state.append_log(LogAction::Refund, course_id, now);

    Ok(serde_json::json!({
        "course_id": course_id,
        "name": item.name,
        "amount": item.price,
        "timestamp": now.to_display_string(),
        "message": format!(
            "Successfully refunded {}! Your ${} will be returned to your original payment method within 3-5 business days.",
            item.name, item.price
        ),
    }))
}

/// Returns the current time. No state mutation.
pub(super) fn current_time(now: Timestamp) -> serde_json::Value {
    serde_json::json!({ "current_time": now.to_display_string() })
}
