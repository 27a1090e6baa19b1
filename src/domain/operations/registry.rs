//! Operation registry - per-agent scoping, validation, and dispatch.

use std::collections::HashMap;

use crate::domain::agents::AgentKind;
use crate::domain::catalog::Catalog;
use crate::domain::foundation::Timestamp;
use crate::domain::session::SessionState;

use super::call::{OperationCall, OperationDefinition};
use super::executors;
use super::outcome::{OperationError, OperationOutcome};

/// Name of the purchase operation.
pub const PURCHASE_COURSE: &str = "purchase_course";
/// Name of the refund operation.
pub const REFUND_COURSE: &str = "refund_course";
/// Name of the clock operation.
pub const CURRENT_TIME: &str = "current_time";

/// Central registry of every operation agents may request.
///
/// Holds the static definitions and the per-agent scope. Execution is a
/// closed dispatch over registered names: unknown names, out-of-scope
/// requests, and malformed arguments are rejected before anything runs,
/// and rejection is an [`OperationOutcome`], never a fault.
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    definitions: Vec<OperationDefinition>,
    agent_scopes: HashMap<AgentKind, Vec<&'static str>>,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationRegistry {
    /// Creates the registry with the built-in operations and scopes.
    pub fn new() -> Self {
        let definitions = vec![
            OperationDefinition::new(
                PURCHASE_COURSE,
                "Purchase a course from the catalog for the current user. \
                 Fails if the course id is unknown or the user already owns it.",
                serde_json::json!({
                    "type": "object",
                    "required": ["course_id"],
                    "properties": {
                        "course_id": {
                            "type": "string",
                            "description": "Catalog id of the course to purchase"
                        }
                    }
                }),
            ),
            OperationDefinition::new(
                REFUND_COURSE,
                "Refund a course the user owns, if purchased within the last 30 days. \
                 Fails if the course id is unknown, not owned, or outside the refund window.",
                serde_json::json!({
                    "type": "object",
                    "required": ["course_id"],
                    "properties": {
                        "course_id": {
                            "type": "string",
                            "description": "Catalog id of the course to refund"
                        }
                    }
                }),
            ),
            OperationDefinition::new(
                CURRENT_TIME,
                "Get the current time in YYYY-MM-DD HH:MM:SS format.",
                serde_json::json!({
                    "type": "object",
                    "properties": {}
                }),
            ),
        ];

        let mut agent_scopes: HashMap<AgentKind, Vec<&'static str>> = HashMap::new();
        agent_scopes.insert(AgentKind::Sales, vec![PURCHASE_COURSE]);
        agent_scopes.insert(AgentKind::Orders, vec![REFUND_COURSE, CURRENT_TIME]);
        agent_scopes.insert(AgentKind::Coordinator, vec![]);
        agent_scopes.insert(AgentKind::CourseSupport, vec![]);
        agent_scopes.insert(AgentKind::Policy, vec![]);

        Self {
            definitions,
            agent_scopes,
        }
    }

    /// Looks up a definition by name.
    pub fn definition(&self, name: &str) -> Option<&OperationDefinition> {
        self.definitions.iter().find(|d| d.name() == name)
    }

    /// Returns the definitions an agent is authorized to request.
    pub fn definitions_for(&self, agent: AgentKind) -> Vec<OperationDefinition> {
        let scope = match self.agent_scopes.get(&agent) {
            Some(scope) => scope,
            None => return Vec::new(),
        };
        self.definitions
            .iter()
            .filter(|d| scope.contains(&d.name()))
            .cloned()
            .collect()
    }

    /// Returns true if the agent may request the named operation.
    pub fn is_permitted(&self, agent: AgentKind, name: &str) -> bool {
        self.agent_scopes
            .get(&agent)
            .is_some_and(|scope| scope.contains(&name))
    }

    /// Validates a call against the registry and the agent's scope.
    pub fn validate(&self, agent: AgentKind, call: &OperationCall) -> Result<(), OperationError> {
        let definition =
            self.definition(call.name())
                .ok_or_else(|| OperationError::UnknownOperation {
                    name: call.name().to_string(),
                })?;

        if !self.is_permitted(agent, call.name()) {
            return Err(OperationError::NotPermitted {
                agent: agent.to_string(),
                name: call.name().to_string(),
            });
        }

        if !call.arguments().is_object() {
            return Err(OperationError::InvalidArguments {
                name: call.name().to_string(),
                reason: "arguments must be a JSON object".to_string(),
            });
        }

        for required in definition.required_parameters() {
            if call.string_argument(required).is_none() {
                return Err(OperationError::InvalidArguments {
                    name: call.name().to_string(),
                    reason: format!("missing required string parameter '{}'", required),
                });
            }
        }

        Ok(())
    }

    /// Validates and executes a call against the session state.
    ///
    /// The outcome is always data; failures never partially mutate state.
    pub fn execute(
        &self,
        agent: AgentKind,
        call: &OperationCall,
        state: &mut SessionState,
        catalog: &Catalog,
        now: Timestamp,
    ) -> OperationOutcome {
        if let Err(error) = self.validate(agent, call) {
            return OperationOutcome::failure(call.name(), error);
        }

        let result = match call.name() {
            PURCHASE_COURSE => {
                // Validated above: course_id is present.
                let course_id = call.string_argument("course_id").unwrap_or_default();
                executors::purchase_course(state, catalog, course_id, now)
            }
            REFUND_COURSE => {
                let course_id = call.string_argument("course_id").unwrap_or_default();
                executors::refund_course(state, catalog, course_id, now)
            }
            CURRENT_TIME => Ok(executors::current_time(now)),
            other => Err(OperationError::UnknownOperation {
                name: other.to_string(),
            }),
        };

        match result {
            Ok(payload) => OperationOutcome::success(call.name(), payload),
            Err(error) => OperationOutcome::failure(call.name(), error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::default_catalog;

    const COURSE: &str = "prompt_engineering_deep_dive";

    fn purchase_call(course_id: &str) -> OperationCall {
        OperationCall::new(PURCHASE_COURSE, serde_json::json!({ "course_id": course_id }))
    }

    #[test]
    fn sales_scope_is_purchase_only() {
        let registry = OperationRegistry::new();
        let names: Vec<String> = registry
            .definitions_for(AgentKind::Sales)
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec![PURCHASE_COURSE.to_string()]);
    }

    #[test]
    fn orders_scope_is_refund_and_clock() {
        let registry = OperationRegistry::new();
        let names: Vec<String> = registry
            .definitions_for(AgentKind::Orders)
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![REFUND_COURSE.to_string(), CURRENT_TIME.to_string()]
        );
    }

    #[test]
    fn support_and_policy_have_no_operations() {
        let registry = OperationRegistry::new();
        assert!(registry.definitions_for(AgentKind::CourseSupport).is_empty());
        assert!(registry.definitions_for(AgentKind::Policy).is_empty());
        assert!(registry.definitions_for(AgentKind::Coordinator).is_empty());
    }

    #[test]
    fn unknown_operation_is_rejected_without_executing() {
        let registry = OperationRegistry::new();
        let mut state = SessionState::initial();
        let call = OperationCall::without_arguments("grant_discount");

        let outcome = registry.execute(
            AgentKind::Sales,
            &call,
            &mut state,
            default_catalog(),
            Timestamp::now(),
        );
        assert!(matches!(
            outcome.error(),
            Some(OperationError::UnknownOperation { .. })
        ));
        assert!(state.interaction_log().is_empty());
    }

    #[test]
    fn out_of_scope_operation_is_not_permitted() {
        let registry = OperationRegistry::new();
        let mut state = SessionState::initial();
        let call = OperationCall::new(REFUND_COURSE, serde_json::json!({ "course_id": COURSE }));

        let outcome = registry.execute(
            AgentKind::Sales,
            &call,
            &mut state,
            default_catalog(),
            Timestamp::now(),
        );
        assert!(matches!(
            outcome.error(),
            Some(OperationError::NotPermitted { .. })
        ));
    }

    #[test]
    fn missing_course_id_fails_validation() {
        let registry = OperationRegistry::new();
        let call = OperationCall::without_arguments(PURCHASE_COURSE);
        let err = registry.validate(AgentKind::Sales, &call).unwrap_err();
        assert!(matches!(err, OperationError::InvalidArguments { .. }));
    }

    #[test]
    fn non_object_arguments_fail_validation() {
        let registry = OperationRegistry::new();
        let call = OperationCall::new(CURRENT_TIME, serde_json::json!("now please"));
        let err = registry.validate(AgentKind::Orders, &call).unwrap_err();
        assert!(matches!(err, OperationError::InvalidArguments { .. }));
    }

    #[test]
    fn execute_purchase_then_refund_round_trip() {
        let registry = OperationRegistry::new();
        let mut state = SessionState::initial();
        let now = Timestamp::now();

        let outcome = registry.execute(
            AgentKind::Sales,
            &purchase_call(COURSE),
            &mut state,
            default_catalog(),
            now,
        );
        assert!(outcome.is_success());
        assert_eq!(state.owned_courses().len(), 1);

        let refund = OperationCall::new(REFUND_COURSE, serde_json::json!({ "course_id": COURSE }));
        let outcome = registry.execute(
            AgentKind::Orders,
            &refund,
            &mut state,
            default_catalog(),
            now.add_days(10),
        );
        assert!(outcome.is_success());
        assert!(state.owned_courses().is_empty());
        assert_eq!(state.interaction_log().len(), 2);
    }

    #[test]
    fn current_time_executes_for_orders() {
        let registry = OperationRegistry::new();
        let mut state = SessionState::initial();
        let call = OperationCall::without_arguments(CURRENT_TIME);

        let outcome = registry.execute(
            AgentKind::Orders,
            &call,
            &mut state,
            default_catalog(),
            Timestamp::now(),
        );
        assert!(outcome.is_success());
        assert!(state.interaction_log().is_empty());
    }
}
