//! Operation call and definition value objects.

use serde::{Deserialize, Serialize};

/// A request to invoke an operation, as emitted by the reasoning engine.
///
/// Arguments arrive as loosely-typed JSON; the registry validates them
/// against the operation's schema before anything executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCall {
    name: String,
    arguments: serde_json::Value,
}

impl OperationCall {
    /// Creates a new operation call.
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Creates a call with no arguments.
    pub fn without_arguments(name: impl Into<String>) -> Self {
        Self::new(name, serde_json::json!({}))
    }

    /// Returns the operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw arguments.
    pub fn arguments(&self) -> &serde_json::Value {
        &self.arguments
    }

    /// Extracts a required string argument.
    pub fn string_argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

/// Definition of an operation: name, documentation, and parameter schema.
///
/// Serves both validation (before execution) and the reasoning engine
/// (rendered as a tool the model may call).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDefinition {
    name: String,
    description: String,
    parameters_schema: serde_json::Value,
}

impl OperationDefinition {
    /// Creates a new operation definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
        }
    }

    /// Returns the operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters schema.
    pub fn parameters_schema(&self) -> &serde_json::Value {
        &self.parameters_schema
    }

    /// Names of required parameters, per the schema's `required` list.
    pub fn required_parameters(&self) -> Vec<&str> {
        self.parameters_schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
            .unwrap_or_default()
    }

    /// Converts to Anthropic tool format.
    pub fn to_anthropic_format(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.parameters_schema
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_definition() -> OperationDefinition {
        OperationDefinition::new(
            "purchase_course",
            "Purchase a course by id",
            serde_json::json!({
                "type": "object",
                "required": ["course_id"],
                "properties": {
                    "course_id": { "type": "string" }
                }
            }),
        )
    }

    #[test]
    fn string_argument_extracts_present_values() {
        let call = OperationCall::new(
            "purchase_course",
            serde_json::json!({ "course_id": "ai_chatbot_mastery" }),
        );
        assert_eq!(call.string_argument("course_id"), Some("ai_chatbot_mastery"));
        assert_eq!(call.string_argument("missing"), None);
    }

    #[test]
    fn string_argument_rejects_non_strings() {
        let call = OperationCall::new("purchase_course", serde_json::json!({ "course_id": 42 }));
        assert_eq!(call.string_argument("course_id"), None);
    }

    #[test]
    fn required_parameters_follow_schema() {
        assert_eq!(sample_definition().required_parameters(), vec!["course_id"]);
        let no_params = OperationDefinition::new(
            "current_time",
            "Get the current time",
            serde_json::json!({ "type": "object", "properties": {} }),
        );
        assert!(no_params.required_parameters().is_empty());
    }

    #[test]
    fn anthropic_format_uses_input_schema_key() {
        let tool = sample_definition().to_anthropic_format();
        assert_eq!(tool["name"], "purchase_course");
        assert!(tool["input_schema"]["required"].is_array());
    }
}
