//! Agent kinds and routing metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of agents.
///
/// The coordinator is the routing entry point; the four specialists handle
/// domain conversations. Routing is single-level: the coordinator may
/// transfer a turn to exactly one specialist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Coordinator,
    Sales,
    Orders,
    CourseSupport,
    Policy,
}

impl AgentKind {
    /// All specialists the coordinator may transfer to.
    pub const SPECIALISTS: [AgentKind; 4] = [
        AgentKind::Sales,
        AgentKind::Orders,
        AgentKind::CourseSupport,
        AgentKind::Policy,
    ];

    /// Stable wire name of the agent.
    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::Coordinator => "coordinator",
            AgentKind::Sales => "sales",
            AgentKind::Orders => "orders",
            AgentKind::CourseSupport => "course_support",
            AgentKind::Policy => "policy",
        }
    }

    /// Resolves a wire name back to an agent kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "coordinator" => Some(AgentKind::Coordinator),
            "sales" => Some(AgentKind::Sales),
            "orders" => Some(AgentKind::Orders),
            "course_support" => Some(AgentKind::CourseSupport),
            "policy" => Some(AgentKind::Policy),
            _ => None,
        }
    }

    /// One-line description used when listing delegates to the coordinator.
    pub fn description(&self) -> &'static str {
        match self {
            AgentKind::Coordinator => {
                "Routes each customer turn to the right specialist agent"
            }
            AgentKind::Sales => {
                "Handles course discovery and purchases for all courses in the catalog"
            }
            AgentKind::Orders => {
                "Handles purchase history questions and processes refunds"
            }
            AgentKind::CourseSupport => {
                "Helps with the content of courses the user already owns"
            }
            AgentKind::Policy => {
                "Answers questions about community guidelines and course policies"
            }
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in AgentKind::SPECIALISTS
            .iter()
            .chain(std::iter::once(&AgentKind::Coordinator))
        {
            assert_eq!(AgentKind::from_name(kind.name()), Some(*kind));
        }
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        assert_eq!(AgentKind::from_name("billing"), None);
    }

    #[test]
    fn specialists_exclude_the_coordinator() {
        assert!(!AgentKind::SPECIALISTS.contains(&AgentKind::Coordinator));
        assert_eq!(AgentKind::SPECIALISTS.len(), 4);
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&AgentKind::CourseSupport).unwrap();
        assert_eq!(json, "\"course_support\"");
    }
}
