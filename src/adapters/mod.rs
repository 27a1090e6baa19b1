//! Adapters - implementations of port interfaces.
//!
//! - `reasoning` - Anthropic Messages API engine and a scripted test engine
//! - `store` - in-memory and YAML-file session stores

pub mod reasoning;
pub mod store;

pub use reasoning::{AnthropicConfig, AnthropicEngine, ScriptedEngine};
pub use store::{InMemorySessionStore, YamlFileSessionStore};
