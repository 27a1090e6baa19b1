//! Reasoning engine adapters.

mod anthropic;
mod scripted;

pub use anthropic::{AnthropicConfig, AnthropicEngine};
pub use scripted::ScriptedEngine;
