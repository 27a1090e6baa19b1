//! Course Concierge - Multi-Agent Customer Support Backend
//!
//! This crate implements coordinator-routed customer support for an online
//! course community: a root coordinator hands each conversational turn to a
//! specialized agent (sales, orders, course support, policy), and agents act
//! on shared per-user session state only through a closed, schema-validated
//! operation registry.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
