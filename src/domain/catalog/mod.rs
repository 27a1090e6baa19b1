//! Catalog - immutable reference data about purchasable courses.
//!
//! The catalog is loaded once at process start and shared read-only by all
//! agents and operations. Course content, prices, and policy text are
//! configuration data, not logic: nothing in here is mutated at runtime.

mod catalog;
mod item;
mod policy;

pub use catalog::{default_catalog, Catalog, CatalogError};
pub use item::CourseItem;
pub use policy::{COMMUNITY_GUIDELINES, COURSE_POLICIES, PRIVACY_POLICY};
