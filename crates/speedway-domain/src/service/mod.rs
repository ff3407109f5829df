//! Domain Services - Stateless rules that span entities
//!
//! Each service is a unit struct. Validation works on shared references
//! and returns the changes to make; applying them is a separate call, so a
//! rejected request never leaves a half-updated match behind.

pub mod aggregation;
pub mod events;
pub mod fixture;
pub mod nomination;
pub mod scoring;
pub mod substitution;
