//! Persistence Adapters - Repository implementations
//!
//! These implement the repository traits from speedway-domain.

pub mod in_memory;
