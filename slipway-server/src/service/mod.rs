//! Service Module
//!
//! Use-case layer for the server. Each use case performs one load, the
//! read-only collaborator lookups it needs, one in-memory mutation through
//! the aggregate, and one save. Boolean-false results from domain methods
//! are translated into labeled validation failures here.

pub mod approval;
pub mod release;
