//! Core domain types
//!
//! This module contains the core domain structures of Slipway. Aggregates
//! (Release, ApprovalWorkflow) keep their state private and are mutated only
//! through their own methods; persisted state re-enters through the
//! `reconstitute` factories.

pub mod approval;
pub mod pipeline;
pub mod release;
