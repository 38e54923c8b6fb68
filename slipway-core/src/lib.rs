//! Slipway Core
//!
//! Core types and abstractions for the Slipway release-lifecycle system.
//!
//! This crate contains:
//! - Domain types: Release aggregate, deployment pipeline, approval workflows
//! - DTOs: Request/response objects exchanged with the server
//! - Ports: Repository interfaces implemented by the storage layer

pub mod domain;
pub mod dto;
pub mod ports;
