//! Data Transfer Objects for the Slipway API
//!
//! This module contains the request and response shapes exchanged between
//! callers and the server. DTOs are lightweight representations optimized
//! for network transfer; the domain aggregates stay behind them.

pub mod approval;
pub mod release;
