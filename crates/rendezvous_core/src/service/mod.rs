//! Meeting use-cases: validation, conflict detection, pagination.
//!
//! # Responsibility
//! - Enforce meeting invariants before anything reaches the store.
//! - Keep callers (CLI, transports) decoupled from storage details.

pub mod conflict;
pub mod error;
pub mod meeting_service;
pub mod pagination;
pub mod validator;
