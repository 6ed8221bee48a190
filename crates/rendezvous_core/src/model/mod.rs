//! Meeting domain model.
//!
//! # Responsibility
//! - Define request shapes accepted before validation.
//! - Define validated meeting records shared by store and service layers.
//!
//! # Invariants
//! - A `Meeting` only exists after the validator accepted its candidate.
//! - RSVP values are a closed enum once past validation.

pub mod meeting;
