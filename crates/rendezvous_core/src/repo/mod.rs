//! Store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the collaborator interface the validator and service read through.
//! - Isolate SQLite query details from scheduling logic.
//!
//! # Invariants
//! - Store APIs distinguish transport failures (`Db`) from corrupt rows
//!   (`InvalidData`); neither is ever reported as an empty result.

pub mod meeting_repo;
