//! # ClassDesk Core
//!
//! Domain types and the subject-assignment workflow: matching instructors to
//! course, section and schedule slots for an academic year and semester.
//!
//! - **Catalog**: on-demand snapshot of instructors and courses
//! - **Validator**: completeness and duplicate checks, no I/O
//! - **Coordinator**: drives a submission from raw selection to persisted rows
//!
//! Persistence is reached through the traits in [`store`]; the `classdesk-db`
//! crate provides the PostgreSQL implementation.

pub mod catalog;
pub mod coordinator;
pub mod errors;
pub mod flow;
pub mod models;
pub mod store;
pub mod validator;
