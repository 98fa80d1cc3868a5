//! Test doubles for the store traits.

pub mod memory;
pub mod repositories;

pub use memory::InMemoryStore;
