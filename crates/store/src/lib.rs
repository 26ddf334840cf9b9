//! Session-store backends for persisting the login token pair.
//!
//! Provides an in-memory store for testing and a JSON-file store so CLI
//! sessions survive between invocations.

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::InMemorySessionStore;
