//! Core types and traits for the feegate workspace.
//!
//! This crate defines the shared abstractions used across all layers of the
//! feegate client, including the error taxonomy, session token pair, response
//! envelopes, and the async session-store trait that the gateway reads
//! credentials through.

pub mod envelope;
pub mod error;
pub mod token;
pub mod traits;

pub use envelope::{Envelope, Page};
pub use error::GateError;
pub use token::SessionTokens;
pub use traits::{LogoutHook, Result, SessionStore};
