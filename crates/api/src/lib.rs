//! Typed endpoint wrappers over the gateway client.
//!
//! A [`Portal`] groups the backend's resources (auth, students, fees,
//! payments, payment submissions) into typed methods, adds per-id
//! memoization for hot detail lookups, and assigns every call an explicit
//! cancellation key so rapid repeats supersede instead of piling up.

pub mod cache;
pub mod endpoints;
pub mod models;
pub mod params;
pub mod portal;
pub mod retry;

pub use cache::MemoCache;
pub use params::{FeeFilters, ListParams, PaymentFilters, StudentFilters, SubmissionFilters};
pub use portal::Portal;
pub use retry::with_retry;
