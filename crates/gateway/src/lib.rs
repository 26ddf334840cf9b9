//! HTTP gateway client with keyed cancellation and transparent 401 refresh.
//!
//! The gateway issues authenticated requests against the backend, refreshes
//! expired credentials at most once per request, and lets any in-flight
//! request be superseded or cancelled by key so that rapid repeated actions
//! produce only the result of the most recent request.

pub mod client;
pub mod descriptor;

pub use client::{GatewayClient, REFRESH_ENDPOINT};
pub use descriptor::RequestDescriptor;
pub use reqwest::Method;
