//! The [`Portal`]: typed access to every backend resource.

mod auth;
mod fees;
mod payments;
mod students;
mod submissions;

pub use submissions::SubmissionStats;

use crate::cache::MemoCache;
use crate::models::{Fee, Student};
use feegate_gateway::GatewayClient;
use std::sync::Arc;

/// Groups the backend's resources into typed methods over one gateway
/// client.
///
/// Detail lookups for students and fees are memoized per id; mutations that
/// change fee balances invalidate the affected entries. Every method passes
/// an explicit cancellation key, so re-issuing a call (rapid pagination,
/// repeated search) supersedes the previous one instead of racing it.
pub struct Portal {
    gateway: Arc<GatewayClient>,
    students: MemoCache<Student>,
    fees: MemoCache<Fee>,
}

impl Portal {
    #[must_use]
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self {
            gateway,
            students: MemoCache::new(),
            fees: MemoCache::new(),
        }
    }

    /// The underlying gateway client (for raw requests and `cancel`).
    #[must_use]
    pub fn gateway(&self) -> &Arc<GatewayClient> {
        &self.gateway
    }

    /// Drops all memoized student and fee details.
    pub fn clear_caches(&self) {
        self.students.clear();
        self.fees.clear();
    }
}
