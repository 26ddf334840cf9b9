//! Fee listing and details.

use super::Portal;
use crate::endpoints;
use crate::models::Fee;
use crate::params::{FeeFilters, ListParams};
use feegate_gateway::RequestDescriptor;
use feegate_types::{Envelope, Page, Result};

impl Portal {
    /// Paginated fee list.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn fees(&self, params: &ListParams<FeeFilters>) -> Result<Page<Fee>> {
        let desc = RequestDescriptor::get(endpoints::FEES)
            .with_query(serde_json::to_value(params)?)
            .with_cancel_key("fees:list");
        let env: Envelope<Page<Fee>> = self.gateway.fetch(desc).await?;
        Ok(env.data)
    }

    /// One fee's details, memoized per id. Invalidated when a payment lands
    /// against it.
    ///
    /// # Errors
    ///
    /// Gateway errors on cache miss.
    pub async fn fee(&self, id: i64) -> Result<Fee> {
        if let Some(hit) = self.fees.get(id) {
            return Ok(hit);
        }
        let desc =
            RequestDescriptor::get(endpoints::fee(id)).with_cancel_key(format!("fees:detail:{id}"));
        let env: Envelope<Fee> = self.gateway.fetch(desc).await?;
        self.fees.insert(id, env.data.clone());
        Ok(env.data)
    }
}
