//! Payment listing and creation, including the bulk/distributed flow.

use super::Portal;
use crate::endpoints;
use crate::models::{NewPayment, Payment};
use crate::params::{ListParams, PaymentFilters};
use feegate_gateway::RequestDescriptor;
use feegate_types::{Envelope, Page, Result};
use serde_json::Value;

impl Portal {
    /// Paginated payment list.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn payments(&self, params: &ListParams<PaymentFilters>) -> Result<Page<Payment>> {
        let desc = RequestDescriptor::get(endpoints::PAYMENTS)
            .with_query(serde_json::to_value(params)?)
            .with_cancel_key("payments:list");
        let env: Envelope<Page<Payment>> = self.gateway.fetch(desc).await?;
        Ok(env.data)
    }

    /// Records one payment against an outstanding fee.
    ///
    /// The memoized detail for that fee is invalidated, since its balance
    /// just changed.
    ///
    /// # Errors
    ///
    /// Gateway errors; a 400 carries the backend's validation error map.
    pub async fn create_payment(&self, payment: &NewPayment) -> Result<Payment> {
        let desc = RequestDescriptor::post(endpoints::PAYMENTS)
            .with_body(serde_json::to_value(payment)?)
            .with_cancel_key("payments:create");
        let env: Envelope<Payment> = self.gateway.fetch(desc).await?;
        self.fees.invalidate(payment.fee_id);
        tracing::info!(fee_id = payment.fee_id, amount = %payment.amount_paid, "payment recorded");
        Ok(env.data)
    }

    /// Records a batch of payments sequentially: the distributed-payment
    /// flow, where one cash amount is split across several outstanding fees.
    ///
    /// Posts stop at the first failure; already-created payments stand.
    ///
    /// # Errors
    ///
    /// The first failing payment's error.
    pub async fn create_payments(&self, payments: &[NewPayment]) -> Result<Vec<Payment>> {
        let mut created = Vec::with_capacity(payments.len());
        for payment in payments {
            created.push(self.create_payment(payment).await?);
        }
        Ok(created)
    }

    /// Partially updates a payment.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn update_payment(&self, id: i64, patch: Value) -> Result<Payment> {
        let desc = RequestDescriptor::patch(endpoints::payment(id))
            .with_body(patch)
            .with_cancel_key(format!("payments:update:{id}"));
        let env: Envelope<Payment> = self.gateway.fetch(desc).await?;
        Ok(env.data)
    }
}
