//! GCash payment-submission review: listing, approve/reject, stats.

use super::Portal;
use crate::endpoints;
use crate::models::{PaymentSubmission, SubmissionStatus};
use crate::params::{ListParams, SubmissionFilters};
use feegate_gateway::RequestDescriptor;
use feegate_types::{Envelope, Page, Result};
use serde_json::{Value, json};

/// Client-side tally over a set of submissions, as shown on the review
/// dashboard header.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionStats {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub total_amount: f64,
    pub average_amount: f64,
}

impl Portal {
    /// Paginated submission list.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn submissions(
        &self,
        params: &ListParams<SubmissionFilters>,
    ) -> Result<Page<PaymentSubmission>> {
        let desc = RequestDescriptor::get(endpoints::PAYMENT_SUBMISSIONS)
            .with_query(serde_json::to_value(params)?)
            .with_cancel_key("submissions:list");
        let env: Envelope<Page<PaymentSubmission>> = self.gateway.fetch(desc).await?;
        Ok(env.data)
    }

    /// One submission's details.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn submission(&self, id: i64) -> Result<PaymentSubmission> {
        let desc = RequestDescriptor::get(endpoints::submission(id))
            .with_cancel_key(format!("submissions:detail:{id}"));
        let env: Envelope<PaymentSubmission> = self.gateway.fetch(desc).await?;
        Ok(env.data)
    }

    /// Approves a payment proof, creating the corresponding payment on the
    /// backend. Memoized fee details are dropped since balances changed.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn approve_submission(
        &self,
        id: i64,
        remarks: Option<&str>,
    ) -> Result<PaymentSubmission> {
        let body = match remarks {
            Some(r) => json!({ "remarks": r }),
            None => json!({}),
        };
        let desc = RequestDescriptor::post(endpoints::submission_approve(id))
            .with_body(body)
            .with_cancel_key(format!("submissions:approve:{id}"));
        let env: Envelope<PaymentSubmission> = self.gateway.fetch(desc).await?;
        self.fees.clear();
        tracing::info!(submission = id, "submission approved");
        Ok(env.data)
    }

    /// Rejects a payment proof. Remarks are mandatory so the student sees
    /// why.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn reject_submission(&self, id: i64, remarks: &str) -> Result<PaymentSubmission> {
        let desc = RequestDescriptor::post(endpoints::submission_reject(id))
            .with_body(json!({ "remarks": remarks }))
            .with_cancel_key(format!("submissions:reject:{id}"));
        let env: Envelope<PaymentSubmission> = self.gateway.fetch(desc).await?;
        tracing::info!(submission = id, "submission rejected");
        Ok(env.data)
    }

    /// Deletes a submission.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn delete_submission(&self, id: i64) -> Result<()> {
        let desc = RequestDescriptor::delete(endpoints::submission(id))
            .with_cancel_key(format!("submissions:delete:{id}"));
        let _: Value = self.gateway.request(desc).await?;
        Ok(())
    }

    /// Counts and amount totals over a set of submissions. Unparseable
    /// amounts count as zero.
    #[must_use]
    pub fn submission_stats(submissions: &[PaymentSubmission]) -> SubmissionStats {
        let mut stats = SubmissionStats {
            pending: 0,
            approved: 0,
            rejected: 0,
            total_amount: 0.0,
            average_amount: 0.0,
        };
        for sub in submissions {
            match sub.status {
                SubmissionStatus::Pending => stats.pending += 1,
                SubmissionStatus::Approved => stats.approved += 1,
                SubmissionStatus::Rejected => stats.rejected += 1,
            }
            stats.total_amount += sub.amount_paid.parse::<f64>().unwrap_or(0.0);
        }
        if !submissions.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            {
                stats.average_amount = stats.total_amount / submissions.len() as f64;
            }
        }
        stats
    }
}
