//! Student listing, details, and per-student financial views.

use super::Portal;
use crate::endpoints;
use crate::models::{Fee, FeeSummary, Payment, PaymentSubmission, Student};
use crate::params::{FeeFilters, ListParams, StudentFilters};
use feegate_gateway::RequestDescriptor;
use feegate_types::{Envelope, Page, Result};
use serde_json::json;

/// Page size for the per-student payment and submission views, which the
/// admin screens render unpaginated.
const STUDENT_HISTORY_PAGE: u32 = 100;

impl Portal {
    /// Paginated student list.
    ///
    /// # Errors
    ///
    /// Gateway errors; superseded calls reject with an auto-cancel.
    pub async fn students(&self, params: &ListParams<StudentFilters>) -> Result<Page<Student>> {
        let desc = RequestDescriptor::get(endpoints::STUDENTS)
            .with_query(serde_json::to_value(params)?)
            .with_cancel_key("students:list");
        let env: Envelope<Page<Student>> = self.gateway.fetch(desc).await?;
        Ok(env.data)
    }

    /// One student's details, memoized per id.
    ///
    /// # Errors
    ///
    /// Gateway errors on cache miss.
    pub async fn student(&self, id: i64) -> Result<Student> {
        if let Some(hit) = self.students.get(id) {
            return Ok(hit);
        }
        let desc = RequestDescriptor::get(endpoints::student(id))
            .with_cancel_key(format!("students:detail:{id}"));
        let env: Envelope<Student> = self.gateway.fetch(desc).await?;
        self.students.insert(id, env.data.clone());
        Ok(env.data)
    }

    /// The fees issued to one student, with optional extra filters.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn student_fees(
        &self,
        student_id: i64,
        params: &ListParams<FeeFilters>,
    ) -> Result<Page<Fee>> {
        let mut params = params.clone();
        params.filters.student_id = Some(student_id);
        let desc = RequestDescriptor::get(endpoints::FEES)
            .with_query(serde_json::to_value(&params)?)
            .with_cancel_key(format!("students:fees:{student_id}"));
        let env: Envelope<Page<Fee>> = self.gateway.fetch(desc).await?;
        Ok(env.data)
    }

    /// Aggregate owed/outstanding totals for one student.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn student_fees_summary(&self, student_id: i64) -> Result<FeeSummary> {
        let desc = RequestDescriptor::get(endpoints::student_fees_summary(student_id))
            .with_cancel_key(format!("students:summary:{student_id}"));
        let env: Envelope<FeeSummary> = self.gateway.fetch(desc).await?;
        Ok(env.data)
    }

    /// One student's payment history.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn student_payments(&self, student_id: i64) -> Result<Page<Payment>> {
        let desc = RequestDescriptor::get(endpoints::PAYMENTS)
            .with_query(json!({
                "student_id": student_id,
                "per_page": STUDENT_HISTORY_PAGE,
            }))
            .with_cancel_key(format!("students:payments:{student_id}"));
        let env: Envelope<Page<Payment>> = self.gateway.fetch(desc).await?;
        Ok(env.data)
    }

    /// One student's GCash payment submissions.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn student_submissions(&self, student_id: i64) -> Result<Page<PaymentSubmission>> {
        let desc = RequestDescriptor::get(endpoints::PAYMENT_SUBMISSIONS)
            .with_query(json!({
                "student__id": student_id,
                "per_page": STUDENT_HISTORY_PAGE,
            }))
            .with_cancel_key(format!("students:submissions:{student_id}"));
        let env: Envelope<Page<PaymentSubmission>> = self.gateway.fetch(desc).await?;
        Ok(env.data)
    }
}
