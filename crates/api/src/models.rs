//! Wire models for the fee-management backend.
//!
//! Field names follow the backend's serializers exactly, including the
//! legacy `s_`-prefixed student columns. Monetary amounts arrive as decimal
//! strings and are kept that way; parsing happens only where arithmetic is
//! needed (see [`crate::portal::SubmissionStats`]).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Enrolled,
    Graduated,
    Dropped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    #[serde(rename = "s_studentID")]
    pub student_id: String,
    #[serde(rename = "s_rfid", default, skip_serializing_if = "Option::is_none")]
    pub rfid: Option<String>,
    #[serde(rename = "s_fname")]
    pub first_name: String,
    #[serde(rename = "s_mname", default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(rename = "s_lname")]
    pub last_name: String,
    #[serde(rename = "s_suffix", default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(rename = "s_set", default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(rename = "s_lvl")]
    pub level: u8,
    #[serde(rename = "s_status")]
    pub status: StudentStatus,
    #[serde(rename = "s_image", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub program_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Student {
    /// Display name: "First [Middle] Last[ Suffix]".
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut name = self.first_name.clone();
        if let Some(middle) = &self.middle_name {
            name.push(' ');
            name.push_str(middle);
        }
        name.push(' ');
        name.push_str(&self.last_name);
        if let Some(suffix) = &self.suffix {
            name.push(' ');
            name.push_str(suffix);
        }
        name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Pending,
    Partial,
    Paid,
    Waived,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    First,
    Second,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fee {
    pub id: i64,
    pub student_id: i64,
    pub category_id: i64,
    pub category_name: String,
    /// Decimal amount as sent by the backend, e.g. `"1500.00"`.
    pub total_amount: String,
    pub balance: String,
    pub status: FeeStatus,
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_by_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub academic_year: String,
    pub semester: Semester,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Aggregate totals for one student's fees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSummary {
    pub student_id: i64,
    pub total_amount: f64,
    pub total_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Gcash,
    Bank,
    Online,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub fee_id: i64,
    pub amount_paid: String,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_by_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_submission_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Create DTO for a payment against an outstanding fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub fee_id: i64,
    pub amount_paid: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

/// A GCash payment proof uploaded by a student, awaiting staff review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSubmission {
    pub id: i64,
    pub student_id: i64,
    pub fee_id: i64,
    #[serde(default)]
    pub screenshot_urls: Vec<String>,
    pub amount_paid: String,
    pub reference_number: String,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
}
