//! Backend endpoint paths, relative to the configured base URL.

/// Version prefix shared by every endpoint.
pub const API_V1: &str = "api/v1";

pub const LOGIN: &str = "api/v1/login/";
pub const TOKEN_REFRESH: &str = "api/v1/token/refresh/";
pub const GOOGLE_AUTH: &str = "api/v1/auth/google/";
pub const PROFILE: &str = "api/v1/me/";
pub const STUDENTS: &str = "api/v1/students/";
pub const COLLECTION_CATEGORIES: &str = "api/v1/collection-categories/";
pub const FEES: &str = "api/v1/fees/";
pub const PAYMENTS: &str = "api/v1/payments/";
pub const PAYMENT_SUBMISSIONS: &str = "api/v1/payment_submissions/";

/// Detail path for a single student.
#[must_use]
pub fn student(id: i64) -> String {
    format!("{STUDENTS}{id}/")
}

/// Aggregate totals for one student's fees.
#[must_use]
pub fn student_fees_summary(id: i64) -> String {
    format!("{STUDENTS}{id}/fees-summary/")
}

/// Detail path for a single fee.
#[must_use]
pub fn fee(id: i64) -> String {
    format!("{FEES}{id}/")
}

/// Detail path for a single payment.
#[must_use]
pub fn payment(id: i64) -> String {
    format!("{PAYMENTS}{id}/")
}

/// Detail path for a single payment submission.
#[must_use]
pub fn submission(id: i64) -> String {
    format!("{PAYMENT_SUBMISSIONS}{id}/")
}

/// Approval action on a payment submission.
#[must_use]
pub fn submission_approve(id: i64) -> String {
    format!("{PAYMENT_SUBMISSIONS}{id}/approve/")
}

/// Rejection action on a payment submission.
#[must_use]
pub fn submission_reject(id: i64) -> String {
    format!("{PAYMENT_SUBMISSIONS}{id}/reject/")
}
