//! List-query parameters.
//!
//! Every field is optional and skipped when unset, so empty values never
//! reach the query string. Filters flatten into the same level as the
//! pagination fields.

use serde::Serialize;

/// Pagination, search, and ordering parameters plus a resource-specific
/// filter struct.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListParams<F: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    #[serde(flatten)]
    pub filters: F,
}

impl<F: Serialize + Default> ListParams<F> {
    /// Parameters selecting the given page with everything else unset.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Parameters carrying only a search term.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StudentFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s_lvl: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FeeFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// Submission list filters. The backend filters by the related student via
/// the double-underscore lookup name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmissionFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student__id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PaymentFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_never_serialize() {
        let params = ListParams::<StudentFilters>::default();
        let v = serde_json::to_value(&params).unwrap();
        assert_eq!(v, serde_json::json!({}));
    }

    #[test]
    fn test_set_fields_flatten() {
        let params = ListParams {
            page: Some(2),
            per_page: Some(50),
            search: Some("cruz".into()),
            ordering: None,
            filters: StudentFilters {
                program_id: Some(4),
                s_status: Some("enrolled".into()),
                s_lvl: None,
            },
        };
        let v = serde_json::to_value(&params).unwrap();
        assert_eq!(v["page"], 2);
        assert_eq!(v["per_page"], 50);
        assert_eq!(v["search"], "cruz");
        assert_eq!(v["program_id"], 4);
        assert_eq!(v["s_status"], "enrolled");
        assert!(v.get("ordering").is_none());
        assert!(v.get("s_lvl").is_none());
    }

    #[test]
    fn test_submission_filter_lookup_name() {
        let params = ListParams {
            filters: SubmissionFilters {
                student__id: Some(9),
                status: Some("pending".into()),
            },
            ..Default::default()
        };
        let v = serde_json::to_value(&params).unwrap();
        assert_eq!(v["student__id"], 9);
        assert_eq!(v["status"], "pending");
    }

    #[test]
    fn test_page_and_search_shorthands() {
        let v = serde_json::to_value(ListParams::<FeeFilters>::page(3)).unwrap();
        assert_eq!(v, serde_json::json!({"page": 3}));

        let v = serde_json::to_value(ListParams::<FeeFilters>::search("tuition")).unwrap();
        assert_eq!(v, serde_json::json!({"search": "tuition"}));
    }
}
