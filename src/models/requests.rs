use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{FilterSpec, SortMode};

/// A search built from the user-facing controls: free-text query plus
/// structured filters, sort mode, and pagination.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filters: FilterSpec,
    #[serde(rename = "sortBy", default)]
    pub sort: SortMode,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            filters: FilterSpec::default(),
            sort: SortMode::default(),
            limit: default_limit(),
            offset: 0,
        }
    }
}
