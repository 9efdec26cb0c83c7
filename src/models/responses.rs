use serde::{Deserialize, Serialize};

use crate::models::domain::{MapEntity, ScoredListing};

/// Response for a search: one page of scored listings plus result
/// accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub listings: Vec<ScoredListing>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    pub offset: usize,
    pub limit: usize,
}

/// Response for a map viewport: clustered entities ready to render, plus a
/// count of listings dropped for bad coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapViewResponse {
    pub entities: Vec<MapEntity>,
    pub skipped: usize,
    pub zoom: u8,
}
