//! Gida Engine - property discovery engine for the Gida real-estate platform
//!
//! This library powers the map and list views of the platform: a
//! multi-criteria filter/sort/paginate pipeline over geolocated listings, a
//! viewport-driven spatial cluster engine for map markers, and a proximity
//! matcher that finds infrastructure near a listing. All operations are pure
//! functions over caller-owned, in-memory collections; the rendering layer
//! owns every piece of mutable view state.

pub mod cache;
pub mod config;
pub mod core;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use crate::cache::{ClusterCache, ClusterCacheKey};
pub use crate::config::EngineSettings;
pub use crate::core::{
    apply_filters, cluster_listings, nearest_infrastructure, relevance_score, sort_listings,
    ClusterOptions, DiscoveryEngine, Haversine, Planar,
};
pub use crate::error::EngineError;
pub use crate::models::{
    BoundingBox, FilterSpec, GeoPoint, InfrastructureCatalog, InfrastructureItem, Listing,
    MapEntity, PropertyType, SearchRequest, SearchResponse, SortMode,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let point = GeoPoint::new(7.491, 9.082).unwrap();
        assert_eq!(point.longitude, 7.491);

        let engine = DiscoveryEngine::default();
        assert_eq!(engine.settings().clustering.min_points, 2);
    }
}
