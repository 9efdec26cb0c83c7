use chrono::{Datelike, Utc};
use validator::Validate;

use crate::config::EngineSettings;
use crate::core::cluster::{cluster_listings, ClusterOptions};
use crate::core::distance::{DistanceMetric, Planar};
use crate::core::filters::{apply_filters, FilterContext};
use crate::core::proximity::{nearest_infrastructure, ProximityOptions};
use crate::core::scoring::{score_listings, sort_listings, RelevanceWeights};
use crate::error::EngineError;
use crate::models::{
    BoundingBox, InfrastructureCatalog, Listing, MapViewResponse, NearbyItem, SearchRequest,
    SearchResponse,
};

/// Discovery engine facade.
///
/// Drives the full pipeline the rendering layer invokes: filter → score →
/// sort → paginate for the list view, viewport clustering for the map view,
/// and proximity lookups for the listing detail view. Every operation is a
/// pure read of caller-owned collections, so rapid re-invocation on map
/// movement is safe; a newer call simply supersedes an older one.
pub struct DiscoveryEngine {
    settings: EngineSettings,
    metric: Box<dyn DistanceMetric + Send + Sync>,
}

impl DiscoveryEngine {
    /// Engine with the planar metric the listing data was built around.
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            metric: Box::new(Planar),
        }
    }

    /// Engine with a caller-selected distance metric.
    pub fn with_metric(
        settings: EngineSettings,
        metric: Box<dyn DistanceMetric + Send + Sync>,
    ) -> Self {
        Self {
            settings,
            metric,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run a search over the listing collection.
    ///
    /// The catalog is only needed when the request activates distance-to
    /// filters; pass `None` otherwise.
    pub fn search(
        &self,
        listings: &[Listing],
        catalog: Option<&InfrastructureCatalog>,
        request: &SearchRequest,
    ) -> Result<SearchResponse, EngineError> {
        request.validate()?;

        let total_candidates = listings.len();
        tracing::info!(
            "Searching {} listings, query: {:?}, sort: {:?}",
            total_candidates,
            request.query,
            request.sort
        );

        let mut ctx = FilterContext::new(Utc::now().year()).with_metric(self.metric.as_ref());
        if let Some(catalog) = catalog {
            ctx = ctx.with_catalog(catalog);
        }

        let filtered = apply_filters(listings, &request.filters, &ctx);
        let scored = score_listings(filtered, &request.query, &request.filters, &self.weights());
        let sorted = sort_listings(scored, request.sort);

        let total_results = sorted.len();
        let limit = request.limit.min(self.settings.search.max_limit);
        let page: Vec<_> = sorted
            .into_iter()
            .skip(request.offset)
            .take(limit)
            .collect();

        tracing::debug!(
            "Search matched {} of {} listings, returning {}",
            total_results,
            total_candidates,
            page.len()
        );

        Ok(SearchResponse {
            listings: page,
            total_results,
            total_candidates,
            offset: request.offset,
            limit,
        })
    }

    /// Cluster listings for the current map viewport.
    ///
    /// Callers combining search and map views pass the already-filtered
    /// subset here.
    pub fn map_view(
        &self,
        listings: &[Listing],
        viewport: &BoundingBox,
        zoom: u8,
    ) -> MapViewResponse {
        let opts = ClusterOptions {
            radius_px: self.settings.clustering.radius_px,
            min_points: self.settings.clustering.min_points,
            max_zoom: self.settings.clustering.max_zoom,
        };
        let outcome = cluster_listings(listings, viewport, zoom, &opts);

        MapViewResponse {
            entities: outcome.entities,
            skipped: outcome.skipped,
            zoom,
        }
    }

    /// Infrastructure near a listing, using the configured radius and cap.
    pub fn nearby(
        &self,
        listing: &Listing,
        catalog: &InfrastructureCatalog,
    ) -> Result<Vec<NearbyItem>, EngineError> {
        let opts = ProximityOptions {
            radius: self.settings.proximity.radius,
            max_results: self.settings.proximity.max_results,
            categories: None,
        };
        nearest_infrastructure(&listing.location, catalog, &opts, self.metric.as_ref())
    }

    fn weights(&self) -> RelevanceWeights {
        let weights = &self.settings.scoring.weights;
        RelevanceWeights {
            query_bonus: weights.query_bonus,
            per_filter: weights.per_filter,
            price_range_bonus: weights.price_range_bonus,
            proximity_bonus: weights.proximity_bonus,
        }
    }
}

impl Default for DiscoveryEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}
