use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::core::distance::DistanceMetric;
use crate::error::EngineError;
use crate::models::{FacilityCategory, GeoPoint, InfrastructureCatalog, NearbyItem};

/// Options for a nearby-infrastructure lookup.
///
/// `radius` is in the units of the chosen metric (degrees for planar,
/// kilometers for haversine). When `categories` is `None` the whole catalog
/// is scanned.
#[derive(Debug, Clone)]
pub struct ProximityOptions {
    pub radius: f64,
    pub max_results: usize,
    pub categories: Option<BTreeSet<FacilityCategory>>,
}

/// Find the infrastructure items closest to `origin` within `opts.radius`.
///
/// Results are ordered by distance ascending, ties broken by rating
/// descending and then id ascending, and truncated to `opts.max_results`.
/// An empty catalog or a non-positive radius yields an empty list; a
/// malformed origin is an error.
pub fn nearest_infrastructure(
    origin: &GeoPoint,
    catalog: &InfrastructureCatalog,
    opts: &ProximityOptions,
    metric: &dyn DistanceMetric,
) -> Result<Vec<NearbyItem>, EngineError> {
    if !origin.is_valid() {
        return Err(EngineError::InvalidCoordinate {
            longitude: origin.longitude,
            latitude: origin.latitude,
        });
    }
    if opts.radius <= 0.0 {
        return Ok(Vec::new());
    }

    let mut nearby = Vec::new();
    for (category, items) in &catalog.categories {
        if let Some(wanted) = &opts.categories {
            if !wanted.contains(category) {
                continue;
            }
        }
        for item in items {
            if !item.location.is_valid() {
                tracing::warn!("Skipping infrastructure item {} with bad coordinates", item.id);
                continue;
            }
            let distance = metric.distance(origin, &item.location);
            if distance <= opts.radius {
                nearby.push(NearbyItem {
                    item: item.clone(),
                    distance,
                });
            }
        }
    }

    nearby.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.item
                    .rating
                    .partial_cmp(&a.item.rating)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.item.id.cmp(&b.item.id))
    });
    nearby.truncate(opts.max_results);

    tracing::debug!(
        "Proximity lookup at ({}, {}) matched {} items",
        origin.longitude,
        origin.latitude,
        nearby.len()
    );

    Ok(nearby)
}

/// Distance from `origin` to the nearest catalog item of one category.
///
/// Feeds the distance-to-facility filter buckets. `None` when the category
/// has no items with usable coordinates.
pub fn nearest_distance(
    origin: &GeoPoint,
    catalog: &InfrastructureCatalog,
    category: FacilityCategory,
    metric: &dyn DistanceMetric,
) -> Option<f64> {
    catalog
        .items(category)
        .iter()
        .filter(|item| item.location.is_valid())
        .map(|item| metric.distance(origin, &item.location))
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
}
