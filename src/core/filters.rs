use crate::core::distance::{DistanceMetric, Planar};
use crate::core::proximity;
use crate::models::{FilterSpec, InfrastructureCatalog, Listing};

/// Ambient inputs some predicates need: the year used for property-age
/// arithmetic, the infrastructure catalog backing distance-to buckets, and
/// the distance metric.
pub struct FilterContext<'a> {
    pub current_year: i32,
    pub catalog: Option<&'a InfrastructureCatalog>,
    pub metric: &'a dyn DistanceMetric,
}

impl<'a> FilterContext<'a> {
    pub fn new(current_year: i32) -> Self {
        Self {
            current_year,
            catalog: None,
            metric: &Planar,
        }
    }

    pub fn with_catalog(mut self, catalog: &'a InfrastructureCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_metric(mut self, metric: &'a dyn DistanceMetric) -> Self {
        self.metric = metric;
        self
    }
}

/// Check a listing against the type, price, and room predicates.
#[inline]
pub fn matches_basics(listing: &Listing, spec: &FilterSpec) -> bool {
    // Property type membership; an empty selection passes everything
    if !spec.property_types.is_empty() && !spec.property_types.contains(&listing.property_type) {
        return false;
    }

    // Price bounds are independent; min > max simply matches nothing
    if let Some(min) = spec.price_range.min {
        if listing.price_minor < min {
            return false;
        }
    }
    if let Some(max) = spec.price_range.max {
        if listing.price_minor > max {
            return false;
        }
    }

    spec.bedrooms.matches(listing.bedrooms) && spec.bathrooms.matches(listing.bathrooms)
}

/// Check a listing against amenity and boolean feature predicates.
///
/// Amenity semantics are ALL-of: every requested amenity must be present.
#[inline]
pub fn matches_features(listing: &Listing, spec: &FilterSpec) -> bool {
    let has_all_amenities = spec
        .amenities
        .iter()
        .all(|wanted| listing.amenities.iter().any(|have| have == wanted));
    if !has_all_amenities {
        return false;
    }

    if let Some(furnished) = spec.furnished {
        if listing.furnished != furnished {
            return false;
        }
    }

    if let Some(pets) = spec.pets_allowed {
        // A listing that doesn't state its pet policy fails an active filter
        if listing.pets_allowed != Some(pets) {
            return false;
        }
    }

    true
}

/// Check a listing against the property-age and floor-level buckets.
#[inline]
pub fn matches_buckets(listing: &Listing, spec: &FilterSpec, current_year: i32) -> bool {
    if let Some(age_bucket) = &spec.property_age {
        match listing.age_years(current_year) {
            Some(age) => {
                if !age_bucket.contains(f64::from(age)) {
                    return false;
                }
            }
            // No build year on record, so the listing can't satisfy the filter
            None => return false,
        }
    }

    if let Some(floor_bucket) = &spec.floor_level {
        match listing.floor_level {
            Some(floor) => {
                if !floor_bucket.contains(f64::from(floor)) {
                    return false;
                }
            }
            None => return false,
        }
    }

    true
}

/// Check a listing against the distance-to-facility buckets.
///
/// Each requested facility kind must have a nearest catalog item whose
/// distance falls in the bucket. Without a catalog, any active distance
/// filter excludes the listing.
pub fn matches_distance_to(listing: &Listing, spec: &FilterSpec, ctx: &FilterContext) -> bool {
    if spec.distance_to.is_empty() {
        return true;
    }

    let Some(catalog) = ctx.catalog else {
        return false;
    };

    spec.distance_to.iter().all(|(category, bucket)| {
        proximity::nearest_distance(&listing.location, catalog, *category, ctx.metric)
            .map_or(false, |distance| bucket.contains(distance))
    })
}

/// Apply every active predicate of `spec`, AND-combined, preserving input
/// order. A pure subset operation: listings are never reordered or mutated.
pub fn apply_filters(listings: &[Listing], spec: &FilterSpec, ctx: &FilterContext) -> Vec<Listing> {
    let filtered: Vec<Listing> = listings
        .iter()
        .filter(|listing| matches_basics(listing, spec))
        .filter(|listing| matches_features(listing, spec))
        .filter(|listing| matches_buckets(listing, spec, ctx.current_year))
        .filter(|listing| matches_distance_to(listing, spec, ctx))
        .cloned()
        .collect();

    tracing::debug!(
        "Filtered {} listings down to {}",
        listings.len(),
        filtered.len()
    );

    filtered
}
