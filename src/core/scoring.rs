use std::cmp::Ordering;

use crate::models::{FilterSpec, Listing, ScoredListing, SortMode};

/// Weights for the relevance heuristic.
///
/// Scoring formula:
/// score = query_bonus (query longer than 3 chars)
///       + per_filter * filled optional fields
///       + price_range_bonus (both price bounds set)
///       + proximity_bonus (any distance-to bucket active)
#[derive(Debug, Clone, Copy)]
pub struct RelevanceWeights {
    pub query_bonus: f64,
    pub per_filter: f64,
    pub price_range_bonus: f64,
    pub proximity_bonus: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            query_bonus: 10.0,
            per_filter: 5.0,
            price_range_bonus: 15.0,
            proximity_bonus: 20.0,
        }
    }
}

/// Score how specific a search is.
///
/// The score ranks queries, not listings: it never alters filter results and
/// is only consulted by the relevance sort mode.
pub fn relevance_score(query: &str, spec: &FilterSpec, weights: &RelevanceWeights) -> f64 {
    let mut score = 0.0;

    if query.trim().chars().count() > 3 {
        score += weights.query_bonus;
    }

    score += spec.active_predicates() as f64 * weights.per_filter;

    if spec.price_range.min.is_some() && spec.price_range.max.is_some() {
        score += weights.price_range_bonus;
    }

    if !spec.distance_to.is_empty() {
        score += weights.proximity_bonus;
    }

    score
}

/// Attach the query's relevance score to each listing.
pub fn score_listings(
    listings: Vec<Listing>,
    query: &str,
    spec: &FilterSpec,
    weights: &RelevanceWeights,
) -> Vec<ScoredListing> {
    let score = relevance_score(query, spec, weights);
    listings
        .into_iter()
        .map(|listing| ScoredListing {
            listing,
            relevance_score: score,
        })
        .collect()
}

/// Sort listings by the requested mode.
///
/// Every mode is deterministic: the stable sort plus a final id tie-break
/// makes each ordering total.
pub fn sort_listings(mut listings: Vec<ScoredListing>, mode: SortMode) -> Vec<ScoredListing> {
    match mode {
        SortMode::Relevance => listings.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.listing.date_added.cmp(&a.listing.date_added))
                .then_with(|| a.listing.id.cmp(&b.listing.id))
        }),
        SortMode::Newest => listings.sort_by(|a, b| {
            b.listing
                .date_added
                .cmp(&a.listing.date_added)
                .then_with(|| a.listing.id.cmp(&b.listing.id))
        }),
        SortMode::Oldest => listings.sort_by(|a, b| {
            a.listing
                .date_added
                .cmp(&b.listing.date_added)
                .then_with(|| a.listing.id.cmp(&b.listing.id))
        }),
        SortMode::PriceAsc => listings.sort_by(|a, b| {
            a.listing
                .price_minor
                .cmp(&b.listing.price_minor)
                .then_with(|| a.listing.id.cmp(&b.listing.id))
        }),
        SortMode::PriceDesc => listings.sort_by(|a, b| {
            b.listing
                .price_minor
                .cmp(&a.listing.price_minor)
                .then_with(|| a.listing.id.cmp(&b.listing.id))
        }),
    }
    listings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FacilityCategory, GeoPoint, PriceRange, PropertyType, RangeBucket, RoomFilter};
    use chrono::{TimeZone, Utc};

    fn scored(id: &str, price_minor: i64, day: u32) -> ScoredListing {
        ScoredListing {
            listing: Listing {
                id: id.to_string(),
                title: format!("Listing {}", id),
                price_minor,
                location: GeoPoint {
                    longitude: 7.491,
                    latitude: 9.082,
                },
                property_type: PropertyType::Residential,
                bedrooms: None,
                bathrooms: None,
                area_label: String::new(),
                amenities: vec![],
                furnished: false,
                year_built: None,
                floor_level: None,
                pets_allowed: None,
                growth_pct_per_year: None,
                investment_score: None,
                date_added: Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap(),
            },
            relevance_score: 0.0,
        }
    }

    #[test]
    fn test_empty_search_scores_zero() {
        let score = relevance_score("", &FilterSpec::default(), &RelevanceWeights::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_query_length_bonus() {
        let weights = RelevanceWeights::default();
        assert_eq!(relevance_score("abc", &FilterSpec::default(), &weights), 0.0);
        assert_eq!(relevance_score("   abc   ", &FilterSpec::default(), &weights), 0.0);
        assert_eq!(relevance_score("maitama", &FilterSpec::default(), &weights), 10.0);
    }

    #[test]
    fn test_filled_filters_add_five_each() {
        let weights = RelevanceWeights::default();
        let spec = FilterSpec {
            property_types: vec![PropertyType::Luxury],
            bedrooms: RoomFilter::AtLeast(3),
            ..FilterSpec::default()
        };
        assert_eq!(relevance_score("", &spec, &weights), 10.0);
    }

    #[test]
    fn test_complete_price_range_bonus() {
        let weights = RelevanceWeights::default();

        let half = FilterSpec {
            price_range: PriceRange {
                min: Some(50_000_000),
                max: None,
            },
            ..FilterSpec::default()
        };
        // One filled field, no completeness bonus
        assert_eq!(relevance_score("", &half, &weights), 5.0);

        let full = FilterSpec {
            price_range: PriceRange {
                min: Some(50_000_000),
                max: Some(100_000_000),
            },
            ..FilterSpec::default()
        };
        // One filled field plus the bonus
        assert_eq!(relevance_score("", &full, &weights), 20.0);
    }

    #[test]
    fn test_proximity_bonus() {
        let weights = RelevanceWeights::default();
        let mut spec = FilterSpec::default();
        spec.distance_to
            .insert(FacilityCategory::Schools, RangeBucket::below(0.05));

        // 5 for the filled field plus 20 for location specificity
        assert_eq!(relevance_score("", &spec, &weights), 25.0);
    }

    #[test]
    fn test_price_asc_sort() {
        let listings = vec![
            scored("1", 120_000_000, 1),
            scored("2", 50_000_000, 2),
            scored("3", 80_000_000, 3),
        ];
        let sorted = sort_listings(listings, SortMode::PriceAsc);
        let prices: Vec<i64> = sorted.iter().map(|s| s.listing.price_minor).collect();
        assert_eq!(prices, vec![50_000_000, 80_000_000, 120_000_000]);
    }

    #[test]
    fn test_price_desc_sort() {
        let listings = vec![scored("1", 50_000_000, 1), scored("2", 120_000_000, 2)];
        let sorted = sort_listings(listings, SortMode::PriceDesc);
        assert_eq!(sorted[0].listing.id, "2");
    }

    #[test]
    fn test_newest_and_oldest() {
        let listings = vec![
            scored("1", 0, 10),
            scored("2", 0, 20),
            scored("3", 0, 15),
        ];

        let newest = sort_listings(listings.clone(), SortMode::Newest);
        let ids: Vec<&str> = newest.iter().map(|s| s.listing.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);

        let oldest = sort_listings(listings, SortMode::Oldest);
        let ids: Vec<&str> = oldest.iter().map(|s| s.listing.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "2"]);
    }

    #[test]
    fn test_relevance_ties_fall_back_to_date_then_id() {
        let mut a = scored("b", 0, 10);
        let mut b = scored("a", 0, 10);
        let mut c = scored("c", 0, 12);
        a.relevance_score = 30.0;
        b.relevance_score = 30.0;
        c.relevance_score = 30.0;

        let sorted = sort_listings(vec![a, b, c], SortMode::Relevance);
        let ids: Vec<&str> = sorted.iter().map(|s| s.listing.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_is_deterministic() {
        let listings = vec![
            scored("1", 80_000_000, 1),
            scored("2", 80_000_000, 1),
            scored("3", 50_000_000, 2),
        ];

        let first = sort_listings(listings.clone(), SortMode::PriceAsc);
        let second = sort_listings(listings, SortMode::PriceAsc);

        let a: Vec<&str> = first.iter().map(|s| s.listing.id.as_str()).collect();
        let b: Vec<&str> = second.iter().map(|s| s.listing.id.as_str()).collect();
        assert_eq!(a, b);
    }
}
