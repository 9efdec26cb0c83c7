use std::collections::BTreeMap;

use crate::core::distance::project_to_pixels;
use crate::models::{BoundingBox, ClusterGroup, GeoPoint, Listing, MapEntity, PointMarker};

/// Tuning for the grid clusterer. Defaults match the map's marker layout:
/// 40px cells, clusters from 2 points, individual markers from zoom 16.
#[derive(Debug, Clone)]
pub struct ClusterOptions {
    pub radius_px: f64,
    pub min_points: usize,
    pub max_zoom: u8,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            radius_px: 40.0,
            min_points: 2,
            max_zoom: 16,
        }
    }
}

/// Result of one clustering pass over a viewport.
///
/// `skipped` counts listings dropped for malformed coordinates so callers
/// can surface data problems instead of silently losing markers.
#[derive(Debug, Clone)]
pub struct ClusterOutcome {
    pub entities: Vec<MapEntity>,
    pub skipped: usize,
}

/// A candidate listing projected into pixel space.
struct Projected<'a> {
    listing: &'a Listing,
    px: f64,
    py: f64,
}

/// Group listings into map entities for one viewport and zoom level.
///
/// Pure function of its inputs: repeated calls with the same arguments yield
/// the same entities in the same order. Listings with invalid coordinates
/// are dropped and counted. At or beyond `max_zoom` every visible listing is
/// its own marker; otherwise listings sharing a `radius_px` pixel grid cell
/// merge, and groups below `min_points` decompose back into markers.
pub fn cluster_listings(
    listings: &[Listing],
    viewport: &BoundingBox,
    zoom: u8,
    opts: &ClusterOptions,
) -> ClusterOutcome {
    let mut skipped = 0;

    // Gather over a one-cell buffer around the viewport so clusters that
    // straddle the edge still form; visibility is re-checked per entity.
    let (min_x, min_y) = project_to_pixels(
        &GeoPoint {
            longitude: viewport.west,
            latitude: viewport.north,
        },
        zoom,
    );
    let (max_x, max_y) = project_to_pixels(
        &GeoPoint {
            longitude: viewport.east,
            latitude: viewport.south,
        },
        zoom,
    );
    let buffer = opts.radius_px.max(0.0);

    let mut candidates: Vec<Projected> = Vec::new();
    for listing in listings {
        if !listing.location.is_valid() {
            skipped += 1;
            continue;
        }
        let (px, py) = project_to_pixels(&listing.location, zoom);
        if px < min_x - buffer || px > max_x + buffer || py < min_y - buffer || py > max_y + buffer
        {
            continue;
        }
        candidates.push(Projected {
            listing,
            px,
            py,
        });
    }

    if skipped > 0 {
        tracing::warn!("Dropped {} listings with malformed coordinates", skipped);
    }

    // Past the clustering ceiling, everything inside the viewport renders
    // individually.
    if zoom >= opts.max_zoom {
        let entities = candidates
            .iter()
            .filter(|c| viewport.contains(&c.listing.location))
            .map(|c| MapEntity::Point(point_marker(c.listing)))
            .collect();
        return ClusterOutcome {
            entities,
            skipped,
        };
    }

    // Bucket candidates by grid cell. BTreeMap keeps cell iteration order
    // stable, so output order never depends on hashing.
    let cell_size = opts.radius_px.max(1.0);
    let mut cells: BTreeMap<(i64, i64), Vec<usize>> = BTreeMap::new();
    for (index, candidate) in candidates.iter().enumerate() {
        let key = (
            (candidate.px / cell_size).floor() as i64,
            (candidate.py / cell_size).floor() as i64,
        );
        cells.entry(key).or_default().push(index);
    }

    let mut entities = Vec::new();
    for members in cells.values() {
        if members.len() >= opts.min_points {
            let group = build_group(&candidates, members);
            let visible = viewport.contains(&group.centroid)
                || members
                    .iter()
                    .any(|&i| viewport.contains(&candidates[i].listing.location));
            if visible {
                entities.push(MapEntity::Cluster(group));
            }
        } else {
            for &index in members {
                let listing = candidates[index].listing;
                if viewport.contains(&listing.location) {
                    entities.push(MapEntity::Point(point_marker(listing)));
                }
            }
        }
    }

    tracing::debug!(
        "Clustered {} candidates into {} entities at zoom {}",
        candidates.len(),
        entities.len(),
        zoom
    );

    ClusterOutcome {
        entities,
        skipped,
    }
}

fn point_marker(listing: &Listing) -> PointMarker {
    PointMarker {
        id: listing.id.clone(),
        location: listing.location,
        price_minor: listing.price_minor,
        investment_score: listing.investment_score,
        growth_pct_per_year: listing.growth_pct_per_year,
    }
}

fn build_group(candidates: &[Projected], members: &[usize]) -> ClusterGroup {
    let count = members.len();
    let mut lon_sum = 0.0;
    let mut lat_sum = 0.0;
    let mut price_sum: i64 = 0;
    let mut growth_sum = 0.0;
    let mut growth_count = 0usize;
    let mut member_ids = Vec::with_capacity(count);

    for &index in members {
        let listing = candidates[index].listing;
        lon_sum += listing.location.longitude;
        lat_sum += listing.location.latitude;
        price_sum += listing.price_minor;
        if let Some(growth) = listing.growth_pct_per_year {
            growth_sum += growth;
            growth_count += 1;
        }
        member_ids.push(listing.id.clone());
    }

    let count_f = count as f64;
    let trend_score = if growth_count > 0 {
        growth_sum / growth_count as f64
    } else {
        0.0
    };

    ClusterGroup {
        count,
        centroid: GeoPoint {
            longitude: lon_sum / count_f,
            latitude: lat_sum / count_f,
        },
        member_ids,
        avg_price_minor: (price_sum as f64 / count_f).round() as i64,
        trend_score,
    }
}
