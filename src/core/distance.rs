use crate::models::GeoPoint;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Tile size used for Web Mercator pixel projection
const TILE_SIZE: f64 = 256.0;

/// Strategy interface for point-to-point distance.
///
/// The engine defaults to [`Planar`], matching the badge distances the
/// listing data was built around. [`Haversine`] is available for callers
/// that need real-world kilometers.
pub trait DistanceMetric {
    fn distance(&self, a: &GeoPoint, b: &GeoPoint) -> f64;
}

/// Euclidean distance on raw degrees.
///
/// This treats coordinates as a flat plane, so the result is in degrees and
/// only meaningful at city scale. It reproduces the "nearby" badge semantics
/// of the listing dataset exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planar;

impl DistanceMetric for Planar {
    #[inline]
    fn distance(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        let dx = a.longitude - b.longitude;
        let dy = a.latitude - b.latitude;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Great-circle distance in kilometers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    #[inline]
    fn distance(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
    }
}

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Project a point to Web Mercator pixel space at an integer zoom level.
///
/// The world is `256 * 2^zoom` pixels wide; the y axis grows southward.
/// Latitudes at the projection poles are clamped to the world edge.
pub fn project_to_pixels(point: &GeoPoint, zoom: u8) -> (f64, f64) {
    let world = TILE_SIZE * 2f64.powi(i32::from(zoom));
    let x = (point.longitude / 360.0 + 0.5) * world;

    let sin_lat = point.latitude.to_radians().sin();
    let y_norm = 0.5 - 0.25 * ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / std::f64::consts::PI;
    let y = (y_norm * world).clamp(0.0, world);

    (x, y)
}
