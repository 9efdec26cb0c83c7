use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::EngineError;

/// A longitude/latitude pair in decimal degrees.
///
/// Serialized as a `[longitude, latitude]` array, the shape the rendering
/// layer and the listing datasets use. Distances over these points default to
/// planar Euclidean math on raw degrees, which is a deliberate approximation
/// valid only at city scale; callers needing real-world accuracy should
/// select the haversine metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// Validate and construct a point.
    ///
    /// Longitude must fall within [-180, 180] and latitude within [-90, 90],
    /// both finite.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, EngineError> {
        let point = Self {
            longitude,
            latitude,
        };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(EngineError::InvalidCoordinate {
                longitude,
                latitude,
            })
        }
    }

    /// Whether both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(pair: [f64; 2]) -> Self {
        Self {
            longitude: pair[0],
            latitude: pair[1],
        }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.longitude, point.latitude]
    }
}

/// Property type categories from the listing dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Residential,
    Apartments,
    Commercial,
    Luxury,
    Industrial,
    Hotels,
    Land,
}

/// A geolocated property listing.
///
/// Owned by the caller; the engine only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    #[serde(rename = "priceMinor")]
    pub price_minor: i64,
    #[serde(rename = "coordinates")]
    pub location: GeoPoint,
    #[serde(rename = "propertyType")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub bedrooms: Option<u8>,
    #[serde(default)]
    pub bathrooms: Option<u8>,
    #[serde(rename = "area")]
    pub area_label: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub furnished: bool,
    #[serde(rename = "yearBuilt", default)]
    pub year_built: Option<i32>,
    #[serde(rename = "floorLevel", default)]
    pub floor_level: Option<u8>,
    #[serde(rename = "petsAllowed", default)]
    pub pets_allowed: Option<bool>,
    #[serde(rename = "growth", default)]
    pub growth_pct_per_year: Option<f64>,
    #[serde(rename = "investmentScore", default)]
    pub investment_score: Option<f64>,
    #[serde(rename = "dateAdded")]
    pub date_added: chrono::DateTime<chrono::Utc>,
}

impl Listing {
    /// Listing age in years relative to `current_year`, if the build year is
    /// known.
    pub fn age_years(&self, current_year: i32) -> Option<i32> {
        self.year_built.map(|built| current_year - built)
    }
}

/// Infrastructure facility kinds used by the catalog and the distance
/// filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityCategory {
    Schools,
    Hospitals,
    Shopping,
    Transport,
}

/// A point of interest near listings: a school, hospital, mall, bus stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfrastructureItem {
    pub id: String,
    pub name: String,
    pub category: FacilityCategory,
    pub location: GeoPoint,
    pub rating: f64,
    #[serde(rename = "distance")]
    pub distance_label: String,
}

/// Infrastructure items grouped by category, each category in caller order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfrastructureCatalog {
    pub categories: BTreeMap<FacilityCategory, Vec<InfrastructureItem>>,
}

impl InfrastructureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item to its category, preserving insertion order.
    pub fn insert(&mut self, item: InfrastructureItem) {
        self.categories.entry(item.category).or_default().push(item);
    }

    /// Items of one category; empty slice if the category is absent.
    pub fn items(&self, category: FacilityCategory) -> &[InfrastructureItem] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }
}

/// Bedroom/bathroom count filter with the UI's "any" / "N" / "N+" semantics.
///
/// `Any` passes everything, `Exactly(n)` requires an exact count, and
/// `AtLeast(n)` is the "N+" sentinel meaning a count of at least `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomFilter {
    #[default]
    Any,
    Exactly(u8),
    AtLeast(u8),
}

impl RoomFilter {
    /// Whether a listing's room count satisfies this filter.
    ///
    /// A listing with no count fails any active filter.
    pub fn matches(&self, actual: Option<u8>) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(n) => actual == Some(*n),
            Self::AtLeast(n) => actual.map_or(false, |count| count >= *n),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Any)
    }
}

impl Serialize for RoomFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_str("any"),
            Self::Exactly(n) => serializer.serialize_u8(*n),
            Self::AtLeast(n) => serializer.serialize_str(&format!("{}+", n)),
        }
    }
}

impl<'de> Deserialize<'de> for RoomFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoomFilterVisitor;

        impl Visitor<'_> for RoomFilterVisitor {
            type Value = RoomFilter;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("\"any\", a room count, or \"N+\"")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<RoomFilter, E> {
                u8::try_from(value)
                    .map(RoomFilter::Exactly)
                    .map_err(|_| E::custom("room count out of range"))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<RoomFilter, E> {
                u64::try_from(value)
                    .map_err(|_| E::custom("room count out of range"))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<RoomFilter, E> {
                let trimmed = value.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("any") {
                    return Ok(RoomFilter::Any);
                }
                if let Some(base) = trimmed.strip_suffix('+') {
                    return base
                        .parse()
                        .map(RoomFilter::AtLeast)
                        .map_err(|_| E::custom("invalid room count"));
                }
                trimmed
                    .parse()
                    .map(RoomFilter::Exactly)
                    .map_err(|_| E::custom("invalid room count"))
            }
        }

        deserializer.deserialize_any(RoomFilterVisitor)
    }
}

/// Half-open numeric interval `[lower, upper)` with either bound optional.
///
/// Used for property age, floor level, and distance-to-facility buckets,
/// where the UI exposes one unbounded bucket at each end ("under 1km",
/// "10+ years").
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeBucket {
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
}

impl RangeBucket {
    pub fn at_least(lower: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    pub fn below(upper: f64) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
        }
    }

    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Lower bound inclusive, upper bound exclusive.
    pub fn contains(&self, value: f64) -> bool {
        self.lower.map_or(true, |l| value >= l) && self.upper.map_or(true, |u| value < u)
    }
}

/// Price bounds in currency minor units, each bound independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

/// All optional search predicates. An unset field is a match-all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(rename = "propertyType", default)]
    pub property_types: Vec<PropertyType>,
    #[serde(rename = "priceRange", default)]
    pub price_range: PriceRange,
    #[serde(default)]
    pub bedrooms: RoomFilter,
    #[serde(default)]
    pub bathrooms: RoomFilter,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub furnished: Option<bool>,
    #[serde(rename = "propertyAge", default)]
    pub property_age: Option<RangeBucket>,
    #[serde(rename = "floorLevel", default)]
    pub floor_level: Option<RangeBucket>,
    #[serde(rename = "petsAllowed", default)]
    pub pets_allowed: Option<bool>,
    #[serde(rename = "distanceTo", default)]
    pub distance_to: BTreeMap<FacilityCategory, RangeBucket>,
}

impl FilterSpec {
    /// Number of filled optional fields, as counted by the relevance scorer.
    pub fn active_predicates(&self) -> usize {
        let mut count = 0;
        if !self.property_types.is_empty() {
            count += 1;
        }
        if self.price_range.min.is_some() || self.price_range.max.is_some() {
            count += 1;
        }
        if self.bedrooms.is_active() {
            count += 1;
        }
        if self.bathrooms.is_active() {
            count += 1;
        }
        if !self.amenities.is_empty() {
            count += 1;
        }
        if self.furnished.is_some() {
            count += 1;
        }
        if self.property_age.is_some() {
            count += 1;
        }
        if self.floor_level.is_some() {
            count += 1;
        }
        if self.pets_allowed.is_some() {
            count += 1;
        }
        if !self.distance_to.is_empty() {
            count += 1;
        }
        count
    }
}

/// Result sort orders. Every mode is a total order: ties always fall back to
/// the listing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    Relevance,
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
}

/// A listing annotated with the query's relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredListing {
    pub listing: Listing,
    #[serde(rename = "relevanceScore")]
    pub relevance_score: f64,
}

/// The geographic viewport currently visible on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.longitude >= self.west
            && point.longitude <= self.east
            && point.latitude >= self.south
            && point.latitude <= self.north
    }
}

/// One entry of a clustered map view: either a single listing marker or an
/// aggregate of nearby listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MapEntity {
    Point(PointMarker),
    Cluster(ClusterGroup),
}

impl MapEntity {
    /// Number of listings this entry represents.
    pub fn count(&self) -> usize {
        match self {
            Self::Point(_) => 1,
            Self::Cluster(group) => group.count,
        }
    }

    pub fn location(&self) -> &GeoPoint {
        match self {
            Self::Point(marker) => &marker.location,
            Self::Cluster(group) => &group.centroid,
        }
    }
}

/// Render data for a single un-clustered listing marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointMarker {
    pub id: String,
    pub location: GeoPoint,
    #[serde(rename = "priceMinor")]
    pub price_minor: i64,
    #[serde(rename = "investmentScore", default)]
    pub investment_score: Option<f64>,
    #[serde(rename = "growth", default)]
    pub growth_pct_per_year: Option<f64>,
}

impl PointMarker {
    /// Investment banding for the marker badge, if the listing is scored.
    pub fn investment_band(&self) -> Option<InvestmentBand> {
        self.investment_score.map(|score| {
            if score >= 8.0 {
                InvestmentBand::Hot
            } else if score >= 6.0 {
                InvestmentBand::Growing
            } else {
                InvestmentBand::Potential
            }
        })
    }
}

/// Aggregate statistics for a group of nearby listings.
///
/// Ephemeral: recomputed on every viewport or zoom change, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterGroup {
    pub count: usize,
    pub centroid: GeoPoint,
    #[serde(rename = "memberIds")]
    pub member_ids: Vec<String>,
    #[serde(rename = "avgPriceMinor")]
    pub avg_price_minor: i64,
    #[serde(rename = "trendScore")]
    pub trend_score: f64,
}

impl ClusterGroup {
    /// Marker size banding used by the map renderer.
    pub fn size_class(&self) -> ClusterSize {
        if self.count < 5 {
            ClusterSize::Small
        } else if self.count < 10 {
            ClusterSize::Medium
        } else {
            ClusterSize::Large
        }
    }

    /// Growth-trend banding for the cluster badge.
    pub fn trend_marker(&self) -> TrendMarker {
        if self.trend_score > 5.0 {
            TrendMarker::Hot
        } else if self.trend_score > 0.0 {
            TrendMarker::Rising
        } else {
            TrendMarker::Flat
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMarker {
    Hot,
    Rising,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentBand {
    Hot,
    Growing,
    Potential,
}

/// An infrastructure item paired with its distance from a query origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyItem {
    pub item: InfrastructureItem,
    pub distance: f64,
}
