// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, ClusterGroup, ClusterSize, FacilityCategory, FilterSpec, GeoPoint,
    InfrastructureCatalog, InfrastructureItem, InvestmentBand, Listing, MapEntity, NearbyItem,
    PointMarker, PriceRange, PropertyType, RangeBucket, RoomFilter, ScoredListing, SortMode,
    TrendMarker,
};
pub use requests::SearchRequest;
pub use responses::{MapViewResponse, SearchResponse};
