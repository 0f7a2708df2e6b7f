pub mod domain;
pub mod enrichment;
pub mod itinerary;
pub mod ports;
pub mod search;

pub use domain::{
    Coordinates, DaySection, Entity, EntityCategory, ImageRef, MapMarker, MarkerKind,
    NewPackingItem, NewTrip, PackingCategory, PackingItem, PlaceMention, Trip, TripContext,
    TripPurpose, TripRequest,
};
pub use enrichment::{ActivityView, DayView, LocationEnricher, OverviewMap, PlaceSet};
pub use itinerary::{parse_itinerary, ParsedItinerary, OVERVIEW};
pub use ports::{
    DatabaseService, EntityRecognitionService, GeocodingService, ImageSearchService,
    ItineraryGenerationService, PortError, PortResult,
};
pub use search::{sort_trips, SavedTripQuery, SortOrder, TripField};
