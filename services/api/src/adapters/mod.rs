pub mod db;
pub mod entity_llm;
pub mod geocoder;
pub mod image_search;
pub mod itinerary_llm;

pub use db::DbAdapter;
pub use entity_llm::OpenAiEntityAdapter;
pub use geocoder::{ArcGisGeocoder, NominatimGeocoder};
pub use image_search::ScrapedImageSearch;
pub use itinerary_llm::OpenAiItineraryAdapter;
