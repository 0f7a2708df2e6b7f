//! crates/trip_planner_core/src/enrichment.rs
//!
//! Turns parsed day-sections into location-tagged views: the place set and
//! overview map markers, and the per-day activity list with imagery.
//!
//! Every external lookup made here is best-effort. A failing or empty lookup
//! means a missing marker or image, never a failed view.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{
    Coordinates, DaySection, ImageRef, MapMarker, MarkerKind, PlaceMention, TripContext,
};
use crate::itinerary::ParsedItinerary;
use crate::ports::{EntityRecognitionService, GeocodingService, ImageSearchService};

//=========================================================================================
// View Models
//=========================================================================================

/// Places extracted from an itinerary, deduplicated by exact text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceSet {
    places: BTreeSet<String>,
    mentions: Vec<PlaceMention>,
}

impl PlaceSet {
    /// Distinct place names. Callers should not depend on the iteration order.
    pub fn places(&self) -> impl Iterator<Item = &str> {
        self.places.iter().map(String::as_str)
    }

    pub fn contains(&self, place: &str) -> bool {
        self.places.contains(place)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Every mention in extraction order, duplicates included.
    pub fn mentions(&self) -> &[PlaceMention] {
        &self.mentions
    }

    /// Place names mentioned on one activity line of one day.
    pub fn places_for_activity(&self, day_title: &str, activity: &str) -> Vec<&str> {
        self.mentions
            .iter()
            .filter(|m| m.day_title == day_title && m.activity == activity)
            .map(|m| m.text.as_str())
            .collect()
    }

    fn insert(&mut self, mention: PlaceMention) {
        self.places.insert(mention.text.clone());
        self.mentions.push(mention);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewMap {
    /// Where the map is centred. `None` if the destination could not be resolved.
    pub center: Option<Coordinates>,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityView {
    pub text: String,
    /// Places recognized on this line, in the order the tagger reported them.
    pub places: Vec<String>,
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub title: String,
    pub activities: Vec<ActivityView>,
}

//=========================================================================================
// The Enricher
//=========================================================================================

/// Orchestrates entity recognition, geocoding and image search over a parsed itinerary.
#[derive(Clone)]
pub struct LocationEnricher {
    recognizer: Arc<dyn EntityRecognitionService>,
    destination_geocoder: Arc<dyn GeocodingService>,
    place_geocoder: Arc<dyn GeocodingService>,
    images: Arc<dyn ImageSearchService>,
}

impl LocationEnricher {
    pub fn new(
        recognizer: Arc<dyn EntityRecognitionService>,
        destination_geocoder: Arc<dyn GeocodingService>,
        place_geocoder: Arc<dyn GeocodingService>,
        images: Arc<dyn ImageSearchService>,
    ) -> Self {
        Self {
            recognizer,
            destination_geocoder,
            place_geocoder,
            images,
        }
    }

    /// Runs entity recognition over every activity line (titles excluded) and keeps
    /// entities whose category is place-like.
    pub async fn extract_places(&self, itinerary: &ParsedItinerary) -> PlaceSet {
        let mut set = PlaceSet::default();
        for section in &itinerary.sections {
            self.collect_section_places(section, &mut set).await;
        }

        debug!("Extracted {} distinct places", set.len());
        set
    }

    async fn collect_section_places(&self, section: &DaySection, set: &mut PlaceSet) {
        for activity in &section.activities {
            if activity.trim().is_empty() {
                continue;
            }
            let entities = match self.recognizer.recognize_entities(activity).await {
                Ok(entities) => entities,
                Err(e) => {
                    warn!("Entity recognition failed for '{}': {}", activity, e);
                    continue;
                }
            };

            for entity in entities.into_iter().filter(|e| e.category.is_place()) {
                let text = entity.text.trim();
                if text.is_empty() {
                    continue;
                }
                set.insert(PlaceMention {
                    text: text.to_string(),
                    day_title: section.title.clone(),
                    activity: activity.clone(),
                });
            }
        }
    }

    /// Builds the overview map: a destination marker plus one marker per place
    /// that the place geocoder can resolve.
    pub async fn overview_map(&self, context: &TripContext, places: &PlaceSet) -> OverviewMap {
        let center = lookup(&*self.destination_geocoder, &context.destination).await;

        let mut markers = Vec::with_capacity(places.len() + 1);
        if let Some(coordinates) = center {
            markers.push(MapMarker {
                label: context.destination.clone(),
                coordinates,
                kind: MarkerKind::Destination,
            });
        } else {
            warn!("Could not resolve destination '{}'", context.destination);
        }

        for place in places.places() {
            if let Some(coordinates) = lookup(&*self.place_geocoder, place).await {
                markers.push(MapMarker {
                    label: place.to_string(),
                    coordinates,
                    kind: MarkerKind::Attraction,
                });
            }
        }

        OverviewMap { center, markers }
    }

    /// Builds the view for one selected day: each activity line with the places
    /// recognized on it and its imagery. Returns `None` when no section matches
    /// the option.
    pub async fn day_view(&self, itinerary: &ParsedItinerary, option: &str) -> Option<DayView> {
        let section = itinerary.section_for_option(option)?;

        let mut places = PlaceSet::default();
        self.collect_section_places(section, &mut places).await;

        let mut activities = Vec::with_capacity(section.activities.len());
        for line in &section.activities {
            let images = if line.trim().is_empty() {
                Vec::new()
            } else {
                self.images_for_line(line).await
            };
            let mut line_places: Vec<String> = Vec::new();
            for place in places.places_for_activity(&section.title, line) {
                if !line_places.iter().any(|p| p == place) {
                    line_places.push(place.to_string());
                }
            }
            activities.push(ActivityView {
                text: line.clone(),
                places: line_places,
                images,
            });
        }

        Some(DayView {
            title: section.title.clone(),
            activities,
        })
    }

    async fn images_for_line(&self, line: &str) -> Vec<ImageRef> {
        let query = vec![line.to_string()];
        match self.images.search_images(&query).await {
            Ok(found) => found
                .into_iter()
                .filter(|(key, _)| line.contains(key.as_str()))
                .map(|(_, image)| image)
                .collect(),
            Err(e) => {
                warn!("Image search failed for '{}': {}", line, e);
                Vec::new()
            }
        }
    }
}

async fn lookup(geocoder: &dyn GeocodingService, place: &str) -> Option<Coordinates> {
    match geocoder.geocode(place).await {
        Ok(Some(coordinates)) => Some(coordinates),
        Ok(None) => {
            debug!("No coordinates found for '{}'", place);
            None
        }
        Err(e) => {
            warn!("Geocoding failed for '{}': {}", place, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Entity, EntityCategory, TripPurpose};
    use crate::itinerary::parse_itinerary;
    use crate::ports::{PortError, PortResult};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TableRecognizer {
        table: HashMap<&'static str, Vec<(&'static str, &'static str)>>,
        calls: AtomicUsize,
    }

    impl TableRecognizer {
        fn new(entries: &[(&'static str, Vec<(&'static str, &'static str)>)]) -> Self {
            Self {
                table: entries.iter().cloned().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EntityRecognitionService for TableRecognizer {
        async fn recognize_entities(&self, text: &str) -> PortResult<Vec<Entity>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("FAIL") {
                return Err(PortError::Unexpected("tagger offline".to_string()));
            }
            Ok(self
                .table
                .get(text)
                .map(|ents| {
                    ents.iter()
                        .map(|(t, l)| Entity::new(*t, EntityCategory::from_label(l)))
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    struct TableGeocoder {
        table: HashMap<&'static str, (f64, f64)>,
    }

    #[async_trait]
    impl GeocodingService for TableGeocoder {
        async fn geocode(&self, place: &str) -> PortResult<Option<Coordinates>> {
            if place == "Atlantis" {
                return Err(PortError::Unexpected("timeout".to_string()));
            }
            Ok(self.table.get(place).map(|(lat, lon)| Coordinates {
                latitude: *lat,
                longitude: *lon,
            }))
        }
    }

    struct EchoImages;

    #[async_trait]
    impl ImageSearchService for EchoImages {
        async fn search_images(&self, queries: &[String]) -> PortResult<HashMap<String, ImageRef>> {
            let mut out = HashMap::new();
            for q in queries {
                if q.contains("Broken") {
                    return Err(PortError::Unexpected("scrape failed".to_string()));
                }
                out.insert(
                    q.clone(),
                    ImageRef {
                        url: format!("https://img.test/{}", q.len()),
                    },
                );
                // A result keyed by something not on the line must be dropped.
                out.insert(
                    "unrelated query".to_string(),
                    ImageRef {
                        url: "https://img.test/other".to_string(),
                    },
                );
            }
            Ok(out)
        }
    }

    fn geocoder() -> Arc<TableGeocoder> {
        Arc::new(TableGeocoder {
            table: [
                ("Paris", (48.8566, 2.3522)),
                ("Eiffel Tower", (48.8584, 2.2945)),
                ("Louvre", (48.8606, 2.3376)),
            ]
            .into_iter()
            .collect(),
        })
    }

    fn enricher(recognizer: Arc<TableRecognizer>) -> LocationEnricher {
        LocationEnricher::new(recognizer, geocoder(), geocoder(), Arc::new(EchoImages))
    }

    fn context(destination: &str) -> TripContext {
        TripContext {
            destination: destination.to_string(),
            purpose: TripPurpose::Leisure,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
        }
    }

    const TEXT: &str =
        "Day 1: Arrival\nVisit the Eiffel Tower\n\nDay 2: Museums\nVisit the Louvre";

    #[tokio::test]
    async fn test_extracts_facility() {
        let recognizer = Arc::new(TableRecognizer::new(&[(
            "Visit the Eiffel Tower",
            vec![("Eiffel Tower", "FAC")],
        )]));
        let enricher = enricher(recognizer);
        let parsed = parse_itinerary("Day 1: Arrival\nVisit the Eiffel Tower");

        let places = enricher.extract_places(&parsed).await;
        assert_eq!(places.places().collect::<Vec<_>>(), vec!["Eiffel Tower"]);
        assert_eq!(
            places.places_for_activity("Day 1: Arrival", "Visit the Eiffel Tower"),
            vec!["Eiffel Tower"]
        );
    }

    #[tokio::test]
    async fn test_titles_skipped_and_non_places_dropped() {
        let recognizer = Arc::new(TableRecognizer::new(&[
            ("Day 1: Arrival", vec![("Arrival Hall", "FAC")]),
            (
                "Visit the Eiffel Tower",
                vec![("Eiffel Tower", "FAC"), ("Gustave", "PERSON"), ("noon", "TIME")],
            ),
            ("Visit the Louvre", vec![("Louvre", "ORG"), (" Paris ", "GPE")]),
        ]));
        let enricher = enricher(recognizer.clone());
        let parsed = parse_itinerary(TEXT);

        let places = enricher.extract_places(&parsed).await;
        let names: Vec<&str> = places.places().collect();
        assert_eq!(names.len(), 3);
        for expected in ["Eiffel Tower", "Louvre", "Paris"] {
            assert!(places.contains(expected), "missing {}", expected);
        }
        assert!(!places.contains("Arrival Hall"));
        assert!(!places.contains("Gustave"));
        // Only the two activity lines are sent to the tagger.
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dedup_is_case_sensitive_and_idempotent() {
        let recognizer = Arc::new(TableRecognizer::new(&[
            ("See the Louvre", vec![("Louvre", "FAC")]),
            ("Back to the Louvre", vec![("Louvre", "FAC")]),
            ("Picnic near the louvre", vec![("louvre", "FAC")]),
        ]));
        let enricher = enricher(recognizer);
        let parsed = parse_itinerary(
            "Day 1\nSee the Louvre\nBack to the Louvre\n\nDay 2\nPicnic near the louvre",
        );

        let first = enricher.extract_places(&parsed).await;
        let second = enricher.extract_places(&parsed).await;
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first.mentions().len(), 3);
    }

    #[tokio::test]
    async fn test_recognizer_failure_skips_line() {
        let recognizer = Arc::new(TableRecognizer::new(&[(
            "Visit the Louvre",
            vec![("Louvre", "FAC")],
        )]));
        let enricher = enricher(recognizer);
        let parsed = parse_itinerary("Day 1\nFAIL here\nVisit the Louvre");

        let places = enricher.extract_places(&parsed).await;
        assert_eq!(places.places().collect::<Vec<_>>(), vec!["Louvre"]);
    }

    #[tokio::test]
    async fn test_overview_skips_unresolved_places() {
        let recognizer = Arc::new(TableRecognizer::new(&[(
            "Tour",
            vec![
                ("Eiffel Tower", "FAC"),
                ("Nowhere Plaza", "FAC"),
                ("Atlantis", "LOC"),
            ],
        )]));
        let enricher = enricher(recognizer);
        let parsed = parse_itinerary("Day 1\nTour");
        let places = enricher.extract_places(&parsed).await;
        assert_eq!(places.len(), 3);

        let map = enricher.overview_map(&context("Paris"), &places).await;
        assert_eq!(
            map.center,
            Some(Coordinates {
                latitude: 48.8566,
                longitude: 2.3522
            })
        );
        assert_eq!(map.markers.len(), 2);
        assert_eq!(map.markers[0].kind, MarkerKind::Destination);
        assert_eq!(map.markers[0].label, "Paris");
        assert_eq!(map.markers[1].kind, MarkerKind::Attraction);
        assert_eq!(map.markers[1].label, "Eiffel Tower");
    }

    #[tokio::test]
    async fn test_overview_without_destination() {
        let recognizer = Arc::new(TableRecognizer::new(&[(
            "Visit the Louvre",
            vec![("Louvre", "FAC")],
        )]));
        let enricher = enricher(recognizer);
        let places = enricher
            .extract_places(&parse_itinerary("Day 1\nVisit the Louvre"))
            .await;

        let map = enricher.overview_map(&context("Atlantis"), &places).await;
        assert_eq!(map.center, None);
        assert_eq!(map.markers.len(), 1);
        assert_eq!(map.markers[0].label, "Louvre");
    }

    #[tokio::test]
    async fn test_day_view_attaches_matching_images() {
        let enricher = enricher(Arc::new(TableRecognizer::new(&[])));
        let parsed = parse_itinerary(
            "Day 1: Arrival\nVisit the Eiffel Tower\nBroken line\n\nDay 2: Museums\nVisit the Louvre",
        );

        let view = enricher.day_view(&parsed, "Day 1: Arrival").await.unwrap();
        assert_eq!(view.title, "Day 1: Arrival");
        assert_eq!(view.activities.len(), 2);
        assert_eq!(view.activities[0].text, "Visit the Eiffel Tower");
        assert_eq!(
            view.activities[0].images,
            vec![ImageRef {
                url: "https://img.test/22".to_string()
            }]
        );
        assert!(view.activities[1].images.is_empty());

        assert!(enricher.day_view(&parsed, "Day 3: Beach").await.is_none());
    }

    #[tokio::test]
    async fn test_day_view_lists_places_per_line() {
        let recognizer = Arc::new(TableRecognizer::new(&[
            (
                "Walk from the Louvre to the Seine",
                vec![("Louvre", "FAC"), ("Seine", "LOC"), ("Louvre", "FAC")],
            ),
            ("Lunch with Marie", vec![("Marie", "PERSON")]),
            ("Visit the Eiffel Tower", vec![("Eiffel Tower", "FAC")]),
        ]));
        let enricher = enricher(recognizer.clone());
        let parsed = parse_itinerary(
            "Day 1: Center\nWalk from the Louvre to the Seine\nLunch with Marie\n\nDay 2: West\nVisit the Eiffel Tower",
        );

        let view = enricher.day_view(&parsed, "Day 1: Center").await.unwrap();
        assert_eq!(view.activities[0].places, vec!["Louvre", "Seine"]);
        assert!(view.activities[1].places.is_empty());
        // Only the selected day is sent to the tagger.
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 2);
    }
}
