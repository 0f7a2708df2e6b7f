//! crates/trip_planner_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::ports::PortError;

//=========================================================================================
// Trips
//=========================================================================================

/// Why the user is travelling. Chosen from a fixed list on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TripPurpose {
    Leisure,
    Business,
    Family,
    Solo,
}

impl TripPurpose {
    pub const ALL: [TripPurpose; 4] = [
        TripPurpose::Leisure,
        TripPurpose::Business,
        TripPurpose::Family,
        TripPurpose::Solo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripPurpose::Leisure => "Leisure",
            TripPurpose::Business => "Business",
            TripPurpose::Family => "Family",
            TripPurpose::Solo => "Solo",
        }
    }
}

impl fmt::Display for TripPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripPurpose {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TripPurpose::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PortError::InvalidInput(format!("Unknown trip purpose '{}'", s)))
    }
}

/// A planned trip as persisted in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: i64,
    pub location: String,
    pub purpose: TripPurpose,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub itinerary_text: String,
    pub saved: bool,
}

impl Trip {
    /// The immutable slice of this trip that the enrichment pipeline needs.
    pub fn context(&self) -> TripContext {
        TripContext {
            destination: self.location.clone(),
            purpose: self.purpose,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// Heading shown above the itinerary, e.g. "Leisure Trip to Paris".
    pub fn heading(&self) -> String {
        format!("{} Trip to {}", self.purpose, capitalize(&self.location))
    }
}

/// The user's trip request, before an itinerary has been generated for it.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub location: String,
    pub purpose: TripPurpose,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A trip ready to be inserted. New trips always start unsaved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub request: TripRequest,
    pub itinerary_text: String,
}

/// Read-only trip facts threaded explicitly through the enrichment pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TripContext {
    pub destination: String,
    pub purpose: TripPurpose,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

//=========================================================================================
// Parsed itinerary
//=========================================================================================

/// One day's worth of itinerary text. The title line is never part of `activities`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySection {
    pub title: String,
    pub activities: Vec<String>,
}

/// A candidate location name pulled out of one activity line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceMention {
    pub text: String,
    pub day_title: String,
    pub activity: String,
}

//=========================================================================================
// Entities, geodata and imagery
//=========================================================================================

/// Semantic class of a recognized entity. Only the first four are treated as places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Location,
    GeopoliticalEntity,
    Facility,
    Organization,
    Other,
}

impl EntityCategory {
    /// Maps an OntoNotes-style label (`LOC`, `GPE`, `FAC`, `ORG`, ...) onto a category.
    /// Anything unrecognized becomes `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "LOC" | "LOCATION" => EntityCategory::Location,
            "GPE" => EntityCategory::GeopoliticalEntity,
            "FAC" | "FACILITY" => EntityCategory::Facility,
            "ORG" | "ORGANIZATION" => EntityCategory::Organization,
            _ => EntityCategory::Other,
        }
    }

    pub fn is_place(&self) -> bool {
        match self {
            EntityCategory::Location
            | EntityCategory::GeopoliticalEntity
            | EntityCategory::Facility
            | EntityCategory::Organization => true,
            EntityCategory::Other => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub category: EntityCategory,
}

impl Entity {
    pub fn new(text: impl Into<String>, category: EntityCategory) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// The trip's destination; rendered with a distinguished flag icon.
    Destination,
    Attraction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub label: String,
    pub coordinates: Coordinates,
    pub kind: MarkerKind,
}

/// A reference to an image found for a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
}

//=========================================================================================
// Packing list
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackingCategory {
    Clothing,
    Toiletries,
    Electronics,
    Other,
}

impl PackingCategory {
    pub const ALL: [PackingCategory; 4] = [
        PackingCategory::Clothing,
        PackingCategory::Toiletries,
        PackingCategory::Electronics,
        PackingCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackingCategory::Clothing => "Clothing",
            PackingCategory::Toiletries => "Toiletries",
            PackingCategory::Electronics => "Electronics",
            PackingCategory::Other => "Other",
        }
    }
}

impl fmt::Display for PackingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackingCategory {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackingCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PortError::InvalidInput(format!("Unknown packing category '{}'", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingItem {
    pub id: i64,
    pub item: String,
    pub category: PackingCategory,
    pub quantity: u32,
    pub packed: bool,
}

/// A packing list entry as submitted by the user. Always stored unpacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPackingItem {
    pub item: String,
    pub category: PackingCategory,
    pub quantity: u32,
}

impl NewPackingItem {
    /// Builds a new item, rejecting a quantity below one.
    pub fn new(
        item: impl Into<String>,
        category: PackingCategory,
        quantity: u32,
    ) -> Result<Self, PortError> {
        if quantity == 0 {
            return Err(PortError::InvalidInput(
                "Quantity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            item: item.into(),
            category,
            quantity,
        })
    }
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
