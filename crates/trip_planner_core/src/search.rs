//! crates/trip_planner_core/src/search.rs
//!
//! Query model for the saved-trips table: a substring filter on one column
//! and a sort on another.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::domain::Trip;
use crate::ports::PortError;

/// A trip column that can be filtered or sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TripField {
    #[default]
    Location,
    Purpose,
    StartDate,
    EndDate,
}

impl TripField {
    /// The fixed store column backing this field. Never built from user text.
    pub fn column(&self) -> &'static str {
        match self {
            TripField::Location => "location",
            TripField::Purpose => "purpose",
            TripField::StartDate => "start_date",
            TripField::EndDate => "end_date",
        }
    }
}

impl FromStr for TripField {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "location" => Ok(TripField::Location),
            "purpose" => Ok(TripField::Purpose),
            "startdate" => Ok(TripField::StartDate),
            "enddate" => Ok(TripField::EndDate),
            _ => Err(PortError::InvalidInput(format!("Unknown trip field '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(PortError::InvalidInput(format!("Unknown sort order '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SavedTripQuery {
    pub filter: TripField,
    /// Substring to look for in the filter column. Empty or absent means no filter.
    pub text: Option<String>,
    pub sort_by: TripField,
    pub order: SortOrder,
}

impl SavedTripQuery {
    /// The search text, if it is non-empty.
    pub fn search_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// Sorts trips in place by the query's sort column. The sort is stable.
pub fn sort_trips(trips: &mut [Trip], sort_by: TripField, order: SortOrder) {
    trips.sort_by(|a, b| {
        let ordering = compare_by(a, b, sort_by);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

fn compare_by(a: &Trip, b: &Trip, field: TripField) -> Ordering {
    match field {
        TripField::Location => a.location.cmp(&b.location),
        TripField::Purpose => a.purpose.as_str().cmp(b.purpose.as_str()),
        TripField::StartDate => a.start_date.cmp(&b.start_date),
        TripField::EndDate => a.end_date.cmp(&b.end_date),
    }
}
