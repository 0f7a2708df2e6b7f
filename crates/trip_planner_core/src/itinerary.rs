//! crates/trip_planner_core/src/itinerary.rs
//!
//! Splits a generated itinerary into day-sections.
//!
//! The language model is asked to separate days with a blank line and to start
//! each day with a title line such as `Day 1: Louvre, Tuileries`. Parsing never
//! fails: text that ignores the convention simply yields fewer selectable days.

use crate::domain::DaySection;

/// The always-present first entry of the day selector.
pub const OVERVIEW: &str = "Overview";

const DAY_PREFIX: &str = "Day";
const PARAGRAPH_BREAK: &str = "\n\n";

/// An itinerary broken into its day-sections, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItinerary {
    pub sections: Vec<DaySection>,
}

impl ParsedItinerary {
    /// The day selector: `Overview` followed by every title that starts with `Day`,
    /// with bolding asterisks stripped.
    pub fn options(&self) -> Vec<String> {
        std::iter::once(OVERVIEW.to_string())
            .chain(
                self.sections
                    .iter()
                    .filter(|s| is_day_title(&s.title))
                    .map(|s| strip_bold(&s.title).to_string()),
            )
            .collect()
    }

    /// Raw titles of every section, including ones not offered as options.
    #[cfg(test)]
    pub fn titles(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.title.as_str()).collect()
    }

    /// Looks a section up by its raw title line.
    pub fn section_by_title(&self, title: &str) -> Option<&DaySection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Looks a section up by a value taken from `options()` or by a raw title.
    /// An exact title match wins over a match with bolding stripped.
    pub fn section_for_option(&self, option: &str) -> Option<&DaySection> {
        self.section_by_title(option)
            .or_else(|| self.sections.iter().find(|s| strip_bold(&s.title) == option))
    }
}

/// Parses a raw itinerary. One section is produced per blank-line separated block.
pub fn parse_itinerary(text: &str) -> ParsedItinerary {
    let normalized = text.replace("\r\n", "\n");

    let sections = normalized
        .split(PARAGRAPH_BREAK)
        .map(|block| {
            let mut lines = block.split('\n');
            // `split` always yields at least one item, even for an empty block.
            let title = lines.next().unwrap_or_default().to_string();
            DaySection {
                title,
                activities: lines.map(str::to_string).collect(),
            }
        })
        .collect();

    ParsedItinerary { sections }
}

fn is_day_title(title: &str) -> bool {
    title.starts_with(DAY_PREFIX)
}

fn strip_bold(title: &str) -> &str {
    title.trim_matches('*')
}
