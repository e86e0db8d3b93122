//! Diary entry types.
//!
//! A [`DiaryEntry`] is an immutable record of one trip: where it happened,
//! when, and what was written about it.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinate;

/// Unique identifier for a diary entry, generated at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Where an entry was written: a coordinate plus hierarchical place names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Geocoded position.
    pub coordinate: Coordinate,
    /// Street or landmark, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// District or neighbourhood, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    /// City name.
    pub city: String,
    /// State, province or prefecture.
    pub state: String,
    /// Country name.
    pub country: String,
}

impl Place {
    /// Create a place without street or district detail.
    #[must_use]
    pub fn new(
        coordinate: Coordinate,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            coordinate,
            street: None,
            district: None,
            city: city.into(),
            state: state.into(),
            country: country.into(),
        }
    }

    /// Set the street.
    #[must_use]
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    /// Set the district.
    #[must_use]
    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }
}

/// Season label attached to a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// Spring.
    Spring,
    /// Summer.
    Summer,
    /// Fall / autumn.
    #[serde(alias = "autumn")]
    Fall,
    /// Winter.
    Winter,
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spring => write!(f, "Spring"),
            Self::Summer => write!(f, "Summer"),
            Self::Fall => write!(f, "Fall"),
            Self::Winter => write!(f, "Winter"),
        }
    }
}

impl std::str::FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "fall" | "autumn" => Ok(Self::Fall),
            "winter" => Ok(Self::Winter),
            other => Err(format!("unknown season: {other}")),
        }
    }
}

/// One diary record.
///
/// Entries are values: once built they are only read. Use [`DiaryEntry::new`]
/// and the `with_*` setters to construct one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    /// Unique identifier (generated when absent from input).
    #[serde(default)]
    pub id: EntryId,
    /// Entry title.
    pub title: String,
    /// When the entry was written.
    pub date: DateTime<Utc>,
    /// Where the entry was written.
    pub place: Place,
    /// Image reference (asset name or URL).
    #[serde(default)]
    pub image: String,
    /// Free-text body.
    #[serde(default)]
    pub content: String,
    /// Season label.
    pub season: Season,
    /// Year label shown alongside the season.
    pub year: String,
    /// Trip length in days.
    pub duration_days: u32,
}

impl DiaryEntry {
    /// Create an entry with a fresh identifier.
    ///
    /// The season defaults to the meteorological season of `date` in the
    /// northern hemisphere and the year label to the calendar year.
    #[must_use]
    pub fn new(title: impl Into<String>, date: DateTime<Utc>, place: Place) -> Self {
        Self {
            id: EntryId::new(),
            title: title.into(),
            date,
            place,
            image: String::new(),
            content: String::new(),
            season: season_of(&date),
            year: date.year().to_string(),
            duration_days: 1,
        }
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the body text.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the season label.
    #[must_use]
    pub fn with_season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }

    /// Set the year label.
    #[must_use]
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    /// Set the trip length in days.
    #[must_use]
    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = days;
        self
    }

    /// Shorthand for the entry's coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> &Coordinate {
        &self.place.coordinate
    }
}

fn season_of(date: &DateTime<Utc>) -> Season {
    match date.month() {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Fall,
        _ => Season::Winter,
    }
}
