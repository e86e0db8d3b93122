//! Entry storage.
//!
//! The store hands out immutable snapshots. A clustering pass works on one
//! snapshot from start to finish and never sees a half-updated list.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::entry::{DiaryEntry, Place, Season};
use crate::error::{Error, Result};
use crate::geo::Coordinate;

/// Source of diary entries.
pub trait EntryStore: Send + Sync {
    /// The current entries, in display order.
    fn snapshot(&self) -> Arc<[DiaryEntry]>;
}

/// A fixed, in-memory list of entries.
#[derive(Debug, Clone)]
pub struct StaticEntryStore {
    entries: Arc<[DiaryEntry]>,
}

impl StaticEntryStore {
    /// Wrap an existing list.
    #[must_use]
    pub fn new(entries: Vec<DiaryEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// The built-in sample trips.
    ///
    /// # Errors
    ///
    /// Only fails if a built-in coordinate or timestamp is invalid.
    pub fn sample() -> Result<Self> {
        Ok(Self::new(sample_entries()?))
    }

    /// Load entries from a JSON array on disk.
    ///
    /// The file is only read; entries without an `id` get a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading entries from {}", path.display());

        let raw = std::fs::read_to_string(path).map_err(|source| Error::EntryLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<DiaryEntry> = serde_json::from_str(&raw)?;

        info!(count = entries.len(), "Loaded entries from {}", path.display());
        Ok(Self::new(entries))
    }

    /// Entries as the list screen shows them (source order).
    #[must_use]
    pub fn list_view(&self) -> &[DiaryEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntryStore for StaticEntryStore {
    fn snapshot(&self) -> Arc<[DiaryEntry]> {
        Arc::clone(&self.entries)
    }
}

fn at(timestamp: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| Error::internal(format!("bad sample timestamp {timestamp}")))
}

fn sample_entries() -> Result<Vec<DiaryEntry>> {
    Ok(vec![
        DiaryEntry::new(
            "Maldives",
            at(1_513_296_000)?,
            Place::new(Coordinate::new(4.1755, 73.5093)?, "Male", "Male Province", "Maldives"),
        )
        .with_image("maldives")
        .with_content(
            "We took a plane in Charles de Gaulle airport in Paris to Male international \
             airport, the flight lasted 13 hours and let me tell you that I loved it so much! \
             It was the first time of my life that I took a long flight.\n\nI was able to see \
             all the beautiful small islands. We arrived early in the afternoon so we had our \
             first meal in the Ithaa Undersea Restaurant, it was delicious and really \
             impressive to eat and see all",
        )
        .with_season(Season::Summer)
        .with_year("2017")
        .with_duration_days(8),
        DiaryEntry::new(
            "Streets of Tokyo",
            at(1_583_020_800)?,
            Place::new(Coordinate::new(35.6762, 139.6503)?, "Tokyo", "Tokyo Prefecture", "Japan")
                .with_street("Meiji Shrine")
                .with_district("Shibuya"),
        )
        .with_image("tokyo")
        .with_content(
            "Exploring the streets of Harajuku today. The energy here is absolutely incredible! \
             Started our morning at the serene Meiji Shrine, then dove into the colorful chaos \
             of Takeshita Street. The contrast between traditional and modern Japan is \
             fascinating...",
        )
        .with_season(Season::Spring)
        .with_year("2020")
        .with_duration_days(5),
        DiaryEntry::new(
            "Afternoon at Eiffel Tower",
            at(1_588_291_200)?,
            Place::new(Coordinate::new(48.8584, 2.2945)?, "Paris", "Île-de-France", "France")
                .with_street("Champ de Mars"),
        )
        .with_image("paris")
        .with_content(
            "Paris in spring is truly enchanting. Spent the afternoon picnicking at Champ de \
             Mars, watching the Eiffel Tower sparkle as the sun set. The cherry blossoms are in \
             full bloom, adding a magical touch to every corner of the city...",
        )
        .with_season(Season::Spring)
        .with_year("2020")
        .with_duration_days(3),
        DiaryEntry::new(
            "Central Park Morning",
            at(1_593_561_600)?,
            Place::new(Coordinate::new(40.7829, -73.9654)?, "New York", "New York", "United States")
                .with_street("Central Park West")
                .with_district("Manhattan"),
        )
        .with_image("nyc")
        .with_content(
            "Found a peaceful spot in the bustling city. Started the day with a morning jog \
             around the Jackie Onassis Reservoir, followed by breakfast at Belvedere Castle. \
             It's amazing how Central Park can make you forget you're in the middle of \
             Manhattan...",
        )
        .with_season(Season::Summer)
        .with_year("2020")
        .with_duration_days(4),
        DiaryEntry::new(
            "Venice Canals",
            at(1_598_918_400)?,
            Place::new(Coordinate::new(45.4408, 12.3155)?, "Venice", "Veneto", "Italy")
                .with_street("St. Mark's Square"),
        )
        .with_image("venice")
        .with_content(
            "Gliding through narrow canals on a gondola, watching the centuries-old buildings \
             pass by. The afternoon light creates beautiful reflections on the water. Stopped \
             for gelato near Rialto Bridge and watched the sunset from St. Mark's Square...",
        )
        .with_season(Season::Fall)
        .with_year("2020")
        .with_duration_days(6),
    ])
}
