//! Zoom levels and the tier table that drives clustering and labelling.
//!
//! | zoom level      | tier    | radius | title   | date         |
//! |-----------------|---------|--------|---------|--------------|
//! | `z <= 5`        | Country | 20 km  | country | `yyyy`       |
//! | `5 < z <= 8`    | Region  | 10 km  | state   | `yyyy/MM`    |
//! | `8 < z <= 12`   | City    | 5 km   | city    | `yyyy/MM/dd` |
//! | `z > 12`        | Street  | 0.5 km | street  | `yyyy/MM/dd` |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::DiaryEntry;
use crate::geo::Span;

/// Upper bound (inclusive) of the country tier.
pub const COUNTRY_MAX_ZOOM: f64 = 5.0;
/// Upper bound (inclusive) of the region tier.
pub const REGION_MAX_ZOOM: f64 = 8.0;
/// Upper bound (inclusive) of the city tier.
pub const CITY_MAX_ZOOM: f64 = 12.0;

/// Zoom level for a visible span: `log2(360 / longitude_delta)`.
///
/// A whole-globe span gives 0; every halving of the span adds one.
#[must_use]
pub fn zoom_level_for_span(span: &Span) -> f64 {
    (360.0 / span.longitude_delta()).log2()
}

/// Granularity tier derived from a zoom level, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomTier {
    /// Whole countries on screen.
    Country,
    /// States and provinces.
    Region,
    /// A single city.
    City,
    /// Street level.
    Street,
}

impl ZoomTier {
    /// All tiers, coarsest first.
    pub const ALL: [Self; 4] = [Self::Country, Self::Region, Self::City, Self::Street];

    /// Tier for a zoom level. NaN falls through to [`ZoomTier::Street`].
    #[must_use]
    pub fn from_zoom_level(zoom_level: f64) -> Self {
        if zoom_level <= COUNTRY_MAX_ZOOM {
            Self::Country
        } else if zoom_level <= REGION_MAX_ZOOM {
            Self::Region
        } else if zoom_level <= CITY_MAX_ZOOM {
            Self::City
        } else {
            Self::Street
        }
    }

    /// The label shown on a marker for `entry` at this tier.
    #[must_use]
    pub fn title_for<'a>(&self, entry: &'a DiaryEntry) -> &'a str {
        let place = &entry.place;
        match self {
            Self::Country => &place.country,
            Self::Region => &place.state,
            Self::City => &place.city,
            Self::Street => place.street.as_deref().unwrap_or(&entry.title),
        }
    }

    /// `strftime` pattern for dates shown at this tier.
    #[must_use]
    pub const fn date_format(&self) -> &'static str {
        match self {
            Self::Country => "%Y",
            Self::Region => "%Y/%m",
            Self::City | Self::Street => "%Y/%m/%d",
        }
    }

    /// Format `date` (in UTC) at this tier's granularity.
    #[must_use]
    pub fn format_date(&self, date: &DateTime<Utc>) -> String {
        date.format(self.date_format()).to_string()
    }
}

impl std::fmt::Display for ZoomTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Country => write!(f, "country"),
            Self::Region => write!(f, "region"),
            Self::City => write!(f, "city"),
            Self::Street => write!(f, "street"),
        }
    }
}

/// Clustering radius per tier, in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterRadii {
    /// Radius at country zoom.
    pub country_km: f64,
    /// Radius at region zoom.
    pub region_km: f64,
    /// Radius at city zoom.
    pub city_km: f64,
    /// Radius at street zoom.
    pub street_km: f64,
}

impl Default for ClusterRadii {
    fn default() -> Self {
        Self {
            country_km: 20.0,
            region_km: 10.0,
            city_km: 5.0,
            street_km: 0.5,
        }
    }
}

impl ClusterRadii {
    /// Radius for `tier`.
    #[must_use]
    pub const fn radius_km(&self, tier: ZoomTier) -> f64 {
        match tier {
            ZoomTier::Country => self.country_km,
            ZoomTier::Region => self.region_km,
            ZoomTier::City => self.city_km,
            ZoomTier::Street => self.street_km,
        }
    }

    /// Radius for a raw zoom level.
    #[must_use]
    pub fn radius_for_zoom(&self, zoom_level: f64) -> f64 {
        self.radius_km(ZoomTier::from_zoom_level(zoom_level))
    }

    /// Check that every radius is positive and finite and that radii never
    /// grow toward finer tiers.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation.
    pub fn check(&self) -> std::result::Result<(), String> {
        for tier in ZoomTier::ALL {
            let r = self.radius_km(tier);
            if !r.is_finite() || r <= 0.0 {
                return Err(format!("{tier} radius must be positive, got {r}"));
            }
        }
        for pair in ZoomTier::ALL.windows(2) {
            let (coarse, fine) = (pair[0], pair[1]);
            if self.radius_km(fine) > self.radius_km(coarse) {
                return Err(format!(
                    "{fine} radius ({}) exceeds {coarse} radius ({})",
                    self.radius_km(fine),
                    self.radius_km(coarse)
                ));
            }
        }
        Ok(())
    }
}
