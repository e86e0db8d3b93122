//! Zoom-aware grouping of diary entries into map annotations.
//!
//! The clusterer is a greedy single pass over the entries in input order.
//! Each still-unassigned entry becomes a seed and claims every unassigned
//! entry (itself included) within the tier radius *of the seed*. Members are
//! never compared with each other, so two members of one cluster can be up
//! to twice the radius apart.
//!
//! The result partitions the input: every entry lands in exactly one
//! annotation. Membership depends on input order; callers that need stable
//! output should hand in a stably ordered slice.

use serde::Serialize;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::entry::DiaryEntry;
use crate::geo::Coordinate;
use crate::zoom::{ClusterRadii, ZoomTier};

/// One map marker's worth of entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusteredAnnotation {
    /// Fresh identifier for this pass.
    pub id: Uuid,
    /// Coordinate of the seed entry.
    pub coordinate: Coordinate,
    /// Zoom level the cluster was computed at.
    pub zoom_level: f64,
    /// Tier derived from `zoom_level`.
    pub tier: ZoomTier,
    members: Vec<DiaryEntry>,
    #[serde(skip)]
    representative: usize,
}

impl ClusteredAnnotation {
    /// Build an annotation from its seed and members.
    ///
    /// Returns `None` if `members` is empty.
    #[must_use]
    pub fn new(coordinate: Coordinate, members: Vec<DiaryEntry>, zoom_level: f64) -> Option<Self> {
        let representative = latest_index(&members)?;
        Some(Self {
            id: Uuid::new_v4(),
            coordinate,
            zoom_level,
            tier: ZoomTier::from_zoom_level(zoom_level),
            members,
            representative,
        })
    }

    /// Member entries in input order. Never empty.
    #[must_use]
    pub fn members(&self) -> &[DiaryEntry] {
        &self.members
    }

    /// Number of member entries (at least 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; an annotation holds at least one entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The most recently dated member. On equal dates the earliest member in
    /// input order wins.
    #[must_use]
    pub fn representative(&self) -> &DiaryEntry {
        &self.members[self.representative]
    }

    /// Marker title at this annotation's tier.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.tier.title_for(self.representative())
    }

    /// Marker date at this annotation's tier.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.tier.format_date(&self.representative().date)
    }
}

/// Index of the latest-dated entry, first one wins on ties.
fn latest_index(entries: &[DiaryEntry]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, entry) in entries.iter().enumerate() {
        match best {
            Some(b) if entries[b].date >= entry.date => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Groups entries into annotations for a given zoom level.
#[derive(Debug, Clone, Default)]
pub struct AnnotationClusterer {
    radii: ClusterRadii,
}

impl AnnotationClusterer {
    /// Create a clusterer with custom per-tier radii.
    ///
    /// The radii are not validated here; see [`ClusterRadii::check`]. A NaN
    /// or negative radius never matches another entry, so that tier degrades
    /// to one annotation per entry.
    #[must_use]
    pub const fn new(radii: ClusterRadii) -> Self {
        Self { radii }
    }

    /// The radius table in use.
    #[must_use]
    pub const fn radii(&self) -> &ClusterRadii {
        &self.radii
    }

    /// Partition `entries` into annotations for `zoom_level`.
    ///
    /// Annotations come back in seed order. Empty input gives empty output.
    #[must_use]
    pub fn cluster(&self, entries: &[DiaryEntry], zoom_level: f64) -> Vec<ClusteredAnnotation> {
        let tier = ZoomTier::from_zoom_level(zoom_level);
        let radius = self.radii.radius_km(tier);

        // Tracked by position, not id, so duplicate ids still partition.
        let mut assigned = vec![false; entries.len()];
        let mut annotations = Vec::new();

        for (seed_idx, seed) in entries.iter().enumerate() {
            if assigned[seed_idx] {
                continue;
            }

            // The seed always belongs to its own cluster, whatever the radius.
            let mut members = vec![seed_idx];
            for (idx, candidate) in entries.iter().enumerate() {
                if idx == seed_idx || assigned[idx] {
                    continue;
                }
                if seed.coordinate().distance_km(candidate.coordinate()) <= radius {
                    members.push(idx);
                }
            }

            for &idx in &members {
                assigned[idx] = true;
            }

            trace!(seed = %seed.id, members = members.len(), "formed cluster");

            let members = members.into_iter().map(|i| entries[i].clone()).collect();
            if let Some(annotation) = ClusteredAnnotation::new(*seed.coordinate(), members, zoom_level) {
                annotations.push(annotation);
            }
        }

        debug!(
            entries = entries.len(),
            zoom_level,
            %tier,
            radius_km = radius,
            clusters = annotations.len(),
            "clustered entries"
        );

        annotations
    }
}
