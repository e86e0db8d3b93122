//! Property tests for the annotation clusterer.
//!
//! 1. Every entry lands in exactly one annotation.
//! 2. Every member is within the tier radius of its annotation's seed.
//! 3. The representative is a latest-dated member, earliest on ties.
//! 4. The radius never shrinks as the zoom level decreases.
//! 5. Output size and order are deterministic for a given input order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use mapdiary::{AnnotationClusterer, ClusterRadii, Coordinate, DiaryEntry, EntryId, Place, ZoomTier};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn entry(lat: f64, lon: f64, ts: i64) -> DiaryEntry {
    let coordinate = Coordinate::new(lat, lon).unwrap();
    let date = DateTime::<Utc>::from_timestamp(ts, 0).unwrap();
    DiaryEntry::new("trip", date, Place::new(coordinate, "City", "State", "Country"))
}

/// Entries packed into roughly a 60 km box so every tier sees real merging.
/// Timestamps come from a small set so date ties are common.
fn entries_strategy() -> impl Strategy<Value = Vec<DiaryEntry>> {
    prop::collection::vec(
        (45.0f64..45.5, 12.0f64..12.5, 0i64..6),
        0..40,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(lat, lon, day)| entry(lat, lon, 1_577_836_800 + day * 86_400))
            .collect()
    })
}

fn zoom_strategy() -> impl Strategy<Value = f64> {
    -2.0f64..20.0
}

fn count_by_id(entries: &[DiaryEntry]) -> HashMap<EntryId, usize> {
    let mut counts = HashMap::new();
    for e in entries {
        *counts.entry(e.id).or_insert(0) += 1;
    }
    counts
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Partition
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_entry_in_exactly_one_cluster(entries in entries_strategy(), zoom in zoom_strategy()) {
        let clusters = AnnotationClusterer::default().cluster(&entries, zoom);

        let members: Vec<DiaryEntry> = clusters
            .iter()
            .flat_map(|c| c.members().iter().cloned())
            .collect();

        prop_assert_eq!(members.len(), entries.len());
        prop_assert_eq!(count_by_id(&members), count_by_id(&entries));
        prop_assert!(clusters.iter().all(|c| !c.is_empty()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Members are within radius of the seed
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn members_within_radius_of_seed(entries in entries_strategy(), zoom in zoom_strategy()) {
        let radii = ClusterRadii::default();
        let radius = radii.radius_for_zoom(zoom);
        let clusters = AnnotationClusterer::new(radii).cluster(&entries, zoom);

        for cluster in &clusters {
            // The seed is the first member and supplies the coordinate.
            prop_assert_eq!(*cluster.members()[0].coordinate(), cluster.coordinate);
            for member in cluster.members() {
                let d = cluster.coordinate.distance_km(member.coordinate());
                prop_assert!(d <= radius, "member {} km from seed, radius {}", d, radius);
            }
            for a in cluster.members() {
                for b in cluster.members() {
                    prop_assert!(a.coordinate().distance_km(b.coordinate()) <= 2.0 * radius + 1e-6);
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Representative selection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn representative_is_first_latest(entries in entries_strategy(), zoom in zoom_strategy()) {
        for cluster in AnnotationClusterer::default().cluster(&entries, zoom) {
            let latest = cluster.members().iter().map(|e| e.date).max().unwrap();
            let first_latest = cluster.members().iter().find(|e| e.date == latest).unwrap();
            prop_assert_eq!(cluster.representative().id, first_latest.id);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Radius monotonicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn radius_never_shrinks_when_zooming_out(a in zoom_strategy(), b in zoom_strategy()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let radii = ClusterRadii::default();

        prop_assert!(ZoomTier::from_zoom_level(low) <= ZoomTier::from_zoom_level(high));
        prop_assert!(radii.radius_for_zoom(low) >= radii.radius_for_zoom(high));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn same_input_same_partition(entries in entries_strategy(), zoom in zoom_strategy()) {
        let clusterer = AnnotationClusterer::default();
        let ids = |run: &[mapdiary::ClusteredAnnotation]| -> Vec<Vec<EntryId>> {
            run.iter().map(|c| c.members().iter().map(|e| e.id).collect()).collect()
        };

        let first = clusterer.cluster(&entries, zoom);
        let second = clusterer.cluster(&entries, zoom);
        prop_assert_eq!(ids(&first), ids(&second));
    }
}
