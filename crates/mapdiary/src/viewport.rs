//! The map viewport: debounced region changes driving re-clustering.
//!
//! Region changes arrive far faster than anyone can read a map while it is
//! being dragged. [`MapViewport`] runs one task that waits for a quiet period
//! after the latest change, then clusters a fresh entry snapshot against the
//! final region and publishes the result as a brand-new [`AnnotationState`].
//!
//! The timer is single-shot and restartable: every change cancels the
//! pending wait and starts a new one, so a burst of changes inside one quiet
//! period produces exactly one clustering pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::cluster::{AnnotationClusterer, ClusteredAnnotation};
use crate::entry::DiaryEntry;
use crate::error::{Error, Result};
use crate::geo::Region;
use crate::marker::{markers, Marker};
use crate::store::EntryStore;
use crate::zoom::zoom_level_for_span;

/// Default quiet period before re-clustering, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Default quiet period before re-clustering.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

/// Settings for a [`MapViewport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSettings {
    /// Quiet period after the last change before clustering runs.
    pub debounce: Duration,
    /// Region shown before the first change arrives.
    pub initial_region: Region,
}

/// The published result of one clustering pass.
///
/// Each pass replaces the whole value; nothing is updated in place.
#[derive(Debug, Clone)]
pub struct AnnotationState {
    /// Region the annotations were computed for.
    pub region: Region,
    /// Zoom level derived from `region`.
    pub zoom_level: f64,
    /// Annotations in seed order.
    pub annotations: Arc<[ClusteredAnnotation]>,
    /// Number of clustering passes so far; 0 before the first.
    pub pass: u64,
}

impl AnnotationState {
    /// State before any clustering has happened.
    #[must_use]
    pub fn initial(region: Region) -> Self {
        Self {
            region,
            zoom_level: zoom_level_for_span(&region.span),
            annotations: Arc::from(Vec::new()),
            pass: 0,
        }
    }

    /// Run one clustering pass for `region` over `entries`.
    #[must_use]
    pub fn compute(
        region: Region,
        entries: &[DiaryEntry],
        clusterer: &AnnotationClusterer,
        pass: u64,
    ) -> Self {
        let zoom_level = zoom_level_for_span(&region.span);
        Self::at_zoom(region, zoom_level, entries, clusterer, pass)
    }

    /// Like [`AnnotationState::compute`] with an explicit zoom level instead
    /// of one derived from the region's span.
    #[must_use]
    pub fn at_zoom(
        region: Region,
        zoom_level: f64,
        entries: &[DiaryEntry],
        clusterer: &AnnotationClusterer,
        pass: u64,
    ) -> Self {
        Self {
            region,
            zoom_level,
            annotations: clusterer.cluster(entries, zoom_level).into(),
            pass,
        }
    }

    /// Render-ready markers for the current annotations.
    #[must_use]
    pub fn markers(&self) -> Vec<Marker> {
        markers(&self.annotations)
    }
}

/// Handle to a running viewport task.
///
/// Dropping the handle stops the task after any pending change has been
/// clustered.
#[derive(Debug)]
pub struct MapViewport {
    changes: mpsc::UnboundedSender<Region>,
    state: watch::Receiver<AnnotationState>,
    task: JoinHandle<()>,
}

impl MapViewport {
    /// Start the viewport task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(
        settings: ViewportSettings,
        store: Arc<dyn EntryStore>,
        clusterer: AnnotationClusterer,
    ) -> Self {
        let (changes, rx) = mpsc::unbounded_channel();
        let (publish, state) = watch::channel(AnnotationState::initial(settings.initial_region));

        debug!(debounce = ?settings.debounce, "Starting map viewport");
        let task = tokio::spawn(run(rx, publish, store, clusterer, settings.debounce));

        Self {
            changes,
            state,
            task,
        }
    }

    /// Report a region change. Never blocks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ViewportClosed`] if the task has exited.
    pub fn set_region(&self, region: Region) -> Result<()> {
        trace!(center = %region.center, "region changed");
        self.changes.send(region).map_err(|_| Error::ViewportClosed)
    }

    /// Subscribe to state replacements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AnnotationState> {
        self.state.clone()
    }

    /// The latest published state.
    #[must_use]
    pub fn current(&self) -> AnnotationState {
        self.state.borrow().clone()
    }

    /// Stop accepting changes, flush any pending one and wait for the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task panicked or was cancelled.
    pub async fn shutdown(self) -> Result<AnnotationState> {
        let Self {
            changes,
            state,
            task,
        } = self;
        drop(changes);
        task.await
            .map_err(|e| Error::internal(format!("viewport task failed: {e}")))?;
        let last = state.borrow().clone();
        Ok(last)
    }
}

async fn run(
    mut changes: mpsc::UnboundedReceiver<Region>,
    publish: watch::Sender<AnnotationState>,
    store: Arc<dyn EntryStore>,
    clusterer: AnnotationClusterer,
    debounce: Duration,
) {
    let mut pass = 0u64;

    while let Some(first) = changes.recv().await {
        let mut latest = first;
        let mut coalesced = 1usize;

        let closed = loop {
            tokio::select! {
                biased;
                next = changes.recv() => match next {
                    Some(region) => {
                        latest = region;
                        coalesced += 1;
                    }
                    None => break true,
                },
                () = tokio::time::sleep(debounce) => break false,
            }
        };

        pass += 1;
        let entries = store.snapshot();
        let state = AnnotationState::compute(latest, &entries, &clusterer, pass);
        debug!(
            pass,
            coalesced,
            zoom_level = state.zoom_level,
            annotations = state.annotations.len(),
            "Published annotations"
        );
        publish.send_replace(state);

        if closed {
            break;
        }
    }

    debug!("Map viewport stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Coordinate, Span};
    use crate::store::StaticEntryStore;
    use crate::zoom::ZoomTier;

    fn region(lat: f64, lon: f64, longitude_delta: f64) -> Region {
        Region::new(
            Coordinate::new(lat, lon).unwrap(),
            Span::new(longitude_delta.min(180.0), longitude_delta).unwrap(),
        )
    }

    fn settings() -> ViewportSettings {
        ViewportSettings {
            debounce: DEFAULT_DEBOUNCE,
            initial_region: region(30.0, 120.0, 180.0),
        }
    }

    fn spawn_sample() -> MapViewport {
        let store: Arc<dyn EntryStore> = Arc::new(StaticEntryStore::sample().unwrap());
        MapViewport::spawn(settings(), store, AnnotationClusterer::default())
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn test_initial_state() {
        let state = AnnotationState::initial(region(30.0, 120.0, 180.0));
        assert_eq!(state.pass, 0);
        assert!(state.annotations.is_empty());
        assert!((state.zoom_level - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_sample_world_view() {
        let store = StaticEntryStore::sample().unwrap();
        let state = AnnotationState::compute(
            region(30.0, 120.0, 180.0),
            store.list_view(),
            &AnnotationClusterer::default(),
            1,
        );

        // The sample trips are continents apart.
        assert_eq!(state.annotations.len(), 5);
        assert_eq!(state.annotations[0].tier, ZoomTier::Country);
        assert_eq!(state.markers()[0].title, "Maldives");
        assert_eq!(state.markers()[0].date, "2017");
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_is_coalesced_into_one_pass() {
        crate::logging::init_test_logging();
        let viewport = spawn_sample();

        for i in 0..5u32 {
            let lon = 10.0 + f64::from(i);
            viewport.set_region(region(45.0, lon, 360.0 / 64.0)).unwrap();
            advance(50).await;
        }

        // 250 ms since the last change: still quiet-period.
        advance(200).await;
        assert_eq!(viewport.current().pass, 0);

        advance(100).await;
        let state = viewport.current();
        assert_eq!(state.pass, 1);
        assert_eq!(state.region, region(45.0, 14.0, 360.0 / 64.0));
        assert!((state.zoom_level - 6.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_give_separate_passes() {
        let viewport = spawn_sample();

        viewport.set_region(region(45.0, 10.0, 90.0)).unwrap();
        advance(400).await;
        assert_eq!(viewport.current().pass, 1);

        viewport.set_region(region(45.0, 12.0, 1.0)).unwrap();
        advance(400).await;
        let state = viewport.current();
        assert_eq!(state.pass, 2);
        assert_eq!(state.region, region(45.0, 12.0, 1.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_replacement() {
        let viewport = spawn_sample();
        let mut rx = viewport.subscribe();

        viewport.set_region(region(0.0, 0.0, 360.0)).unwrap();
        rx.changed().await.unwrap();

        let state = rx.borrow_and_update().clone();
        assert_eq!(state.pass, 1);
        assert_eq!(state.annotations.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_pending_change() {
        let viewport = spawn_sample();

        viewport.set_region(region(45.0, 12.0, 0.01)).unwrap();
        let state = viewport.shutdown().await.unwrap();

        assert_eq!(state.pass, 1);
        assert_eq!(state.annotations[0].tier, ZoomTier::Street);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_without_changes() {
        let viewport = spawn_sample();
        let state = viewport.shutdown().await.unwrap();
        assert_eq!(state.pass, 0);
        assert!(state.annotations.is_empty());
    }
}
