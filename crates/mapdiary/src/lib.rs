//! `mapdiary` - the map core of a travel diary
//!
//! Groups geocoded diary entries into zoom-aware map annotations and keeps
//! them in step with a debounced map viewport.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod cluster;
pub mod config;
pub mod entry;
pub mod error;
pub mod geo;
pub mod logging;
pub mod marker;
pub mod store;
pub mod viewport;
pub mod zoom;

pub use cluster::{AnnotationClusterer, ClusteredAnnotation};
pub use config::Config;
pub use entry::{DiaryEntry, EntryId, Place, Season};
pub use error::{Error, Result};
pub use geo::{Coordinate, Region, Span};
pub use logging::init_logging;
pub use marker::Marker;
pub use store::{EntryStore, StaticEntryStore};
pub use viewport::{AnnotationState, MapViewport, ViewportSettings};
pub use zoom::{zoom_level_for_span, ClusterRadii, ZoomTier};
