//! What the render layer needs to draw one annotation.

use serde::Serialize;
use uuid::Uuid;

use crate::cluster::ClusteredAnnotation;
use crate::geo::Coordinate;

/// A render-ready map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Identifier of the annotation this marker draws.
    pub annotation_id: Uuid,
    /// Where to place the marker.
    pub coordinate: Coordinate,
    /// Label for the current zoom tier.
    pub title: String,
    /// Date label for the current zoom tier.
    pub date: String,
    /// Image of the representative entry.
    pub image: String,
    /// Number of entries behind the marker.
    pub count: usize,
    /// Count badge, present only for clusters of more than one entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<usize>,
}

impl From<&ClusteredAnnotation> for Marker {
    fn from(annotation: &ClusteredAnnotation) -> Self {
        let count = annotation.len();
        Self {
            annotation_id: annotation.id,
            coordinate: annotation.coordinate,
            title: annotation.display_title().to_string(),
            date: annotation.display_date(),
            image: annotation.representative().image.clone(),
            count,
            badge: (count > 1).then_some(count),
        }
    }
}

/// Markers for a whole annotation list, in the same order.
#[must_use]
pub fn markers(annotations: &[ClusteredAnnotation]) -> Vec<Marker> {
    annotations.iter().map(Marker::from).collect()
}
