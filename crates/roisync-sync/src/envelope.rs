//! Request bodies for the server's ROI update endpoint.
//!
//! Both additions and deletions go through the same envelope; only the
//! `new` list or the `empty_rois` map is populated.

use std::collections::BTreeMap;
use std::fmt;

use roisync_core::WireShape;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::batch::partition;
use crate::error::{EnvelopeError, RejectedResponse};

/// Top-level request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiEnvelope {
    #[serde(rename = "imageId")]
    pub image_id: u64,
    pub rois: RoiChanges,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoiChanges {
    pub count: usize,
    /// Shapes to delete, grouped by ROI id
    pub empty_rois: BTreeMap<u64, Vec<String>>,
    pub new_and_deleted: Vec<Value>,
    pub deleted: BTreeMap<u64, Vec<String>>,
    pub new: Vec<Value>,
    pub modified: Vec<Value>,
}

impl RoiEnvelope {
    /// Envelope adding already serialized shapes
    pub fn add(image_id: u64, shapes: Vec<Value>) -> Self {
        Self {
            image_id,
            rois: RoiChanges {
                count: shapes.len(),
                new: shapes,
                ..RoiChanges::default()
            },
        }
    }

    /// Envelope deleting the referenced shapes
    pub fn delete(image_id: u64, refs: &[DeletionRef]) -> Self {
        let mut empty_rois: BTreeMap<u64, Vec<String>> = BTreeMap::new();
        for r in refs {
            empty_rois.entry(r.grouping_key()).or_default().push(r.to_string());
        }
        Self {
            image_id,
            rois: RoiChanges {
                count: refs.len(),
                empty_rois,
                ..RoiChanges::default()
            },
        }
    }

    /// Compact JSON body as sent over the wire
    pub fn to_body(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Add envelopes for `shapes`, each body below `max_body_size` bytes where
/// possible.
///
/// No shapes means no requests.
pub fn build_add_envelopes(
    image_id: u64,
    shapes: &[WireShape],
    max_body_size: usize,
) -> Result<Vec<RoiEnvelope>, EnvelopeError> {
    if shapes.is_empty() {
        tracing::debug!(image_id, "no shapes to add");
        return Ok(Vec::new());
    }

    let items = shapes
        .iter()
        .map(|shape| {
            let json = shape.to_json()?;
            let len = serde_json::to_string(&json)?.len();
            Ok((json, len))
        })
        .collect::<serde_json::Result<Vec<(Value, usize)>>>()?;

    // body length with an empty `new` list and a one-digit count
    let frame_len = RoiEnvelope::add(image_id, Vec::new()).to_body()?.len();
    let body_len = |batch: &[(Value, usize)]| -> usize {
        let shapes_len: usize = batch.iter().map(|(_, len)| len).sum();
        let separators = batch.len().saturating_sub(1);
        frame_len - 1 + digits(batch.len()) + shapes_len + separators
    };

    let envelopes: Vec<RoiEnvelope> = partition(items, max_body_size, body_len)?
        .into_iter()
        .map(|batch| RoiEnvelope::add(image_id, batch.into_iter().map(|(json, _)| json).collect()))
        .collect();

    tracing::debug!(
        image_id,
        shapes = shapes.len(),
        requests = envelopes.len(),
        "built add envelopes"
    );
    Ok(envelopes)
}

/// Delete envelope for every stored shape in `shapes`; unsaved ones are skipped
pub fn build_delete_envelope(image_id: u64, shapes: &[WireShape]) -> RoiEnvelope {
    let refs: Vec<DeletionRef> = shapes.iter().filter_map(DeletionRef::from_shape).collect();
    if refs.len() < shapes.len() {
        tracing::debug!(
            skipped = shapes.len() - refs.len(),
            "shapes without a server id cannot be deleted"
        );
    }
    RoiEnvelope::delete(image_id, &refs)
}

fn digits(n: usize) -> usize {
    n.to_string().len()
}

/// Server reference to a stored shape, written `roi:shape`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeletionRef {
    pub roi_id: u64,
    pub shape_id: u64,
}

impl DeletionRef {
    pub fn parse(text: &str) -> Option<Self> {
        let (roi, shape) = text.split_once(':')?;
        Some(Self {
            roi_id: roi.trim().parse().ok()?,
            shape_id: shape.trim().parse().ok()?,
        })
    }

    /// Reference to a decoded shape; `None` if it was never stored
    pub fn from_shape(shape: &WireShape) -> Option<Self> {
        (shape.server_id != 0).then_some(Self {
            roi_id: shape.roi_id,
            shape_id: shape.server_id,
        })
    }

    /// ROI the shape belongs to
    pub fn grouping_key(&self) -> u64 {
        self.roi_id
    }
}

impl fmt::Display for DeletionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.roi_id, self.shape_id)
    }
}

/// Classify a response body; any mention of "error" is a failure
pub fn check_response(body: &str) -> Result<(), RejectedResponse> {
    if body.to_lowercase().contains("error") {
        tracing::warn!(body, "server reported an error");
        return Err(RejectedResponse(body.to_string()));
    }
    Ok(())
}
