//! The work behind each subcommand, free of argument parsing and file I/O

use anyhow::Result;
use roisync_core::{AnnotationForest, LogicalObject, ShapeCodec, WireShape, merge};
use roisync_sync::{RoiEnvelope, SyncConfig, build_add_envelopes, build_delete_envelope};
use serde_json::Value;
use tracing::{info, warn};

/// Add envelopes for a flat list of local objects, parents encoded first
pub fn export(objects: Vec<LogicalObject>, image_id: u64, config: &SyncConfig) -> Result<Vec<RoiEnvelope>> {
    config.validate()?;
    let forest = AnnotationForest::reconstruct(objects);
    let codec = ShapeCodec::new(config.encode_options());
    let shapes = codec.encode_forest(&forest);
    let envelopes = build_add_envelopes(image_id, &shapes, config.max_body_size_bytes)?;
    info!(
        objects = forest.len(),
        shapes = shapes.len(),
        requests = envelopes.len(),
        "encoded objects"
    );
    Ok(envelopes)
}

/// Local objects rebuilt from a server ROI list
pub fn import(rois: &Value) -> AnnotationForest {
    let shapes = decodable_shapes(rois);
    let shape_count = shapes.len();
    let forest = AnnotationForest::reconstruct(merge(shapes));
    info!(
        shapes = shape_count,
        objects = forest.len(),
        roots = forest.roots().count(),
        "imported shapes"
    );
    forest
}

/// Delete envelope for every decodable shape in a ROI list
pub fn delete(rois: &Value, image_id: u64) -> RoiEnvelope {
    let envelope = build_delete_envelope(image_id, &decodable_shapes(rois));
    info!(shapes = envelope.rois.count, "built delete request");
    envelope
}

fn decodable_shapes(rois: &Value) -> Vec<WireShape> {
    let mut codec = ShapeCodec::new(Default::default());
    codec
        .decode_rois(rois)
        .into_iter()
        .filter_map(|result| match result {
            Ok(shape) => Some(shape),
            Err(e) => {
                warn!(error = %e, "skipping shape");
                None
            }
        })
        .collect()
}
