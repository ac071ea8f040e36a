//! Conversion between local objects and remote shapes.
//!
//! Encoding may split one object into several shapes (one per point, one per
//! polygon of a multi-part area). Every part carries the same identifier in
//! its text field, which is what lets [`crate::merge`] put them back together.

use roisync_geometry::{PointShape, Region, Rgba, ShapeGeometry, ShapeKind};
use serde_json::Value;

use crate::error::{Result, ShapeError};
use crate::hierarchy::AnnotationForest;
use crate::ids::{IdSource, ObjectId, RandomIds};
use crate::object::LogicalObject;
use crate::text_field::{TextField, is_packed};
use crate::wire::{WireShape, parse_shape};

/// Styling applied when encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Fill areal shapes with a translucent version of the stroke colour
    pub fill_shapes: bool,
    /// Stroke colour for objects without one
    pub default_color: Rgba,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            fill_shapes: false,
            default_color: Rgba::default(),
        }
    }
}

/// Encoder/decoder for remote shapes
#[derive(Debug, Clone, Default)]
pub struct ShapeCodec<I = RandomIds> {
    options: EncodeOptions,
    ids: I,
}

impl ShapeCodec<RandomIds> {
    pub fn new(options: EncodeOptions) -> Self {
        Self {
            options,
            ids: RandomIds,
        }
    }
}

impl<I: IdSource> ShapeCodec<I> {
    /// Codec drawing replacement identifiers from `ids`
    pub fn with_id_source(options: EncodeOptions, ids: I) -> Self {
        Self { options, ids }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn id_source(&self) -> &I {
        &self.ids
    }

    /// Shapes representing one object, in part order
    pub fn encode(&self, object: &LogicalObject) -> Vec<WireShape> {
        self.encode_with_parent(object, object.parent)
    }

    /// Shapes for a whole forest, parents before their children
    pub fn encode_forest(&self, forest: &AnnotationForest) -> Vec<WireShape> {
        forest
            .depth_first()
            .into_iter()
            .flat_map(|object| {
                let parent = forest.parent_of(object.id).map(|p| p.id);
                self.encode_with_parent(object, parent)
            })
            .collect()
    }

    fn encode_with_parent(&self, object: &LogicalObject, parent: Option<ObjectId>) -> Vec<WireShape> {
        let stroke = object.color.unwrap_or(self.options.default_color);
        let fill = if self.options.fill_shapes {
            stroke.more_translucent()
        } else {
            Rgba::TRANSPARENT
        };

        let geometries = geometries_for(&object.region, object.id);
        if geometries.is_empty() {
            tracing::debug!(id = %object.id, "object has an empty region, nothing to encode");
        }

        geometries
            .into_iter()
            .map(|geometry| WireShape {
                server_id: 0,
                roi_id: 0,
                identifier: object.id,
                parent,
                classification: object.classification.clone(),
                name: object.name.clone(),
                kind: object.kind,
                locked: object.locked,
                plane: object.plane,
                fill_color: Some(fill),
                stroke_color: Some(stroke),
                owner: None,
                geometry,
            })
            .collect()
    }

    /// Typed shape from one remote JSON object.
    ///
    /// `roi_id` is the server id of the containing ROI.
    pub fn decode(&mut self, json: &Value, roi_id: u64) -> Result<WireShape> {
        let (header, mut geometry) = parse_shape(json)?;
        let text = header.text.as_deref();
        let mut field = TextField::unpack(text, &mut self.ids);

        if let ShapeGeometry::Label(label) = &mut geometry {
            match text.filter(|t| !t.is_empty() && !is_packed(t)) {
                Some(caption) => {
                    label.caption = Some(caption.to_string());
                    field.name = Some(caption.to_string());
                }
                None => label.caption = field.name.clone(),
            }
        }

        Ok(WireShape {
            server_id: header.id.unwrap_or_default(),
            roi_id,
            identifier: field.identifier,
            parent: field.parent,
            classification: field.classification,
            name: field.name,
            kind: field.kind,
            locked: header.locked.unwrap_or_default(),
            plane: header.plane(),
            fill_color: header.fill_color.map(Rgba::from_packed),
            stroke_color: header.stroke_color.map(Rgba::from_packed),
            owner: header.owner(),
            geometry,
        })
    }

    /// Every shape of a server ROI list, one result per shape.
    ///
    /// Accepts a bare array of `{"@id": .., "shapes": [..]}` objects or the
    /// paginated `{"data": [..]}` wrapper around one.
    pub fn decode_rois(&mut self, json: &Value) -> Vec<Result<WireShape>> {
        let rois = match json {
            Value::Array(rois) => rois,
            Value::Object(page) => match page.get("data").and_then(Value::as_array) {
                Some(rois) => rois,
                None => {
                    return vec![Err(ShapeError::MalformedRoi(
                        "expected a ROI array or a page with a \"data\" array".into(),
                    ))];
                }
            },
            other => return vec![Err(ShapeError::MalformedRoi(other.to_string()))],
        };

        let mut shapes = Vec::new();
        for roi in rois {
            let roi_id = roi.get("@id").and_then(Value::as_u64);
            let roi_shapes = roi.get("shapes").and_then(Value::as_array);
            match (roi_id, roi_shapes) {
                (Some(roi_id), Some(roi_shapes)) => {
                    shapes.extend(roi_shapes.iter().map(|shape| self.decode(shape, roi_id)));
                }
                (None, _) => shapes.push(Err(ShapeError::MalformedRoi(format!(
                    "ROI without a numeric \"@id\": {roi}"
                )))),
                (Some(roi_id), None) => shapes.push(Err(ShapeError::MalformedRoi(format!(
                    "ROI {roi_id} has no \"shapes\" array"
                )))),
            }
        }
        shapes
    }
}

fn geometries_for(region: &Region, id: ObjectId) -> Vec<ShapeGeometry> {
    if region.is_empty() {
        return Vec::new();
    }
    let single = |kind: ShapeKind| -> Vec<ShapeGeometry> {
        ShapeGeometry::from_region(kind, region).into_iter().collect()
    };
    match region {
        Region::Rectangle { .. } => single(ShapeKind::Rectangle),
        Region::Ellipse { .. } => single(ShapeKind::Ellipse),
        Region::Line { .. } => single(ShapeKind::Line),
        Region::Polygon { .. } => single(ShapeKind::Polygon),
        Region::Polyline { .. } => single(ShapeKind::Polyline),
        Region::Points { points } => points
            .iter()
            .map(|p| ShapeGeometry::Point(PointShape { x: p.x, y: p.y }))
            .collect(),
        Region::Area { .. } => {
            let holes = region.hole_count();
            if holes > 0 {
                tracing::warn!(%id, holes, "shapes cannot have holes, filling them");
            }
            region
                .polygon_parts()
                .iter()
                .filter_map(|part| ShapeGeometry::from_region(ShapeKind::Polygon, part))
                .collect()
        }
        Region::Collection { parts } => parts.iter().flat_map(|part| geometries_for(part, id)).collect(),
    }
}
