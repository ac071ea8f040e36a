//! Remote shape records.
//!
//! [`WireShape`] is the typed form of one shape as the image server stores
//! it. Its JSON form is a flat object: common attributes (`@id`, `@type`,
//! `Text`, colours, plane) next to the kind-specific numeric fields.

use roisync_geometry::{
    EllipseShape, ImagePlane, LabelShape, LineShape, PointShape, PolygonShape, PolylineShape,
    RectangleShape, Rgba, ShapeGeometry, ShapeKind,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ShapeError};
use crate::ids::ObjectId;
use crate::metadata::{Classification, ObjectKind};
use crate::text_field::TextField;

/// Account that owns a shape on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: u64,
    pub full_name: String,
}

/// One remote shape, with its packed metadata already unpacked
#[derive(Debug, Clone, PartialEq)]
pub struct WireShape {
    /// Server-side shape id, 0 for shapes not yet stored
    pub server_id: u64,
    /// Server-side id of the ROI containing the shape, 0 if unknown
    pub roi_id: u64,
    pub identifier: ObjectId,
    pub parent: Option<ObjectId>,
    pub classification: Classification,
    pub name: Option<String>,
    pub kind: ObjectKind,
    pub locked: bool,
    pub plane: ImagePlane,
    pub fill_color: Option<Rgba>,
    pub stroke_color: Option<Rgba>,
    pub owner: Option<Owner>,
    pub geometry: ShapeGeometry,
}

impl WireShape {
    pub fn shape_kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Metadata as written into the text attribute
    pub fn text_field(&self) -> TextField {
        TextField {
            kind: self.kind,
            classification: self.classification.clone(),
            identifier: self.identifier,
            parent: self.parent,
            name: self.name.clone(),
        }
    }

    /// Server reference in `roiId:shapeId` form
    pub fn old_id(&self) -> String {
        format!("{}:{}", self.roi_id, self.server_id)
    }

    /// JSON object accepted by the server for this shape
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let header = RawHeader {
            id: Some(self.server_id),
            old_id: Some(self.old_id()),
            type_uri: self.shape_kind().type_uri(),
            text: Some(self.text_field().pack()),
            fill_color: self.fill_color.map(Rgba::to_packed),
            stroke_color: self.stroke_color.map(Rgba::to_packed),
            locked: Some(self.locked),
            the_c: Some(self.plane.c),
            the_z: Some(self.plane.z),
            the_t: Some(self.plane.t),
            details: None,
        };
        match &self.geometry {
            ShapeGeometry::Point(g) => to_value(header, g),
            ShapeGeometry::Rectangle(g) => to_value(header, g),
            ShapeGeometry::Ellipse(g) => to_value(header, g),
            ShapeGeometry::Line(g) => to_value(header, g),
            ShapeGeometry::Label(g) => to_value(header, g),
            ShapeGeometry::Polygon(g) => to_value(header, g),
            ShapeGeometry::Polyline(g) => to_value(header, g),
        }
    }
}

/// Attributes common to every shape kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawHeader {
    #[serde(rename = "@id", default)]
    pub id: Option<u64>,
    #[serde(rename = "oldId", default, skip_serializing_if = "Option::is_none")]
    pub old_id: Option<String>,
    #[serde(rename = "@type", default)]
    pub type_uri: String,
    #[serde(rename = "Text", default)]
    pub text: Option<String>,
    #[serde(rename = "FillColor", default)]
    pub fill_color: Option<i32>,
    #[serde(rename = "StrokeColor", default)]
    pub stroke_color: Option<i32>,
    #[serde(rename = "Locked", default)]
    pub locked: Option<bool>,
    #[serde(rename = "TheC", default)]
    pub the_c: Option<u32>,
    #[serde(rename = "TheZ", default)]
    pub the_z: Option<u32>,
    #[serde(rename = "TheT", default)]
    pub the_t: Option<u32>,
    #[serde(
        rename = "omero:details",
        alias = "omero:details:",
        default,
        skip_serializing
    )]
    pub details: Option<RawDetails>,
}

impl RawHeader {
    pub fn plane(&self) -> ImagePlane {
        ImagePlane::new(
            self.the_c.unwrap_or_default(),
            self.the_z.unwrap_or_default(),
            self.the_t.unwrap_or_default(),
        )
    }

    pub fn owner(&self) -> Option<Owner> {
        let owner = self.details.as_ref()?.owner.as_ref()?;
        Some(Owner {
            id: owner.id.unwrap_or_default(),
            full_name: owner.full_name(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawDetails {
    #[serde(default)]
    pub owner: Option<RawExperimenter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawExperimenter {
    #[serde(rename = "@id", default)]
    pub id: Option<u64>,
    #[serde(rename = "FirstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "MiddleName", default)]
    pub middle_name: Option<String>,
    #[serde(rename = "LastName", default)]
    pub last_name: Option<String>,
}

impl RawExperimenter {
    fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Serialize, Deserialize)]
struct RawShape<G> {
    #[serde(flatten)]
    header: RawHeader,
    #[serde(flatten)]
    geometry: G,
}

fn to_value<G: Serialize>(header: RawHeader, geometry: &G) -> serde_json::Result<Value> {
    serde_json::to_value(RawShape { header, geometry })
}

fn from_value<G: DeserializeOwned>(json: &Value, kind: ShapeKind) -> Result<(RawHeader, G)> {
    let raw: RawShape<G> = serde_json::from_value(json.clone())
        .map_err(|source| ShapeError::Malformed { kind, source })?;
    Ok((raw.header, raw.geometry))
}

/// Split a shape object into its common attributes and typed geometry
pub(crate) fn parse_shape(json: &Value) -> Result<(RawHeader, ShapeGeometry)> {
    let object = json
        .as_object()
        .ok_or_else(|| ShapeError::NotAnObject(json.to_string()))?;
    let type_uri = object
        .get("@type")
        .and_then(Value::as_str)
        .ok_or(ShapeError::MissingType)?;
    let kind = ShapeKind::from_type_uri(type_uri)
        .ok_or_else(|| ShapeError::UnrecognizedType(type_uri.to_string()))?;

    let parsed = match kind {
        ShapeKind::Point => {
            let (header, g) = from_value::<PointShape>(json, kind)?;
            (header, ShapeGeometry::Point(g))
        }
        ShapeKind::Rectangle => {
            let (header, g) = from_value::<RectangleShape>(json, kind)?;
            (header, ShapeGeometry::Rectangle(g))
        }
        ShapeKind::Ellipse => {
            let (header, g) = from_value::<EllipseShape>(json, kind)?;
            (header, ShapeGeometry::Ellipse(g))
        }
        ShapeKind::Line => {
            let (header, g) = from_value::<LineShape>(json, kind)?;
            (header, ShapeGeometry::Line(g))
        }
        ShapeKind::Label => {
            let (header, g) = from_value::<LabelShape>(json, kind)?;
            (header, ShapeGeometry::Label(g))
        }
        ShapeKind::Polygon => {
            let (header, g) = from_value::<PolygonShape>(json, kind)?;
            (header, ShapeGeometry::Polygon(g))
        }
        ShapeKind::Polyline => {
            let (header, g) = from_value::<PolylineShape>(json, kind)?;
            (header, ShapeGeometry::Polyline(g))
        }
    };
    Ok(parsed)
}
