//! Per-kind shape payloads.
//!
//! Each remote shape kind carries a fixed set of numeric fields. The payload
//! structs below serialize with the server's field names so the codec can
//! flatten them straight into a wire record.

use serde::{Deserialize, Serialize};

use crate::region::{Region, Vertex, open_ring};

const SCHEMA: &str = "http://www.openmicroscopy.org/Schemas/OME/2016-06#";

/// Discriminator of a remote shape record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Point,
    Rectangle,
    Ellipse,
    Line,
    Label,
    Polygon,
    Polyline,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Point,
        ShapeKind::Rectangle,
        ShapeKind::Ellipse,
        ShapeKind::Line,
        ShapeKind::Label,
        ShapeKind::Polygon,
        ShapeKind::Polyline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Point => "Point",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Line => "Line",
            ShapeKind::Label => "Label",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Polyline => "Polyline",
        }
    }

    /// Value of the `@type` field for this kind
    pub fn type_uri(self) -> String {
        format!("{SCHEMA}{}", self.name())
    }

    /// Kind named by an `@type` value
    pub fn from_type_uri(uri: &str) -> Option<Self> {
        let name = uri.strip_prefix(SCHEMA)?;
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Conversion between one kind's payload and the canonical region
pub trait KindGeometry: Sized {
    const KIND: ShapeKind;

    fn to_region(&self) -> Region;

    /// Best-effort extraction of this kind's parameters
    fn from_region(region: &Region) -> Option<Self>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointShape {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
}

impl KindGeometry for PointShape {
    const KIND: ShapeKind = ShapeKind::Point;

    fn to_region(&self) -> Region {
        Region::point(self.x, self.y)
    }

    fn from_region(region: &Region) -> Option<Self> {
        let c = region.centroid()?;
        Some(Self { x: c.x, y: c.y })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleShape {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Width")]
    pub width: f64,
    #[serde(rename = "Height")]
    pub height: f64,
}

impl KindGeometry for RectangleShape {
    const KIND: ShapeKind = ShapeKind::Rectangle;

    fn to_region(&self) -> Region {
        Region::Rectangle {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    fn from_region(region: &Region) -> Option<Self> {
        let b = region.bounds()?;
        Some(Self {
            x: b.min_x,
            y: b.min_y,
            width: b.width(),
            height: b.height(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseShape {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "RadiusX")]
    pub radius_x: f64,
    #[serde(rename = "RadiusY")]
    pub radius_y: f64,
}

impl KindGeometry for EllipseShape {
    const KIND: ShapeKind = ShapeKind::Ellipse;

    fn to_region(&self) -> Region {
        Region::Ellipse {
            center_x: self.x,
            center_y: self.y,
            radius_x: self.radius_x,
            radius_y: self.radius_y,
        }
    }

    fn from_region(region: &Region) -> Option<Self> {
        let b = region.bounds()?;
        let c = b.center();
        Some(Self {
            x: c.x,
            y: c.y,
            radius_x: b.width() / 2.0,
            radius_y: b.height() / 2.0,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineShape {
    #[serde(rename = "X1")]
    pub x1: f64,
    #[serde(rename = "Y1")]
    pub y1: f64,
    #[serde(rename = "X2")]
    pub x2: f64,
    #[serde(rename = "Y2")]
    pub y2: f64,
}

impl KindGeometry for LineShape {
    const KIND: ShapeKind = ShapeKind::Line;

    fn to_region(&self) -> Region {
        Region::Line {
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
        }
    }

    fn from_region(region: &Region) -> Option<Self> {
        if let Region::Line { x1, y1, x2, y2 } = *region {
            return Some(Self { x1, y1, x2, y2 });
        }
        let b = region.bounds()?;
        Some(Self {
            x1: b.min_x,
            y1: b.min_y,
            x2: b.max_x,
            y2: b.max_y,
        })
    }
}

/// A text label anchored at a point.
///
/// The caption is not a numeric wire field; the codec fills it from the
/// shape's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelShape {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(skip)]
    pub caption: Option<String>,
}

impl KindGeometry for LabelShape {
    const KIND: ShapeKind = ShapeKind::Label;

    fn to_region(&self) -> Region {
        tracing::warn!(x = self.x, y = self.y, "label has no area, converting it to a point");
        Region::point(self.x, self.y)
    }

    fn from_region(region: &Region) -> Option<Self> {
        let c = region.centroid()?;
        Some(Self {
            x: c.x,
            y: c.y,
            caption: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonShape {
    #[serde(rename = "Points", with = "points_text")]
    pub points: Vec<Vertex>,
}

impl KindGeometry for PolygonShape {
    const KIND: ShapeKind = ShapeKind::Polygon;

    fn to_region(&self) -> Region {
        Region::Polygon {
            points: self.points.clone(),
        }
    }

    fn from_region(region: &Region) -> Option<Self> {
        if let Region::Polygon { points } = region {
            return Some(Self {
                points: points.clone(),
            });
        }
        let polygons = region.to_multi_polygon()?;
        let first = polygons.0.first()?;
        Some(Self {
            points: open_ring(first.exterior()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineShape {
    #[serde(rename = "Points", with = "points_text")]
    pub points: Vec<Vertex>,
}

impl KindGeometry for PolylineShape {
    const KIND: ShapeKind = ShapeKind::Polyline;

    fn to_region(&self) -> Region {
        Region::Polyline {
            points: self.points.clone(),
        }
    }

    fn from_region(region: &Region) -> Option<Self> {
        let points = region.vertices();
        if points.is_empty() {
            return None;
        }
        Some(Self { points })
    }
}

/// Geometry of one remote shape, one variant per supported kind
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    Point(PointShape),
    Rectangle(RectangleShape),
    Ellipse(EllipseShape),
    Line(LineShape),
    Label(LabelShape),
    Polygon(PolygonShape),
    Polyline(PolylineShape),
}

impl ShapeGeometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeGeometry::Point(_) => ShapeKind::Point,
            ShapeGeometry::Rectangle(_) => ShapeKind::Rectangle,
            ShapeGeometry::Ellipse(_) => ShapeKind::Ellipse,
            ShapeGeometry::Line(_) => ShapeKind::Line,
            ShapeGeometry::Label(_) => ShapeKind::Label,
            ShapeGeometry::Polygon(_) => ShapeKind::Polygon,
            ShapeGeometry::Polyline(_) => ShapeKind::Polyline,
        }
    }

    pub fn to_region(&self) -> Region {
        match self {
            ShapeGeometry::Point(g) => g.to_region(),
            ShapeGeometry::Rectangle(g) => g.to_region(),
            ShapeGeometry::Ellipse(g) => g.to_region(),
            ShapeGeometry::Line(g) => g.to_region(),
            ShapeGeometry::Label(g) => g.to_region(),
            ShapeGeometry::Polygon(g) => g.to_region(),
            ShapeGeometry::Polyline(g) => g.to_region(),
        }
    }

    /// Extract the parameters of `kind` from a region
    pub fn from_region(kind: ShapeKind, region: &Region) -> Option<Self> {
        match kind {
            ShapeKind::Point => PointShape::from_region(region).map(ShapeGeometry::Point),
            ShapeKind::Rectangle => RectangleShape::from_region(region).map(ShapeGeometry::Rectangle),
            ShapeKind::Ellipse => EllipseShape::from_region(region).map(ShapeGeometry::Ellipse),
            ShapeKind::Line => LineShape::from_region(region).map(ShapeGeometry::Line),
            ShapeKind::Label => LabelShape::from_region(region).map(ShapeGeometry::Label),
            ShapeKind::Polygon => PolygonShape::from_region(region).map(ShapeGeometry::Polygon),
            ShapeKind::Polyline => PolylineShape::from_region(region).map(ShapeGeometry::Polyline),
        }
    }
}

/// Format vertices as the server's `"x,y x,y"` point list
pub fn format_points(points: &[Vertex]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a `"x,y x,y"` point list; pairs with fewer than two values are skipped
pub fn parse_points(text: &str) -> Result<Vec<Vertex>, String> {
    let mut points = Vec::new();
    for pair in text.split(' ').filter(|p| !p.is_empty()) {
        let coords: Vec<&str> = pair.split(',').collect();
        if coords.len() < 2 {
            continue;
        }
        let x = coords[0]
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid x coordinate in {pair:?}: {e}"))?;
        let y = coords[1]
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid y coordinate in {pair:?}: {e}"))?;
        points.push(Vertex::new(x, y));
    }
    Ok(points)
}

mod points_text {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::region::Vertex;

    pub fn serialize<S: Serializer>(points: &[Vertex], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_points(points))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vertex>, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_points(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_uri_round_trips_for_every_kind() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_type_uri(&kind.type_uri()), Some(kind));
        }
        assert_eq!(
            ShapeKind::Rectangle.type_uri(),
            "http://www.openmicroscopy.org/Schemas/OME/2016-06#Rectangle"
        );
    }

    #[test]
    fn unknown_type_uri_is_rejected() {
        assert_eq!(ShapeKind::from_type_uri("http://www.openmicroscopy.org/Schemas/OME/2016-06#Mask"), None);
        assert_eq!(ShapeKind::from_type_uri("Rectangle"), None);
    }

    #[test]
    fn parses_point_list() {
        let points = parse_points("4.5,-7.5 12.0,65.5 0.0,50.0").unwrap();
        assert_eq!(
            points,
            vec![
                Vertex::new(4.5, -7.5),
                Vertex::new(12.0, 65.5),
                Vertex::new(0.0, 50.0),
            ]
        );
    }

    #[test]
    fn skips_incomplete_pairs_and_rejects_garbage() {
        assert_eq!(parse_points("1,2 3 4,5").unwrap().len(), 2);
        assert!(parse_points("1,2 a,5").is_err());
        assert!(parse_points("").unwrap().is_empty());
    }

    #[test]
    fn polygon_serializes_points_as_text() {
        let polygon = PolygonShape {
            points: vec![Vertex::new(1.5, 2.0), Vertex::new(3.0, -4.25)],
        };
        let json = serde_json::to_value(&polygon).unwrap();
        assert_eq!(json["Points"], "1.5,2 3,-4.25");

        let back: PolygonShape = serde_json::from_value(json).unwrap();
        assert_eq!(back, polygon);
    }

    #[test]
    fn rectangle_from_any_region_uses_bounds() {
        let region = Region::Polygon {
            points: vec![
                Vertex::new(2.0, 3.0),
                Vertex::new(10.0, 3.0),
                Vertex::new(6.0, 9.0),
            ],
        };
        let rect = RectangleShape::from_region(&region).unwrap();
        assert_eq!(
            rect,
            RectangleShape {
                x: 2.0,
                y: 3.0,
                width: 8.0,
                height: 6.0,
            }
        );
    }

    #[test]
    fn ellipse_region_round_trips() {
        let ellipse = EllipseShape {
            x: 4.5,
            y: -7.5,
            radius_x: 12.0,
            radius_y: 65.5,
        };
        assert_eq!(EllipseShape::from_region(&ellipse.to_region()), Some(ellipse));
    }

    #[test]
    fn line_from_non_line_uses_diagonal() {
        let region = Region::Rectangle {
            x: 1.0,
            y: 1.0,
            width: 2.0,
            height: 3.0,
        };
        assert_eq!(
            LineShape::from_region(&region),
            Some(LineShape {
                x1: 1.0,
                y1: 1.0,
                x2: 3.0,
                y2: 4.0,
            })
        );
    }

    #[test]
    fn label_becomes_point_region() {
        let label = LabelShape {
            x: 3.0,
            y: 4.0,
            caption: Some("nucleus".into()),
        };
        let geometry = ShapeGeometry::Label(label);
        assert_eq!(geometry.kind(), ShapeKind::Label);
        assert_eq!(geometry.to_region(), Region::point(3.0, 4.0));
    }

    #[test]
    fn polygon_from_area_drops_closing_vertex() {
        let area = Region::Rectangle {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
        .union(Region::Rectangle {
            x: 5.0,
            y: 5.0,
            width: 1.0,
            height: 1.0,
        });
        let polygon = PolygonShape::from_region(&area).unwrap();
        assert_eq!(polygon.points.len(), 4);
    }
}
