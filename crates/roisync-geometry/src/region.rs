//! Canonical 2D regions.
//!
//! A `Region` is what a local object actually covers on the image. Wire
//! shapes convert to and from it, and several wire shapes sharing one
//! identity are combined with [`Region::union`].

use std::f64::consts::PI;

use geo::{Area as _, BooleanOps, Centroid, Coord, LineString, MultiPolygon, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// Number of segments used when an ellipse takes part in a polygon union
pub const ELLIPSE_SEGMENTS: usize = 64;

/// A point in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Vertex> for Coord<f64> {
    fn from(v: Vertex) -> Self {
        Coord { x: v.x, y: v.y }
    }
}

impl From<Coord<f64>> for Vertex {
    fn from(c: Coord<f64>) -> Self {
        Vertex::new(c.x, c.y)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Smallest box holding every vertex, `None` for an empty iterator
    pub fn from_vertices<I: IntoIterator<Item = Vertex>>(vertices: I) -> Option<Self> {
        let mut iter = vertices.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for v in iter {
            bounds.min_x = bounds.min_x.min(v.x);
            bounds.min_y = bounds.min_y.min(v.y);
            bounds.max_x = bounds.max_x.max(v.x);
            bounds.max_y = bounds.max_y.max(v.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Vertex {
        Vertex::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// The region covered by a local object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Region {
    /// Axis-aligned rectangle from its top-left corner
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Axis-aligned ellipse from its centre and radii
    Ellipse {
        center_x: f64,
        center_y: f64,
        radius_x: f64,
        radius_y: f64,
    },
    /// Straight segment
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// One or more isolated points
    Points { points: Vec<Vertex> },
    /// Closed ring
    Polygon { points: Vec<Vertex> },
    /// Open path
    Polyline { points: Vec<Vertex> },
    /// General areal geometry, the result of unions
    Area { polygons: MultiPolygon<f64> },
    /// Parts that cannot be reduced to a single kind
    Collection { parts: Vec<Region> },
}

impl Region {
    /// Single-point region
    pub fn point(x: f64, y: f64) -> Self {
        Region::Points {
            points: vec![Vertex::new(x, y)],
        }
    }

    pub fn is_point_like(&self) -> bool {
        matches!(self, Region::Points { .. })
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Region::Points { points } | Region::Polygon { points } | Region::Polyline { points } => {
                points.is_empty()
            }
            Region::Area { polygons } => polygons.0.is_empty(),
            Region::Collection { parts } => parts.iter().all(Region::is_empty),
            _ => false,
        }
    }

    /// Every vertex describing the region, in drawing order
    pub fn vertices(&self) -> Vec<Vertex> {
        match self {
            Region::Rectangle { x, y, width, height } => vec![
                Vertex::new(*x, *y),
                Vertex::new(x + width, *y),
                Vertex::new(x + width, y + height),
                Vertex::new(*x, y + height),
            ],
            Region::Ellipse {
                center_x,
                center_y,
                radius_x,
                radius_y,
            } => ellipse_vertices(*center_x, *center_y, *radius_x, *radius_y),
            Region::Line { x1, y1, x2, y2 } => vec![Vertex::new(*x1, *y1), Vertex::new(*x2, *y2)],
            Region::Points { points } | Region::Polygon { points } | Region::Polyline { points } => {
                points.clone()
            }
            Region::Area { polygons } => polygons
                .0
                .iter()
                .flat_map(|p| open_ring(p.exterior()))
                .collect(),
            Region::Collection { parts } => parts.iter().flat_map(Region::vertices).collect(),
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Region::Rectangle { x, y, width, height } => Some(Bounds {
                min_x: x.min(x + width),
                min_y: y.min(y + height),
                max_x: x.max(x + width),
                max_y: y.max(y + height),
            }),
            Region::Ellipse {
                center_x,
                center_y,
                radius_x,
                radius_y,
            } => Some(Bounds {
                min_x: center_x - radius_x.abs(),
                min_y: center_y - radius_y.abs(),
                max_x: center_x + radius_x.abs(),
                max_y: center_y + radius_y.abs(),
            }),
            _ => Bounds::from_vertices(self.vertices()),
        }
    }

    /// Polygonal form of an areal region, `None` for points and lines
    pub fn to_multi_polygon(&self) -> Option<MultiPolygon<f64>> {
        match self {
            Region::Rectangle { x, y, width, height } => {
                let rect = Rect::new(
                    Coord { x: *x, y: *y },
                    Coord {
                        x: x + width,
                        y: y + height,
                    },
                );
                Some(MultiPolygon::new(vec![rect.to_polygon()]))
            }
            Region::Ellipse { .. } | Region::Polygon { .. } => {
                Some(MultiPolygon::new(vec![closed_polygon(&self.vertices())]))
            }
            Region::Area { polygons } => Some(polygons.clone()),
            _ => None,
        }
    }

    /// Enclosed area in square pixels (0 for points and lines)
    pub fn area(&self) -> f64 {
        match self {
            Region::Rectangle { width, height, .. } => (width * height).abs(),
            Region::Ellipse { radius_x, radius_y, .. } => (PI * radius_x * radius_y).abs(),
            Region::Polygon { points } => closed_polygon(points).unsigned_area(),
            Region::Area { polygons } => polygons.unsigned_area(),
            Region::Collection { parts } => parts.iter().map(Region::area).sum(),
            _ => 0.0,
        }
    }

    pub fn centroid(&self) -> Option<Vertex> {
        match self {
            Region::Rectangle { .. } | Region::Ellipse { .. } => self.bounds().map(|b| b.center()),
            Region::Line { x1, y1, x2, y2 } => Some(Vertex::new((x1 + x2) / 2.0, (y1 + y2) / 2.0)),
            Region::Polygon { .. } | Region::Area { .. } => self
                .to_multi_polygon()
                .and_then(|mp| mp.centroid())
                .map(|p| Vertex::new(p.x(), p.y()))
                .or_else(|| mean(&self.vertices())),
            _ => mean(&self.vertices()),
        }
    }

    /// Areal region as separate hole-free polygons, one per connected part
    pub fn polygon_parts(&self) -> Vec<Region> {
        match self {
            Region::Polygon { .. } => vec![self.clone()],
            _ => self
                .to_multi_polygon()
                .map(|mp| {
                    mp.0.iter()
                        .map(|p| Region::Polygon {
                            points: open_ring(p.exterior()),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Number of interior rings (holes) in an areal region
    pub fn hole_count(&self) -> usize {
        match self {
            Region::Area { polygons } => polygons.0.iter().map(|p| p.interiors().len()).sum(),
            Region::Collection { parts } => parts.iter().map(Region::hole_count).sum(),
            _ => 0,
        }
    }

    /// Union of two regions.
    ///
    /// Points join points, areal regions are combined with a polygon boolean
    /// union, and anything else is kept side by side in a `Collection`.
    pub fn union(self, other: Region) -> Region {
        let mut parts = self.into_parts();
        for part in other.into_parts() {
            absorb(&mut parts, part);
        }
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Region::Collection { parts }
        }
    }

    fn into_parts(self) -> Vec<Region> {
        match self {
            Region::Collection { parts } => parts,
            other => vec![other],
        }
    }
}

fn absorb(parts: &mut Vec<Region>, part: Region) {
    for slot in parts.iter_mut() {
        if let Some(merged) = try_merge(slot, &part) {
            *slot = merged;
            return;
        }
    }
    parts.push(part);
}

fn try_merge(existing: &Region, part: &Region) -> Option<Region> {
    match (existing, part) {
        (Region::Points { points: a }, Region::Points { points: b }) => Some(Region::Points {
            points: a.iter().chain(b).copied().collect(),
        }),
        _ => {
            let a = existing.to_multi_polygon()?;
            let b = part.to_multi_polygon()?;
            Some(Region::Area {
                polygons: a.union(&b),
            })
        }
    }
}

fn ellipse_vertices(cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<Vertex> {
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / ELLIPSE_SEGMENTS as f64;
            Vertex::new(cx + rx * theta.cos(), cy + ry * theta.sin())
        })
        .collect()
}

fn closed_polygon(points: &[Vertex]) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = points.iter().copied().map(Coord::from).collect();
    Polygon::new(LineString::from(coords), vec![])
}

/// Ring coordinates without the repeated closing vertex
pub(crate) fn open_ring(ring: &LineString<f64>) -> Vec<Vertex> {
    let mut vertices: Vec<Vertex> = ring.coords().copied().map(Vertex::from).collect();
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    vertices
}

fn mean(vertices: &[Vertex]) -> Option<Vertex> {
    if vertices.is_empty() {
        return None;
    }
    let n = vertices.len() as f64;
    let (sx, sy) = vertices
        .iter()
        .fold((0.0, 0.0), |(sx, sy), v| (sx + v.x, sy + v.y));
    Some(Vertex::new(sx / n, sy / n))
}
