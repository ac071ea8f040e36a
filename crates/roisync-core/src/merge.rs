//! Regrouping decoded shapes into logical objects.
//!
//! Shapes that share an identifier are parts of one object. Their geometries
//! are unioned and their metadata collapsed to one canonical value; parts
//! that disagree are reported, never rejected.

use std::collections::HashMap;
use std::fmt::Debug;

use roisync_geometry::Region;

use crate::ids::ObjectId;
use crate::object::LogicalObject;
use crate::wire::WireShape;

/// Two parts of one object carrying different values for an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeConflict {
    pub id: ObjectId,
    pub attribute: &'static str,
}

/// One object per distinct identifier, in first-seen order
pub fn merge(shapes: Vec<WireShape>) -> Vec<LogicalObject> {
    merge_with_conflicts(shapes).0
}

/// Like [`merge`], also returning every attribute disagreement found
pub fn merge_with_conflicts(shapes: Vec<WireShape>) -> (Vec<LogicalObject>, Vec<AttributeConflict>) {
    let mut order: Vec<ObjectId> = Vec::new();
    let mut groups: HashMap<ObjectId, Vec<WireShape>> = HashMap::new();
    for shape in shapes {
        let id = shape.identifier;
        groups
            .entry(id)
            .or_insert_with(|| {
                order.push(id);
                Vec::new()
            })
            .push(shape);
    }

    let mut conflicts = Vec::new();
    let objects = order
        .into_iter()
        .filter_map(|id| {
            let parts = groups.remove(&id)?;
            merge_group(id, parts, &mut conflicts)
        })
        .collect();
    (objects, conflicts)
}

fn merge_group(
    id: ObjectId,
    parts: Vec<WireShape>,
    conflicts: &mut Vec<AttributeConflict>,
) -> Option<LogicalObject> {
    let first = parts.first()?;

    let checks = [
        ("kind", distinct(parts.iter().map(|s| s.kind))),
        ("classification", distinct(parts.iter().map(|s| &s.classification))),
        ("locked", distinct(parts.iter().map(|s| s.locked))),
        ("plane", distinct(parts.iter().map(|s| s.plane))),
        ("parent", distinct(parts.iter().filter_map(|s| s.parent))),
        ("name", distinct(parts.iter().map(|s| s.name.as_deref()))),
    ];
    for (attribute, values) in checks {
        if let Some(values) = values {
            tracing::warn!(%id, attribute, %values, "parts of one object disagree, keeping the first value");
            conflicts.push(AttributeConflict { id, attribute });
        }
    }

    let region = parts
        .iter()
        .map(|s| s.geometry.to_region())
        .reduce(Region::union)?;

    if parts.len() > 1 {
        tracing::debug!(%id, parts = parts.len(), "merged shapes into one object");
    }

    Some(LogicalObject {
        id,
        parent: parts.iter().find_map(|s| s.parent),
        classification: first.classification.clone(),
        name: first.name.clone(),
        kind: first.kind,
        locked: first.locked,
        plane: first.plane,
        color: first.stroke_color,
        owner: first.owner.clone(),
        region,
        children: Vec::new(),
    })
}

/// Debug listing of the distinct values, `None` when they all agree
fn distinct<T: PartialEq + Debug>(values: impl Iterator<Item = T>) -> Option<String> {
    let mut seen: Vec<T> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    (seen.len() > 1).then(|| format!("{seen:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Classification, ObjectKind};
    use roisync_geometry::{ImagePlane, PointShape, RectangleShape, ShapeGeometry};
    use uuid::Uuid;

    fn id(n: u128) -> ObjectId {
        ObjectId(Uuid::from_u128(n))
    }

    fn shape(identifier: ObjectId, geometry: ShapeGeometry) -> WireShape {
        WireShape {
            server_id: 0,
            roi_id: 0,
            identifier,
            parent: None,
            classification: Classification::none(),
            name: None,
            kind: ObjectKind::Annotation,
            locked: false,
            plane: ImagePlane::default(),
            fill_color: None,
            stroke_color: None,
            owner: None,
            geometry,
        }
    }

    fn rect(x: f64, y: f64, width: f64, height: f64) -> ShapeGeometry {
        ShapeGeometry::Rectangle(RectangleShape { x, y, width, height })
    }

    fn point(x: f64, y: f64) -> ShapeGeometry {
        ShapeGeometry::Point(PointShape { x, y })
    }

    #[test]
    fn rectangles_sharing_an_id_are_unioned() {
        let shapes = vec![
            shape(id(1), rect(0.0, 0.0, 10.0, 10.0)),
            shape(id(1), rect(20.0, 0.0, 5.0, 5.0)),
        ];
        let objects = merge(shapes);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].id, id(1));
        assert!((objects[0].region.area() - 125.0).abs() < 1e-6);
    }

    #[test]
    fn points_sharing_an_id_become_multipoint() {
        let shapes = vec![
            shape(id(7), point(1.0, 1.0)),
            shape(id(7), point(2.0, 2.0)),
            shape(id(7), point(3.0, 3.0)),
        ];
        let objects = merge(shapes);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].region.vertices().len(), 3);
        assert!(objects[0].region.is_point_like());
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let shapes = vec![
            shape(id(3), point(0.0, 0.0)),
            shape(id(1), point(0.0, 0.0)),
            shape(id(3), point(1.0, 1.0)),
            shape(id(2), point(0.0, 0.0)),
        ];
        let ids: Vec<ObjectId> = merge(shapes).into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![id(3), id(1), id(2)]);
    }

    #[test]
    fn first_present_parent_wins() {
        let a = shape(id(1), point(0.0, 0.0));
        let mut b = shape(id(1), point(1.0, 1.0));
        b.parent = Some(id(9));

        let (objects, conflicts) = merge_with_conflicts(vec![a, b]);
        assert_eq!(objects[0].parent, Some(id(9)));
        assert!(conflicts.is_empty());
    }

    #[test]
    fn first_name_wins_even_when_absent() {
        let a = shape(id(1), point(0.0, 0.0));
        let mut b = shape(id(1), point(1.0, 1.0));
        b.name = Some("late".into());

        let (objects, conflicts) = merge_with_conflicts(vec![a, b]);
        assert_eq!(objects[0].name, None);
        assert_eq!(
            conflicts,
            vec![AttributeConflict {
                id: id(1),
                attribute: "name"
            }]
        );
    }

    #[test]
    fn matching_names_are_not_a_conflict() {
        let mut a = shape(id(1), point(0.0, 0.0));
        let mut b = shape(id(1), point(1.0, 1.0));
        a.name = Some("nucleus".into());
        b.name = Some("nucleus".into());

        let (objects, conflicts) = merge_with_conflicts(vec![a, b]);
        assert_eq!(objects[0].name.as_deref(), Some("nucleus"));
        assert!(conflicts.is_empty());
    }

    #[test]
    fn conflicting_classification_keeps_first_and_reports() {
        let mut a = shape(id(1), point(0.0, 0.0));
        let mut b = shape(id(1), point(1.0, 1.0));
        a.classification = Classification::new(["Tumor"]).unwrap();
        b.classification = Classification::new(["Stroma"]).unwrap();
        b.kind = ObjectKind::Detection;

        let (objects, conflicts) = merge_with_conflicts(vec![a, b]);
        assert_eq!(objects[0].classification.names(), ["Tumor"]);
        assert_eq!(objects[0].kind, ObjectKind::Annotation);
        assert_eq!(
            conflicts,
            vec![
                AttributeConflict {
                    id: id(1),
                    attribute: "kind"
                },
                AttributeConflict {
                    id: id(1),
                    attribute: "classification"
                },
            ]
        );
    }

    #[test]
    fn empty_input_gives_no_objects() {
        assert!(merge(Vec::new()).is_empty());
    }
}
