//! Local objects: one identity, one region, plus metadata

use roisync_geometry::{ImagePlane, Region, Rgba};
use serde::{Deserialize, Serialize};

use crate::ids::ObjectId;
use crate::metadata::{Classification, ObjectKind};
use crate::wire::Owner;

/// A local annotation or detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalObject {
    pub id: ObjectId,
    #[serde(default)]
    pub parent: Option<ObjectId>,
    #[serde(default)]
    pub classification: Classification,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: ObjectKind,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub plane: ImagePlane,
    /// Display colour; the configured default is used when absent
    #[serde(default)]
    pub color: Option<Rgba>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    pub region: Region,
    /// Filled in by hierarchy reconstruction
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ObjectId>,
}

impl LogicalObject {
    /// Unclassified top-level annotation with a fresh identifier
    pub fn new(region: Region) -> Self {
        Self {
            id: ObjectId::new(),
            parent: None,
            classification: Classification::none(),
            name: None,
            kind: ObjectKind::Annotation,
            locked: false,
            plane: ImagePlane::default(),
            color: None,
            owner: None,
            region,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }

    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }
}
