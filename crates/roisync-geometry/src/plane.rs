use serde::{Deserialize, Serialize};

/// Channel, z-slice and timepoint a shape is drawn on (all 0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ImagePlane {
    #[serde(default)]
    pub c: u32,
    #[serde(default)]
    pub z: u32,
    #[serde(default)]
    pub t: u32,
}

impl ImagePlane {
    pub fn new(c: u32, z: u32, t: u32) -> Self {
        Self { c, z, t }
    }
}

impl std::fmt::Display for ImagePlane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c={} z={} t={}", self.c, self.z, self.t)
    }
}
