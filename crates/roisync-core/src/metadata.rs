//! Classification and kind of a logical object

use serde::{Deserialize, Serialize};

use crate::error::ClassificationError;
use crate::text_field::{CLASS_DELIMITER, FIELD_DELIMITER, NO_CLASS};

/// Whether an object was drawn by hand or produced by a detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObjectKind {
    #[default]
    Annotation,
    Detection,
}

impl ObjectKind {
    /// Tag written in the packed text field
    pub fn tag(self) -> &'static str {
        match self {
            ObjectKind::Annotation => "Annotation",
            ObjectKind::Detection => "Detection",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Annotation" => Some(ObjectKind::Annotation),
            "Detection" => Some(ObjectKind::Detection),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Ordered classification path, outermost class first.
///
/// An empty path means "unclassified". Names are non-empty and never contain
/// the text field delimiters, so every path survives packing unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Classification(Vec<String>);

impl Classification {
    /// No classification
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(names: I) -> Result<Self, ClassificationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for name in &names {
            if name.is_empty() {
                return Err(ClassificationError::EmptyName);
            }
            if name.contains(CLASS_DELIMITER) || name.contains(FIELD_DELIMITER) {
                return Err(ClassificationError::ReservedDelimiter(name.clone()));
            }
        }
        if let [only] = names.as_slice() {
            if only == NO_CLASS {
                return Err(ClassificationError::ReservedName(only.clone()));
            }
        }
        Ok(Self(names))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    /// Innermost class name
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for Classification {
    type Error = ClassificationError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<Classification> for Vec<String> {
    fn from(classification: Classification) -> Self {
        classification.0
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            return f.write_str("Unclassified");
        }
        f.write_str(&self.0.join(": "))
    }
}
