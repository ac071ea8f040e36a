//! Shape interchange between local objects and image-server ROIs.
//!
//! - [`TextField`]: object metadata packed into a shape's text attribute
//! - [`ShapeCodec`]: local object to remote shapes and back
//! - [`merge`]: shapes sharing an identifier back into one object
//! - [`AnnotationForest`]: parent/child links rebuilt from identifiers

pub mod codec;
pub mod error;
pub mod hierarchy;
pub mod ids;
pub mod merge;
pub mod metadata;
pub mod object;
pub mod text_field;
pub mod wire;

pub use codec::{EncodeOptions, ShapeCodec};
pub use error::{ClassificationError, Result, ShapeError};
pub use hierarchy::AnnotationForest;
pub use ids::{IdSource, ObjectId, RandomIds, SequentialIds};
pub use merge::{AttributeConflict, merge, merge_with_conflicts};
pub use metadata::{Classification, ObjectKind};
pub use object::LogicalObject;
pub use text_field::TextField;
pub use wire::{Owner, WireShape};
