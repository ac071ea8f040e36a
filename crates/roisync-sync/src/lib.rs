//! Transport-side helpers for roisync.
//!
//! Splits encoded shapes into size-bounded request bodies, builds the add
//! and delete envelopes the server expects, and loads user settings. No
//! network I/O happens here.

pub mod batch;
pub mod config;
pub mod envelope;
pub mod error;

pub use batch::partition;
pub use config::{DEFAULT_MAX_BODY_SIZE, SyncConfig};
pub use envelope::{
    DeletionRef, RoiChanges, RoiEnvelope, build_add_envelopes, build_delete_envelope,
    check_response,
};
pub use error::{ConfigError, EnvelopeError, PartitionError, RejectedResponse};
