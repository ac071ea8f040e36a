//! The packed text field.
//!
//! A remote shape has a single free-text attribute. Object metadata rides in
//! it as five positional fields:
//!
//! ```text
//! <kind>:<class>&<class>...:<identifier>:<parent identifier>:<name>
//! ```
//!
//! Absent values are written as the `NoClass`, `NoParent` and `NoName`
//! sentinels. The name is the last field and keeps any `:` it contains.

use crate::ids::{IdSource, ObjectId};
use crate::metadata::{Classification, ObjectKind};

pub const FIELD_DELIMITER: &str = ":";
pub const CLASS_DELIMITER: &str = "&";

pub const NO_CLASS: &str = "NoClass";
pub const NO_PARENT: &str = "NoParent";
pub const NO_NAME: &str = "NoName";

const FIELD_COUNT: usize = 5;

/// Whether a text looks like a packed field rather than a plain caption
pub fn is_packed(text: &str) -> bool {
    text.contains(FIELD_DELIMITER)
}

/// Metadata carried in a shape's text attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub kind: ObjectKind,
    pub classification: Classification,
    pub identifier: ObjectId,
    pub parent: Option<ObjectId>,
    pub name: Option<String>,
}

impl TextField {
    /// Unclassified, unnamed, top-level annotation
    pub fn new(identifier: ObjectId) -> Self {
        Self {
            kind: ObjectKind::Annotation,
            classification: Classification::none(),
            identifier,
            parent: None,
            name: None,
        }
    }

    pub fn pack(&self) -> String {
        let class_path = if self.classification.is_none() {
            NO_CLASS.to_string()
        } else {
            self.classification.names().join(CLASS_DELIMITER)
        };
        let parent = self
            .parent
            .map(|id| id.to_string())
            .unwrap_or_else(|| NO_PARENT.to_string());
        let name = self.name.as_deref().filter(|n| !is_blank(n)).unwrap_or(NO_NAME);

        format!(
            "{kind}{d}{class_path}{d}{identifier}{d}{parent}{d}{name}",
            kind = self.kind.tag(),
            identifier = self.identifier,
            d = FIELD_DELIMITER,
        )
    }

    /// Recover metadata from a shape's text.
    ///
    /// Never fails: every field falls back on its own. A missing or
    /// unreadable identifier is replaced by one drawn from `ids`.
    pub fn unpack(text: Option<&str>, ids: &mut impl IdSource) -> Self {
        let text = text.unwrap_or_default();
        let raw = RawFields::split(text);

        let kind = match raw.kind.filter(|tag| !tag.is_empty()) {
            None => ObjectKind::Annotation,
            Some(tag) => ObjectKind::from_tag(tag).unwrap_or_else(|| {
                if is_packed(text) {
                    tracing::warn!(tag, "unknown object kind, reading it as an annotation");
                }
                ObjectKind::Annotation
            }),
        };

        let classification = raw
            .classification
            .map(parse_classification)
            .unwrap_or_default();

        let identifier = match raw.identifier.and_then(ObjectId::parse) {
            Some(id) => id,
            None => {
                let id = ids.next_id();
                tracing::debug!(
                    field = raw.identifier.unwrap_or_default(),
                    %id,
                    "no readable object identifier in shape text, assigned a new one"
                );
                id
            }
        };

        let parent = raw.parent.filter(|p| *p != NO_PARENT).and_then(|p| {
            let parsed = ObjectId::parse(p);
            if parsed.is_none() {
                tracing::warn!(parent = p, "unreadable parent identifier, treating object as top-level");
            }
            parsed
        });

        let name = raw
            .name
            .filter(|n| !is_blank(n) && *n != NO_NAME)
            .map(str::to_string);

        Self {
            kind,
            classification,
            identifier,
            parent,
            name,
        }
    }
}

/// Positional fields of a packed text, `None` where the text ran out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawFields<'a> {
    pub kind: Option<&'a str>,
    pub classification: Option<&'a str>,
    pub identifier: Option<&'a str>,
    pub parent: Option<&'a str>,
    pub name: Option<&'a str>,
}

impl<'a> RawFields<'a> {
    pub fn split(text: &'a str) -> Self {
        let mut fields = text.splitn(FIELD_COUNT, FIELD_DELIMITER);
        Self {
            kind: fields.next(),
            classification: fields.next(),
            identifier: fields.next(),
            parent: fields.next(),
            name: fields.next(),
        }
    }
}

fn is_blank(field: &str) -> bool {
    field.trim().is_empty()
}

fn parse_classification(field: &str) -> Classification {
    if is_blank(field) || field == NO_CLASS {
        return Classification::none();
    }
    let names = field.split(CLASS_DELIMITER).filter(|name| !name.is_empty());
    Classification::new(names).unwrap_or_else(|e| {
        tracing::warn!(field, error = %e, "unreadable classification, leaving object unclassified");
        Classification::none()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{RandomIds, SequentialIds};
    use proptest::prelude::*;
    use uuid::Uuid;

    const ID: &str = "4f0a3bd5-2954-4110-a37c-bab2a01e8e2c";
    const PARENT: &str = "0b7c1a5e-6d1f-4c36-9a55-0e3f3e7d2a11";

    fn id(text: &str) -> ObjectId {
        text.parse().unwrap()
    }

    #[test]
    fn packs_detection_with_class_path() {
        let field = TextField {
            kind: ObjectKind::Detection,
            classification: Classification::new(["Tumor", "Positive"]).unwrap(),
            identifier: id(ID),
            parent: None,
            name: Some("cell-7".into()),
        };
        assert_eq!(
            field.pack(),
            format!("Detection:Tumor&Positive:{ID}:NoParent:cell-7")
        );
    }

    #[test]
    fn packs_sentinels_for_absent_values() {
        let field = TextField::new(id(ID));
        assert_eq!(field.pack(), format!("Annotation:NoClass:{ID}:NoParent:NoName"));
    }

    #[test]
    fn unpacks_every_field() {
        let text = format!("Detection:Tumor&Positive:{ID}:{PARENT}:cell-7");
        let field = TextField::unpack(Some(text.as_str()), &mut RandomIds);
        assert_eq!(field.kind, ObjectKind::Detection);
        assert_eq!(field.classification.names(), ["Tumor", "Positive"]);
        assert_eq!(field.identifier, id(ID));
        assert_eq!(field.parent, Some(id(PARENT)));
        assert_eq!(field.name.as_deref(), Some("cell-7"));
    }

    #[test]
    fn unreadable_identifier_is_regenerated() {
        let mut ids = SequentialIds::new();
        let field = TextField::unpack(
            Some("Annotation:NoClass:not-a-uuid:NoParent:NoName"),
            &mut ids,
        );
        assert_eq!(field.identifier.0, Uuid::from_u128(1));
        assert_eq!(ids.issued(), 1);
        assert_eq!(field.kind, ObjectKind::Annotation);
        assert!(field.classification.is_none());
        assert_eq!(field.parent, None);
        assert_eq!(field.name, None);
    }

    #[test]
    fn missing_text_yields_defaults() {
        let mut ids = SequentialIds::new();
        let field = TextField::unpack(None, &mut ids);
        assert_eq!(field, TextField::new(ObjectId(Uuid::from_u128(1))));
    }

    #[test]
    fn truncated_text_keeps_present_fields() {
        let text = format!("Detection:Stroma:{ID}");
        let mut ids = SequentialIds::new();
        let field = TextField::unpack(Some(text.as_str()), &mut ids);
        assert_eq!(field.kind, ObjectKind::Detection);
        assert_eq!(field.classification.names(), ["Stroma"]);
        assert_eq!(field.identifier, id(ID));
        assert_eq!(field.parent, None);
        assert_eq!(field.name, None);
        assert_eq!(ids.issued(), 0);
    }

    #[test]
    fn unknown_kind_reads_as_annotation() {
        let text = format!("Mystery:NoClass:{ID}:NoParent:NoName");
        let field = TextField::unpack(Some(text.as_str()), &mut RandomIds);
        assert_eq!(field.kind, ObjectKind::Annotation);
        assert_eq!(field.identifier, id(ID));
    }

    #[test]
    fn unreadable_parent_becomes_top_level() {
        let text = format!("Annotation:NoClass:{ID}:garbage:NoName");
        let field = TextField::unpack(Some(text.as_str()), &mut RandomIds);
        assert_eq!(field.parent, None);
    }

    #[test]
    fn name_may_contain_field_delimiter() {
        let mut field = TextField::new(id(ID));
        field.name = Some("ratio: 3:4".into());
        let back = TextField::unpack(Some(field.pack().as_str()), &mut RandomIds);
        assert_eq!(back, field);
    }

    #[test]
    fn blank_name_reads_as_no_name() {
        for text in [
            format!("Annotation:NoClass:{ID}:NoParent:"),
            format!("Annotation:NoClass:{ID}:NoParent:   "),
        ] {
            let field = TextField::unpack(Some(text.as_str()), &mut RandomIds);
            assert_eq!(field.name, None, "{text:?}");
            assert_eq!(field.identifier, id(ID));
        }
    }

    #[test]
    fn blank_name_packs_as_sentinel() {
        let mut field = TextField::new(id(ID));
        field.name = Some("  ".into());
        assert!(field.pack().ends_with(":NoName"));
    }

    #[test]
    fn blank_class_field_is_unclassified() {
        let text = format!("Detection:  :{ID}:NoParent:cell");
        let field = TextField::unpack(Some(text.as_str()), &mut RandomIds);
        assert!(field.classification.is_none());
        assert_eq!(field.kind, ObjectKind::Detection);
        assert_eq!(field.name.as_deref(), Some("cell"));
    }

    #[test]
    fn split_reports_missing_positions() {
        let raw = RawFields::split("Annotation:NoClass");
        assert_eq!(raw.kind, Some("Annotation"));
        assert_eq!(raw.classification, Some("NoClass"));
        assert_eq!(raw.identifier, None);
        assert!(!is_packed("plain caption"));
    }

    fn arb_text_field() -> impl Strategy<Value = TextField> {
        let kind = prop_oneof![Just(ObjectKind::Annotation), Just(ObjectKind::Detection)];
        let classification = prop::collection::vec("[A-Za-z0-9][A-Za-z0-9 _.-]{0,9}", 0..4)
            .prop_filter_map("reserved class path", |names| Classification::new(names).ok());
        let name = proptest::option::of("\\PC{1,16}".prop_filter("absent name", |n| !is_blank(n) && n != NO_NAME));
        (
            kind,
            classification,
            any::<u128>(),
            proptest::option::of(any::<u128>()),
            name,
        )
            .prop_map(|(kind, classification, identifier, parent, name)| TextField {
                kind,
                classification,
                identifier: ObjectId(Uuid::from_u128(identifier)),
                parent: parent.map(|p| ObjectId(Uuid::from_u128(p))),
                name,
            })
    }

    proptest! {
        #[test]
        fn pack_then_unpack_is_identity(field in arb_text_field()) {
            let mut ids = SequentialIds::new();
            let back = TextField::unpack(Some(field.pack().as_str()), &mut ids);
            prop_assert_eq!(back, field);
            prop_assert_eq!(ids.issued(), 0);
        }
    }
}
