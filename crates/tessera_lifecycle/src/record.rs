//! How records expose their media fields.

use tessera_error::TesseraResult;
use tessera_media::MediaAsset;

/// One field of a record as seen by the orchestrator.
pub enum FieldSlot<'a> {
    /// A media column
    Media {
        /// Column name
        column: String,
        /// The column's value
        asset: &'a mut MediaAsset,
    },
    /// An embedded record stored in one column
    Nested {
        /// Column holding the embedded record
        column: String,
        /// The embedded record
        record: &'a mut dyn EmbeddedRecord,
    },
    /// A list of embedded records stored in one column
    Repeated {
        /// Column holding the list
        column: String,
        /// The embedded records
        records: Vec<&'a mut dyn EmbeddedRecord>,
    },
}

impl<'a> FieldSlot<'a> {
    /// A media column.
    pub fn media(column: impl Into<String>, asset: &'a mut MediaAsset) -> Self {
        Self::Media {
            column: column.into(),
            asset,
        }
    }

    /// An embedded record.
    pub fn nested(column: impl Into<String>, record: &'a mut dyn EmbeddedRecord) -> Self {
        Self::Nested {
            column: column.into(),
            record,
        }
    }

    /// A list of embedded records.
    pub fn repeated<R: EmbeddedRecord>(column: impl Into<String>, records: &'a mut [R]) -> Self {
        Self::Repeated {
            column: column.into(),
            records: records
                .iter_mut()
                .map(|r| r as &mut dyn EmbeddedRecord)
                .collect(),
        }
    }

    /// Column name of the slot.
    pub fn column(&self) -> &str {
        match self {
            Self::Media { column, .. } | Self::Nested { column, .. } | Self::Repeated { column, .. } => {
                column
            }
        }
    }
}

/// Anything holding media fields.
///
/// The field graph must be a tree: an embedded record must not lead back
/// to one of its owners.
pub trait MediaFields: Send {
    /// Media fields, embedded records and lists of embedded records.
    fn media_fields(&mut self) -> Vec<FieldSlot<'_>>;
}

/// A top-level record persisted in its own row.
pub trait MediaRecord: MediaFields {
    /// Type name, e.g. `UserProfile`.
    fn class_name(&self) -> &str;

    /// Primary key, `None` before the first insert.
    fn primary_key(&self) -> Option<String>;
}

/// A record embedded in a column of its owner.
///
/// Media fields of embedded records are stored under the owner's
/// identity; `column_value` re-encodes the record after its URLs change.
pub trait EmbeddedRecord: MediaFields {
    /// Value of the owner's column for this record.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    fn column_value(&self) -> TesseraResult<serde_json::Value>;
}

/// A media asset reached while walking a record.
pub(crate) struct MediaSlot<'a> {
    /// Column of the top-level record that holds the asset
    pub owner_column: String,
    /// Column of the asset itself
    pub column: String,
    pub asset: &'a mut MediaAsset,
}

/// Flatten the field tree into the assets it holds, in declaration order.
pub(crate) fn collect_media<'a>(
    slots: Vec<FieldSlot<'a>>,
    owner_column: Option<&str>,
    out: &mut Vec<MediaSlot<'a>>,
) {
    for slot in slots {
        match slot {
            FieldSlot::Media { column, asset } => out.push(MediaSlot {
                owner_column: owner_column.unwrap_or(&column).to_string(),
                column,
                asset,
            }),
            FieldSlot::Nested { column, record } => {
                let owner = owner_column.unwrap_or(&column).to_string();
                collect_media(record.media_fields(), Some(&owner), out);
            }
            FieldSlot::Repeated { column, records } => {
                let owner = owner_column.unwrap_or(&column).to_string();
                for record in records {
                    collect_media(record.media_fields(), Some(&owner), out);
                }
            }
        }
    }
}
