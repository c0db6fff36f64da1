//! Persisted JSON form of a media asset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_core::{Rectangle, Size};

/// The value written to the record's column.
///
/// Transient state (pending upload, delete and crop flags, superseded
/// versions) is never part of it.
///
/// # Examples
///
/// ```
/// use tessera_media::PersistedAsset;
///
/// let value: PersistedAsset =
///     serde_json::from_str(r#"{"FileName":"a.png","Url":"/a.png","FileSize":3}"#).unwrap();
/// assert_eq!(value.file_name, "a.png");
/// assert!(value.crop_options.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersistedAsset {
    /// Original file name
    #[serde(default)]
    pub file_name: String,
    /// Storage path of the raw upload
    #[serde(default)]
    pub url: String,
    /// Size in bytes
    #[serde(default)]
    pub file_size: i64,
    /// Crop rectangles by style
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub crop_options: BTreeMap<String, Rectangle>,
    /// Target sizes by style
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sizes: BTreeMap<String, Size>,
    /// Dimensions of the (possibly cropped) original
    #[serde(default, skip_serializing_if = "is_zero_size")]
    pub original_size: Size,
}

fn is_zero_size(size: &Size) -> bool {
    *size == Size::default()
}

/// Fields present in an incoming payload. Absent fields leave the asset
/// untouched, so `{"Url": "..."}` updates the URL alone.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PersistedPatch {
    #[serde(rename = "FileName", alias = "file_name", alias = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "Url", alias = "url", alias = "URL")]
    pub url: Option<String>,
    #[serde(rename = "FileSize", alias = "file_size", alias = "fileSize")]
    pub file_size: Option<i64>,
}

/// Image settings carried by an incoming payload.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ImagePatch {
    #[serde(rename = "CropOptions", alias = "crop_options", alias = "cropOptions")]
    pub crop_options: Option<BTreeMap<String, Rectangle>>,
    #[serde(rename = "Sizes", alias = "sizes")]
    pub sizes: Option<BTreeMap<String, Size>>,
    #[serde(rename = "OriginalSize", alias = "original_size", alias = "originalSize")]
    pub original_size: Option<Size>,
}

/// Request flags honoured without being persisted fields.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RequestFlags {
    #[serde(default, rename = "Delete", alias = "delete")]
    pub delete: bool,
    #[serde(default, rename = "Crop", alias = "crop")]
    pub crop: bool,
}
