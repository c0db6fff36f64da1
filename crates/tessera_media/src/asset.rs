//! The media asset value.

use crate::{AssetKind, PersistedAsset, UploadPart};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tessera_core::{
    Constraints, FieldOptions, ORIGINAL_STYLE, Rectangle, Size, StyleSpec, extension_of,
    is_image_format, is_svg_format, is_video_format, media_url, style_url,
};
use tessera_error::{ConfigError, JsonError, TesseraResult, ValidationError, ValidationErrorKind};
use tessera_storage::ObjectStore;

/// Observable state of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, strum::EnumIter)]
pub enum AssetState {
    /// No file attached
    #[display("empty")]
    Empty,
    /// New file attached, not yet stored
    #[display("pending")]
    Pending,
    /// File stored, renditions current
    #[display("stored")]
    Stored,
    /// Stored file whose renditions must be regenerated
    #[display("pending crop")]
    PendingCrop,
    /// Marked for removal from storage
    #[display("deleted")]
    Deleted,
}

/// A previously stored file made obsolete by a newer one.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct SupersededVersion {
    /// Base URL of the old file
    url: String,
    /// Styles rendered for it
    style_names: Vec<String>,
}

impl SupersededVersion {
    /// Describe an old file and its styles.
    pub fn new(url: impl Into<String>, style_names: Vec<String>) -> Self {
        Self {
            url: url.into(),
            style_names,
        }
    }

    /// Every storage path belonging to this version: the base URL and
    /// one URL per style.
    pub fn paths(&self) -> Vec<String> {
        std::iter::once(self.url.clone())
            .chain(self.style_names.iter().map(|s| style_url(&self.url, s)))
            .collect()
    }
}

/// The value of one media field.
#[derive(Clone)]
pub struct MediaAsset {
    pub(crate) kind: AssetKind,
    pub(crate) file_name: String,
    pub(crate) url: String,
    pub(crate) file_size: i64,
    pub(crate) pending_delete: bool,
    pub(crate) pending_crop: bool,
    pub(crate) crop_options: BTreeMap<String, Rectangle>,
    pub(crate) sizes: BTreeMap<String, Size>,
    pub(crate) original_size: Size,
    pub(crate) superseded: Vec<SupersededVersion>,
    pub(crate) upload: Option<UploadPart>,
    pub(crate) processed: bool,
    pub(crate) options: FieldOptions,
    pub(crate) constraints: Constraints,
    pub(crate) declared_sizes: BTreeMap<String, Size>,
    pub(crate) storage: Option<Arc<dyn ObjectStore>>,
}

impl MediaAsset {
    /// An empty asset of the given kind, with the kind's default constraints.
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            file_name: String::new(),
            url: String::new(),
            file_size: 0,
            pending_delete: false,
            pending_crop: false,
            crop_options: BTreeMap::new(),
            sizes: BTreeMap::new(),
            original_size: Size::default(),
            superseded: Vec::new(),
            upload: None,
            processed: false,
            options: FieldOptions::new(),
            constraints: kind.constraints(),
            declared_sizes: BTreeMap::new(),
            storage: None,
        }
    }

    /// An empty asset configured from field options.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_size` or `sizes` is malformed.
    pub fn with_options(kind: AssetKind, options: FieldOptions) -> Result<Self, ConfigError> {
        let mut asset = Self::new(kind);
        asset.configure(options)?;
        Ok(asset)
    }

    /// Replace the upload constraints, e.g. with [`Constraints::none`] for
    /// trusted local input.
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Apply field options: constraint overrides and declared styles.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_size` or `sizes` is malformed.
    pub fn configure(&mut self, options: FieldOptions) -> Result<(), ConfigError> {
        self.constraints = self.kind.constraints().overridden_by(&options)?;
        self.declared_sizes = if self.kind.is_croppable() {
            options.sizes()?
        } else {
            BTreeMap::new()
        };
        self.options = options;
        Ok(())
    }

    /// Kind of field.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Original file name, empty when no file is attached.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Size in bytes.
    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    /// Crop rectangles by style.
    pub fn crop_options(&self) -> &BTreeMap<String, Rectangle> {
        &self.crop_options
    }

    /// Per-asset target sizes by style.
    pub fn sizes(&self) -> &BTreeMap<String, Size> {
        &self.sizes
    }

    /// Dimensions of the (possibly cropped) original.
    pub fn original_size(&self) -> Size {
        self.original_size
    }

    /// Older versions awaiting removal.
    pub fn superseded(&self) -> &[SupersededVersion] {
        &self.superseded
    }

    /// Field options.
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Effective upload constraints.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Pending upload, if a new file was set and not stored yet.
    pub fn upload(&self) -> Option<&UploadPart> {
        self.upload.as_ref()
    }

    /// Whether a file is attached.
    pub fn has_file(&self) -> bool {
        !self.file_name.is_empty()
    }

    /// Whether no file is attached.
    pub fn is_empty(&self) -> bool {
        !self.has_file()
    }

    /// Whether a new upload awaits storing.
    pub fn is_pending(&self) -> bool {
        self.upload.is_some()
    }

    /// Whether removal was requested.
    pub fn is_pending_delete(&self) -> bool {
        self.pending_delete
    }

    /// Whether regenerating the renditions was requested.
    pub fn is_pending_crop(&self) -> bool {
        self.pending_crop
    }

    /// Whether the current lifecycle call already handled this asset.
    pub fn is_processed(&self) -> bool {
        self.processed
    }

    /// Current state.
    pub fn state(&self) -> AssetState {
        if self.pending_delete {
            AssetState::Deleted
        } else if self.is_empty() {
            AssetState::Empty
        } else if self.upload.is_some() {
            AssetState::Pending
        } else if self.pending_crop {
            AssetState::PendingCrop
        } else {
            AssetState::Stored
        }
    }

    /// Base URL, empty when no file is attached.
    pub fn url(&self) -> &str {
        if self.is_empty() { "" } else { &self.url }
    }

    /// URL of a style rendition, `name.ext` → `name.<style>.ext`. An empty
    /// style yields the base URL.
    pub fn url_for(&self, style: &str) -> String {
        let url = self.url();
        if url.is_empty() || style.is_empty() {
            url.to_string()
        } else {
            style_url(url, style)
        }
    }

    /// URL under the storage endpoint.
    ///
    /// An absolute result (leading `/`) is returned as is; anything else
    /// is made protocol relative.
    pub fn full_url(&self, style: Option<&str>) -> String {
        if self.is_empty() {
            return String::new();
        }
        let endpoint = self.storage.as_ref().map(|s| s.endpoint()).unwrap_or("");
        let joined = format!("{}{}", endpoint, self.url_for(style.unwrap_or("")));
        let joined = joined.trim_end_matches('/');
        if joined.starts_with('/') {
            joined.to_string()
        } else {
            media_url(joined, &[])
        }
    }

    /// [`full_url`](Self::full_url) with a `?_=<nanos>` cache buster.
    pub fn full_url_uncached(&self, style: Option<&str>) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!(
            "{}?_={}",
            self.full_url(style),
            chrono::Utc::now().timestamp_subsec_nanos()
        )
    }

    /// Lowercase extension of the stored URL.
    pub fn ext(&self) -> String {
        extension_of(self.url())
    }

    /// The pending upload's name until it is stored, then the URL.
    fn format_name(&self) -> &str {
        if self.upload.is_some() || self.url.is_empty() {
            &self.file_name
        } else {
            &self.url
        }
    }

    /// Whether the file is a supported raster image.
    pub fn is_image(&self) -> bool {
        self.has_file() && is_image_format(self.format_name())
    }

    /// Whether the file is a video.
    pub fn is_video(&self) -> bool {
        self.has_file() && is_video_format(self.format_name())
    }

    /// Whether the file is an SVG document.
    pub fn is_svg(&self) -> bool {
        self.has_file() && is_svg_format(self.format_name())
    }

    /// Declared sizes overlaid with the asset's own sizes.
    pub fn effective_sizes(&self) -> BTreeMap<String, Size> {
        let mut sizes = self.declared_sizes.clone();
        sizes.extend(self.sizes.iter().map(|(k, v)| (k.clone(), *v)));
        sizes
    }

    /// Style names, sorted: `original` plus every sized or cropped style.
    /// Non-image kinds have none.
    pub fn style_names(&self) -> Vec<String> {
        if !self.kind.is_croppable() {
            return Vec::new();
        }
        let mut names: BTreeSet<String> = BTreeSet::new();
        names.insert(ORIGINAL_STYLE.to_string());
        names.extend(self.declared_sizes.keys().cloned());
        names.extend(self.sizes.keys().cloned());
        names.extend(self.crop_options.keys().cloned());
        names.into_iter().collect()
    }

    /// Specification of every style, active or not.
    pub fn style_specs(&self) -> Vec<StyleSpec> {
        let sizes = self.effective_sizes();
        self.style_names()
            .into_iter()
            .map(|name| {
                let mut spec = StyleSpec::new(name.clone());
                if let Some(size) = sizes.get(&name) {
                    spec = spec.with_size(*size);
                }
                if let Some(crop) = self.crop_options.get(&name) {
                    spec = spec.with_crop(*crop);
                }
                spec
            })
            .collect()
    }

    /// Every storage path of the current file: base URL and one per style.
    pub fn paths(&self) -> Vec<String> {
        if self.url().is_empty() {
            return Vec::new();
        }
        SupersededVersion::new(self.url.clone(), self.style_names()).paths()
    }

    /// Request a crop for `style`. The style gets the crop's size unless it
    /// already has one, and the renditions are marked for regeneration.
    ///
    /// # Errors
    ///
    /// `NotAnImage` for kinds without styles, `InvalidRectangle` for a
    /// degenerate rectangle, `CropOutOfBounds` when the stored original's
    /// size is known and the rectangle falls outside it.
    pub fn request_crop(&mut self, style: &str, rect: Rectangle) -> Result<(), ValidationError> {
        if !self.kind.is_croppable() {
            return Err(ValidationError::new(ValidationErrorKind::NotAnImage(
                self.file_name.clone(),
            )));
        }
        let bounds = self.known_bounds(style).unwrap_or(Size::new(u32::MAX, u32::MAX));
        rect.validate_within(style, bounds.width, bounds.height)?;
        self.crop_options.insert(style.to_string(), rect);
        self.sizes.entry(style.to_string()).or_insert(rect.size());
        self.pending_crop = true;
        self.processed = false;
        Ok(())
    }

    /// Size the rectangles of `style` are measured against, when it is
    /// already settled: the stored original with no upload pending and no
    /// crop or resize of its own.
    fn known_bounds(&self, style: &str) -> Option<Size> {
        let original_settled = self.upload.is_none()
            && !self.crop_options.contains_key(ORIGINAL_STYLE)
            && !self.effective_sizes().contains_key(ORIGINAL_STYLE);
        (style != ORIGINAL_STYLE && original_settled && !self.original_size.is_zero())
            .then_some(self.original_size)
    }

    /// Set the target size of a style.
    ///
    /// # Errors
    ///
    /// `NotAnImage` for kinds without styles.
    pub fn set_size(&mut self, style: &str, size: Size) -> Result<(), ValidationError> {
        if !self.kind.is_croppable() {
            return Err(ValidationError::new(ValidationErrorKind::NotAnImage(
                self.file_name.clone(),
            )));
        }
        self.sizes.insert(style.to_string(), size);
        Ok(())
    }

    /// Assign the storage URL computed for a new upload.
    pub fn assign_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Record the dimensions of the original after cropping.
    pub fn set_original_size(&mut self, size: Size) {
        self.original_size = size;
    }

    /// Mark the asset as handled for this lifecycle call: the upload is
    /// consumed and the crop request cleared.
    pub fn finish_processing(&mut self) {
        self.upload = None;
        self.pending_crop = false;
        self.processed = true;
    }

    /// Reset to the empty state after the stored files were removed.
    /// Superseded versions are kept for cleanup.
    pub fn clear(&mut self) {
        self.set_zero();
        self.pending_delete = false;
    }

    /// Forget the file entirely.
    pub(crate) fn set_zero(&mut self) {
        self.file_name.clear();
        self.url.clear();
        self.file_size = 0;
        self.upload = None;
        self.pending_crop = false;
        self.clear_image_settings();
    }

    pub(crate) fn clear_image_settings(&mut self) {
        self.crop_options.clear();
        self.sizes.clear();
        self.original_size = Size::default();
    }

    /// Snapshot of the stored file, for cleanup after it is replaced.
    pub(crate) fn snapshot(&self) -> Option<SupersededVersion> {
        if self.url().is_empty() {
            return None;
        }
        Some(SupersededVersion::new(self.url.clone(), self.style_names()))
    }

    pub(crate) fn supersede(&mut self, version: SupersededVersion) {
        if version.url == self.url && self.upload.is_none() {
            return;
        }
        if !self.superseded.iter().any(|v| v.url == version.url) {
            self.superseded.push(version);
        }
    }

    /// The persisted form of the current state.
    pub fn persisted(&self) -> PersistedAsset {
        PersistedAsset {
            file_name: self.file_name.clone(),
            url: self.url.clone(),
            file_size: self.file_size,
            crop_options: self.crop_options.clone(),
            sizes: self.sizes.clone(),
            original_size: self.original_size,
        }
    }

    /// Column value: `None` for an empty asset, JSON otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> TesseraResult<Option<String>> {
        if self.is_empty() {
            return Ok(None);
        }
        let json = serde_json::to_string(&self.persisted())
            .map_err(|e| JsonError::new(format!("Failed to encode media asset: {}", e)))?;
        Ok(Some(json))
    }

    /// Column value as JSON: `null` for an empty asset.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self) -> TesseraResult<serde_json::Value> {
        if self.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::to_value(self.persisted())
            .map_err(|e| JsonError::new(format!("Failed to encode media asset: {}", e)).into())
    }

    /// Persisted form with the URL made absolute against the storage
    /// endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export(&self) -> TesseraResult<String> {
        let mut persisted = self.persisted();
        if let Some(storage) = &self.storage {
            persisted.url = media_url(storage.endpoint(), &[&persisted.url]);
        }
        serde_json::to_string(&persisted)
            .map_err(|e| JsonError::new(format!("Failed to export media asset: {}", e)).into())
    }
}

impl Default for MediaAsset {
    fn default() -> Self {
        Self::new(AssetKind::File)
    }
}

impl std::fmt::Debug for MediaAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaAsset")
            .field("kind", &self.kind)
            .field("file_name", &self.file_name)
            .field("url", &self.url)
            .field("file_size", &self.file_size)
            .field("state", &self.state())
            .field("crop_options", &self.crop_options)
            .field("sizes", &self.sizes)
            .field("original_size", &self.original_size)
            .field("superseded", &self.superseded)
            .field("storage", &self.storage.as_ref().map(|s| s.kind().to_string()))
            .finish()
    }
}

impl std::fmt::Display for MediaAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url())
    }
}
