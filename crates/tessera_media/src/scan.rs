//! Setting and scanning asset values.

use crate::persisted::{ImagePatch, PersistedPatch, RequestFlags};
use crate::{MediaAsset, UploadInput, UploadPart};
use tessera_error::{
    JsonError, StorageError, TesseraResult, UnsupportedInputError, ValidationError,
    ValidationErrorKind,
};

/// File identity resolved from an input, before validation.
struct Candidate<'a> {
    file_name: String,
    content_type: Option<&'a str>,
    size: u64,
}

impl MediaAsset {
    /// Set the asset from an upload or an encoded value.
    ///
    /// Uploads are validated against the effective constraints first
    /// (type, then extension, then size). With several non-empty parts
    /// every part must pass, and a failure names the 1-based part index.
    /// When the file identity changes, the previously stored file is
    /// queued for cleanup.
    ///
    /// # Errors
    ///
    /// A validation error leaves the asset unchanged. Encoded inputs can
    /// fail to decode.
    #[tracing::instrument(skip(self, input), fields(kind = %self.kind, current = %self.file_name))]
    pub async fn set(&mut self, input: UploadInput) -> TesseraResult<()> {
        let previous = self.snapshot();
        let (previous_name, previous_size) = (self.file_name.clone(), self.file_size);

        let file_size = match &input {
            UploadInput::File(path) => Some(
                tokio::fs::metadata(path)
                    .await
                    .map_err(|e| StorageError::operation("stat upload", path.display().to_string(), e))?
                    .len(),
            ),
            _ => None,
        };

        self.validate(&input, file_size)?;
        self.apply(input, file_size)?;
        self.processed = false;

        if self.file_name != previous_name || self.file_size != previous_size {
            if let Some(version) = previous {
                tracing::debug!(url = %version.url(), "Queued superseded version for cleanup");
                self.supersede(version);
            }
        }
        Ok(())
    }

    fn validate(&self, input: &UploadInput, file_size: Option<u64>) -> Result<(), ValidationError> {
        if self.constraints.is_empty() {
            return Ok(());
        }

        let candidate = match input {
            UploadInput::File(path) => Some(Candidate {
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                content_type: None,
                size: file_size.unwrap_or_default(),
            }),
            UploadInput::Part(part) => Some(Candidate::from(part)),
            UploadInput::Parts(parts) if parts.len() == 1 => {
                parts.first().filter(|p| p.size() > 0).map(Candidate::from)
            }
            UploadInput::Parts(parts) => {
                for (i, part) in parts.iter().enumerate().filter(|(_, p)| p.size() > 0) {
                    let candidate = Candidate::from(part);
                    self.check(&candidate).map_err(|reason| {
                        ValidationError::new(ValidationErrorKind::Part {
                            index: i + 1,
                            reason: Box::new(reason),
                        })
                    })?;
                }
                None
            }
            _ => None,
        };

        match candidate {
            Some(c) if !c.file_name.is_empty() && c.size > 0 => {
                self.check(&c).map_err(ValidationError::new)
            }
            _ => Ok(()),
        }
    }

    fn check(&self, candidate: &Candidate<'_>) -> Result<(), ValidationErrorKind> {
        self.constraints
            .check(&candidate.file_name, candidate.content_type, candidate.size)
    }

    fn apply(&mut self, input: UploadInput, file_size: Option<u64>) -> TesseraResult<()> {
        match input {
            UploadInput::Null => self.set_zero(),
            UploadInput::File(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let size = file_size.unwrap_or_default();
                self.attach(UploadPart::from_path(name, path, size));
            }
            UploadInput::Part(part) => self.attach(part),
            UploadInput::Parts(parts) => {
                if let Some(part) = parts.into_iter().find(|p| p.size() > 0) {
                    self.attach(part);
                }
            }
            UploadInput::Bytes(data) => self.scan_bytes(&data)?,
            UploadInput::Json(text) => self.scan_bytes(text.as_bytes())?,
            UploadInput::JsonList(items) => {
                for item in items {
                    self.scan_bytes(item.as_bytes())?;
                }
            }
        }
        Ok(())
    }

    fn attach(&mut self, part: UploadPart) {
        self.file_name = part.file_name().to_string();
        self.file_size = i64::try_from(part.size()).unwrap_or(i64::MAX);
        self.clear_image_settings();
        self.upload = Some(part);
    }

    /// Decode an encoded persisted value into the asset.
    ///
    /// Empty input resets the asset. Otherwise fields present in the
    /// payload overwrite the current ones; `Delete: true` and `Crop: true`
    /// raise the corresponding request flags. For images, crop options and
    /// sizes are merged and every cropped style without a size gets the
    /// crop's size.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a JSON object.
    pub fn scan_bytes(&mut self, data: &[u8]) -> TesseraResult<()> {
        if data.iter().all(u8::is_ascii_whitespace) {
            self.set_zero();
            return Ok(());
        }

        let value: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| JsonError::new(format!("Failed to decode media asset: {}", e)))?;
        if value.is_null() {
            self.set_zero();
            return Ok(());
        }

        let patch: PersistedPatch = decode_shape(&value)?;
        if let Some(file_name) = patch.file_name {
            self.file_name = file_name;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(file_size) = patch.file_size {
            self.file_size = file_size;
        }

        let flags: RequestFlags = decode_shape(&value)?;
        if flags.delete {
            self.pending_delete = true;
            self.processed = false;
        }

        if self.kind.is_croppable() && self.has_file() && !self.pending_delete {
            let image: ImagePatch = decode_shape(&value)?;
            if flags.crop {
                self.pending_crop = true;
                self.processed = false;
            }
            if let Some(crop_options) = image.crop_options {
                self.crop_options.extend(crop_options);
            }
            if let Some(sizes) = image.sizes {
                self.sizes.extend(sizes);
            }
            for (style, rect) in &self.crop_options {
                self.sizes.entry(style.clone()).or_insert(rect.size());
            }
            if let Some(original_size) = image.original_size {
                self.original_size = original_size;
            }
        }
        Ok(())
    }

    /// Scan a column value already parsed as JSON.
    ///
    /// `null` resets, a string is scanned as an encoded payload, an array
    /// of strings is scanned item by item and an object is scanned
    /// directly.
    ///
    /// # Errors
    ///
    /// `UnsupportedInputError` for any other shape.
    pub fn scan_value(&mut self, value: &serde_json::Value) -> TesseraResult<()> {
        match value {
            serde_json::Value::Null => {
                self.set_zero();
                Ok(())
            }
            serde_json::Value::String(text) => self.scan_bytes(text.as_bytes()),
            serde_json::Value::Array(items) => {
                for item in items {
                    match item {
                        serde_json::Value::String(text) => self.scan_bytes(text.as_bytes())?,
                        other => {
                            return Err(UnsupportedInputError::new(format!(
                                "can't scan array item {} into a media asset",
                                other
                            ))
                            .into());
                        }
                    }
                }
                Ok(())
            }
            serde_json::Value::Object(_) => {
                let encoded = serde_json::to_vec(value)
                    .map_err(|e| JsonError::new(format!("Failed to re-encode value: {}", e)))?;
                self.scan_bytes(&encoded)
            }
            other => Err(UnsupportedInputError::new(format!(
                "can't scan {} into a media asset",
                other
            ))
            .into()),
        }
    }
}

impl<'a> From<&'a UploadPart> for Candidate<'a> {
    fn from(part: &'a UploadPart) -> Self {
        Self {
            file_name: part.file_name().to_string(),
            content_type: part.content_type(),
            size: part.size(),
        }
    }
}

fn decode_shape<T: serde::de::DeserializeOwned>(value: &serde_json::Value) -> Result<T, JsonError> {
    T::deserialize(value)
        .map_err(|e| JsonError::new(format!("Failed to decode media asset: {}", e)))
}
