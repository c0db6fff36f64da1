//! Values a media field can be set from.

use std::path::{Path, PathBuf};
use tessera_error::{StorageError, TesseraResult};

/// Where the bytes of an upload come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    /// Bytes already in memory
    Memory(Vec<u8>),
    /// A file on local disk
    Path(PathBuf),
}

/// One uploaded file, e.g. a part of a multipart form.
///
/// # Examples
///
/// ```
/// use tessera_media::UploadPart;
///
/// let part = UploadPart::from_bytes("cat.png", vec![1, 2, 3]).with_content_type("image/png");
/// assert_eq!(part.size(), 3);
/// assert_eq!(part.content_type(), Some("image/png"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    file_name: String,
    content_type: Option<String>,
    size: u64,
    source: UploadSource,
}

impl UploadPart {
    /// An upload held in memory.
    pub fn from_bytes(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            size: data.len() as u64,
            source: UploadSource::Memory(data),
        }
    }

    /// An upload spooled to disk, with its known size.
    pub fn from_path(file_name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            size,
            source: UploadSource::Path(path.into()),
        }
    }

    /// Attach the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// File name as uploaded.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Declared content type, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Where the bytes live.
    pub fn source(&self) -> &UploadSource {
        &self.source
    }

    /// Read the whole upload.
    pub async fn read(&self) -> TesseraResult<Vec<u8>> {
        match &self.source {
            UploadSource::Memory(data) => Ok(data.clone()),
            UploadSource::Path(path) => tokio::fs::read(path).await.map_err(|e| {
                StorageError::operation("open upload", path.display().to_string(), e).into()
            }),
        }
    }
}

/// Input accepted by [`MediaAsset::set`](crate::MediaAsset::set).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadInput {
    /// A local file; its name and size are read from the filesystem
    File(PathBuf),
    /// A single upload part
    Part(UploadPart),
    /// Several upload parts, validated individually
    Parts(Vec<UploadPart>),
    /// An encoded persisted value
    Bytes(Vec<u8>),
    /// An encoded persisted value as text
    Json(String),
    /// Encoded persisted values, scanned in order
    JsonList(Vec<String>),
    /// Clear the field
    Null,
}

impl UploadInput {
    /// Input for a local file.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}
