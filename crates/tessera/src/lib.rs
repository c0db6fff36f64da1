//! Tessera - media attachments for persisted records.
//!
//! Tessera manages files attached to records: it validates uploads,
//! stores them under paths rendered from the record's identity, renders
//! cropped and resized styles of images, and removes files that were
//! replaced or whose record was deleted.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tessera::{OperationFlags, TesseraConfig, UploadInput, UploadPart};
//!
//! let orchestrator = TesseraConfig::load()?.orchestrator()?;
//!
//! profile
//!     .avatar
//!     .set(UploadInput::Part(UploadPart::from_bytes("me.png", bytes)))
//!     .await?;
//! db.insert(&mut profile).await?;
//! orchestrator
//!     .after_create(&mut profile, &db, OperationFlags::default())
//!     .await?;
//! ```
//!
//! # Architecture
//!
//! Tessera is organized as a workspace with focused crates:
//!
//! - `tessera_error` - Error types
//! - `tessera_core` - Shared value types, field options, upload constraints
//! - `tessera_storage` - Object storage port and backends
//! - `tessera_template` - Storage path templates
//! - `tessera_media` - The media asset value
//! - `tessera_imaging` - Crop and resize pipeline
//! - `tessera_lifecycle` - Record save and delete hooks
//!
//! This crate re-exports everything for convenience and adds
//! configuration loading, tracing setup and the `tessera` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod telemetry;

pub use config::{BackendConfig, BackendKind, MediaConfig, StorageConfig, TesseraConfig};
pub use telemetry::{init_tracing, init_tracing_with};

pub use tessera_core::{
    Constraints, ConstraintsBuilder, FieldOptions, ImageFormat, ORIGINAL_STYLE, Rectangle,
    RecordContext, RecordContextBuilder, Size, StyleSpec, extension_of, is_image_format,
    is_svg_format, is_video_format, media_url, style_url,
};
pub use tessera_error::{
    ByteSize, ConfigError, DecodeError, DecodeErrorKind, JsonError, StorageError,
    StorageErrorKind, TemplateError, TemplateErrorKind, TesseraError, TesseraErrorKind,
    TesseraResult, UnsupportedInputError, ValidationError, ValidationErrorKind,
};
pub use tessera_imaging::{CropOutcome, CropPipeline, Rendition, codec_format, dimensions};
pub use tessera_lifecycle::{
    ColumnWriter, EmbeddedRecord, FieldSlot, HandlerRegistry, ImageCropHandler, MediaFields,
    MediaHandler, MediaRecord, OperationFlags, Orchestrator, SaveReport,
};
pub use tessera_media::{
    AssetKind, AssetState, MediaAsset, PersistedAsset, SupersededVersion, UploadInput,
    UploadPart, UploadSource,
};
pub use tessera_storage::{
    FileSystemStorage, MemoryStorage, ObjectInfo, ObjectStore, OperationKind, StorageOperation,
    StorageRegistry,
};
pub use tessera_template::{
    DEFAULT_URL_TEMPLATE, Placeholder, TemplateContext, UrlTemplate, pluralize, slugify,
    snake_case,
};
