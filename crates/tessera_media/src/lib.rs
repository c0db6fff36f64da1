//! Media asset values for Tessera.
//!
//! A [`MediaAsset`] is the value held by one media field of a record. It
//! tracks the identity of the attached file (name, size, storage URL),
//! the crop and size settings of image styles, and the previously stored
//! versions that still need to be removed from storage.
//!
//! # Lifecycle
//!
//! ```text
//! Empty --set--> Pending --store--> Stored --crop request--> PendingCrop --store--> Stored
//!   any state --delete flag--> Deleted
//! ```
//!
//! # Example
//!
//! ```
//! use tessera_media::{AssetKind, MediaAsset, UploadInput, UploadPart};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut avatar = MediaAsset::new(AssetKind::Image);
//! avatar
//!     .set(UploadInput::Part(UploadPart::from_bytes("me.png", vec![0u8; 128])))
//!     .await?;
//! assert!(avatar.is_pending());
//! assert_eq!(avatar.file_name(), "me.png");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod input;
mod kind;
mod persisted;
mod scan;
mod storage;

pub use asset::{AssetState, MediaAsset, SupersededVersion};
pub use input::{UploadInput, UploadPart, UploadSource};
pub use kind::AssetKind;
pub use persisted::PersistedAsset;
