//! Storage path templates for Tessera media fields.
//!
//! A template such as `/system/{class}/{primary_key_path}/{column}/{filename_slug}`
//! is rendered against the identity of the owning record and the uploaded
//! file name. Both `{name}` and `{{name}}` placeholder forms are accepted.
//!
//! # Placeholders
//!
//! | Placeholder | Value |
//! |---|---|
//! | `class` | record type name, snake cased and pluralised (`UserProfile` → `user_profiles`) |
//! | `primary_key` | primary key as text |
//! | `primary_key_path` | URL-safe base64 of the key split into `2/3/4/rest` segments |
//! | `column` | column name, lowercased |
//! | `filename` | original file name |
//! | `filename_slug` | slug of the base name plus the original extension |
//! | `basename` | file name without extension |
//! | `extension` | extension without the dot |
//! | `hash` | nanosecond timestamp token |
//! | `filename_with_hash` | `slug.hash.ext` |
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use tessera_core::RecordContext;
//! use tessera_template::{TemplateContext, UrlTemplate};
//!
//! let record = RecordContext::new("UserProfile", Some("42".to_string()), "Avatar");
//! let ctx = TemplateContext::new(record, "My Photo.PNG")
//!     .with_now(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
//!
//! let url = UrlTemplate::default().render(&ctx).unwrap();
//! assert_eq!(url, "/system/user_profiles/ND/I/avatar/my-photo.PNG");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod inflect;
mod template;

pub use context::TemplateContext;
pub use inflect::{pluralize, slugify, snake_case};
pub use template::{DEFAULT_URL_TEMPLATE, Placeholder, UrlTemplate};
