//! Record lifecycle hooks for Tessera media fields.
//!
//! The persistence layer calls the [`Orchestrator`] around its own writes:
//!
//! | Hook | When | What happens |
//! |---|---|---|
//! | [`before_update`](Orchestrator::before_update) | before an `UPDATE` | pending uploads are stored, crops rendered, cleared fields removed |
//! | [`after_create`](Orchestrator::after_create) | after an `INSERT` | as above, then one follow-up column write with the generated URLs |
//! | [`before_delete`](Orchestrator::before_delete) | before a `DELETE` | every stored file of every media field is removed |
//!
//! Records expose their media fields through [`MediaFields`], including
//! embedded records and lists of them. Each asset is handled at most once
//! per transition.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod handler;
mod orchestrator;
mod record;
mod writer;

pub use handler::{HandlerRegistry, ImageCropHandler, MediaHandler};
pub use orchestrator::{OperationFlags, Orchestrator, SaveReport};
pub use record::{EmbeddedRecord, FieldSlot, MediaFields, MediaRecord};
pub use writer::ColumnWriter;
