//! The lifecycle orchestrator.

use crate::record::{MediaSlot, collect_media};
use crate::{ColumnWriter, FieldSlot, HandlerRegistry, MediaRecord};
use std::collections::{BTreeMap, BTreeSet};
use tessera_core::RecordContext;
use tessera_error::{TemplateError, TemplateErrorKind, TesseraResult};
use tessera_media::MediaAsset;
use tessera_storage::StorageRegistry;
use tessera_template::{TemplateContext, UrlTemplate};

/// Per-operation switches set by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct OperationFlags {
    /// Bypass every media hook, e.g. for bulk administrative writes
    pub skip_media_callbacks: bool,
}

impl OperationFlags {
    /// Flags that bypass the media hooks.
    pub fn skipping() -> Self {
        Self {
            skip_media_callbacks: true,
        }
    }
}

/// What a save hook did.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct SaveReport {
    /// Top-level columns whose value changed
    changed_columns: BTreeSet<String>,
    /// Objects removed from storage
    removed: usize,
    /// Whether a follow-up column write was issued
    deferred_write: bool,
}

#[derive(Debug, Default)]
struct FieldOutcome {
    changed: bool,
    removed: usize,
}

/// Drives media fields through record saves and deletes.
///
/// Every store and remove of one call is awaited in sequence. The first
/// error aborts the call; writes already made for other fields are kept.
///
/// # Example
///
/// ```rust,ignore
/// let orchestrator = Orchestrator::new(registry);
///
/// db.insert(&mut profile).await?;
/// orchestrator
///     .after_create(&mut profile, &db, OperationFlags::default())
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Orchestrator {
    storage: StorageRegistry,
    handlers: HandlerRegistry,
    url_template: UrlTemplate,
}

impl Orchestrator {
    /// Orchestrator with the default handlers and URL template.
    pub fn new(storage: StorageRegistry) -> Self {
        Self {
            storage,
            handlers: HandlerRegistry::default(),
            url_template: UrlTemplate::default(),
        }
    }

    /// Replace the handler registry.
    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Replace the URL template used by fields without a `url` option.
    pub fn with_url_template(mut self, url_template: UrlTemplate) -> Self {
        self.url_template = url_template;
        self
    }

    /// Storage backends.
    pub fn storage(&self) -> &StorageRegistry {
        &self.storage
    }

    /// Registered handlers.
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Default URL template.
    pub fn url_template(&self) -> &UrlTemplate {
        &self.url_template
    }

    /// Hook run before an update is written.
    ///
    /// Stores pending uploads, renders requested crops and removes the
    /// files of cleared fields. The caller persists the updated values
    /// with its own write.
    ///
    /// # Errors
    ///
    /// The first validation, template, decode or storage error.
    #[tracing::instrument(skip_all, fields(class = %record.class_name()))]
    pub async fn before_update(
        &self,
        record: &mut dyn MediaRecord,
        flags: OperationFlags,
    ) -> TesseraResult<SaveReport> {
        if flags.skip_media_callbacks {
            tracing::debug!("Media callbacks skipped");
            return Ok(SaveReport::default());
        }
        self.save_record(record).await
    }

    /// Hook run after an insert.
    ///
    /// Processes the fields like [`before_update`](Self::before_update),
    /// now that the primary key exists, then writes the changed columns
    /// through `writer` in one call.
    ///
    /// # Errors
    ///
    /// The first processing error, a missing primary key, or the
    /// writer's error.
    #[tracing::instrument(skip_all, fields(class = %record.class_name()))]
    pub async fn after_create(
        &self,
        record: &mut dyn MediaRecord,
        writer: &dyn ColumnWriter,
        flags: OperationFlags,
    ) -> TesseraResult<SaveReport> {
        if flags.skip_media_callbacks {
            tracing::debug!("Media callbacks skipped");
            return Ok(SaveReport::default());
        }

        let mut report = self.save_record(record).await?;
        if report.changed_columns.is_empty() {
            return Ok(report);
        }

        let primary_key = record.primary_key().ok_or_else(|| {
            TemplateError::new(TemplateErrorKind::MissingContext {
                placeholder: "primary_key".to_string(),
                missing: "a primary key after insert".to_string(),
            })
        })?;
        let columns = column_values(record, &report.changed_columns)?;
        tracing::debug!(columns = ?columns.keys().collect::<Vec<_>>(), "Writing generated columns");
        writer
            .update_columns(record.class_name(), &primary_key, columns)
            .await?;
        report.deferred_write = true;
        Ok(report)
    }

    /// Hook run before a delete: removes the current and superseded files
    /// of every media field. Missing files are not errors.
    ///
    /// Returns the number of objects removed.
    ///
    /// # Errors
    ///
    /// The first storage error.
    #[tracing::instrument(skip_all, fields(class = %record.class_name()))]
    pub async fn before_delete(
        &self,
        record: &mut dyn MediaRecord,
        flags: OperationFlags,
    ) -> TesseraResult<usize> {
        if flags.skip_media_callbacks {
            tracing::debug!("Media callbacks skipped");
            return Ok(0);
        }

        let mut slots = Vec::new();
        collect_media(record.media_fields(), None, &mut slots);

        let mut removed = 0;
        for MediaSlot { column, asset, .. } in slots {
            asset.bind(self.storage.resolve(asset.options().storage())?);
            let current = asset.remove_all().await?;
            let superseded = asset.remove_superseded().await?;
            tracing::debug!(column = %column, current, superseded, "Removed media files");
            removed += current + superseded;
        }

        tracing::info!(removed, "Removed media of deleted record");
        Ok(removed)
    }

    async fn save_record(&self, record: &mut dyn MediaRecord) -> TesseraResult<SaveReport> {
        let base = RecordContext::new(record.class_name(), record.primary_key(), "");
        let mut slots = Vec::new();
        collect_media(record.media_fields(), None, &mut slots);

        let mut report = SaveReport::default();
        for slot in slots {
            let outcome = self
                .save_field(&base.for_column(slot.column.as_str()), slot.asset)
                .await?;
            report.removed += outcome.removed;
            if outcome.changed {
                report.changed_columns.insert(slot.owner_column);
            }
        }
        Ok(report)
    }

    #[tracing::instrument(
        skip(self, asset),
        fields(column = %ctx.column(), state = %asset.state(), file = %asset.file_name())
    )]
    async fn save_field(
        &self,
        ctx: &RecordContext,
        asset: &mut MediaAsset,
    ) -> TesseraResult<FieldOutcome> {
        if asset.is_processed() {
            tracing::debug!("Already processed");
            return Ok(FieldOutcome::default());
        }
        asset.bind(self.storage.resolve(asset.options().storage())?);

        if asset.is_pending_delete() {
            let removed = asset.remove_all().await? + asset.remove_superseded().await?;
            asset.clear();
            asset.finish_processing();
            tracing::info!(removed, "Removed media of cleared field");
            return Ok(FieldOutcome {
                changed: true,
                removed,
            });
        }

        let upload = match asset.upload() {
            Some(part) => Some(part.read().await?),
            None => None,
        };
        let crop = asset.is_pending_crop();

        if asset.is_empty() || (upload.is_none() && !crop) {
            let removed = asset.remove_superseded().await?;
            asset.finish_processing();
            return Ok(FieldOutcome {
                changed: false,
                removed,
            });
        }

        // Nothing is written until the URL renders and the handler accepts the source.
        let uploaded = upload.is_some();
        let url = if uploaded {
            self.render_url(ctx, asset)?
        } else {
            asset.url().to_string()
        };
        let handler = self.handlers.find(asset).cloned();
        let source = match (&handler, upload) {
            (_, Some(data)) => Some(data),
            (Some(_), None) => Some(asset.retrieve(&url).await?),
            (None, None) => None,
        };
        if let (Some(handler), Some(data)) = (&handler, &source) {
            handler.check(asset, &url, data)?;
        }

        if let (true, Some(data)) = (uploaded, &source) {
            asset.store(&url, data).await?;
            asset.assign_url(url.as_str());
            tracing::info!(url = %url, bytes = data.len(), "Stored upload");
        }

        if let (Some(handler), Some(data)) = (handler, source) {
            tracing::debug!(handler = handler.name(), "Running media handler");
            handler.handle(asset, &data).await?;
        }

        let removed = asset.remove_superseded().await?;
        asset.finish_processing();
        Ok(FieldOutcome {
            changed: true,
            removed,
        })
    }

    fn render_url(&self, ctx: &RecordContext, asset: &MediaAsset) -> TesseraResult<String> {
        let template = match asset.options().url_template() {
            Some(source) => UrlTemplate::parse(source)?,
            None => self.url_template.clone(),
        };
        template.render(&TemplateContext::new(ctx.clone(), asset.file_name()))
    }
}

/// Current values of the given top-level columns.
fn column_values(
    record: &mut dyn MediaRecord,
    columns: &BTreeSet<String>,
) -> TesseraResult<BTreeMap<String, serde_json::Value>> {
    let mut values = BTreeMap::new();
    for slot in record.media_fields() {
        match slot {
            FieldSlot::Media { column, asset } if columns.contains(&column) => {
                values.insert(column, asset.to_value()?);
            }
            FieldSlot::Nested { column, record } if columns.contains(&column) => {
                values.insert(column, record.column_value()?);
            }
            FieldSlot::Repeated { column, records } if columns.contains(&column) => {
                let items = records
                    .iter()
                    .map(|r| r.column_value())
                    .collect::<TesseraResult<Vec<_>>>()?;
                values.insert(column, serde_json::Value::Array(items));
            }
            _ => {}
        }
    }
    Ok(values)
}
