//! Follow-up column writes.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tessera_error::TesseraResult;

/// Persistence-layer seam for the write that follows an insert.
///
/// Generated URLs depend on the primary key, which only exists after the
/// insert, so the affected columns are written once more.
#[async_trait]
pub trait ColumnWriter: Send + Sync {
    /// Update `columns` of the row `primary_key` of `class_name`.
    ///
    /// # Errors
    ///
    /// Any persistence failure.
    async fn update_columns(
        &self,
        class_name: &str,
        primary_key: &str,
        columns: BTreeMap<String, serde_json::Value>,
    ) -> TesseraResult<()>;
}
