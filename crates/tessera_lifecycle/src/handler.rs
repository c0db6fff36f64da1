//! Format-specific media handlers and their registry.

use async_trait::async_trait;
use std::sync::Arc;
use tessera_core::ORIGINAL_STYLE;
use tessera_error::TesseraResult;
use tessera_imaging::CropPipeline;
use tessera_media::MediaAsset;

/// Renders derived files for assets of a particular format.
///
/// A handler runs after the raw upload is stored, or when a stored asset
/// requests new crops. `source` holds the raw upload. [`check`](Self::check)
/// runs first, before anything is written.
///
/// # Example
///
/// ```rust,ignore
/// struct PosterFrame;
///
/// #[async_trait]
/// impl MediaHandler for PosterFrame {
///     fn name(&self) -> &str {
///         "poster_frame"
///     }
///
///     fn can_handle(&self, asset: &MediaAsset) -> bool {
///         asset.is_video()
///     }
///
///     async fn handle(&self, asset: &mut MediaAsset, source: &[u8]) -> TesseraResult<()> {
///         asset.store(&asset.url_for("poster"), &extract_frame(source)?).await
///     }
/// }
/// ```
#[async_trait]
pub trait MediaHandler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Whether this handler processes `asset`.
    fn can_handle(&self, asset: &MediaAsset) -> bool;

    /// Reject `source` before any object is stored for it. `url` is the
    /// path the upload will be stored at.
    ///
    /// # Errors
    ///
    /// A validation or decode error aborts the save with storage untouched.
    fn check(&self, _asset: &MediaAsset, _url: &str, _source: &[u8]) -> TesseraResult<()> {
        Ok(())
    }

    /// Render and store the derived files of `asset`.
    ///
    /// # Errors
    ///
    /// Any decode, validation or storage error aborts the lifecycle call.
    async fn handle(&self, asset: &mut MediaAsset, source: &[u8]) -> TesseraResult<()>;
}

/// Renders every style of an image through the [`CropPipeline`].
///
/// Renditions are stored at the style URLs. When no `original` rendition
/// is produced, the raw upload is stored as the original so later crop
/// requests always find one. The asset's original size is updated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCropHandler {
    pipeline: CropPipeline,
}

impl ImageCropHandler {
    /// Handler using the given pipeline.
    pub fn new(pipeline: CropPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl MediaHandler for ImageCropHandler {
    fn name(&self) -> &str {
        "image_crop"
    }

    fn can_handle(&self, asset: &MediaAsset) -> bool {
        asset.kind().is_croppable() && asset.is_image()
    }

    fn check(&self, asset: &MediaAsset, url: &str, source: &[u8]) -> TesseraResult<()> {
        let original_size = self.pipeline.check_styles(url, source, &asset.style_specs())?;
        tracing::debug!(%original_size, "Crop rectangles fit the source");
        Ok(())
    }

    #[tracing::instrument(skip(self, asset, source), fields(url = %asset.url(), bytes = source.len()))]
    async fn handle(&self, asset: &mut MediaAsset, source: &[u8]) -> TesseraResult<()> {
        let outcome = self
            .pipeline
            .crop_styles(asset.url(), source, &asset.style_specs())?;

        if !outcome.original_rendered() {
            asset.store(&asset.url_for(ORIGINAL_STYLE), source).await?;
        }
        for rendition in outcome.renditions() {
            asset
                .store(&asset.url_for(rendition.style()), rendition.data())
                .await?;
        }

        asset.set_original_size(*outcome.original_size());
        tracing::info!(
            renditions = outcome.renditions().len(),
            original_size = %outcome.original_size(),
            "Rendered image styles"
        );
        Ok(())
    }
}

/// Handlers in registration order; the first one that can handle an
/// asset wins.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn MediaHandler>>,
}

impl HandlerRegistry {
    /// A registry with no handlers.
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a handler after the existing ones.
    pub fn register(&mut self, handler: Arc<dyn MediaHandler>) {
        self.handlers.push(handler);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_handler(mut self, handler: Arc<dyn MediaHandler>) -> Self {
        self.register(handler);
        self
    }

    /// First handler that can handle `asset`.
    pub fn find(&self, asset: &MediaAsset) -> Option<&Arc<dyn MediaHandler>> {
        self.handlers.iter().find(|h| h.can_handle(asset))
    }

    /// Names of the registered handlers.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    /// The image crop handler alone.
    fn default() -> Self {
        Self::empty().with_handler(Arc::new(ImageCropHandler::default()))
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}
