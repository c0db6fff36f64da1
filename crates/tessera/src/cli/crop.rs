//! `tessera crop` handler.

use super::{CropArg, SizeArg};
use std::path::Path;
use tessera::{
    AssetKind, Constraints, ImageCropHandler, MediaAsset, MediaHandler, StorageError, TesseraConfig,
    TesseraResult, UploadInput,
};
use tracing::info;

/// Store `input` at `url` on the selected backend and render its styles.
///
/// Any format the crop pipeline decodes is accepted, at any size.
///
/// Returns the stored paths: the upload, the original and every style.
#[tracing::instrument(skip(config, crops, sizes), fields(input = %input.display()))]
pub async fn crop_image(
    config: &TesseraConfig,
    input: &Path,
    url: &str,
    crops: &[CropArg],
    sizes: &[SizeArg],
    backend: Option<&str>,
) -> TesseraResult<Vec<String>> {
    let registry = config.build_registry()?;
    let storage = registry.resolve(backend)?;

    let mut asset = MediaAsset::new(AssetKind::Image).with_constraints(Constraints::none());
    asset.set(UploadInput::File(input.to_path_buf())).await?;
    asset.assign_url(url);
    for size in sizes {
        asset.set_size(&size.style, size.size)?;
    }
    for crop in crops {
        asset.request_crop(&crop.style, crop.rect)?;
    }
    asset.bind(storage);

    let source = tokio::fs::read(input)
        .await
        .map_err(|e| StorageError::operation("read input", input.display().to_string(), e))?;
    asset.store(url, &source).await?;
    ImageCropHandler::default().handle(&mut asset, &source).await?;
    asset.finish_processing();

    info!(
        styles = asset.style_names().len(),
        original_size = %asset.original_size(),
        "Cropped image"
    );
    Ok(asset.paths())
}
