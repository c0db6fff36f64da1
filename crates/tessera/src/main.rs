//! Tessera CLI binary.
//!
//! This binary provides command-line access to Tessera's functionality:
//! - Render storage paths from the configured URL template
//! - Store an image and render its cropped and resized styles

use clap::Parser;
use tessera::TesseraConfig;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, crop_image, render_url};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    tessera::init_tracing_with(if cli.verbose { "debug" } else { "info" })?;

    let config = match &cli.config {
        Some(path) => TesseraConfig::from_file(path)?,
        None => TesseraConfig::load()?,
    };

    // Execute the requested command
    match cli.command {
        Commands::Url {
            class,
            id,
            column,
            filename,
            template,
            style,
        } => {
            let url = render_url(
                &config,
                &class,
                id.as_deref(),
                &column,
                &filename,
                template.as_deref(),
                style.as_deref(),
            )?;
            println!("{}", url);
        }

        Commands::Crop {
            input,
            url,
            crops,
            sizes,
            backend,
        } => {
            let paths =
                crop_image(&config, &input, &url, &crops, &sizes, backend.as_deref()).await?;
            for path in paths {
                println!("{}", path);
            }
        }
    }

    Ok(())
}
