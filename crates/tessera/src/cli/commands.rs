//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tessera::{Rectangle, Size};

/// Tessera - media attachments with templated storage paths and cropped image styles
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(about = "Media attachments with templated storage paths and cropped image styles", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file used instead of the layered lookup
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the storage path of an upload
    Url {
        /// Record type name, e.g. UserProfile
        #[arg(long)]
        class: String,

        /// Primary key of the record
        #[arg(long)]
        id: Option<String>,

        /// Column holding the media value
        #[arg(long)]
        column: String,

        /// Uploaded file name
        #[arg(long)]
        filename: String,

        /// Template overriding the configured one
        #[arg(long)]
        template: Option<String>,

        /// Print the path of this style instead of the base path
        #[arg(long)]
        style: Option<String>,
    },

    /// Store an image and render its styles
    Crop {
        /// Image file to store
        input: PathBuf,

        /// Storage path of the image
        #[arg(long)]
        url: String,

        /// Crop region per style, as style=x,y,width,height
        #[arg(long = "crop", value_parser = parse_crop)]
        crops: Vec<CropArg>,

        /// Target size per style, as style=WIDTHxHEIGHT
        #[arg(long = "size", value_parser = parse_size)]
        sizes: Vec<SizeArg>,

        /// Storage backend name; the configured default when omitted
        #[arg(long)]
        backend: Option<String>,
    },
}

/// A `--crop` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropArg {
    /// Style name
    pub style: String,
    /// Crop region
    pub rect: Rectangle,
}

/// A `--size` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeArg {
    /// Style name
    pub style: String,
    /// Target size
    pub size: Size,
}

fn split_style(arg: &str) -> Result<(&str, &str), String> {
    match arg.split_once('=') {
        Some((style, value)) if !style.trim().is_empty() => Ok((style.trim(), value.trim())),
        _ => Err(format!("expected style=value, got '{}'", arg)),
    }
}

fn parse_numbers(value: &str, separator: char, count: usize) -> Result<Vec<u32>, String> {
    let numbers = value
        .split(separator)
        .map(|n| n.trim().parse::<u32>().map_err(|e| format!("'{}': {}", n, e)))
        .collect::<Result<Vec<_>, _>>()?;
    if numbers.len() != count {
        return Err(format!("expected {} numbers, got '{}'", count, value));
    }
    Ok(numbers)
}

fn parse_crop(arg: &str) -> Result<CropArg, String> {
    let (style, value) = split_style(arg)?;
    let n = parse_numbers(value, ',', 4)?;
    Ok(CropArg {
        style: style.to_string(),
        rect: Rectangle::new(n[0], n[1], n[2], n[3]),
    })
}

fn parse_size(arg: &str) -> Result<SizeArg, String> {
    let (style, value) = split_style(arg)?;
    let n = parse_numbers(value, 'x', 2)?;
    Ok(SizeArg {
        style: style.to_string(),
        size: Size::new(n[0], n[1]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crop() {
        let arg = parse_crop("thumb=10,20,100,80").unwrap();
        assert_eq!(arg.style, "thumb");
        assert_eq!(arg.rect, Rectangle::new(10, 20, 100, 80));
        assert!(parse_crop("thumb=10,20,100").is_err());
        assert!(parse_crop("=1,2,3,4").is_err());
    }

    #[test]
    fn test_parse_size() {
        let arg = parse_size("small=64x48").unwrap();
        assert_eq!(arg.size, Size::new(64, 48));
        assert!(parse_size("small=64").is_err());
        assert!(parse_size("small").is_err());
    }

    #[test]
    fn test_cli_parses_crop_command() {
        let cli = Cli::parse_from([
            "tessera",
            "crop",
            "photo.png",
            "--url",
            "/system/photos/1/image/photo.png",
            "--crop",
            "thumb=0,0,50,50",
            "--size",
            "small=20x20",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Crop { crops, sizes, backend, .. } => {
                assert_eq!(crops.len(), 1);
                assert_eq!(sizes[0].style, "small");
                assert!(backend.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
