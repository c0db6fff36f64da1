//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the tessera binary.

mod commands;
mod crop;
mod url;

pub use commands::{Cli, Commands, CropArg, SizeArg};
pub use crop::crop_image;
pub use url::render_url;
