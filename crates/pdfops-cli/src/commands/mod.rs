//! Subcommand implementations.

pub mod compress;
pub mod images;
pub mod merge;
pub mod split;
pub mod text;

use std::path::Path;

use pdfops_core::OpsConfig;

/// Load the config file when one was given, defaults otherwise.
pub fn load_config(path: Option<&str>) -> anyhow::Result<OpsConfig> {
    match path {
        Some(p) => Ok(OpsConfig::from_file(Path::new(p))?),
        None => Ok(OpsConfig::default()),
    }
}
