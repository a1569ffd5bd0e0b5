//! Argument resolution.
//!
//! Everything here falls back to a default with a warning; nothing is
//! fatal. The directory check that can end the run lives in the pipeline.

use clap::Parser;
use shared_utils::{JpegQuality, RunLog};
use std::path::PathBuf;

/// Fallback when the folder argument is absent or points nowhere.
pub const DEFAULT_FOLDER: &str = ".";

#[derive(Parser, Debug)]
#[command(name = "img-resize")]
#[command(version, about = "Batch-resize JPEG/PNG images in a folder to half their dimensions", long_about = None)]
pub struct Cli {
    /// Folder containing the images to resize.
    #[arg(value_name = "IMAGE_FOLDER")]
    pub folder: Option<PathBuf>,

    /// JPEG quality, 1-100. Invalid values fall back to the default.
    #[arg(value_name = "JPEG_QUALITY", allow_hyphen_values = true)]
    pub quality: Option<String>,
}

/// Drop `--`-prefixed arguments before clap sees them. The CLI is purely
/// positional; benchmark harnesses are known to inject long flags.
pub fn filter_injected_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter().filter(|a| !a.starts_with("--")).collect()
}

/// Resolved job configuration, parsed once at start of run.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub folder: PathBuf,
    pub quality: JpegQuality,
}

impl JobConfig {
    pub fn resolve(cli: &Cli, log: &mut RunLog) -> Self {
        let folder = match &cli.folder {
            Some(path) if path.is_dir() => path.clone(),
            Some(path) => {
                log.warn(&format!(
                    "Folder {} does not exist, falling back to {}",
                    path.display(),
                    DEFAULT_FOLDER
                ));
                PathBuf::from(DEFAULT_FOLDER)
            }
            None => PathBuf::from(DEFAULT_FOLDER),
        };

        let quality = match &cli.quality {
            Some(raw) => match JpegQuality::parse(raw) {
                Ok(quality) => quality,
                Err(e) => {
                    let fallback = JpegQuality::default();
                    log.warn(&format!("{}, using default {}", e, fallback));
                    fallback
                }
            },
            None => JpegQuality::default(),
        };

        log.info(&format!(
            "Source folder: {} | JPEG quality: {}",
            folder.display(),
            quality
        ));

        Self { folder, quality }
    }
}
