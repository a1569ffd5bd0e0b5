//! The load-all → resize-all → save-all pipeline.
//!
//! Sequential and synchronous. Decoded originals are deliberately held in
//! memory until every file has been saved, then released in one batch; the
//! per-file resized canvas is dropped right after its save attempt.

use crate::config::JobConfig;
use crate::errors::{ImgResizeError, Result};
use chrono::Local;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use shared_utils::{
    apply_density, collect_files, print_summary_report, read_density, BatchResult, Density,
    RunLog, IMAGE_EXTENSIONS, STATS_LOG_NAME,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One decoded source image, alive for the whole run.
pub struct LoadedImage {
    pub path: PathBuf,
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
    pub density: Option<Density>,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub discovered: usize,
    pub result: BatchResult,
    pub output_dir: PathBuf,
    pub elapsed: Duration,
}

/// Target dimensions: integer division truncates odd dimensions down.
pub fn halved(width: u32, height: u32) -> (u32, u32) {
    (width / 2, height / 2)
}

fn is_jpeg_output(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            ext == "jpg" || ext == "jpeg"
        }
        None => false,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn run(config: &JobConfig, log: &mut RunLog) -> Result<RunOutcome> {
    let run_start = Instant::now();

    if !config.folder.is_dir() {
        return Err(ImgResizeError::DirectoryNotFound(config.folder.clone()));
    }

    let files = collect_files(&config.folder, IMAGE_EXTENSIONS);
    if files.is_empty() {
        return Err(ImgResizeError::NoInputFiles(config.folder.clone()));
    }
    let discovered = files.len();
    log.info(&format!("Found {} image file(s)", discovered));

    let mut result = BatchResult::new();

    // Load phase: decode everything up front. A file that fails here is
    // recorded and never processed.
    let mut loaded: Vec<LoadedImage> = Vec::with_capacity(files.len());
    for path in &files {
        match load_image(path) {
            Ok(record) => loaded.push(record),
            Err(e) => {
                log.warn(&format!("Failed to load {}: {}", file_name(path), e));
                result.fail(path.clone(), e.to_string());
            }
        }
    }

    let output_dir = config.folder.join(format!(
        "converted-{}",
        Local::now().format("%Y%m%d%H%M%S")
    ));
    fs::create_dir_all(&output_dir)?;
    log.info(&format!("Output folder: {}", output_dir.display()));

    for record in &loaded {
        let name = file_name(&record.path);
        let step_start = Instant::now();

        let (new_w, new_h) = halved(record.width, record.height);
        if new_w == 0 || new_h == 0 {
            log.warn(&format!(
                "Skipping {}: {}x{} cannot be halved",
                name, record.width, record.height
            ));
            result.skip();
            continue;
        }

        let out_path = output_dir.join(name.as_str());
        match resize_and_save(record, new_w, new_h, config.quality.value(), &out_path) {
            Ok(()) => {
                log.info(&format!(
                    "Processed: {} | Original: {}x{} | New: {}x{} | Time: {}ms",
                    name,
                    record.width,
                    record.height,
                    new_w,
                    new_h,
                    step_start.elapsed().as_millis()
                ));
                result.success();
            }
            Err(e) => {
                log.warn(&format!("Failed to save {}: {}", name, e));
                result.fail(record.path.clone(), e.to_string());
            }
        }
    }

    // Bulk release of the decoded originals, only after the whole save
    // loop has run.
    drop(loaded);

    let elapsed = run_start.elapsed();
    log.info(&format!("Total files processed: {}", result.succeeded));
    log.info(&format!("Total elapsed time: {}ms", elapsed.as_millis()));

    if let Err(e) = log.persist(&output_dir.join(STATS_LOG_NAME)) {
        eprintln!("⚠️  Could not write {}: {}", STATS_LOG_NAME, e);
    }

    print_summary_report(discovered, &result, elapsed);

    Ok(RunOutcome {
        discovered,
        result,
        output_dir,
        elapsed,
    })
}

fn load_image(path: &Path) -> Result<LoadedImage> {
    let bytes = fs::read(path)?;
    let density = read_density(&bytes);
    let image = image::load_from_memory(&bytes)?;
    let (width, height) = (image.width(), image.height());

    tracing::debug!(
        path = %path.display(),
        width,
        height,
        density = ?density,
        "Loaded image"
    );

    Ok(LoadedImage {
        path: path.to_path_buf(),
        image,
        width,
        height,
        density,
    })
}

fn resize_and_save(
    record: &LoadedImage,
    new_w: u32,
    new_h: u32,
    quality: u8,
    out_path: &Path,
) -> Result<()> {
    // One draw into the target-sized canvas; resampling is the library's
    // business.
    let resized = record.image.resize_exact(new_w, new_h, FilterType::Triangle);

    let mut encoded: Vec<u8> = Vec::new();
    if is_jpeg_output(out_path) {
        let quality_encode = {
            let mut cursor = std::io::Cursor::new(&mut encoded);
            resized.write_with_encoder(JpegEncoder::new_with_quality(&mut cursor, quality))
        };
        if let Err(e) = quality_encode {
            // Default-parameter save when the quality encoder refuses.
            tracing::warn!(
                path = %out_path.display(),
                error = %e,
                "Quality JPEG encode failed, falling back to default encode"
            );
            encoded.clear();
            resized.write_to(&mut std::io::Cursor::new(&mut encoded), ImageFormat::Jpeg)?;
        }
    } else {
        let format = ImageFormat::from_path(out_path)?;
        resized.write_to(&mut std::io::Cursor::new(&mut encoded), format)?;
    }

    if let Some(density) = record.density {
        if !apply_density(&mut encoded, density) {
            tracing::debug!(
                path = %out_path.display(),
                "No metadata segment to carry density over to"
            );
        }
    }

    fs::write(out_path, &encoded)?;
    Ok(())
}
