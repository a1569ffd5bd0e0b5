use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImgResizeError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("No .jpg/.png files found in {0}")]
    NoInputFiles(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ImgResizeError>;
