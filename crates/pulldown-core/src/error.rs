use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load indicator image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to decode bundled indicator image {name}: {source}")]
    ImageDecode {
        name: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("Sprite set must contain at least one frame")]
    EmptySprite,

    #[error("Pull-down refresh must be attached to a vertically scrollable view")]
    UnsupportedHost,

    #[error("Pull-down refresh must be the first element of its view (found at index {0})")]
    NotFirstChild(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
