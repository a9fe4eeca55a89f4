use crate::terrain::coordinates::GridCoord;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorldgenError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(
        "Steepness thresholds out of order: max walkable {walkable} exceeds max climbable {climbable}"
    )]
    ThresholdsOutOfOrder { walkable: f32, climbable: f32 },

    // Grid errors
    #[error("Invalid grid data: {reason}")]
    InvalidGrid { reason: String },

    #[error("Coordinate ({x}, {y}) is outside a {resolution}x{resolution} grid")]
    OutOfBounds { x: u32, y: u32, resolution: u32 },

    // Search errors
    #[error("No path found from {start} to {target}")]
    NoPathFound { start: GridCoord, target: GridCoord },

    // Layout persistence errors
    #[error("Layout file not found at path: {path}")]
    LayoutFileNotFound { path: PathBuf },

    #[error("Corrupted layout file: {reason}")]
    CorruptedLayoutFile { reason: String },

    #[error("Failed to encode layout: {0}")]
    LayoutEncodingFailed(#[from] bincode::error::EncodeError),
}

/// Result type alias for all operations
pub type WorldgenResult<T> = Result<T, WorldgenError>;
