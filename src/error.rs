use std::fmt;
use std::io;
use thiserror::Error;

use crate::services::artifact_store::ArtifactKind;

#[derive(Debug, Error)]
pub enum PaletteStoreError {
    #[error("Palette not found: {0}")]
    NotFound(String),

    #[error("Invalid palette name: {0}")]
    InvalidName(String),

    #[error("Invalid palette {name}: {reason}")]
    InvalidPalette { name: String, reason: String },

    #[error("Failed to read palette {name}: {source}")]
    CorruptPalette {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Palette storage error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Decoder detail is kept for logs only
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Palette error: {0}")]
    Palette(#[from] eink_dither::PaletteError),

    #[error("Dither error: {0}")]
    Dither(#[from] eink_dither::DitherError),

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("No {kind} stored for {identity}")]
    ArtifactNotFound {
        identity: String,
        kind: ArtifactKind,
    },

    #[error("Invalid identity: {0:?}")]
    InvalidIdentity(String),

    #[error("Artifact storage error: {0}")]
    Io(#[from] io::Error),
}

/// Step of the panel lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStage {
    Initialize,
    Clear,
    Display,
    Sleep,
}

impl fmt::Display for PanelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelStage::Initialize => write!(f, "initialize"),
            PanelStage::Clear => write!(f, "clear"),
            PanelStage::Display => write!(f, "display"),
            PanelStage::Sleep => write!(f, "sleep"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("E-paper driver unavailable")]
    DriverUnavailable,

    #[error("Refusing to display an empty buffer")]
    EmptyBuffer,

    #[error("Buffer is {actual} bytes, panel expects {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Panel {stage} failed: {cause}")]
    DispatchFailed { stage: PanelStage, cause: String },
}

/// Error categories a caller can act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidImage,
    InvalidPalette,
    NotFound,
    InvalidName,
    CorruptPalette,
    DriverUnavailable,
    DispatchFailed,
    ArtifactNotFound,
    InvalidBuffer,
    InvalidIdentity,
    Internal,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Palette(#[from] PaletteStoreError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Palette(e) => match e {
                PaletteStoreError::NotFound(_) => ErrorKind::NotFound,
                PaletteStoreError::InvalidName(_) => ErrorKind::InvalidName,
                PaletteStoreError::InvalidPalette { .. } => ErrorKind::InvalidPalette,
                PaletteStoreError::CorruptPalette { .. } => ErrorKind::CorruptPalette,
                PaletteStoreError::Io(_) => ErrorKind::Internal,
            },
            CoreError::Convert(e) => match e {
                ConvertError::InvalidImage(_) => ErrorKind::InvalidImage,
                _ => ErrorKind::Internal,
            },
            CoreError::Artifact(e) => match e {
                ArtifactError::ArtifactNotFound { .. } => ErrorKind::ArtifactNotFound,
                ArtifactError::InvalidIdentity(_) => ErrorKind::InvalidIdentity,
                ArtifactError::Io(_) => ErrorKind::Internal,
            },
            CoreError::Dispatch(e) => match e {
                DispatchError::DriverUnavailable => ErrorKind::DriverUnavailable,
                DispatchError::EmptyBuffer | DispatchError::BufferSize { .. } => {
                    ErrorKind::InvalidBuffer
                }
                DispatchError::DispatchFailed { .. } => ErrorKind::DispatchFailed,
            },
        }
    }

    /// Message safe to show an end user. Never includes paths or decoder
    /// output; those stay in `Display` for logs.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidImage => "The uploaded file is not a valid image.",
            ErrorKind::InvalidPalette => "The palette file is empty or unusable.",
            ErrorKind::NotFound => "The selected palette does not exist.",
            ErrorKind::InvalidName => "Palette names must be a plain .act file name.",
            ErrorKind::CorruptPalette => "The palette file could not be read.",
            ErrorKind::DriverUnavailable => "The e-paper display is not available.",
            ErrorKind::DispatchFailed => "The e-paper display did not accept the image.",
            ErrorKind::ArtifactNotFound => "No converted image is available yet.",
            ErrorKind::InvalidBuffer => "The frame buffer does not match the panel size.",
            ErrorKind::InvalidIdentity => "The session token is not valid.",
            ErrorKind::Internal => "An internal error occurred.",
        }
    }
}
