//! Error types for the AR core.
//!
//! "Not ready yet" conditions (no hit pose, unknown duration, asset still
//! loading) are not errors; callers guard on them.

use thiserror::Error;

/// Failures surfaced to the user or the log while an AR session runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The immersive session could not start (no XR device, missing
    /// permission, insecure context). Terminal for that attempt.
    #[error("AR session unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Reference space or hit-test source could not be created.
    #[error("hit-test tracking unavailable: {0}")]
    TrackingUnavailable(String),

    /// The environment refused to start playback (autoplay policy etc).
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),
}

/// Invalid chroma-key configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("similarity must be positive and finite, got {0}")]
    Similarity(f32),

    #[error("smoothness must lie in [0, {similarity}], got {smoothness}")]
    Smoothness { smoothness: f32, similarity: f32 },

    #[error("spill must be finite and non-negative, got {0}")]
    Spill(f32),

    #[error("key color components must be finite")]
    KeyColor,
}

/// Malformed point-cloud asset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlyError {
    #[error("missing 'ply' magic")]
    BadMagic,

    #[error("header is not terminated by end_header")]
    UnterminatedHeader,

    #[error("unsupported format '{0}'")]
    UnsupportedFormat(String),

    #[error("unknown property type '{0}'")]
    UnknownType(String),

    #[error("malformed header line: {0}")]
    MalformedHeader(String),

    #[error("no vertex element")]
    MissingVertexElement,

    #[error("vertex element has no '{0}' property")]
    MissingProperty(&'static str),

    #[error("unexpected end of data")]
    Truncated,

    #[error("invalid ascii value '{0}'")]
    InvalidValue(String),
}
