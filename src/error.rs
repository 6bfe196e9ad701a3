use thiserror::Error;

/// Errors surfaced by the engine outside the frame path.
///
/// The frame loop itself never returns these: unknown effects and missing
/// owners degrade instead of failing.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The drawing surface could not provide a usable 2D context.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A configuration value was out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
