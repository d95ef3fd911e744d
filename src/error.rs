use thiserror::Error;

/// Malformed routing configuration. Raised before any geometry work so
/// operator mistakes surface instead of being masked by a fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("unknown routing strategy tag: {tag:?}")]
    UnknownStrategy { tag: String },

    #[error("obstacle padding must be finite and >= 0, got {value}")]
    InvalidPadding { value: f32 },

    #[error("detour step must be finite and > 0, got {value}")]
    InvalidDetourStep { value: f32 },
}

/// Degenerate input geometry for a single connector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("shape {id:?} has degenerate bounds ({width} x {height})")]
    DegenerateShape { id: String, width: f32, height: f32 },

    #[error("connector endpoints coincide at ({x}, {y})")]
    CoincidentEndpoints { x: f32, y: f32 },

    #[error("connector {connector:?} references unknown shape {shape:?}")]
    UnknownShape { connector: String, shape: String },
}

/// No acceptable route exists within the strategy's search bound. The engine
/// never returns an intersecting route instead; callers may retry with
/// relaxed padding or escalate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    #[error("no obstacle-free path from ({from_x}, {from_y}) to ({to_x}, {to_y}) within {attempts} detour attempts")]
    NoPath {
        from_x: f32,
        from_y: f32,
        to_x: f32,
        to_y: f32,
        attempts: usize,
    },

    #[error("path blocked by obstacle {obstacle:?}")]
    Blocked { obstacle: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}
