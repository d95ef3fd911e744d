use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geometry::Rect;

/// A placed diagram shape. Owned by the caller; the engine only ever borrows
/// the shape set for the duration of a routing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: String,
    pub bounds: Rect,
    /// Type tag used for per-shape-type strategy overrides ("valve",
    /// "instrument", ...). Free-form; unmatched tags simply fall through to
    /// the default strategy.
    pub shape_type: String,
}

impl Shape {
    pub fn new(id: impl Into<String>, bounds: Rect, shape_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bounds,
            shape_type: shape_type.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.bounds.is_degenerate() {
            return Err(ValidationError::DegenerateShape {
                id: self.id.clone(),
                width: self.bounds.width,
                height: self.bounds.height,
            });
        }
        Ok(())
    }
}

/// A requested connection between two shapes, referenced by id. Connector
/// order is the stable order the crossing optimizer processes routes in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    pub from: String,
    pub to: String,
}

impl Connector {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}
