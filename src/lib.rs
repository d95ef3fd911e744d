pub mod config;
pub mod error;
pub mod geometry;
pub mod index;
pub mod log;
pub mod model;
pub mod route;

pub use config::{
    CurveConfig, DetourConfig, OptimizerConfig, OverridePrecedence, RoutingConfig, StrategyKind,
    load_config,
};
pub use error::{ConfigurationError, Error, RoutingError, ValidationError};
pub use geometry::{Point, Rect};
pub use index::ObstacleIndex;
pub use model::{Connector, Shape};
pub use route::{
    Route, Segment, SegmentKind, anchor_points, route_between, route_connector, route_diagram,
    select_strategy,
};
