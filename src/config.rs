use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

static STRATEGY_TAGS: Lazy<BTreeMap<&'static str, StrategyKind>> = Lazy::new(|| {
    BTreeMap::from([
        ("orthogonal", StrategyKind::Orthogonal),
        ("curved", StrategyKind::Curved),
        ("straight", StrategyKind::Straight),
    ])
});

/// Routing algorithm variant. Resolved once per connector from the string
/// tags carried by [`RoutingConfig`]; the routing code itself dispatches on
/// this enum, never on tag strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Orthogonal,
    Curved,
    Straight,
}

impl StrategyKind {
    pub fn from_tag(tag: &str) -> Result<Self, ConfigurationError> {
        STRATEGY_TAGS
            .get(tag)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownStrategy {
                tag: tag.to_string(),
            })
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            StrategyKind::Orthogonal => "orthogonal",
            StrategyKind::Curved => "curved",
            StrategyKind::Straight => "straight",
        }
    }
}

/// Which shape-type override wins when both endpoint shapes carry one.
///
/// The historical behavior is `EndWins`: the override for the end shape's
/// type replaces the one for the start shape's type. That makes strategy
/// selection direction-dependent for A→B vs B→A; callers that need symmetric
/// connectors should keep their override tables disjoint or switch the
/// policy, not rely on connector direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverridePrecedence {
    #[default]
    EndWins,
    StartWins,
}

/// Bounds for the orthogonal detour search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetourConfig {
    /// Maximum jog offsets tried per candidate family before giving up.
    pub max_attempts: usize,
    /// Distance between successive jog offsets.
    pub step: f32,
}

impl Default for DetourConfig {
    fn default() -> Self {
        Self {
            max_attempts: 12,
            step: 24.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Perpendicular control-point offset as a fraction of the start-end
    /// distance.
    pub control_factor: f32,
    /// Sample count when flattening a curve for collision testing.
    pub flatten_steps: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            control_factor: 0.25,
            flatten_steps: 16,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Maximum mid-line offsets tried per crossing route.
    pub max_shift_attempts: usize,
    /// Distance between successive mid-line offsets.
    pub shift_step: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_shift_attempts: 6,
            shift_step: 24.0,
        }
    }
}

/// Routing configuration for a whole diagram. Immutable once constructed and
/// shared read-only across concurrent routing calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Strategy tag applied when no shape-type override matches.
    pub default_strategy: String,
    /// Shape type tag → strategy tag.
    pub shape_type_overrides: BTreeMap<String, String>,
    /// Minimum clearance added around each obstacle before intersection
    /// testing. Must be finite and >= 0.
    pub padding: f32,
    /// Run the crossing optimizer over batch results.
    pub optimize_crossings: bool,
    pub override_precedence: OverridePrecedence,
    pub detour: DetourConfig,
    pub curve: CurveConfig,
    pub optimizer: OptimizerConfig,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_strategy: "orthogonal".to_string(),
            shape_type_overrides: BTreeMap::new(),
            padding: 8.0,
            optimize_crossings: false,
            override_precedence: OverridePrecedence::default(),
            detour: DetourConfig::default(),
            curve: CurveConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl RoutingConfig {
    /// Check every field that can only fail at run time: strategy tags in the
    /// default slot and the override table, padding, and detour step.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        StrategyKind::from_tag(&self.default_strategy)?;
        for tag in self.shape_type_overrides.values() {
            StrategyKind::from_tag(tag)?;
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(ConfigurationError::InvalidPadding {
                value: self.padding,
            });
        }
        if !self.detour.step.is_finite() || self.detour.step <= 0.0 {
            return Err(ConfigurationError::InvalidDetourStep {
                value: self.detour.step,
            });
        }
        Ok(())
    }
}

/// On-disk form of [`RoutingConfig`]: every field optional so partial files
/// overlay the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    default_strategy: Option<String>,
    shape_type_overrides: Option<BTreeMap<String, String>>,
    padding: Option<f32>,
    optimize_crossings: Option<bool>,
    override_precedence: Option<OverridePrecedence>,
    detour_max_attempts: Option<usize>,
    detour_step: Option<f32>,
    curve_control_factor: Option<f32>,
    curve_flatten_steps: Option<usize>,
    optimizer_max_shift_attempts: Option<usize>,
    optimizer_shift_step: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<RoutingConfig> {
    let mut config = RoutingConfig::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(v) = parsed.default_strategy {
        config.default_strategy = v;
    }
    if let Some(v) = parsed.shape_type_overrides {
        config.shape_type_overrides = v;
    }
    if let Some(v) = parsed.padding {
        config.padding = v;
    }
    if let Some(v) = parsed.optimize_crossings {
        config.optimize_crossings = v;
    }
    if let Some(v) = parsed.override_precedence {
        config.override_precedence = v;
    }
    if let Some(v) = parsed.detour_max_attempts {
        config.detour.max_attempts = v;
    }
    if let Some(v) = parsed.detour_step {
        config.detour.step = v;
    }
    if let Some(v) = parsed.curve_control_factor {
        config.curve.control_factor = v;
    }
    if let Some(v) = parsed.curve_flatten_steps {
        config.curve.flatten_steps = v;
    }
    if let Some(v) = parsed.optimizer_max_shift_attempts {
        config.optimizer.max_shift_attempts = v;
    }
    if let Some(v) = parsed.optimizer_shift_step {
        config.optimizer.shift_step = v;
    }

    config.validate()?;
    Ok(config)
}
