use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Tolerance for floating-point weight sums.
const WEIGHT_SUM_EPSILON: f64 = 0.01;

/// Relative weights used when ranking issues for display scoring.
/// Must sum to 1.0.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueWeights {
    #[serde(default = "default_argument_count_weight")]
    pub argument_count: f64,
    #[serde(default = "default_impact_magnitude_weight")]
    pub impact_magnitude: f64,
    #[serde(default = "default_centrality_weight")]
    pub centrality_to_question: f64,
}

fn default_argument_count_weight() -> f64 {
    0.3
}

fn default_impact_magnitude_weight() -> f64 {
    0.3
}

fn default_centrality_weight() -> f64 {
    0.4
}

impl Default for IssueWeights {
    fn default() -> Self {
        Self {
            argument_count: default_argument_count_weight(),
            impact_magnitude: default_impact_magnitude_weight(),
            centrality_to_question: default_centrality_weight(),
        }
    }
}

/// Maximum points per speaker rubric category. Must sum to 100.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeakerPointScale {
    #[serde(default = "default_content_scale")]
    pub content: f64,
    #[serde(default = "default_style_scale")]
    pub style: f64,
    #[serde(default = "default_strategy_scale")]
    pub strategy: f64,
}

fn default_content_scale() -> f64 {
    40.0
}

fn default_style_scale() -> f64 {
    40.0
}

fn default_strategy_scale() -> f64 {
    20.0
}

impl Default for SpeakerPointScale {
    fn default() -> Self {
        Self {
            content: default_content_scale(),
            style: default_style_scale(),
            strategy: default_strategy_scale(),
        }
    }
}

/// Scoring configuration for a pipeline run.
///
/// Invalid values fail fast at construction: a nonsensical configuration must
/// never silently produce nonsensical scores.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub issue_weights: IssueWeights,
    /// Points subtracted from a side for each of its dropped arguments.
    #[serde(default = "default_dropped_argument_penalty")]
    pub dropped_argument_penalty: f64,
    /// Clashes with quality below this are excluded from issue scoring.
    #[serde(default = "default_clash_quality_threshold")]
    pub clash_quality_threshold: f64,
    /// Point margins below this resolve to a draw.
    #[serde(default = "default_draw_margin_threshold")]
    pub draw_margin_threshold: f64,
    #[serde(default)]
    pub speaker_point_scale: SpeakerPointScale,
}

fn default_dropped_argument_penalty() -> f64 {
    5.0
}

fn default_clash_quality_threshold() -> f64 {
    3.0
}

fn default_draw_margin_threshold() -> f64 {
    5.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            issue_weights: IssueWeights::default(),
            dropped_argument_penalty: default_dropped_argument_penalty(),
            clash_quality_threshold: default_clash_quality_threshold(),
            draw_margin_threshold: default_draw_margin_threshold(),
            speaker_point_scale: SpeakerPointScale::default(),
        }
    }
}

/// Configuration construction failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("issue weights must sum to 1.0 (got {0:.3})")]
    InvalidIssueWeights(f64),
    #[error("speaker point scale must sum to 100 (got {0:.1})")]
    InvalidSpeakerScale(f64),
    #[error("{name} must be non-negative (got {value})")]
    NegativeOption { name: &'static str, value: f64 },
    #[error("clash quality threshold must be within 0-10 (got {0})")]
    ThresholdOutOfRange(f64),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl ScoringConfig {
    /// Validate and return the configuration, consuming it.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weight_sum = self.issue_weights.argument_count
            + self.issue_weights.impact_magnitude
            + self.issue_weights.centrality_to_question;
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_EPSILON
            || self.issue_weights.argument_count < 0.0
            || self.issue_weights.impact_magnitude < 0.0
            || self.issue_weights.centrality_to_question < 0.0
        {
            return Err(ConfigError::InvalidIssueWeights(weight_sum));
        }

        let scale_sum = self.speaker_point_scale.content
            + self.speaker_point_scale.style
            + self.speaker_point_scale.strategy;
        if (scale_sum - 100.0).abs() > WEIGHT_SUM_EPSILON
            || self.speaker_point_scale.content < 0.0
            || self.speaker_point_scale.style < 0.0
            || self.speaker_point_scale.strategy < 0.0
        {
            return Err(ConfigError::InvalidSpeakerScale(scale_sum));
        }

        if self.dropped_argument_penalty < 0.0 {
            return Err(ConfigError::NegativeOption {
                name: "dropped_argument_penalty",
                value: self.dropped_argument_penalty,
            });
        }
        if self.draw_margin_threshold < 0.0 {
            return Err(ConfigError::NegativeOption {
                name: "draw_margin_threshold",
                value: self.draw_margin_threshold,
            });
        }
        if !(0.0..=10.0).contains(&self.clash_quality_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.clash_quality_threshold));
        }

        Ok(())
    }

    /// Load and validate a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: ScoringConfig = if contents.trim().is_empty() {
            ScoringConfig::default()
        } else {
            serde_yaml::from_str(&contents)?
        };
        config.validated()
    }
}
