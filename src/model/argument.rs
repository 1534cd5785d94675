use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the central question an argument supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Pro,
    Con,
}

impl Position {
    pub fn opposite(self) -> Self {
        match self {
            Position::Pro => Position::Con,
            Position::Con => Position::Pro,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Pro => "pro",
            Position::Con => "con",
        }
    }
}

/// Lifecycle status of an argument within a single pipeline run.
///
/// `Refuted` and `Turned` are only ever assigned by clash refinement; the
/// other four can be assigned during initial resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentStatus {
    Extended,
    Dropped,
    Refuted,
    Turned,
    Conceded,
    Contested,
}

/// Kind of support offered for a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantType {
    Empirical,
    Testimonial,
    Analogical,
    Logical,
    Experiential,
    None,
}

/// Supporting reasoning or evidence attached to a claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warrant {
    pub text: String,
    pub warrant_type: WarrantType,
}

/// Warrant quality sub-scores, present only when the argument has a warrant.
/// All bounded 0-10.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarrantQuality {
    pub source_credibility: f64,
    pub recency: f64,
    pub relevance: f64,
    pub sufficiency: f64,
}

/// Per-argument scores produced by the evaluation stage. All bounded 0-10.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentEvaluation {
    pub clarity: f64,
    pub relevance: f64,
    pub warrant_present: bool,
    pub warrant_type: WarrantType,
    pub warrant_quality: Option<WarrantQuality>,
    pub impact_magnitude: f64,
    pub impact_probability: f64,
    pub impact_timeframe: f64,
    pub impact_reversibility: f64,
    /// Does the warrant actually support the claim.
    pub internal_link_strength: f64,
    pub overall_strength: f64,
}

// A single argument reconstructed from a comment.
// - responds_to: the opposing argument this one attacks, set by the linker
// - responses: ids of arguments that attack this one
// - evaluation: None until the evaluation stage has scored the argument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argument {
    pub id: String,
    pub source_comment_id: String,
    pub author: String,
    pub position: Position,
    pub timestamp: DateTime<Utc>,
    pub claim: String,
    pub warrant: Option<Warrant>,
    pub impact: Option<String>,
    pub responds_to: Option<String>,
    pub responses: Vec<String>,
    pub status: ArgumentStatus,
    pub evaluation: Option<ArgumentEvaluation>,
}

impl Argument {
    /// Overall strength when evaluated; unevaluated arguments carry no score.
    pub fn strength(&self) -> Option<f64> {
        self.evaluation.as_ref().map(|e| e.overall_strength)
    }
}
