//! LLM-facing payload shapes.
//!
//! Each stage expects its response text to parse into one of these types.
//! They mirror the documented JSON contracts and are kept separate from the
//! domain model; per-stage converters clamp scores and map enums across.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Argument extraction: {"analyses": [...]}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionPayload {
    pub analyses: Vec<CommentAnalysis>,
}

/// Arguments extracted from one comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentAnalysis {
    pub comment_id: String,
    #[serde(default)]
    pub arguments: Vec<ExtractedArgument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedArgument {
    /// A single debatable assertion.
    pub claim: String,
    /// Supporting reasoning or evidence, if any.
    #[serde(default)]
    pub warrant: Option<String>,
    #[serde(default)]
    pub warrant_type: Option<ExtractedWarrantType>,
    /// Why the claim matters, if stated.
    #[serde(default)]
    pub impact: Option<String>,
    pub position: ExtractedPosition,
    /// Short quote from the parent comment this argument addresses.
    #[serde(default)]
    pub responds_to_quote: Option<String>,
    /// Explicit concession of an opposing point.
    #[serde(default)]
    pub is_concession: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedPosition {
    Pro,
    Con,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedWarrantType {
    Empirical,
    Testimonial,
    Analogical,
    Logical,
    Experiential,
    None,
}

// ---------------------------------------------------------------------------
// Argument evaluation: {"evaluations": [...]}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationPayload {
    pub evaluations: Vec<ExtractedEvaluation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEvaluation {
    pub argument_id: String,
    pub clarity: f64,
    pub relevance: f64,
    /// Present only when the argument carries a warrant.
    #[serde(default)]
    pub warrant_quality: Option<ExtractedWarrantQuality>,
    pub impact_magnitude: f64,
    pub impact_probability: f64,
    pub impact_timeframe: f64,
    pub impact_reversibility: f64,
    pub internal_link_strength: f64,
    pub overall_strength: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedWarrantQuality {
    pub source_credibility: f64,
    pub recency: f64,
    pub relevance: f64,
    pub sufficiency: f64,
}

// ---------------------------------------------------------------------------
// Clash evaluation: {"clashes": [...]}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClashPayload {
    pub clashes: Vec<ExtractedClash>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedClash {
    pub attacker_id: String,
    pub defender_id: String,
    pub clash_type: ExtractedClashType,
    pub quality: f64,
    pub winner: ExtractedClashWinner,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedClashType {
    Denial,
    Mitigation,
    Turn,
    Outweigh,
    NoLink,
    Counterplan,
    TalkingPast,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedClashWinner {
    Attacker,
    Defender,
    Draw,
}

// ---------------------------------------------------------------------------
// Issue grouping: {"issues": [...]}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuePayload {
    pub issues: Vec<ExtractedIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedIssue {
    pub topic: String,
    #[serde(default)]
    pub description: String,
    pub argument_ids: Vec<String>,
    pub centrality: f64,
}

// ---------------------------------------------------------------------------
// Speaker evaluation: {"evaluations": [...]}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerPayload {
    pub evaluations: Vec<ExtractedSpeakerEvaluation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSpeakerEvaluation {
    pub author: String,
    pub content: f64,
    pub style: f64,
    pub strategy: f64,
    pub intellectual_honesty: f64,
}

// ---------------------------------------------------------------------------
// Burden analysis: single object
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedBurden {
    pub affirmative_burden: String,
    pub negative_burden: String,
    pub presumption: ExtractedPresumption,
    pub pro_met_burden: bool,
    pub con_met_burden: bool,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedPresumption {
    Pro,
    Con,
    Neither,
}
