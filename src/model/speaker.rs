use serde::{Deserialize, Serialize};

use crate::model::argument::Position;

// Per-participant performance scores, World-Schools style.
// - content/style/strategy maxima come from the configured point scale
//   (default 40/40/20); speaker_points is their sum, max 100
// - the count fields are computed deterministically from pipeline state,
//   independent of the inference call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerEvaluation {
    pub author: String,
    pub position: Position,
    pub content: f64,
    pub style: f64,
    pub strategy: f64,
    pub speaker_points: f64,
    pub intellectual_honesty: f64,
    pub arguments_made: usize,
    pub clashes_won: usize,
    pub clashes_lost: usize,
    pub concessions: usize,
    pub drops: usize,
}

// What each side must prove, and what happens when neither does.
// presumption is None when no default side can be determined (including the
// fallback taken when the analysis call fails).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurdenAnalysis {
    pub affirmative_burden: String,
    pub negative_burden: String,
    pub presumption: Option<Position>,
    pub pro_met_burden: bool,
    pub con_met_burden: bool,
    pub reasoning: String,
}

impl BurdenAnalysis {
    /// Fallback when burden analysis fails: neither side is credited and no
    /// presumption bonus can fire downstream.
    pub fn undetermined(question: &str) -> Self {
        Self {
            affirmative_burden: format!("Establish that the answer to \"{question}\" is yes"),
            negative_burden: format!("Establish that the answer to \"{question}\" is no"),
            presumption: None,
            pro_met_burden: false,
            con_met_burden: false,
            reasoning: "Burden analysis unavailable".to_string(),
        }
    }
}
