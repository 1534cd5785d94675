use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::argument::Argument;
use crate::model::clash::Clash;
use crate::model::comment::ThreadStats;
use crate::model::issue::{Issue, Outcome};
use crate::model::speaker::{BurdenAnalysis, SpeakerEvaluation};

/// Presentation scores, 0-100 per side, derived independently of the
/// win/loss decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayScores {
    pub pro: f64,
    pub con: f64,
    pub margin: f64,
}

// The final judgment over the whole debate.
// - pro_points/con_points come from the composite point formula
// - confidence is bounded 0-95
// - voting_issues are the ids of the issues that decided the outcome,
//   ranked by centrality, at most five
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub winner: Outcome,
    pub confidence: f64,
    pub issues_won_by_pro: usize,
    pub issues_won_by_con: usize,
    pub issues_drawn: usize,
    pub pro_impact_total: f64,
    pub con_impact_total: f64,
    pub pro_points: f64,
    pub con_points: f64,
    pub display: DisplayScores,
    pub voting_issues: Vec<String>,
    pub summary: String,
    pub judge_notes: Vec<String>,
}

/// Complete output of one pipeline run. Always fully populated: stages that
/// failed contribute their fallback values and are listed in
/// `degraded_stages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateReport {
    pub central_question: String,
    pub stats: ThreadStats,
    pub arguments: Vec<Argument>,
    pub clashes: Vec<Clash>,
    pub issues: Vec<Issue>,
    pub speakers: Vec<SpeakerEvaluation>,
    pub burden: BurdenAnalysis,
    pub verdict: Verdict,
    pub degraded_stages: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
