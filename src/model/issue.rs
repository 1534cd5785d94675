use serde::{Deserialize, Serialize};

/// Outcome of a contest between the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pro,
    Con,
    Draw,
}

// A grouped sub-topic of contention within the debate.
// Invariant: every argument belongs to exactly one issue.
// pro_points/con_points and winner are filled by issue winner resolution;
// pro_dropped/con_dropped hold each side's arguments that went unanswered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub topic: String,
    pub description: String,
    pub pro_argument_ids: Vec<String>,
    pub con_argument_ids: Vec<String>,
    pub clash_ids: Vec<String>,
    pub pro_dropped: Vec<String>,
    pub con_dropped: Vec<String>,
    pub winner: Outcome,
    /// How directly this issue determines the answer to the central
    /// question, 0-10.
    pub centrality: f64,
    pub pro_points: f64,
    pub con_points: f64,
    pub reasoning: String,
}

impl Issue {
    pub fn argument_count(&self) -> usize {
        self.pro_argument_ids.len() + self.con_argument_ids.len()
    }

    pub fn contains_argument(&self, argument_id: &str) -> bool {
        self.pro_argument_ids.iter().any(|id| id == argument_id)
            || self.con_argument_ids.iter().any(|id| id == argument_id)
    }
}
