use serde::{Deserialize, Serialize};

/// How an attacking argument engages the argument it responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClashType {
    /// Disputes the truth of the claim itself.
    Denial,
    /// Accepts the claim but reduces its force.
    Mitigation,
    /// Flips the claim into support for the attacker's side.
    Turn,
    /// Concedes the point but argues other considerations outweigh it.
    Outweigh,
    /// Attacks the connection between warrant and claim.
    NoLink,
    /// Offers an alternative that absorbs the claim's benefit.
    Counterplan,
    /// The two sides never actually engage each other's reasoning.
    TalkingPast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClashWinner {
    Attacker,
    Defender,
    Draw,
}

// A direct exchange between two arguments of opposing position.
// quality is 0-10 and forced to 0 for talking_past, where neither side
// is credited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clash {
    pub id: String,
    pub attacker_id: String,
    pub defender_id: String,
    pub clash_type: ClashType,
    pub quality: f64,
    pub winner: ClashWinner,
    pub reasoning: String,
}

impl Clash {
    /// Fallback used when clash evaluation fails for a pair: nobody is
    /// credited and later stages still see a defined value.
    pub fn undetermined(id: String, attacker_id: String, defender_id: String) -> Self {
        Self {
            id,
            attacker_id,
            defender_id,
            clash_type: ClashType::TalkingPast,
            quality: 0.0,
            winner: ClashWinner::Draw,
            reasoning: "Exchange could not be evaluated".to_string(),
        }
    }
}
