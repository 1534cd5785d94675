//! Clash evaluation service.
//!
//! Classifies every attacker/defender exchange and declares a winner, then
//! refines argument statuses from the outcomes. Failed batches fall back to
//! talking_past/draw/quality 0 so later stages always see a defined value.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::argument::{Argument, ArgumentStatus};
use crate::model::clash::{Clash, ClashType, ClashWinner};
use crate::model::wire::{ClashPayload, ExtractedClash, ExtractedClashType, ExtractedClashWinner};
use crate::service::batch::batched;
use crate::service::inference::{
    decode_payload, InferenceClient, InferenceRequest, JsonExtractor,
};
use crate::service::{RunBudget, StageResult};

pub mod prompts;

const ENV_CLASH_MODEL: &str = "CLASH_MODEL";

/// Attacker/defender pairs per inference call.
const CLASH_BATCH_SIZE: usize = 3;

const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.0;
const STAGE: &str = "clash";

/// An attacker/defender pairing eligible for clash evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClashPair {
    pub attacker_id: String,
    pub defender_id: String,
}

/// Collect every pair where an argument responds to an opposite-position
/// argument, in argument order.
pub fn collect_pairs(arguments: &[Argument]) -> Vec<ClashPair> {
    let by_id: HashMap<&str, &Argument> =
        arguments.iter().map(|a| (a.id.as_str(), a)).collect();

    arguments
        .iter()
        .filter_map(|attacker| {
            let defender_id = attacker.responds_to.as_deref()?;
            let defender = by_id.get(defender_id)?;
            // The linker never joins same-position arguments; re-check anyway
            // so a malformed input cannot produce a same-side clash.
            if defender.position == attacker.position {
                return None;
            }
            Some(ClashPair {
                attacker_id: attacker.id.clone(),
                defender_id: defender.id.to_string(),
            })
        })
        .collect()
}

pub struct ClashEvaluationService {
    client: Arc<dyn InferenceClient>,
    extractor: Arc<dyn JsonExtractor>,
    model_hint: Option<String>,
}

impl ClashEvaluationService {
    pub fn new(client: Arc<dyn InferenceClient>, extractor: Arc<dyn JsonExtractor>) -> Self {
        Self {
            client,
            extractor,
            model_hint: std::env::var(ENV_CLASH_MODEL).ok(),
        }
    }

    /// Evaluate every clash pair. Output order and ids follow pair order, so
    /// repeated runs over the same flow produce the same clash ids.
    pub async fn evaluate_clashes(
        &self,
        arguments: &[Argument],
        question: &str,
        budget: &RunBudget,
    ) -> StageResult<Vec<Clash>> {
        let pairs = collect_pairs(arguments);
        let by_id: HashMap<&str, &Argument> =
            arguments.iter().map(|a| (a.id.as_str(), a)).collect();

        let mut clashes: Vec<Clash> = Vec::with_capacity(pairs.len());
        let mut degraded = false;

        for batch in batched(&pairs, CLASH_BATCH_SIZE) {
            let payload = if budget.exhausted() {
                tracing::warn!(
                    remaining_pairs = batch.len(),
                    "Run budget exhausted, falling back for remaining clash pairs"
                );
                degraded = true;
                None
            } else {
                let payload = self.evaluate_batch(question, batch, &by_id).await;
                if payload.is_none() {
                    degraded = true;
                }
                payload
            };

            for pair in batch {
                let id = format!("clash-{}", clashes.len());
                let evaluated = payload.as_ref().and_then(|p| {
                    p.clashes.iter().find(|c| {
                        c.attacker_id == pair.attacker_id && c.defender_id == pair.defender_id
                    })
                });
                let clash = match evaluated {
                    Some(extracted) => convert_clash(id, extracted),
                    None => {
                        // Missing from the payload or failed batch: nobody
                        // is credited for this exchange.
                        degraded = true;
                        Clash::undetermined(
                            id,
                            pair.attacker_id.clone(),
                            pair.defender_id.clone(),
                        )
                    }
                };
                clashes.push(clash);
            }
        }

        tracing::info!(
            pairs = pairs.len(),
            clashes = clashes.len(),
            degraded = degraded,
            "Clash evaluation complete"
        );

        if degraded {
            StageResult::degraded(clashes)
        } else {
            StageResult::clean(clashes)
        }
    }

    async fn evaluate_batch(
        &self,
        question: &str,
        batch: &[ClashPair],
        by_id: &HashMap<&str, &Argument>,
    ) -> Option<ClashPayload> {
        let request = InferenceRequest {
            prompt: prompts::build_clash_prompt(question, batch, by_id),
            system: Some(prompts::CLASH_SYSTEM_PROMPT.to_string()),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            model_hint: self.model_hint.clone(),
        };

        let response = match self.client.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(batch_size = batch.len(), error = %e, "Clash evaluation batch failed");
                return None;
            }
        };

        decode_payload(self.extractor.as_ref(), &response.text, STAGE)
    }
}

fn convert_clash(id: String, extracted: &ExtractedClash) -> Clash {
    let clash_type = match extracted.clash_type {
        ExtractedClashType::Denial => ClashType::Denial,
        ExtractedClashType::Mitigation => ClashType::Mitigation,
        ExtractedClashType::Turn => ClashType::Turn,
        ExtractedClashType::Outweigh => ClashType::Outweigh,
        ExtractedClashType::NoLink => ClashType::NoLink,
        ExtractedClashType::Counterplan => ClashType::Counterplan,
        ExtractedClashType::TalkingPast => ClashType::TalkingPast,
    };

    let winner = match extracted.winner {
        ExtractedClashWinner::Attacker => ClashWinner::Attacker,
        ExtractedClashWinner::Defender => ClashWinner::Defender,
        ExtractedClashWinner::Draw => ClashWinner::Draw,
    };

    // talking_past credits neither side, whatever the model scored
    let quality = if clash_type == ClashType::TalkingPast {
        0.0
    } else {
        extracted.quality.clamp(0.0, 10.0)
    };

    Clash {
        id,
        attacker_id: extracted.attacker_id.clone(),
        defender_id: extracted.defender_id.clone(),
        clash_type,
        quality,
        winner,
        reasoning: extracted.reasoning.clone(),
    }
}

/// Refine contested statuses from clash outcomes, in clash order.
///
/// Attacker wins: defender falls to turned (on a turn) or refuted, and the
/// attacker, if still contested, extends. Defender wins: a contested attacker
/// is refuted, a contested defender extends. Draws change nothing. Conceded
/// is terminal and never overwritten.
pub fn refine_statuses(arguments: &mut [Argument], clashes: &[Clash]) {
    let index_of: HashMap<String, usize> = arguments
        .iter()
        .enumerate()
        .map(|(idx, a)| (a.id.clone(), idx))
        .collect();

    for clash in clashes {
        let attacker_idx = index_of.get(clash.attacker_id.as_str()).copied();
        let defender_idx = index_of.get(clash.defender_id.as_str()).copied();
        let (attacker_idx, defender_idx) = match (attacker_idx, defender_idx) {
            (Some(a), Some(d)) => (a, d),
            _ => continue,
        };

        match clash.winner {
            ClashWinner::Attacker => {
                let fallen = if clash.clash_type == ClashType::Turn {
                    ArgumentStatus::Turned
                } else {
                    ArgumentStatus::Refuted
                };
                if arguments[defender_idx].status != ArgumentStatus::Conceded {
                    arguments[defender_idx].status = fallen;
                }
                if arguments[attacker_idx].status == ArgumentStatus::Contested {
                    arguments[attacker_idx].status = ArgumentStatus::Extended;
                }
            }
            ClashWinner::Defender => {
                if arguments[attacker_idx].status == ArgumentStatus::Contested {
                    arguments[attacker_idx].status = ArgumentStatus::Refuted;
                }
                if arguments[defender_idx].status == ArgumentStatus::Contested {
                    arguments[defender_idx].status = ArgumentStatus::Extended;
                }
            }
            ClashWinner::Draw => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::argument::Position;
    use chrono::{TimeZone, Utc};

    fn argument(id: &str, position: Position) -> Argument {
        Argument {
            id: id.to_string(),
            source_comment_id: format!("c-{id}"),
            author: format!("author-{id}"),
            position,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            claim: "A claim".to_string(),
            warrant: None,
            impact: None,
            responds_to: None,
            responses: Vec::new(),
            status: ArgumentStatus::Contested,
            evaluation: None,
        }
    }

    fn clash(id: &str, attacker: &str, defender: &str, clash_type: ClashType, winner: ClashWinner) -> Clash {
        Clash {
            id: id.to_string(),
            attacker_id: attacker.to_string(),
            defender_id: defender.to_string(),
            clash_type,
            quality: 6.0,
            winner,
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_collect_pairs_requires_opposite_positions() {
        let mut arguments = vec![
            argument("a1", Position::Pro),
            argument("b1", Position::Con),
            argument("a2", Position::Pro),
        ];
        arguments[1].responds_to = Some("a1".to_string());
        // Malformed same-side link must not produce a pair
        arguments[2].responds_to = Some("a1".to_string());

        let pairs = collect_pairs(&arguments);
        assert_eq!(
            pairs,
            vec![ClashPair {
                attacker_id: "b1".to_string(),
                defender_id: "a1".to_string(),
            }]
        );
    }

    #[test]
    fn test_talking_past_quality_forced_to_zero() {
        let extracted = ExtractedClash {
            attacker_id: "b1".to_string(),
            defender_id: "a1".to_string(),
            clash_type: ExtractedClashType::TalkingPast,
            quality: 8.0,
            winner: ExtractedClashWinner::Attacker,
            reasoning: String::new(),
        };
        let clash = convert_clash("clash-0".to_string(), &extracted);
        assert_eq!(clash.quality, 0.0);
        assert_eq!(clash.clash_type, ClashType::TalkingPast);
    }

    #[test]
    fn test_attacker_win_refutes_defender_and_extends_attacker() {
        let mut arguments = vec![argument("a1", Position::Pro), argument("b1", Position::Con)];
        let clashes = vec![clash("clash-0", "b1", "a1", ClashType::Denial, ClashWinner::Attacker)];
        refine_statuses(&mut arguments, &clashes);
        assert_eq!(arguments[0].status, ArgumentStatus::Refuted);
        assert_eq!(arguments[1].status, ArgumentStatus::Extended);
    }

    #[test]
    fn test_attacker_win_with_turn_marks_defender_turned() {
        let mut arguments = vec![argument("a1", Position::Pro), argument("b1", Position::Con)];
        let clashes = vec![clash("clash-0", "b1", "a1", ClashType::Turn, ClashWinner::Attacker)];
        refine_statuses(&mut arguments, &clashes);
        assert_eq!(arguments[0].status, ArgumentStatus::Turned);
    }

    #[test]
    fn test_defender_win_refutes_attacker() {
        let mut arguments = vec![argument("a1", Position::Pro), argument("b1", Position::Con)];
        let clashes = vec![clash("clash-0", "b1", "a1", ClashType::Denial, ClashWinner::Defender)];
        refine_statuses(&mut arguments, &clashes);
        assert_eq!(arguments[0].status, ArgumentStatus::Extended);
        assert_eq!(arguments[1].status, ArgumentStatus::Refuted);
    }

    #[test]
    fn test_draw_changes_nothing() {
        let mut arguments = vec![argument("a1", Position::Pro), argument("b1", Position::Con)];
        let clashes = vec![clash("clash-0", "b1", "a1", ClashType::Mitigation, ClashWinner::Draw)];
        refine_statuses(&mut arguments, &clashes);
        assert_eq!(arguments[0].status, ArgumentStatus::Contested);
        assert_eq!(arguments[1].status, ArgumentStatus::Contested);
    }

    #[test]
    fn test_conceded_defender_is_never_overwritten() {
        let mut arguments = vec![argument("a1", Position::Pro), argument("b1", Position::Con)];
        arguments[0].status = ArgumentStatus::Conceded;
        let clashes = vec![clash("clash-0", "b1", "a1", ClashType::Denial, ClashWinner::Attacker)];
        refine_statuses(&mut arguments, &clashes);
        assert_eq!(arguments[0].status, ArgumentStatus::Conceded);
    }

    #[test]
    fn test_later_clash_can_refute_an_extended_argument() {
        // b1 beats a1 and extends; a2 then beats b1, which falls to refuted.
        let mut arguments = vec![
            argument("a1", Position::Pro),
            argument("b1", Position::Con),
            argument("a2", Position::Pro),
        ];
        let clashes = vec![
            clash("clash-0", "b1", "a1", ClashType::Denial, ClashWinner::Attacker),
            clash("clash-1", "a2", "b1", ClashType::Denial, ClashWinner::Attacker),
        ];
        refine_statuses(&mut arguments, &clashes);
        assert_eq!(arguments[1].status, ArgumentStatus::Refuted);
        assert_eq!(arguments[2].status, ArgumentStatus::Extended);
    }
}
