//! Speaker evaluation service.
//!
//! Groups arguments by author, computes each author's deterministic record
//! (arguments made, clash wins and losses, concessions, drops), and scores
//! content/style/strategy against World-Schools-style rubrics via batched
//! inference calls. A failed batch yields neutral mid-range scores.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::argument::{Argument, ArgumentStatus, Position};
use crate::model::clash::{Clash, ClashWinner};
use crate::model::config::SpeakerPointScale;
use crate::model::speaker::SpeakerEvaluation;
use crate::model::wire::SpeakerPayload;
use crate::service::batch::batched;
use crate::service::inference::{
    decode_payload, InferenceClient, InferenceRequest, JsonExtractor,
};
use crate::service::{RunBudget, StageResult};

pub mod prompts;

const ENV_SPEAKER_MODEL: &str = "SPEAKER_MODEL";

/// Authors per inference call.
const SPEAKER_BATCH_SIZE: usize = 4;

const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.0;
const STAGE: &str = "speaker";

/// Honesty rubric maximum (not part of the configurable point scale).
const HONESTY_MAX: f64 = 10.0;

/// An author's deterministic record, computed from pipeline state.
#[derive(Debug, Clone)]
pub struct AuthorRecord {
    pub author: String,
    pub position: Position,
    pub arguments_made: usize,
    pub clashes_won: usize,
    pub clashes_lost: usize,
    pub concessions: usize,
    pub drops: usize,
}

/// Build per-author records, ordered by author name for determinism.
///
/// An author arguing both sides is assigned their majority position; ties
/// keep the position of their earliest argument.
pub fn author_records(arguments: &[Argument], clashes: &[Clash]) -> Vec<AuthorRecord> {
    let mut by_author: BTreeMap<&str, Vec<&Argument>> = BTreeMap::new();
    for argument in arguments {
        by_author.entry(argument.author.as_str()).or_default().push(argument);
    }

    let author_of = |argument_id: &str| -> Option<&str> {
        arguments
            .iter()
            .find(|a| a.id == argument_id)
            .map(|a| a.author.as_str())
    };

    let mut records = Vec::with_capacity(by_author.len());
    for (author, args) in by_author {
        let pro_count = args.iter().filter(|a| a.position == Position::Pro).count();
        let con_count = args.len() - pro_count;
        let position = if pro_count > con_count {
            Position::Pro
        } else if con_count > pro_count {
            Position::Con
        } else {
            args[0].position
        };

        let mut clashes_won = 0;
        let mut clashes_lost = 0;
        for clash in clashes {
            let attacker_author = author_of(&clash.attacker_id);
            let defender_author = author_of(&clash.defender_id);
            match clash.winner {
                ClashWinner::Attacker => {
                    if attacker_author == Some(author) {
                        clashes_won += 1;
                    }
                    if defender_author == Some(author) {
                        clashes_lost += 1;
                    }
                }
                ClashWinner::Defender => {
                    if defender_author == Some(author) {
                        clashes_won += 1;
                    }
                    if attacker_author == Some(author) {
                        clashes_lost += 1;
                    }
                }
                ClashWinner::Draw => {}
            }
        }

        records.push(AuthorRecord {
            author: author.to_string(),
            position,
            arguments_made: args.len(),
            clashes_won,
            clashes_lost,
            concessions: args
                .iter()
                .filter(|a| a.status == ArgumentStatus::Conceded)
                .count(),
            drops: args
                .iter()
                .filter(|a| a.status == ArgumentStatus::Dropped)
                .count(),
        });
    }
    records
}

pub struct SpeakerEvaluationService {
    client: Arc<dyn InferenceClient>,
    extractor: Arc<dyn JsonExtractor>,
    model_hint: Option<String>,
}

impl SpeakerEvaluationService {
    pub fn new(client: Arc<dyn InferenceClient>, extractor: Arc<dyn JsonExtractor>) -> Self {
        Self {
            client,
            extractor,
            model_hint: std::env::var(ENV_SPEAKER_MODEL).ok(),
        }
    }

    pub async fn evaluate_speakers(
        &self,
        arguments: &[Argument],
        clashes: &[Clash],
        scale: &SpeakerPointScale,
        question: &str,
        budget: &RunBudget,
    ) -> StageResult<Vec<SpeakerEvaluation>> {
        let records = author_records(arguments, clashes);
        if records.is_empty() {
            return StageResult::clean(Vec::new());
        }

        let mut evaluations = Vec::with_capacity(records.len());
        let mut degraded = false;

        for batch in batched(&records, SPEAKER_BATCH_SIZE) {
            let payload = if budget.exhausted() {
                tracing::warn!(
                    remaining_authors = batch.len(),
                    "Run budget exhausted, using neutral speaker scores"
                );
                degraded = true;
                None
            } else {
                let payload = self.evaluate_batch(question, batch, arguments).await;
                if payload.is_none() {
                    degraded = true;
                }
                payload
            };

            for record in batch {
                let scored = payload
                    .as_ref()
                    .and_then(|p| p.evaluations.iter().find(|e| e.author == record.author));
                evaluations.push(match scored {
                    Some(extracted) => SpeakerEvaluation {
                        author: record.author.clone(),
                        position: record.position,
                        content: extracted.content.clamp(0.0, scale.content),
                        style: extracted.style.clamp(0.0, scale.style),
                        strategy: extracted.strategy.clamp(0.0, scale.strategy),
                        speaker_points: extracted.content.clamp(0.0, scale.content)
                            + extracted.style.clamp(0.0, scale.style)
                            + extracted.strategy.clamp(0.0, scale.strategy),
                        intellectual_honesty: extracted
                            .intellectual_honesty
                            .clamp(0.0, HONESTY_MAX),
                        arguments_made: record.arguments_made,
                        clashes_won: record.clashes_won,
                        clashes_lost: record.clashes_lost,
                        concessions: record.concessions,
                        drops: record.drops,
                    },
                    None => neutral_evaluation(record, scale),
                });
            }
        }

        tracing::info!(
            authors = evaluations.len(),
            degraded = degraded,
            "Speaker evaluation complete"
        );

        if degraded {
            StageResult::degraded(evaluations)
        } else {
            StageResult::clean(evaluations)
        }
    }

    async fn evaluate_batch(
        &self,
        question: &str,
        batch: &[AuthorRecord],
        arguments: &[Argument],
    ) -> Option<SpeakerPayload> {
        let request = InferenceRequest {
            prompt: prompts::build_speaker_prompt(question, batch, arguments),
            system: Some(prompts::SPEAKER_SYSTEM_PROMPT.to_string()),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            model_hint: self.model_hint.clone(),
        };

        let response = match self.client.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(batch_size = batch.len(), error = %e, "Speaker evaluation batch failed");
                return None;
            }
        };

        decode_payload(self.extractor.as_ref(), &response.text, STAGE)
    }
}

/// Neutral mid-range scores: half of each rubric maximum.
fn neutral_evaluation(record: &AuthorRecord, scale: &SpeakerPointScale) -> SpeakerEvaluation {
    SpeakerEvaluation {
        author: record.author.clone(),
        position: record.position,
        content: scale.content / 2.0,
        style: scale.style / 2.0,
        strategy: scale.strategy / 2.0,
        speaker_points: (scale.content + scale.style + scale.strategy) / 2.0,
        intellectual_honesty: HONESTY_MAX / 2.0,
        arguments_made: record.arguments_made,
        clashes_won: record.clashes_won,
        clashes_lost: record.clashes_lost,
        concessions: record.concessions,
        drops: record.drops,
    }
}
