//! Per-argument evaluation service.
//!
//! Scores clarity, relevance, warrant quality, impact, and composite strength
//! in batches. A failed batch leaves its arguments unevaluated; the pipeline
//! continues.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::argument::{Argument, ArgumentEvaluation, WarrantQuality, WarrantType};
use crate::model::wire::{EvaluationPayload, ExtractedEvaluation};
use crate::service::batch::batched;
use crate::service::inference::{
    decode_payload, InferenceClient, InferenceRequest, JsonExtractor,
};
use crate::service::{RunBudget, StageResult};

pub mod prompts;

const ENV_EVALUATION_MODEL: &str = "EVALUATION_MODEL";

/// Arguments per inference call.
const EVALUATION_BATCH_SIZE: usize = 3;

const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.0;
const STAGE: &str = "evaluation";

pub struct ArgumentEvaluationService {
    client: Arc<dyn InferenceClient>,
    extractor: Arc<dyn JsonExtractor>,
    model_hint: Option<String>,
}

impl ArgumentEvaluationService {
    pub fn new(client: Arc<dyn InferenceClient>, extractor: Arc<dyn JsonExtractor>) -> Self {
        Self {
            client,
            extractor,
            model_hint: std::env::var(ENV_EVALUATION_MODEL).ok(),
        }
    }

    /// Score all arguments in place, merging batch results by argument id.
    pub async fn evaluate_arguments(
        &self,
        arguments: &mut [Argument],
        question: &str,
        budget: &RunBudget,
    ) -> StageResult<()> {
        let index_of: HashMap<String, usize> = arguments
            .iter()
            .enumerate()
            .map(|(idx, a)| (a.id.clone(), idx))
            .collect();

        let mut degraded = false;
        let mut evaluated = 0usize;

        // Snapshot for prompt building; results merge back by argument id
        let snapshot: Vec<Argument> = arguments.to_vec();
        for batch in batched(&snapshot, EVALUATION_BATCH_SIZE) {
            if budget.exhausted() {
                tracing::warn!(
                    remaining = batch.len(),
                    "Run budget exhausted, leaving remaining arguments unevaluated"
                );
                degraded = true;
                break;
            }

            match self.evaluate_batch(question, batch).await {
                Some(payload) => {
                    for extracted in payload.evaluations {
                        let idx = match index_of.get(extracted.argument_id.as_str()) {
                            Some(idx) => *idx,
                            None => {
                                tracing::warn!(
                                    argument_id = %extracted.argument_id,
                                    "Evaluation payload references an unknown argument"
                                );
                                continue;
                            }
                        };
                        let evaluation = convert_evaluation(extracted, &arguments[idx]);
                        arguments[idx].evaluation = Some(evaluation);
                        evaluated += 1;
                    }
                }
                None => {
                    // Fail-soft: these arguments keep evaluation = None
                    degraded = true;
                }
            }
        }

        tracing::info!(
            arguments = arguments.len(),
            evaluated = evaluated,
            degraded = degraded,
            "Argument evaluation complete"
        );

        if degraded {
            StageResult::degraded(())
        } else {
            StageResult::clean(())
        }
    }

    async fn evaluate_batch(
        &self,
        question: &str,
        batch: &[Argument],
    ) -> Option<EvaluationPayload> {
        let request = InferenceRequest {
            prompt: prompts::build_evaluation_prompt(question, batch),
            system: Some(prompts::EVALUATION_SYSTEM_PROMPT.to_string()),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            model_hint: self.model_hint.clone(),
        };

        let response = match self.client.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(batch_size = batch.len(), error = %e, "Argument evaluation batch failed");
                return None;
            }
        };

        decode_payload(self.extractor.as_ref(), &response.text, STAGE)
    }
}

/// Clamp to the 0-10 scoring scale.
fn clamp10(value: f64) -> f64 {
    value.clamp(0.0, 10.0)
}

/// Convert a wire evaluation into the domain record. Warrant presence and
/// type come from the argument itself, not from the model; warrant quality is
/// kept only when a warrant exists.
fn convert_evaluation(extracted: ExtractedEvaluation, argument: &Argument) -> ArgumentEvaluation {
    let warrant_quality = match &argument.warrant {
        Some(_) => extracted.warrant_quality.map(|q| WarrantQuality {
            source_credibility: clamp10(q.source_credibility),
            recency: clamp10(q.recency),
            relevance: clamp10(q.relevance),
            sufficiency: clamp10(q.sufficiency),
        }),
        None => None,
    };

    ArgumentEvaluation {
        clarity: clamp10(extracted.clarity),
        relevance: clamp10(extracted.relevance),
        warrant_present: argument.warrant.is_some(),
        warrant_type: argument
            .warrant
            .as_ref()
            .map(|w| w.warrant_type)
            .unwrap_or(WarrantType::None),
        warrant_quality,
        impact_magnitude: clamp10(extracted.impact_magnitude),
        impact_probability: clamp10(extracted.impact_probability),
        impact_timeframe: clamp10(extracted.impact_timeframe),
        impact_reversibility: clamp10(extracted.impact_reversibility),
        internal_link_strength: clamp10(extracted.internal_link_strength),
        overall_strength: clamp10(extracted.overall_strength),
    }
}
