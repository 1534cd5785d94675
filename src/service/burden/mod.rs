//! Burden-of-proof analysis service.
//!
//! A single inference call determines what each side had to prove, which side
//! holds presumption, and whether each side met its burden. On failure the
//! analysis degrades to an undetermined fallback that awards no presumption
//! bonus downstream.

use std::sync::Arc;

use crate::model::argument::{Argument, Position};
use crate::model::issue::Issue;
use crate::model::speaker::BurdenAnalysis;
use crate::model::wire::{ExtractedBurden, ExtractedPresumption};
use crate::service::inference::{
    decode_payload, InferenceClient, InferenceRequest, JsonExtractor,
};
use crate::service::{RunBudget, StageResult};

pub mod prompts;

const ENV_BURDEN_MODEL: &str = "BURDEN_MODEL";

const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.0;
const STAGE: &str = "burden";

pub struct BurdenAnalysisService {
    client: Arc<dyn InferenceClient>,
    extractor: Arc<dyn JsonExtractor>,
    model_hint: Option<String>,
}

impl BurdenAnalysisService {
    pub fn new(client: Arc<dyn InferenceClient>, extractor: Arc<dyn JsonExtractor>) -> Self {
        Self {
            client,
            extractor,
            model_hint: std::env::var(ENV_BURDEN_MODEL).ok(),
        }
    }

    pub async fn analyze_burden(
        &self,
        question: &str,
        issues: &[Issue],
        arguments: &[Argument],
        budget: &RunBudget,
    ) -> StageResult<BurdenAnalysis> {
        if budget.exhausted() {
            tracing::warn!("Run budget exhausted, burden analysis undetermined");
            return StageResult::degraded(BurdenAnalysis::undetermined(question));
        }

        let request = InferenceRequest {
            prompt: prompts::build_burden_prompt(question, issues, arguments),
            system: Some(prompts::BURDEN_SYSTEM_PROMPT.to_string()),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            model_hint: self.model_hint.clone(),
        };

        let response = match self.client.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Burden analysis call failed");
                return StageResult::degraded(BurdenAnalysis::undetermined(question));
            }
        };

        match decode_payload::<ExtractedBurden>(self.extractor.as_ref(), &response.text, STAGE) {
            Some(extracted) => {
                tracing::info!(
                    pro_met = extracted.pro_met_burden,
                    con_met = extracted.con_met_burden,
                    "Burden analysis complete"
                );
                StageResult::clean(convert_burden(extracted))
            }
            None => StageResult::degraded(BurdenAnalysis::undetermined(question)),
        }
    }
}

fn convert_burden(extracted: ExtractedBurden) -> BurdenAnalysis {
    let presumption = match extracted.presumption {
        ExtractedPresumption::Pro => Some(Position::Pro),
        ExtractedPresumption::Con => Some(Position::Con),
        ExtractedPresumption::Neither => None,
    };

    BurdenAnalysis {
        affirmative_burden: extracted.affirmative_burden,
        negative_burden: extracted.negative_burden,
        presumption,
        pro_met_burden: extracted.pro_met_burden,
        con_met_burden: extracted.con_met_burden,
        reasoning: extracted.reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neither_presumption_maps_to_none() {
        let burden = convert_burden(ExtractedBurden {
            affirmative_burden: "Prove the policy helps".to_string(),
            negative_burden: "Prove it harms or fails".to_string(),
            presumption: ExtractedPresumption::Neither,
            pro_met_burden: true,
            con_met_burden: false,
            reasoning: String::new(),
        });
        assert!(burden.presumption.is_none());
        assert!(burden.pro_met_burden);
    }

    #[test]
    fn test_undetermined_fallback_awards_nothing() {
        let burden = BurdenAnalysis::undetermined("Is it good?");
        assert!(burden.presumption.is_none());
        assert!(!burden.pro_met_burden);
        assert!(!burden.con_met_burden);
    }
}
