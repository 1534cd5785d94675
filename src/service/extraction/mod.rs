//! Argument extraction service using batched inference calls.
//!
//! Turns comments into typed claim/warrant/impact arguments. A failed batch
//! contributes zero arguments; extraction never aborts the pipeline.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::model::argument::{Argument, ArgumentStatus, Position, Warrant, WarrantType};
use crate::model::comment::{Comment, DebateRequest, PositionDefinitions};
use crate::model::wire::{
    ExtractedArgument, ExtractedPosition, ExtractedWarrantType, ExtractionPayload,
};
use crate::service::batch::batched;
use crate::service::inference::{
    decode_payload, InferenceClient, InferenceRequest, JsonExtractor,
};
use crate::service::{RunBudget, StageResult};

pub mod prompts;
pub mod validation;

/// Environment variable overriding the model hint for extraction calls.
const ENV_EXTRACTION_MODEL: &str = "EXTRACTION_MODEL";

/// Comments per inference call.
const EXTRACTION_BATCH_SIZE: usize = 5;

const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.0;
const STAGE: &str = "extraction";

/// Transient extraction byproducts, carried between stages out of band so the
/// argument records themselves stay free of scratch state.
#[derive(Debug, Default)]
pub struct ExtractionScratch {
    /// Argument id -> quote identifying the parent argument it addresses.
    pub response_quotes: HashMap<String, String>,
    /// Argument ids flagged as explicit concessions.
    pub concessions: HashSet<String>,
}

/// Service turning comments into structured arguments.
pub struct ArgumentExtractionService {
    client: Arc<dyn InferenceClient>,
    extractor: Arc<dyn JsonExtractor>,
    model_hint: Option<String>,
}

impl ArgumentExtractionService {
    pub fn new(client: Arc<dyn InferenceClient>, extractor: Arc<dyn JsonExtractor>) -> Self {
        Self {
            client,
            extractor,
            model_hint: std::env::var(ENV_EXTRACTION_MODEL).ok(),
        }
    }

    /// Extract arguments from every comment in the request, in batches of
    /// [`EXTRACTION_BATCH_SIZE`].
    pub async fn extract_arguments(
        &self,
        request: &DebateRequest,
        budget: &RunBudget,
    ) -> StageResult<(Vec<Argument>, ExtractionScratch)> {
        let positions = request
            .positions
            .clone()
            .unwrap_or_else(|| PositionDefinitions::for_question(&request.central_question));

        let mut arguments = Vec::new();
        let mut scratch = ExtractionScratch::default();
        let mut degraded = false;

        for batch in batched(&request.comments, EXTRACTION_BATCH_SIZE) {
            if budget.exhausted() {
                tracing::warn!(
                    remaining_comments = batch.len(),
                    "Run budget exhausted, skipping remaining extraction batches"
                );
                degraded = true;
                break;
            }

            match self
                .extract_batch(&request.central_question, &positions, batch)
                .await
            {
                Some(payload) => {
                    merge_batch(payload, batch, &mut arguments, &mut scratch);
                }
                None => {
                    // Fail-soft: this batch contributes zero arguments
                    degraded = true;
                }
            }
        }

        tracing::info!(
            comments = request.comments.len(),
            arguments = arguments.len(),
            concessions = scratch.concessions.len(),
            degraded = degraded,
            "Argument extraction complete"
        );

        if degraded {
            StageResult::degraded((arguments, scratch))
        } else {
            StageResult::clean((arguments, scratch))
        }
    }

    async fn extract_batch(
        &self,
        question: &str,
        positions: &PositionDefinitions,
        batch: &[Comment],
    ) -> Option<ExtractionPayload> {
        let request = InferenceRequest {
            prompt: prompts::build_extraction_prompt(question, positions, batch),
            system: Some(prompts::EXTRACTION_SYSTEM_PROMPT.to_string()),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            model_hint: self.model_hint.clone(),
        };

        let response = match self.client.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    batch_size = batch.len(),
                    error = %e,
                    "Argument extraction batch failed"
                );
                return None;
            }
        };

        decode_payload(self.extractor.as_ref(), &response.text, STAGE)
    }
}

/// Fold one batch payload into the argument list, skipping entries that fail
/// validation or reference comments outside the batch.
fn merge_batch(
    payload: ExtractionPayload,
    batch: &[Comment],
    arguments: &mut Vec<Argument>,
    scratch: &mut ExtractionScratch,
) {
    let by_id: HashMap<&str, &Comment> = batch.iter().map(|c| (c.id.as_str(), c)).collect();
    let mut per_comment_index: HashMap<String, usize> = HashMap::new();

    for analysis in payload.analyses {
        let comment = match by_id.get(analysis.comment_id.as_str()) {
            Some(comment) => *comment,
            None => {
                tracing::warn!(
                    comment_id = %analysis.comment_id,
                    "Extraction payload references a comment outside the batch"
                );
                continue;
            }
        };

        for extracted in analysis.arguments {
            if let Err(reason) = validation::validate_extracted_argument(&extracted) {
                tracing::debug!(
                    comment_id = %comment.id,
                    reason = %reason,
                    "Skipping invalid extracted argument"
                );
                continue;
            }

            let index = per_comment_index.entry(comment.id.clone()).or_insert(0);
            let id = format!("arg-{}-{}", comment.id, *index);
            *index += 1;

            if let Some(quote) = &extracted.responds_to_quote {
                scratch
                    .response_quotes
                    .insert(id.clone(), quote.trim().to_string());
            }
            if extracted.is_concession {
                scratch.concessions.insert(id.clone());
            }

            arguments.push(convert_argument(id, extracted, comment));
        }
    }
}

fn convert_argument(id: String, extracted: ExtractedArgument, comment: &Comment) -> Argument {
    let position = match extracted.position {
        ExtractedPosition::Pro => Position::Pro,
        ExtractedPosition::Con => Position::Con,
    };

    let warrant = extracted.warrant.and_then(|text| {
        let text = text.trim().to_string();
        if text.is_empty() {
            return None;
        }
        Some(Warrant {
            text,
            warrant_type: convert_warrant_type(extracted.warrant_type),
        })
    });

    Argument {
        id,
        source_comment_id: comment.id.clone(),
        author: comment.author.clone(),
        position,
        timestamp: comment.timestamp,
        claim: extracted.claim.trim().to_string(),
        warrant,
        impact: extracted
            .impact
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty()),
        responds_to: None,
        responses: Vec::new(),
        // Placeholder until status resolution runs
        status: ArgumentStatus::Extended,
        evaluation: None,
    }
}

fn convert_warrant_type(extracted: Option<ExtractedWarrantType>) -> WarrantType {
    match extracted {
        Some(ExtractedWarrantType::Empirical) => WarrantType::Empirical,
        Some(ExtractedWarrantType::Testimonial) => WarrantType::Testimonial,
        Some(ExtractedWarrantType::Analogical) => WarrantType::Analogical,
        Some(ExtractedWarrantType::Logical) => WarrantType::Logical,
        Some(ExtractedWarrantType::Experiential) => WarrantType::Experiential,
        Some(ExtractedWarrantType::None) | None => WarrantType::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn comment(id: &str) -> Comment {
        Comment {
            id: id.to_string(),
            author: format!("author-{id}"),
            text: "Some comment text".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            parent_id: None,
            engagement: 3,
        }
    }

    fn extracted(claim: &str) -> ExtractedArgument {
        ExtractedArgument {
            claim: claim.to_string(),
            warrant: Some("A peer-reviewed study found the effect".to_string()),
            warrant_type: Some(ExtractedWarrantType::Empirical),
            impact: Some("Policy would change outcomes at scale".to_string()),
            position: ExtractedPosition::Pro,
            responds_to_quote: Some("the effect is overstated".to_string()),
            is_concession: false,
        }
    }

    #[test]
    fn test_merge_batch_assigns_deterministic_ids() {
        let batch = vec![comment("c1")];
        let payload = ExtractionPayload {
            analyses: vec![crate::model::wire::CommentAnalysis {
                comment_id: "c1".to_string(),
                arguments: vec![
                    extracted("Remote work increases productivity overall"),
                    extracted("Commutes waste productive hours every day"),
                ],
            }],
        };

        let mut arguments = Vec::new();
        let mut scratch = ExtractionScratch::default();
        merge_batch(payload, &batch, &mut arguments, &mut scratch);

        assert_eq!(arguments.len(), 2);
        assert_eq!(arguments[0].id, "arg-c1-0");
        assert_eq!(arguments[1].id, "arg-c1-1");
        assert_eq!(arguments[0].author, "author-c1");
        assert!(scratch.response_quotes.contains_key("arg-c1-0"));
    }

    #[test]
    fn test_merge_batch_skips_unknown_comment() {
        let batch = vec![comment("c1")];
        let payload = ExtractionPayload {
            analyses: vec![crate::model::wire::CommentAnalysis {
                comment_id: "other".to_string(),
                arguments: vec![extracted("Claim for a comment not in the batch")],
            }],
        };

        let mut arguments = Vec::new();
        let mut scratch = ExtractionScratch::default();
        merge_batch(payload, &batch, &mut arguments, &mut scratch);
        assert!(arguments.is_empty());
    }

    #[test]
    fn test_convert_argument_drops_empty_warrant() {
        let mut e = extracted("The ban reduces consumption measurably");
        e.warrant = Some("   ".to_string());
        let argument = convert_argument("arg-c1-0".to_string(), e, &comment("c1"));
        assert!(argument.warrant.is_none());
        assert_eq!(argument.status, ArgumentStatus::Extended);
        assert!(argument.evaluation.is_none());
    }

    #[test]
    fn test_concession_flag_lands_in_scratch() {
        let batch = vec![comment("c1")];
        let mut arg = extracted("You are right that costs rose last year");
        arg.is_concession = true;
        let payload = ExtractionPayload {
            analyses: vec![crate::model::wire::CommentAnalysis {
                comment_id: "c1".to_string(),
                arguments: vec![arg],
            }],
        };

        let mut arguments = Vec::new();
        let mut scratch = ExtractionScratch::default();
        merge_batch(payload, &batch, &mut arguments, &mut scratch);
        assert!(scratch.concessions.contains("arg-c1-0"));
    }
}
