//! Pipeline orchestration.
//!
//! Stages run sequentially: flow build (extraction, linking, evaluation,
//! status) -> clash evaluation -> issue grouping -> speaker evaluation ->
//! burden analysis -> verdict. Every stage fails soft, so a run always ends
//! with a complete report; stages that degraded are listed on it.

use std::sync::Arc;

use chrono::Utc;

use crate::model::comment::{DebateRequest, ThreadStats};
use crate::model::config::{ConfigError, ScoringConfig};
use crate::model::verdict::DebateReport;
use crate::service::burden::BurdenAnalysisService;
use crate::service::clash::{self, ClashEvaluationService};
use crate::service::evaluation::ArgumentEvaluationService;
use crate::service::extraction::ArgumentExtractionService;
use crate::service::inference::{InferenceClient, JsonExtractor};
use crate::service::issues::{scoring, IssueGroupingService};
use crate::service::speaker::SpeakerEvaluationService;
use crate::service::{linking, status, verdict, RunBudget};

/// The debate scoring pipeline.
///
/// The inference client and JSON extractor are explicit dependencies, so
/// tests substitute stub implementations and get deterministic runs.
pub struct DebatePipeline {
    config: ScoringConfig,
    extraction: ArgumentExtractionService,
    evaluation: ArgumentEvaluationService,
    clash: ClashEvaluationService,
    grouping: IssueGroupingService,
    speaker: SpeakerEvaluationService,
    burden: BurdenAnalysisService,
}

impl DebatePipeline {
    /// Build a pipeline. Fails fast on invalid configuration.
    pub fn new(
        client: Arc<dyn InferenceClient>,
        extractor: Arc<dyn JsonExtractor>,
        config: ScoringConfig,
    ) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        Ok(Self {
            config,
            extraction: ArgumentExtractionService::new(client.clone(), extractor.clone()),
            evaluation: ArgumentEvaluationService::new(client.clone(), extractor.clone()),
            clash: ClashEvaluationService::new(client.clone(), extractor.clone()),
            grouping: IssueGroupingService::new(client.clone(), extractor.clone()),
            speaker: SpeakerEvaluationService::new(client.clone(), extractor.clone()),
            burden: BurdenAnalysisService::new(client, extractor),
        })
    }

    /// Score a debate with no deadline or cancellation.
    pub async fn score(&self, request: DebateRequest) -> DebateReport {
        self.score_with_budget(request, &RunBudget::unbounded()).await
    }

    /// Score a debate under a run budget. Once the budget is exhausted,
    /// remaining inference-backed stages short-circuit to their fallbacks.
    pub async fn score_with_budget(
        &self,
        request: DebateRequest,
        budget: &RunBudget,
    ) -> DebateReport {
        let started = std::time::Instant::now();
        let stats = ThreadStats::from_comments(&request.comments);
        let mut degraded_stages: Vec<String> = Vec::new();
        let mut note_degraded = |stage: &str, degraded: bool| {
            if degraded {
                degraded_stages.push(stage.to_string());
            }
        };

        // Flow build
        let extraction = self.extraction.extract_arguments(&request, budget).await;
        note_degraded("extraction", extraction.degraded);
        let (mut arguments, scratch) = extraction.value;

        linking::link_responses(&mut arguments, &request.comments, &scratch.response_quotes);

        let evaluation = self
            .evaluation
            .evaluate_arguments(&mut arguments, &request.central_question, budget)
            .await;
        note_degraded("evaluation", evaluation.degraded);

        status::resolve_initial_statuses(&mut arguments, &scratch.concessions);

        // Clash evaluation refines contested statuses
        let clash_result = self
            .clash
            .evaluate_clashes(&arguments, &request.central_question, budget)
            .await;
        note_degraded("clash", clash_result.degraded);
        let clashes = clash_result.value;
        clash::refine_statuses(&mut arguments, &clashes);

        // Issue grouping and the deterministic winner resolution
        let grouping = self
            .grouping
            .group_issues(&arguments, &request.central_question, budget)
            .await;
        note_degraded("grouping", grouping.degraded);
        let mut issues = grouping.value;
        scoring::determine_issue_winners(&mut issues, &arguments, &clashes, &self.config);

        let speakers = self
            .speaker
            .evaluate_speakers(
                &arguments,
                &clashes,
                &self.config.speaker_point_scale,
                &request.central_question,
                budget,
            )
            .await;
        note_degraded("speaker", speakers.degraded);

        let burden = self
            .burden
            .analyze_burden(&request.central_question, &issues, &arguments, budget)
            .await;
        note_degraded("burden", burden.degraded);

        let verdict = verdict::calculate_verdict(
            &issues,
            &arguments,
            &speakers.value,
            &burden.value,
            &self.config,
        );

        tracing::info!(
            comments = stats.total_comments,
            arguments = arguments.len(),
            clashes = clashes.len(),
            issues = issues.len(),
            winner = ?verdict.winner,
            confidence = verdict.confidence,
            degraded_stages = ?degraded_stages,
            elapsed_ms = started.elapsed().as_millis(),
            "Debate scoring complete"
        );

        DebateReport {
            central_question: request.central_question,
            stats,
            arguments,
            clashes,
            issues,
            speakers: speakers.value,
            burden: burden.value,
            verdict,
            degraded_stages,
            generated_at: Utc::now(),
        }
    }
}
