//! Issue grouping service.
//!
//! Partitions arguments into 2-6 topical issues via a single inference call.
//! Post-processing enforces the exactly-one-issue invariant; on failure the
//! whole debate collapses into one fallback issue at full weight.

use std::collections::HashSet;
use std::sync::Arc;

use crate::model::argument::{Argument, Position};
use crate::model::issue::{Issue, Outcome};
use crate::model::wire::IssuePayload;
use crate::service::inference::{
    decode_payload, InferenceClient, InferenceRequest, JsonExtractor,
};
use crate::service::{RunBudget, StageResult};

pub mod prompts;
pub mod scoring;

const ENV_GROUPING_MODEL: &str = "GROUPING_MODEL";

const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.0;
const STAGE: &str = "grouping";

/// Weight given to the fallback issue spanning the whole debate.
const FALLBACK_CENTRALITY: f64 = 10.0;

pub struct IssueGroupingService {
    client: Arc<dyn InferenceClient>,
    extractor: Arc<dyn JsonExtractor>,
    model_hint: Option<String>,
}

impl IssueGroupingService {
    pub fn new(client: Arc<dyn InferenceClient>, extractor: Arc<dyn JsonExtractor>) -> Self {
        Self {
            client,
            extractor,
            model_hint: std::env::var(ENV_GROUPING_MODEL).ok(),
        }
    }

    /// Group all arguments into issues. Winner, points, and clash membership
    /// are filled afterwards by [`scoring::determine_issue_winners`].
    pub async fn group_issues(
        &self,
        arguments: &[Argument],
        question: &str,
        budget: &RunBudget,
    ) -> StageResult<Vec<Issue>> {
        if arguments.is_empty() {
            return StageResult::clean(Vec::new());
        }
        // Nothing to partition; the single fallback issue is the grouping
        if arguments.len() < 2 {
            return StageResult::clean(fallback_issues(arguments));
        }

        if budget.exhausted() {
            tracing::warn!("Run budget exhausted, using single fallback issue");
            return StageResult::degraded(fallback_issues(arguments));
        }

        let payload = self.group_call(question, arguments).await;
        match payload {
            Some(payload) => {
                let issues = convert_issues(payload, arguments);
                if issues.is_empty() {
                    tracing::warn!("Grouping payload contained no usable issues, falling back");
                    StageResult::degraded(fallback_issues(arguments))
                } else {
                    tracing::info!(
                        issues = issues.len(),
                        arguments = arguments.len(),
                        "Issue grouping complete"
                    );
                    StageResult::clean(issues)
                }
            }
            None => StageResult::degraded(fallback_issues(arguments)),
        }
    }

    async fn group_call(&self, question: &str, arguments: &[Argument]) -> Option<IssuePayload> {
        let request = InferenceRequest {
            prompt: prompts::build_grouping_prompt(question, arguments),
            system: Some(prompts::GROUPING_SYSTEM_PROMPT.to_string()),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            model_hint: self.model_hint.clone(),
        };

        let response = match self.client.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Issue grouping call failed");
                return None;
            }
        };

        decode_payload(self.extractor.as_ref(), &response.text, STAGE)
    }
}

/// Single issue spanning every argument, at full centrality.
pub fn fallback_issues(arguments: &[Argument]) -> Vec<Issue> {
    vec![make_issue(
        0,
        "The central question".to_string(),
        "All arguments, grouped as one issue".to_string(),
        arguments.iter().collect(),
        FALLBACK_CENTRALITY,
    )]
}

/// Convert the wire payload, enforcing that every argument lands in exactly
/// one issue: first assignment wins, and arguments the model missed are
/// attached to the first issue.
fn convert_issues(payload: IssuePayload, arguments: &[Argument]) -> Vec<Issue> {
    let known_ids: HashSet<&str> = arguments.iter().map(|a| a.id.as_str()).collect();
    let mut assigned: HashSet<String> = HashSet::new();
    let mut issues: Vec<Issue> = Vec::new();

    for extracted in payload.issues {
        let mut members: Vec<&Argument> = Vec::new();
        for argument_id in &extracted.argument_ids {
            if !known_ids.contains(argument_id.as_str()) {
                tracing::warn!(
                    argument_id = %argument_id,
                    "Grouping payload references an unknown argument"
                );
                continue;
            }
            if !assigned.insert(argument_id.clone()) {
                // Already claimed by an earlier issue
                continue;
            }
            if let Some(argument) = arguments.iter().find(|a| &a.id == argument_id) {
                members.push(argument);
            }
        }
        if members.is_empty() {
            continue;
        }
        issues.push(make_issue(
            issues.len(),
            extracted.topic,
            extracted.description,
            members,
            extracted.centrality.clamp(0.0, 10.0),
        ));
    }

    // Arguments the model never placed go to the first issue
    if let Some(first) = issues.first_mut() {
        for argument in arguments {
            if !assigned.contains(&argument.id) {
                tracing::debug!(argument_id = %argument.id, "Attaching unplaced argument to first issue");
                match argument.position {
                    Position::Pro => first.pro_argument_ids.push(argument.id.clone()),
                    Position::Con => first.con_argument_ids.push(argument.id.clone()),
                }
            }
        }
    }

    issues
}

fn make_issue(
    index: usize,
    topic: String,
    description: String,
    members: Vec<&Argument>,
    centrality: f64,
) -> Issue {
    let mut pro_argument_ids = Vec::new();
    let mut con_argument_ids = Vec::new();
    for argument in members {
        match argument.position {
            Position::Pro => pro_argument_ids.push(argument.id.clone()),
            Position::Con => con_argument_ids.push(argument.id.clone()),
        }
    }

    Issue {
        id: format!("issue-{index}"),
        topic,
        description,
        pro_argument_ids,
        con_argument_ids,
        clash_ids: Vec::new(),
        pro_dropped: Vec::new(),
        con_dropped: Vec::new(),
        winner: Outcome::Draw,
        centrality,
        pro_points: 0.0,
        con_points: 0.0,
        reasoning: String::new(),
    }
}
