//! Prompts for burden-of-proof analysis

use crate::model::argument::{Argument, Position};
use crate::model::issue::Issue;

/// Arguments sampled per side as context.
const SAMPLE_ARGUMENTS: usize = 4;

/// System prompt for burden analysis
pub const BURDEN_SYSTEM_PROMPT: &str = r#"You are a debate judge analyzing burden of proof.

## Task

Given the central question and the state of the debate:
1. State the affirmative burden: what the pro side must establish to win.
2. State the negative burden: what the con side must establish.
3. Determine presumption: which side wins by default if neither burden is
   met. Use "neither" when the question gives no side a default.
4. Judge whether each side met its burden, based on the issue outcomes and
   arguments shown.

## Rules

- Burdens follow from the wording of the question, not from who argued more.
- Meeting a burden requires surviving arguments, not merely stated ones.
- Be conservative: an unclear record means the burden was not met.

## Output Format

Return a single JSON object only:
{
  "affirmative_burden": "<text>",
  "negative_burden": "<text>",
  "presumption": "pro|con|neither",
  "pro_met_burden": false,
  "con_met_burden": false,
  "reasoning": "<2-3 sentences>"
}"#;

/// Build the burden prompt from issue outcomes and sampled arguments
pub fn build_burden_prompt(question: &str, issues: &[Issue], arguments: &[Argument]) -> String {
    let mut issue_lines = String::new();
    for issue in issues {
        issue_lines.push_str(&format!(
            "- {} -> winner: {:?} (pro {:.1} / con {:.1})\n",
            issue.topic, issue.winner, issue.pro_points, issue.con_points
        ));
    }
    if issue_lines.is_empty() {
        issue_lines.push_str("- no issues resolved\n");
    }

    let mut argument_lines = String::new();
    for position in [Position::Pro, Position::Con] {
        argument_lines.push_str(&format!("### {} arguments\n", position.label()));
        let sampled: Vec<&Argument> = arguments
            .iter()
            .filter(|a| a.position == position)
            .take(SAMPLE_ARGUMENTS)
            .collect();
        if sampled.is_empty() {
            argument_lines.push_str("- none\n");
        }
        for argument in sampled {
            argument_lines.push_str(&format!(
                "- [{:?}] {}\n",
                argument.status, argument.claim
            ));
        }
    }

    format!(
        r#"Analyze burden of proof for this debate.

## Central Question
{question}

## Issue Outcomes
{issue_lines}
## Sampled Arguments
{argument_lines}
---

Return the single burden object."#
    )
}
