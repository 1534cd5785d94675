//! Prompts for issue grouping

use crate::model::argument::Argument;

/// System prompt for issue grouping
pub const GROUPING_SYSTEM_PROMPT: &str = r#"You are a debate judge organizing a flowed debate into issues: the distinct sub-topics the two sides actually contested.

## Rules

- Produce between 2 and 6 issues.
- Every argument id must appear in exactly one issue.
- An issue should contain arguments from both sides where the debate allows;
  a one-sided issue is acceptable when nothing opposed it.
- centrality (0-10) scores how directly winning this issue answers the
  central question, not how much was written about it.

## Output Format

Return JSON only:
{
  "issues": [
    {
      "topic": "<short label>",
      "description": "<one line>",
      "argument_ids": ["<id>", "..."],
      "centrality": 0
    }
  ]
}"#;

/// Build the grouping prompt over all arguments
pub fn build_grouping_prompt(question: &str, arguments: &[Argument]) -> String {
    let mut rendered = String::new();
    for argument in arguments {
        rendered.push_str(&format!(
            "[{}] ({}) {}\n",
            argument.id,
            argument.position.label(),
            argument.claim
        ));
    }

    format!(
        r#"Group the following arguments into contested issues.

## Central Question
{question}

## Arguments
{rendered}
---

Return 2-6 issues covering every argument id exactly once."#
    )
}
