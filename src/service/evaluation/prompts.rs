//! Prompts for argument evaluation

use crate::model::argument::Argument;

/// System prompt for argument evaluation
pub const EVALUATION_SYSTEM_PROMPT: &str = r#"You are a debate judge scoring individual arguments. Score every dimension 0-10.

## Dimensions

- clarity: is the claim a single, unambiguous assertion
- relevance: how directly the claim bears on the central question
- warrant_quality (only when a warrant is shown):
  - source_credibility: reliability of the cited support
  - recency: how current the support is
  - relevance: how well the support fits this claim
  - sufficiency: whether the support alone carries the claim
- impact_magnitude: size of the consequence if the claim holds
- impact_probability: likelihood the consequence materializes
- impact_timeframe: how soon the consequence arrives (10 = immediate)
- impact_reversibility: how hard the consequence is to undo (10 = irreversible)
- internal_link_strength: does the warrant actually support the claim
- overall_strength: composite judgment of the argument as presented

## Rules

- Score what is written, not what could have been argued.
- An argument without a warrant cannot score above 3 on internal_link_strength.
- Missing impact means low impact scores, not null.
- Omit warrant_quality entirely for arguments shown without a warrant.

## Output Format

Return JSON only:
{
  "evaluations": [
    {
      "argument_id": "<id>",
      "clarity": 0,
      "relevance": 0,
      "warrant_quality": {
        "source_credibility": 0,
        "recency": 0,
        "relevance": 0,
        "sufficiency": 0
      },
      "impact_magnitude": 0,
      "impact_probability": 0,
      "impact_timeframe": 0,
      "impact_reversibility": 0,
      "internal_link_strength": 0,
      "overall_strength": 0
    }
  ]
}

Include one entry per argument id from the input."#;

/// Build the evaluation prompt for a batch of arguments
pub fn build_evaluation_prompt(question: &str, arguments: &[Argument]) -> String {
    let mut rendered = String::new();
    for argument in arguments {
        let warrant = argument
            .warrant
            .as_ref()
            .map(|w| format!("{} ({:?})", w.text, w.warrant_type))
            .unwrap_or_else(|| "none".to_string());
        let impact = argument.impact.as_deref().unwrap_or("none");
        rendered.push_str(&format!(
            "[{}] side: {}\nclaim: {}\nwarrant: {}\nimpact: {}\n\n",
            argument.id,
            argument.position.label(),
            argument.claim,
            warrant,
            impact
        ));
    }

    format!(
        r#"Score the following arguments against the central question.

## Central Question
{question}

## Arguments
{rendered}
---

Return one evaluation per argument id."#
    )
}
