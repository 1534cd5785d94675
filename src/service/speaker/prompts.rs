//! Prompts for speaker evaluation

use crate::model::argument::Argument;
use crate::service::speaker::AuthorRecord;

/// Claims shown per author as scoring context.
const SAMPLE_CLAIMS: usize = 3;

/// System prompt for speaker evaluation
pub const SPEAKER_SYSTEM_PROMPT: &str = r#"You are a debate judge awarding speaker points on World-Schools-style rubrics. Score each listed participant.

## Rubrics

- content (0-40): quality of arguments and evidence as presented
- style (0-40): clarity, structure, and persuasive delivery in writing
- strategy (0-20): choice of arguments, prioritization, and engagement with
  the strongest opposing material
- intellectual_honesty (0-10): accurate representation of the opponent,
  acknowledged concessions, no misdirection

## Rules

- The win/loss record and drop counts are provided as context; weigh them for
  strategy, but do not double-count them under content.
- Conceding a point honestly should raise intellectual_honesty, not lower it.
- Score each participant independently; points are not ranks.

## Output Format

Return JSON only:
{
  "evaluations": [
    {
      "author": "<name>",
      "content": 0,
      "style": 0,
      "strategy": 0,
      "intellectual_honesty": 0
    }
  ]
}

Include one entry per listed author, with the author name copied exactly."#;

/// Build the speaker prompt for a batch of author records
pub fn build_speaker_prompt(
    question: &str,
    records: &[AuthorRecord],
    arguments: &[Argument],
) -> String {
    let mut rendered = String::new();
    for record in records {
        let claims: Vec<&str> = arguments
            .iter()
            .filter(|a| a.author == record.author)
            .take(SAMPLE_CLAIMS)
            .map(|a| a.claim.as_str())
            .collect();

        rendered.push_str(&format!(
            "### {} (side: {})\narguments made: {} | clashes won: {} | clashes lost: {} | concessions: {} | drops: {}\nsample claims:\n",
            record.author,
            record.position.label(),
            record.arguments_made,
            record.clashes_won,
            record.clashes_lost,
            record.concessions,
            record.drops,
        ));
        for claim in claims {
            rendered.push_str(&format!("- {claim}\n"));
        }
        rendered.push('\n');
    }

    format!(
        r#"Award speaker points to the following participants.

## Central Question
{question}

## Participants
{rendered}
---

Return one evaluation per author."#
    )
}
