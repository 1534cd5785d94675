//! Prompts for argument extraction

use crate::model::comment::{Comment, PositionDefinitions};

/// System prompt for argument extraction
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a debate analyst. Your task is to extract structured arguments from discussion comments using the claim/warrant/impact model.

## Critical Rules

1. **A claim is a single debatable assertion.**
   - One comment may contain zero, one, or several distinct claims.
   - Split compound reasoning into separate arguments, one per claim.

2. **Questions and bare agreement are NOT arguments.**
   - "Do you have a source for that?" -> NOT an argument
   - "This. Exactly this." -> NOT an argument
   - "I agree, and here is why: ..." -> extract the new reasoning only

3. **The warrant is the supporting reasoning or evidence, if any.**
   - empirical: data, studies, statistics
   - testimonial: expert or authority statements
   - analogical: comparison to a similar case
   - logical: deductive or structural reasoning
   - experiential: first-hand experience
   - none: the claim is asserted without support

4. **The impact is why the claim matters for the question, if stated.**

5. **Classify position strictly relative to the central question**, using the
   provided side definitions, not the comment's tone.

## Reply Handling

- When a comment argues against something its parent said, include a short
  verbatim quote (under 20 words) from the parent in responds_to_quote.
- Set is_concession true only when the author explicitly grants an opposing
  point ("fair enough", "you're right that...", conceding language).

## Output Format

Return JSON only:
{
  "analyses": [
    {
      "comment_id": "<id>",
      "arguments": [
        {
          "claim": "<single debatable assertion>",
          "warrant": "<supporting reasoning or null>",
          "warrant_type": "empirical|testimonial|analogical|logical|experiential|none",
          "impact": "<why it matters or null>",
          "position": "pro|con",
          "responds_to_quote": "<short parent quote or null>",
          "is_concession": false
        }
      ]
    }
  ]
}

Include every comment id from the input, with an empty arguments array when a
comment contains no arguments."#;

/// Build the extraction prompt for a batch of comments
pub fn build_extraction_prompt(
    question: &str,
    positions: &PositionDefinitions,
    comments: &[Comment],
) -> String {
    let mut rendered = String::new();
    for comment in comments {
        let parent = comment.parent_id.as_deref().unwrap_or("none");
        rendered.push_str(&format!(
            "[{}] author: {} | parent: {} | posted: {} | engagement: {}\n{}\n\n",
            comment.id, comment.author, parent, comment.timestamp, comment.engagement, comment.text
        ));
    }

    format!(
        r#"Extract all arguments from the following comments.

## Central Question
{question}

## Side Definitions
- pro: {}
- con: {}

## Comments
{rendered}
---

Return structured JSON with an analyses entry per comment id."#,
        positions.pro, positions.con
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_prompt_includes_every_comment_id() {
        let comments = vec![
            Comment {
                id: "c1".to_string(),
                author: "alice".to_string(),
                text: "First".to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                parent_id: None,
                engagement: 0,
            },
            Comment {
                id: "c2".to_string(),
                author: "bob".to_string(),
                text: "Second".to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap(),
                parent_id: Some("c1".to_string()),
                engagement: 2,
            },
        ];
        let positions = PositionDefinitions::for_question("Is it good?");
        let prompt = build_extraction_prompt("Is it good?", &positions, &comments);
        assert!(prompt.contains("[c1]"));
        assert!(prompt.contains("[c2]"));
        assert!(prompt.contains("parent: c1"));
    }
}
