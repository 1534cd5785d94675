use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// A single comment in the thread under analysis.
// - parent_id: links the comment into the reply tree; None for top-level
// - engagement: platform score for the comment (votes or similar)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub engagement: i64,
}

/// Free-text definitions of what each side of the debate is arguing for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionDefinitions {
    pub pro: String,
    pub con: String,
}

impl PositionDefinitions {
    /// Generic definitions derived from the central question, used when the
    /// caller does not supply explicit ones.
    pub fn for_question(question: &str) -> Self {
        Self {
            pro: format!("Affirms the question: {question}"),
            con: format!("Rejects the question: {question}"),
        }
    }
}

/// Input handed to the pipeline: the full thread plus the question it debates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateRequest {
    pub central_question: String,
    #[serde(default)]
    pub positions: Option<PositionDefinitions>,
    pub comments: Vec<Comment>,
}

/// Thread shape statistics, computed without inference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadStats {
    pub total_comments: usize,
    pub participant_count: usize,
    pub max_depth: usize,
    pub total_words: usize,
    pub average_comment_length: usize,
}

impl ThreadStats {
    pub fn from_comments(comments: &[Comment]) -> Self {
        let total_comments = comments.len();
        let participant_count = comments
            .iter()
            .map(|c| c.author.as_str())
            .collect::<HashSet<_>>()
            .len();
        let total_words: usize = comments.iter().map(|c| c.text.split_whitespace().count()).sum();

        let parents: HashMap<&str, Option<&str>> = comments
            .iter()
            .map(|c| (c.id.as_str(), c.parent_id.as_deref()))
            .collect();
        let max_depth = comments
            .iter()
            .map(|c| depth_of(c.id.as_str(), &parents))
            .max()
            .unwrap_or(0);

        Self {
            total_comments,
            participant_count,
            max_depth,
            total_words,
            average_comment_length: if total_comments == 0 {
                0
            } else {
                total_words / total_comments
            },
        }
    }
}

/// Depth of a comment in the reply tree (0 for top-level). Bounded by the
/// comment count so a malformed parent cycle cannot loop forever.
fn depth_of(id: &str, parents: &HashMap<&str, Option<&str>>) -> usize {
    let mut depth = 0;
    let mut current = id;
    while depth < parents.len() {
        match parents.get(current).copied().flatten() {
            Some(parent) => {
                depth += 1;
                current = parent;
            }
            None => break,
        }
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn comment(id: &str, parent: Option<&str>, text: &str) -> Comment {
        Comment {
            id: id.to_string(),
            author: format!("author-{id}"),
            text: text.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            parent_id: parent.map(String::from),
            engagement: 1,
        }
    }

    #[test]
    fn test_stats_empty_thread() {
        let stats = ThreadStats::from_comments(&[]);
        assert_eq!(stats.total_comments, 0);
        assert_eq!(stats.max_depth, 0);
        assert_eq!(stats.average_comment_length, 0);
    }

    #[test]
    fn test_stats_counts_depth_and_words() {
        let comments = vec![
            comment("c1", None, "one two three"),
            comment("c2", Some("c1"), "four five"),
            comment("c3", Some("c2"), "six"),
        ];
        let stats = ThreadStats::from_comments(&comments);
        assert_eq!(stats.total_comments, 3);
        assert_eq!(stats.participant_count, 3);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.total_words, 6);
        assert_eq!(stats.average_comment_length, 2);
    }

    #[test]
    fn test_stats_survive_parent_cycle() {
        let mut a = comment("a", Some("b"), "x");
        a.parent_id = Some("b".into());
        let b = comment("b", Some("a"), "y");
        let stats = ThreadStats::from_comments(&[a, b]);
        assert!(stats.max_depth <= 2);
    }
}
