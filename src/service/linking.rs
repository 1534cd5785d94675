//! Response linking
//!
//! Connects each argument to the opposing-position argument it replies to,
//! searching the parent comment's arguments. A supplied response-quote is
//! matched by substring containment first, then bag-of-words overlap; without
//! a usable quote the linker falls back to thread structure. Same-position
//! arguments are never linked.

use std::collections::{HashMap, HashSet};

use crate::model::argument::Argument;
use crate::model::comment::Comment;

/// Minimum share of quote words that must appear in a candidate's text.
const QUOTE_OVERLAP_THRESHOLD: f64 = 0.3;

/// Establish responds_to/responses links across the argument list.
pub fn link_responses(
    arguments: &mut [Argument],
    comments: &[Comment],
    response_quotes: &HashMap<String, String>,
) {
    let parent_of: HashMap<&str, &str> = comments
        .iter()
        .filter_map(|c| c.parent_id.as_deref().map(|p| (c.id.as_str(), p)))
        .collect();

    let mut args_by_comment: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, argument) in arguments.iter().enumerate() {
        args_by_comment
            .entry(argument.source_comment_id.clone())
            .or_default()
            .push(idx);
    }

    let mut links: Vec<(usize, usize)> = Vec::new();
    for child_idx in 0..arguments.len() {
        let child = &arguments[child_idx];
        let parent_comment = match parent_of.get(child.source_comment_id.as_str()) {
            Some(parent) => *parent,
            None => continue,
        };
        let candidates = match args_by_comment.get(parent_comment) {
            Some(indices) => indices,
            None => continue,
        };

        // Only opposite-position arguments are ever linked
        let opposite: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&i| arguments[i].position == child.position.opposite())
            .collect();
        if opposite.is_empty() {
            continue;
        }

        let target = match response_quotes.get(&child.id) {
            Some(quote) => best_quote_match(quote, &opposite, arguments)
                .or_else(|| structural_fallback(&opposite, arguments)),
            None => structural_fallback(&opposite, arguments),
        };

        if let Some(parent_idx) = target {
            links.push((child_idx, parent_idx));
        }
    }

    for (child_idx, parent_idx) in links {
        let child_id = arguments[child_idx].id.clone();
        let parent_id = arguments[parent_idx].id.clone();
        arguments[child_idx].responds_to = Some(parent_id);
        arguments[parent_idx].responses.push(child_id);
    }
}

/// Match a quote against candidate claims/warrants: substring containment
/// first, then word overlap at [`QUOTE_OVERLAP_THRESHOLD`].
fn best_quote_match(quote: &str, candidates: &[usize], arguments: &[Argument]) -> Option<usize> {
    let normalized_quote = normalize_text(quote);
    if normalized_quote.is_empty() {
        return None;
    }

    for &idx in candidates {
        if candidate_text(&arguments[idx]).contains(&normalized_quote) {
            return Some(idx);
        }
    }

    let quote_words: HashSet<&str> = normalized_quote.split_whitespace().collect();
    let mut best: Option<(usize, f64)> = None;
    for &idx in candidates {
        let ratio = overlap_ratio(&quote_words, &candidate_text(&arguments[idx]));
        if ratio >= QUOTE_OVERLAP_THRESHOLD && best.map(|(_, b)| ratio > b).unwrap_or(true) {
            best = Some((idx, ratio));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Structural fallback: a lone opposite-position candidate wins outright;
/// among several, the strongest evaluated candidate wins (unevaluated
/// arguments rank at zero, ties keep the earliest).
fn structural_fallback(candidates: &[usize], arguments: &[Argument]) -> Option<usize> {
    if candidates.len() == 1 {
        return Some(candidates[0]);
    }
    let mut best: Option<(usize, f64)> = None;
    for &idx in candidates {
        let strength = arguments[idx].strength().unwrap_or(0.0);
        if best.map(|(_, b)| strength > b).unwrap_or(true) {
            best = Some((idx, strength));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Share of quote words present in the candidate text.
fn overlap_ratio(quote_words: &HashSet<&str>, candidate: &str) -> f64 {
    if quote_words.is_empty() {
        return 0.0;
    }
    let candidate_words: HashSet<&str> = candidate.split_whitespace().collect();
    let overlap = quote_words.intersection(&candidate_words).count();
    overlap as f64 / quote_words.len() as f64
}

/// Lowercase, strip punctuation, collapse whitespace.
fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Claim plus warrant text, normalized for matching.
fn candidate_text(argument: &Argument) -> String {
    match &argument.warrant {
        Some(warrant) => normalize_text(&format!("{} {}", argument.claim, warrant.text)),
        None => normalize_text(&argument.claim),
    }
}
