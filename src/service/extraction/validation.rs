//! Validation for extracted arguments
//!
//! Deterministic quality gates applied before wire payloads are converted to
//! domain arguments. The model is instructed not to produce questions or bare
//! agreement; these checks enforce that contract.

use crate::model::wire::ExtractedArgument;

/// Shortest claim accepted as a debatable assertion.
const MIN_CLAIM_LEN: usize = 10;

/// Longest accepted responds_to_quote, in characters. Quotes are meant to be
/// short identifying snippets, not whole paragraphs.
const MAX_QUOTE_LEN: usize = 300;

/// Phrases that indicate bare agreement rather than a new argument.
const AGREEMENT_PATTERNS: &[&str] = &[
    "i agree",
    "agreed",
    "this exactly",
    "exactly this",
    "well said",
    "came here to say this",
    "+1",
];

/// Check one extracted argument against the extraction contract.
pub fn validate_extracted_argument(extracted: &ExtractedArgument) -> Result<(), String> {
    let claim = extracted.claim.trim();

    if claim.len() < MIN_CLAIM_LEN {
        return Err(format!("claim too short ({} chars)", claim.len()));
    }

    if claim.ends_with('?') {
        return Err("claim is a question".to_string());
    }

    let claim_lower = claim.to_lowercase();
    if AGREEMENT_PATTERNS
        .iter()
        .any(|pattern| claim_lower.starts_with(pattern))
        && extracted.warrant.is_none()
    {
        return Err("bare agreement without new reasoning".to_string());
    }

    if let Some(quote) = &extracted.responds_to_quote {
        if quote.trim().len() > MAX_QUOTE_LEN {
            return Err(format!("responds_to_quote too long ({} chars)", quote.len()));
        }
    }

    Ok(())
}
