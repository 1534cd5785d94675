//! Prompts for clash evaluation

use std::collections::HashMap;

use crate::model::argument::Argument;
use crate::service::clash::ClashPair;

/// System prompt for clash evaluation
pub const CLASH_SYSTEM_PROMPT: &str = r#"You are a debate judge evaluating direct exchanges between opposing arguments. For each pair, the attacker replied to the defender.

## Clash Types

- denial: attacker disputes the truth of the defender's claim
- mitigation: attacker accepts the claim but reduces its force
- turn: attacker flips the claim into support for their own side
- outweigh: attacker concedes the point but argues other considerations dominate
- no_link: attacker severs the connection between warrant and claim
- counterplan: attacker offers an alternative that absorbs the claim's benefit
- talking_past: the replies never engage each other's actual reasoning

## Quality

Score 0-10 for how directly the exchange engages the actual claim and warrant.
Reserve 0 for talking_past, where neither side earns credit.

## Winner

- attacker: the reply leaves the defender's argument weaker than before
- defender: the original argument survives the reply intact
- draw: genuinely even, or impossible to judge from the text

Judge only what was written. A confident tone is not a win; engagement with
the opposing warrant is.

## Output Format

Return JSON only:
{
  "clashes": [
    {
      "attacker_id": "<id>",
      "defender_id": "<id>",
      "clash_type": "denial|mitigation|turn|outweigh|no_link|counterplan|talking_past",
      "quality": 0,
      "winner": "attacker|defender|draw",
      "reasoning": "<one sentence>"
    }
  ]
}

Include one entry per pair, with the exact attacker_id and defender_id given."#;

/// Build the clash prompt for a batch of pairs
pub fn build_clash_prompt(
    question: &str,
    pairs: &[ClashPair],
    by_id: &HashMap<&str, &Argument>,
) -> String {
    let mut rendered = String::new();
    for (i, pair) in pairs.iter().enumerate() {
        let attacker = by_id.get(pair.attacker_id.as_str());
        let defender = by_id.get(pair.defender_id.as_str());
        let (attacker, defender) = match (attacker, defender) {
            (Some(a), Some(d)) => (a, d),
            _ => continue,
        };
        rendered.push_str(&format!(
            "### Exchange {}\ndefender [{}] ({}): {}\n{}attacker [{}] ({}): {}\n{}\n",
            i + 1,
            defender.id,
            defender.position.label(),
            defender.claim,
            defender
                .warrant
                .as_ref()
                .map(|w| format!("  warrant: {}\n", w.text))
                .unwrap_or_default(),
            attacker.id,
            attacker.position.label(),
            attacker.claim,
            attacker
                .warrant
                .as_ref()
                .map(|w| format!("  warrant: {}\n", w.text))
                .unwrap_or_default(),
        ));
    }

    format!(
        r#"Evaluate the following exchanges.

## Central Question
{question}

## Exchanges
{rendered}
---

Return one clash entry per exchange."#
    )
}
