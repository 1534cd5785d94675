//! Issue winner resolution.
//!
//! The deterministic core of the engine: pure arithmetic over clash results,
//! drops, extensions, and argument strength. No inference calls. Identical
//! issue input always yields identical winner, points, and reasoning.

use std::collections::{HashMap, HashSet};

use crate::model::argument::{Argument, ArgumentStatus, Position};
use crate::model::clash::{Clash, ClashType, ClashWinner};
use crate::model::config::ScoringConfig;
use crate::model::issue::{Issue, Outcome};

/// Points a side loses when one of its arguments is turned against it.
const TURN_PENALTY: f64 = 5.0;

/// Points credited for each argument a side carried unanswered.
const EXTENSION_CREDIT: f64 = 2.0;

/// Discount applied to a defender's successful hold relative to a winning
/// attack.
const DEFENDER_CREDIT_FACTOR: f64 = 0.5;

#[derive(Debug, Default, Clone, Copy)]
struct SideTotals {
    clash: f64,
    turn_penalty: f64,
    drop_penalty: f64,
    extension: f64,
    strength: f64,
}

impl SideTotals {
    fn points(&self) -> f64 {
        self.clash + self.extension + self.strength - self.turn_penalty - self.drop_penalty
    }
}

/// Resolve winner, points, clash membership, and reasoning for every issue.
///
/// A clash belongs to the issue holding its defender (the attacked claim
/// defines the contested ground). Clashes of type talking_past never score,
/// whatever the quality threshold; other clashes score when their quality
/// meets the configured threshold.
pub fn determine_issue_winners(
    issues: &mut [Issue],
    arguments: &[Argument],
    clashes: &[Clash],
    config: &ScoringConfig,
) {
    let arg_by_id: HashMap<&str, &Argument> =
        arguments.iter().map(|a| (a.id.as_str(), a)).collect();

    for issue in issues.iter_mut() {
        let members: HashSet<&str> = issue
            .pro_argument_ids
            .iter()
            .chain(issue.con_argument_ids.iter())
            .map(String::as_str)
            .collect();

        issue.clash_ids.clear();
        issue.pro_dropped.clear();
        issue.con_dropped.clear();

        let mut pro = SideTotals::default();
        let mut con = SideTotals::default();

        for clash in clashes {
            if !members.contains(clash.defender_id.as_str()) {
                continue;
            }
            issue.clash_ids.push(clash.id.clone());

            // talking_past credits nobody, regardless of threshold
            if clash.clash_type == ClashType::TalkingPast {
                continue;
            }
            if clash.quality < config.clash_quality_threshold {
                continue;
            }

            let attacker_position = match arg_by_id.get(clash.attacker_id.as_str()) {
                Some(attacker) => attacker.position,
                None => continue,
            };

            match clash.winner {
                ClashWinner::Attacker => {
                    side_mut(&mut pro, &mut con, attacker_position).clash += clash.quality;
                    if clash.clash_type == ClashType::Turn {
                        side_mut(&mut pro, &mut con, attacker_position.opposite()).turn_penalty +=
                            TURN_PENALTY;
                    }
                }
                ClashWinner::Defender => {
                    side_mut(&mut pro, &mut con, attacker_position.opposite()).clash +=
                        clash.quality * DEFENDER_CREDIT_FACTOR;
                }
                ClashWinner::Draw => {}
            }
        }

        let member_ids: Vec<String> = issue
            .pro_argument_ids
            .iter()
            .chain(issue.con_argument_ids.iter())
            .cloned()
            .collect();
        for member_id in &member_ids {
            let argument = match arg_by_id.get(member_id.as_str()) {
                Some(argument) => *argument,
                None => continue,
            };
            match argument.status {
                ArgumentStatus::Dropped => {
                    side_mut(&mut pro, &mut con, argument.position).drop_penalty +=
                        config.dropped_argument_penalty;
                    match argument.position {
                        Position::Pro => issue.pro_dropped.push(argument.id.clone()),
                        Position::Con => issue.con_dropped.push(argument.id.clone()),
                    }
                }
                ArgumentStatus::Extended => {
                    side_mut(&mut pro, &mut con, argument.position).extension += EXTENSION_CREDIT;
                }
                _ => {}
            }
        }
        issue.pro_dropped.sort();
        issue.con_dropped.sort();

        pro.strength = average_strength(&issue.pro_argument_ids, &arg_by_id);
        con.strength = average_strength(&issue.con_argument_ids, &arg_by_id);

        issue.pro_points = pro.points();
        issue.con_points = con.points();

        let margin = (issue.pro_points - issue.con_points).abs();
        issue.winner = if margin < config.draw_margin_threshold {
            Outcome::Draw
        } else if issue.pro_points > issue.con_points {
            Outcome::Pro
        } else {
            Outcome::Con
        };

        let reasoning = assemble_reasoning(&pro, &con, issue);
        issue.reasoning = reasoning;
    }
}

fn side_mut<'a>(
    pro: &'a mut SideTotals,
    con: &'a mut SideTotals,
    position: Position,
) -> &'a mut SideTotals {
    match position {
        Position::Pro => pro,
        Position::Con => con,
    }
}

/// Mean overall strength across a side's evaluated arguments; a side with no
/// evaluated arguments contributes nothing.
fn average_strength(ids: &[String], arg_by_id: &HashMap<&str, &Argument>) -> f64 {
    let strengths: Vec<f64> = ids
        .iter()
        .filter_map(|id| arg_by_id.get(id.as_str()))
        .filter_map(|a| a.strength())
        .collect();
    if strengths.is_empty() {
        0.0
    } else {
        strengths.iter().sum::<f64>() / strengths.len() as f64
    }
}

/// Two or three highest-magnitude contributing factors, rendered in a fixed
/// order for equal magnitudes.
fn assemble_reasoning(pro: &SideTotals, con: &SideTotals, issue: &Issue) -> String {
    let mut factors: Vec<(f64, String)> = Vec::new();

    for (side, totals, dropped) in [
        ("pro", pro, issue.pro_dropped.len()),
        ("con", con, issue.con_dropped.len()),
    ] {
        if totals.clash > 0.0 {
            factors.push((
                totals.clash,
                format!("{side} won the scored exchanges (+{:.1})", totals.clash),
            ));
        }
        if totals.turn_penalty > 0.0 {
            factors.push((
                totals.turn_penalty,
                format!("{side} had an argument turned (-{:.1})", totals.turn_penalty),
            ));
        }
        if totals.drop_penalty > 0.0 {
            factors.push((
                totals.drop_penalty,
                format!(
                    "{side} dropped {} argument{} (-{:.1})",
                    dropped,
                    if dropped == 1 { "" } else { "s" },
                    totals.drop_penalty
                ),
            ));
        }
        if totals.extension > 0.0 {
            factors.push((
                totals.extension,
                format!("{side} carried unanswered arguments (+{:.1})", totals.extension),
            ));
        }
        if totals.strength > 0.0 {
            factors.push((
                totals.strength,
                format!("{side} averaged {:.1} argument strength", totals.strength),
            ));
        }
    }

    factors.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });

    let leading: Vec<String> = factors.into_iter().take(3).map(|(_, text)| text).collect();
    if leading.is_empty() {
        "Neither side scored".to_string()
    } else {
        leading.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::model::argument::{ArgumentEvaluation, WarrantType};

    fn argument(id: &str, position: Position, status: ArgumentStatus) -> Argument {
        Argument {
            id: id.to_string(),
            source_comment_id: format!("c-{id}"),
            author: format!("author-{id}"),
            position,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            claim: "A claim".to_string(),
            warrant: None,
            impact: None,
            responds_to: None,
            responses: Vec::new(),
            status,
            evaluation: None,
        }
    }

    fn with_strength(mut argument: Argument, strength: f64) -> Argument {
        argument.evaluation = Some(ArgumentEvaluation {
            clarity: 5.0,
            relevance: 5.0,
            warrant_present: false,
            warrant_type: WarrantType::None,
            warrant_quality: None,
            impact_magnitude: 5.0,
            impact_probability: 5.0,
            impact_timeframe: 5.0,
            impact_reversibility: 5.0,
            internal_link_strength: 5.0,
            overall_strength: strength,
        });
        argument
    }

    fn clash(
        id: &str,
        attacker: &str,
        defender: &str,
        clash_type: ClashType,
        quality: f64,
        winner: ClashWinner,
    ) -> Clash {
        Clash {
            id: id.to_string(),
            attacker_id: attacker.to_string(),
            defender_id: defender.to_string(),
            clash_type,
            quality,
            winner,
            reasoning: String::new(),
        }
    }

    fn issue_over(arguments: &[Argument]) -> Issue {
        Issue {
            id: "issue-0".to_string(),
            topic: "Test".to_string(),
            description: String::new(),
            pro_argument_ids: arguments
                .iter()
                .filter(|a| a.position == Position::Pro)
                .map(|a| a.id.clone())
                .collect(),
            con_argument_ids: arguments
                .iter()
                .filter(|a| a.position == Position::Con)
                .map(|a| a.id.clone())
                .collect(),
            clash_ids: Vec::new(),
            pro_dropped: Vec::new(),
            con_dropped: Vec::new(),
            winner: Outcome::Draw,
            centrality: 5.0,
            pro_points: 0.0,
            con_points: 0.0,
            reasoning: String::new(),
        }
    }

    // One extended pro argument, one dropped con argument, zero clashes:
    // pro = +2, con = -5, margin 7 >= 5 -> pro wins
    #[test]
    fn test_extension_and_drop_arithmetic() {
        let arguments = vec![
            argument("a1", Position::Pro, ArgumentStatus::Extended),
            argument("b1", Position::Con, ArgumentStatus::Dropped),
        ];
        let mut issues = vec![issue_over(&arguments)];
        let config = ScoringConfig::default();

        determine_issue_winners(&mut issues, &arguments, &[], &config);

        assert_eq!(issues[0].pro_points, 2.0);
        assert_eq!(issues[0].con_points, -5.0);
        assert_eq!(issues[0].winner, Outcome::Pro);
        assert_eq!(issues[0].con_dropped, vec!["b1".to_string()]);
    }

    #[test]
    fn test_attacker_win_credits_full_quality() {
        let arguments = vec![
            argument("a1", Position::Pro, ArgumentStatus::Refuted),
            argument("b1", Position::Con, ArgumentStatus::Extended),
        ];
        let mut issues = vec![issue_over(&arguments)];
        let clashes = vec![clash(
            "clash-0",
            "b1",
            "a1",
            ClashType::Denial,
            6.0,
            ClashWinner::Attacker,
        )];

        determine_issue_winners(&mut issues, &arguments, &clashes, &ScoringConfig::default());
        // con: 6 (clash) + 2 (extension)
        assert_eq!(issues[0].con_points, 8.0);
        assert_eq!(issues[0].pro_points, 0.0);
        assert_eq!(issues[0].clash_ids, vec!["clash-0".to_string()]);
    }

    #[test]
    fn test_defender_win_credits_half_quality() {
        let arguments = vec![
            argument("a1", Position::Pro, ArgumentStatus::Extended),
            argument("b1", Position::Con, ArgumentStatus::Refuted),
        ];
        let mut issues = vec![issue_over(&arguments)];
        let clashes = vec![clash(
            "clash-0",
            "b1",
            "a1",
            ClashType::Denial,
            8.0,
            ClashWinner::Defender,
        )];

        determine_issue_winners(&mut issues, &arguments, &clashes, &ScoringConfig::default());
        // pro: 8*0.5 (held the attack) + 2 (extension)
        assert_eq!(issues[0].pro_points, 6.0);
    }

    #[test]
    fn test_turn_subtracts_from_defender_side() {
        let arguments = vec![
            argument("a1", Position::Pro, ArgumentStatus::Turned),
            argument("b1", Position::Con, ArgumentStatus::Extended),
        ];
        let mut issues = vec![issue_over(&arguments)];
        let clashes = vec![clash(
            "clash-0",
            "b1",
            "a1",
            ClashType::Turn,
            7.0,
            ClashWinner::Attacker,
        )];

        determine_issue_winners(&mut issues, &arguments, &clashes, &ScoringConfig::default());
        assert_eq!(issues[0].con_points, 9.0);
        assert_eq!(issues[0].pro_points, -5.0);
    }

    #[test]
    fn test_talking_past_never_scores() {
        let arguments = vec![
            argument("a1", Position::Pro, ArgumentStatus::Contested),
            argument("b1", Position::Con, ArgumentStatus::Contested),
        ];
        let mut issues = vec![issue_over(&arguments)];
        // Quality set above threshold on purpose; type alone must exclude it
        let clashes = vec![clash(
            "clash-0",
            "b1",
            "a1",
            ClashType::TalkingPast,
            9.0,
            ClashWinner::Attacker,
        )];

        determine_issue_winners(&mut issues, &arguments, &clashes, &ScoringConfig::default());
        assert_eq!(issues[0].pro_points, 0.0);
        assert_eq!(issues[0].con_points, 0.0);
        // Still recorded as belonging to the issue
        assert_eq!(issues[0].clash_ids, vec!["clash-0".to_string()]);
    }

    #[test]
    fn test_below_threshold_clash_excluded() {
        let arguments = vec![
            argument("a1", Position::Pro, ArgumentStatus::Contested),
            argument("b1", Position::Con, ArgumentStatus::Contested),
        ];
        let mut issues = vec![issue_over(&arguments)];
        let clashes = vec![clash(
            "clash-0",
            "b1",
            "a1",
            ClashType::Denial,
            2.0,
            ClashWinner::Attacker,
        )];

        determine_issue_winners(&mut issues, &arguments, &clashes, &ScoringConfig::default());
        assert_eq!(issues[0].con_points, 0.0);
    }

    #[test]
    fn test_average_strength_ignores_unevaluated() {
        let arguments = vec![
            with_strength(argument("a1", Position::Pro, ArgumentStatus::Contested), 8.0),
            argument("a2", Position::Pro, ArgumentStatus::Contested),
            with_strength(argument("b1", Position::Con, ArgumentStatus::Contested), 4.0),
        ];
        let mut issues = vec![issue_over(&arguments)];

        determine_issue_winners(&mut issues, &arguments, &[], &ScoringConfig::default());
        // pro average over the single evaluated argument, not both
        assert_eq!(issues[0].pro_points, 8.0);
        assert_eq!(issues[0].con_points, 4.0);
    }

    #[test]
    fn test_draw_iff_margin_below_threshold() {
        let arguments = vec![
            with_strength(argument("a1", Position::Pro, ArgumentStatus::Contested), 9.0),
            with_strength(argument("b1", Position::Con, ArgumentStatus::Contested), 5.0),
        ];
        let mut issues = vec![issue_over(&arguments)];
        let mut config = ScoringConfig::default();

        config.draw_margin_threshold = 5.0;
        determine_issue_winners(&mut issues, &arguments, &[], &config);
        assert_eq!(issues[0].winner, Outcome::Draw);

        // Margin equal to the threshold is not a draw
        config.draw_margin_threshold = 4.0;
        determine_issue_winners(&mut issues, &arguments, &[], &config);
        assert_eq!(issues[0].winner, Outcome::Pro);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let arguments = vec![
            with_strength(argument("a1", Position::Pro, ArgumentStatus::Extended), 6.0),
            with_strength(argument("b1", Position::Con, ArgumentStatus::Dropped), 4.0),
        ];
        let clashes = vec![clash(
            "clash-0",
            "b1",
            "a1",
            ClashType::Mitigation,
            5.0,
            ClashWinner::Defender,
        )];
        let config = ScoringConfig::default();

        let mut first = vec![issue_over(&arguments)];
        let mut second = vec![issue_over(&arguments)];
        determine_issue_winners(&mut first, &arguments, &clashes, &config);
        determine_issue_winners(&mut second, &arguments, &clashes, &config);

        assert_eq!(first[0].winner, second[0].winner);
        assert_eq!(first[0].pro_points, second[0].pro_points);
        assert_eq!(first[0].reasoning, second[0].reasoning);
    }
}
