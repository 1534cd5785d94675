//! Verdict calculation.
//!
//! Pure arithmetic over issue outcomes, surviving impacts, drops, burden, and
//! speaker points. The winner comes from the composite point formula; display
//! scores are a separate presentation-only conversion.

use crate::model::argument::{Argument, ArgumentStatus, Position};
use crate::model::config::ScoringConfig;
use crate::model::issue::{Issue, Outcome};
use crate::model::speaker::{BurdenAnalysis, SpeakerEvaluation};
use crate::model::verdict::{DisplayScores, Verdict};

/// Points per issue won, regardless of issue weight.
const ISSUE_WIN_POINTS: f64 = 20.0;

/// Multiplier on each side's surviving impact total.
const IMPACT_POINTS: f64 = 5.0;

/// Bonus for meeting your burden when the opponent missed theirs.
const BURDEN_MET_BONUS: f64 = 15.0;

/// Bonus for holding presumption when neither side met its burden.
const PRESUMPTION_BONUS: f64 = 10.0;

const MAX_CONFIDENCE: f64 = 95.0;

/// Display-score blend: issues 60%, impact 20%, speakers 20%.
const DISPLAY_ISSUE_SHARE: f64 = 0.6;
const DISPLAY_IMPACT_SHARE: f64 = 0.2;
const DISPLAY_SPEAKER_SHARE: f64 = 0.2;

/// Voting issues reported, at most.
const MAX_VOTING_ISSUES: usize = 5;

/// Compute the final verdict from resolved pipeline state.
pub fn calculate_verdict(
    issues: &[Issue],
    arguments: &[Argument],
    speakers: &[SpeakerEvaluation],
    burden: &BurdenAnalysis,
    config: &ScoringConfig,
) -> Verdict {
    let issues_won_by_pro = issues.iter().filter(|i| i.winner == Outcome::Pro).count();
    let issues_won_by_con = issues.iter().filter(|i| i.winner == Outcome::Con).count();
    let issues_drawn = issues.len() - issues_won_by_pro - issues_won_by_con;

    let pro_impact_total = surviving_impact_total(arguments, Position::Pro);
    let con_impact_total = surviving_impact_total(arguments, Position::Con);

    let dropped_by_pro = dropped_count(arguments, Position::Pro);
    let dropped_by_con = dropped_count(arguments, Position::Con);

    let pro_points = ISSUE_WIN_POINTS * issues_won_by_pro as f64
        + IMPACT_POINTS * pro_impact_total
        - config.dropped_argument_penalty * dropped_by_pro as f64
        + burden_bonus(burden, Position::Pro);
    let con_points = ISSUE_WIN_POINTS * issues_won_by_con as f64
        + IMPACT_POINTS * con_impact_total
        - config.dropped_argument_penalty * dropped_by_con as f64
        + burden_bonus(burden, Position::Con);

    let difference = (pro_points - con_points).abs();
    let winner = if difference < config.draw_margin_threshold {
        Outcome::Draw
    } else if pro_points > con_points {
        Outcome::Pro
    } else {
        Outcome::Con
    };

    let confidence = match winner {
        Outcome::Draw => (50.0 - difference).max(0.0),
        _ => {
            let total = pro_points + con_points;
            if total > 0.0 {
                (50.0 + difference / total * 100.0).min(MAX_CONFIDENCE)
            } else {
                50.0
            }
        }
    };

    let display = display_scores(
        issues,
        arguments,
        speakers,
        pro_impact_total,
        con_impact_total,
        config,
    );

    let voting_issues = voting_issues(issues, winner);
    let summary = assemble_summary(winner, issues_won_by_pro, issues_won_by_con, issues, &voting_issues);
    let judge_notes = assemble_judge_notes(issues, &voting_issues, speakers, burden);

    Verdict {
        winner,
        confidence,
        issues_won_by_pro,
        issues_won_by_con,
        issues_drawn,
        pro_impact_total,
        con_impact_total,
        pro_points,
        con_points,
        display,
        voting_issues,
        summary,
        judge_notes,
    }
}

/// Impacts still standing at the end of the round: magnitude summed over a
/// side's arguments that were not refuted, turned, or conceded.
fn surviving_impact_total(arguments: &[Argument], position: Position) -> f64 {
    arguments
        .iter()
        .filter(|a| a.position == position)
        .filter(|a| {
            !matches!(
                a.status,
                ArgumentStatus::Refuted | ArgumentStatus::Turned | ArgumentStatus::Conceded
            )
        })
        .filter_map(|a| a.evaluation.as_ref())
        .map(|e| e.impact_magnitude)
        .sum()
}

fn dropped_count(arguments: &[Argument], position: Position) -> usize {
    arguments
        .iter()
        .filter(|a| a.position == position && a.status == ArgumentStatus::Dropped)
        .count()
}

fn burden_bonus(burden: &BurdenAnalysis, position: Position) -> f64 {
    let (own_met, other_met) = match position {
        Position::Pro => (burden.pro_met_burden, burden.con_met_burden),
        Position::Con => (burden.con_met_burden, burden.pro_met_burden),
    };
    if own_met && !other_met {
        BURDEN_MET_BONUS
    } else if !own_met && !other_met && burden.presumption == Some(position) {
        PRESUMPTION_BONUS
    } else {
        0.0
    }
}

/// Presentation scores: 60% weighted issue wins, 20% impact share, 20%
/// average speaker points, each as a pro-share ratio (0.5 when a component
/// has no signal). Independent of the win/loss decision.
fn display_scores(
    issues: &[Issue],
    arguments: &[Argument],
    speakers: &[SpeakerEvaluation],
    pro_impact_total: f64,
    con_impact_total: f64,
    config: &ScoringConfig,
) -> DisplayScores {
    let max_count = issues.iter().map(Issue::argument_count).max().unwrap_or(0);

    let mut pro_issue_score = 0.0;
    let mut con_issue_score = 0.0;
    for issue in issues {
        let importance = issue_importance(issue, arguments, max_count, config);
        match issue.winner {
            Outcome::Pro => pro_issue_score += importance,
            Outcome::Con => con_issue_score += importance,
            Outcome::Draw => {}
        }
    }

    let issue_ratio = pro_share(pro_issue_score, con_issue_score);
    let impact_ratio = pro_share(pro_impact_total, con_impact_total);

    let pro_speaker_avg = average_speaker_points(speakers, Position::Pro);
    let con_speaker_avg = average_speaker_points(speakers, Position::Con);
    let speaker_ratio = pro_share(pro_speaker_avg, con_speaker_avg);

    let pro = 100.0
        * (DISPLAY_ISSUE_SHARE * issue_ratio
            + DISPLAY_IMPACT_SHARE * impact_ratio
            + DISPLAY_SPEAKER_SHARE * speaker_ratio);
    let con = 100.0
        * (DISPLAY_ISSUE_SHARE * (1.0 - issue_ratio)
            + DISPLAY_IMPACT_SHARE * (1.0 - impact_ratio)
            + DISPLAY_SPEAKER_SHARE * (1.0 - speaker_ratio));

    DisplayScores {
        pro: pro.clamp(0.0, 100.0),
        con: con.clamp(0.0, 100.0),
        margin: (pro - con).abs(),
    }
}

/// Composite importance used only for display weighting: argument count,
/// average surviving impact, and the grouped centrality weight, blended by
/// the configured issue weights.
fn issue_importance(
    issue: &Issue,
    arguments: &[Argument],
    max_count: usize,
    config: &ScoringConfig,
) -> f64 {
    let count_share = if max_count == 0 {
        0.0
    } else {
        issue.argument_count() as f64 / max_count as f64
    };

    let impacts: Vec<f64> = issue
        .pro_argument_ids
        .iter()
        .chain(issue.con_argument_ids.iter())
        .filter_map(|id| arguments.iter().find(|a| &a.id == id))
        .filter_map(|a| a.evaluation.as_ref())
        .map(|e| e.impact_magnitude)
        .collect();
    let impact_avg = if impacts.is_empty() {
        0.0
    } else {
        impacts.iter().sum::<f64>() / impacts.len() as f64
    };

    config.issue_weights.argument_count * count_share
        + config.issue_weights.impact_magnitude * impact_avg / 10.0
        + config.issue_weights.centrality_to_question * issue.centrality / 10.0
}

/// Pro's share of a two-sided quantity; 0.5 when there is no signal.
fn pro_share(pro: f64, con: f64) -> f64 {
    let total = pro + con;
    if total <= 0.0 {
        0.5
    } else {
        pro / total
    }
}

fn average_speaker_points(speakers: &[SpeakerEvaluation], position: Position) -> f64 {
    let points: Vec<f64> = speakers
        .iter()
        .filter(|s| s.position == position)
        .map(|s| s.speaker_points)
        .collect();
    if points.is_empty() {
        0.0
    } else {
        points.iter().sum::<f64>() / points.len() as f64
    }
}

/// Issues that decided the outcome: those matching the overall winner, by
/// centrality descending (ties by id), capped. Empty on a draw.
fn voting_issues(issues: &[Issue], winner: Outcome) -> Vec<String> {
    if winner == Outcome::Draw {
        return Vec::new();
    }
    let mut matching: Vec<&Issue> = issues.iter().filter(|i| i.winner == winner).collect();
    matching.sort_by(|a, b| {
        b.centrality
            .partial_cmp(&a.centrality)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    matching
        .into_iter()
        .take(MAX_VOTING_ISSUES)
        .map(|i| i.id.clone())
        .collect()
}

fn assemble_summary(
    winner: Outcome,
    issues_won_by_pro: usize,
    issues_won_by_con: usize,
    issues: &[Issue],
    voting_issues: &[String],
) -> String {
    match winner {
        Outcome::Draw => format!(
            "The debate resolves to a draw, with issues split {issues_won_by_pro}-{issues_won_by_con}."
        ),
        _ => {
            let side = if winner == Outcome::Pro { "Pro" } else { "Con" };
            let decisive = voting_issues
                .first()
                .and_then(|id| issues.iter().find(|i| &i.id == id))
                .map(|i| format!(" The decisive issue was \"{}\".", i.topic))
                .unwrap_or_default();
            format!(
                "{side} wins the debate, taking the issues {issues_won_by_pro}-{issues_won_by_con}.{decisive}"
            )
        }
    }
}

fn assemble_judge_notes(
    issues: &[Issue],
    voting_issues: &[String],
    speakers: &[SpeakerEvaluation],
    burden: &BurdenAnalysis,
) -> Vec<String> {
    let mut notes = Vec::new();

    for issue_id in voting_issues {
        if let Some(issue) = issues.iter().find(|i| &i.id == issue_id) {
            notes.push(format!("{}: {}", issue.topic, issue.reasoning));
        }
    }

    if !burden.reasoning.is_empty() {
        notes.push(format!("Burden: {}", burden.reasoning));
    }

    let top_speaker = speakers.iter().max_by(|a, b| {
        a.speaker_points
            .partial_cmp(&b.speaker_points)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.author.cmp(&a.author))
    });
    if let Some(speaker) = top_speaker {
        notes.push(format!(
            "Top speaker: {} ({:.1} points)",
            speaker.author, speaker.speaker_points
        ));
    }

    notes
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

    fn with_impact(mut argument: Argument, magnitude: f64) -> Argument {
        argument.evaluation = Some(ArgumentEvaluation {
            clarity: 5.0,
            relevance: 5.0,
            warrant_present: false,
            warrant_type: WarrantType::None,
            warrant_quality: None,
            impact_magnitude: magnitude,
            impact_probability: 5.0,
            impact_timeframe: 5.0,
            impact_reversibility: 5.0,
            internal_link_strength: 5.0,
            overall_strength: 5.0,
        });
        argument
    }

    fn issue(id: &str, winner: Outcome, centrality: f64) -> Issue {
        Issue {
            id: id.to_string(),
            topic: format!("Topic {id}"),
            description: String::new(),
            pro_argument_ids: Vec::new(),
            con_argument_ids: Vec::new(),
            clash_ids: Vec::new(),
            pro_dropped: Vec::new(),
            con_dropped: Vec::new(),
            winner,
            centrality,
            pro_points: 0.0,
            con_points: 0.0,
            reasoning: "reasoning".to_string(),
        }
    }

    fn no_burden() -> BurdenAnalysis {
        BurdenAnalysis::undetermined("q")
    }

    #[test]
    fn test_point_formula_with_issue_win_and_drop() {
        let issues = vec![issue("issue-0", Outcome::Pro, 8.0)];
        let arguments = vec![
            with_impact(argument("a1", Position::Pro, ArgumentStatus::Extended), 4.0),
            argument("b1", Position::Con, ArgumentStatus::Dropped),
        ];
        let verdict = calculate_verdict(
            &issues,
            &arguments,
            &[],
            &no_burden(),
            &ScoringConfig::default(),
        );

        // pro: 20*1 + 5*4.0; con: -5*1
        assert_eq!(verdict.pro_points, 40.0);
        assert_eq!(verdict.con_points, -5.0);
        assert_eq!(verdict.winner, Outcome::Pro);
        assert_eq!(verdict.voting_issues, vec!["issue-0".to_string()]);
    }

    #[test]
    fn test_refuted_impacts_do_not_survive() {
        let arguments = vec![
            with_impact(argument("a1", Position::Pro, ArgumentStatus::Refuted), 9.0),
            with_impact(argument("a2", Position::Pro, ArgumentStatus::Contested), 3.0),
        ];
        assert_eq!(surviving_impact_total(&arguments, Position::Pro), 3.0);
    }

    #[test]
    fn test_burden_bonus_cases() {
        let mut burden = no_burden();
        burden.pro_met_burden = true;
        assert_eq!(burden_bonus(&burden, Position::Pro), 15.0);
        assert_eq!(burden_bonus(&burden, Position::Con), 0.0);

        let mut neither = no_burden();
        neither.presumption = Some(Position::Con);
        assert_eq!(burden_bonus(&neither, Position::Con), 10.0);
        assert_eq!(burden_bonus(&neither, Position::Pro), 0.0);

        let mut both = no_burden();
        both.pro_met_burden = true;
        both.con_met_burden = true;
        assert_eq!(burden_bonus(&both, Position::Pro), 0.0);
    }

    #[test]
    fn test_empty_input_is_a_calm_draw() {
        let verdict = calculate_verdict(&[], &[], &[], &no_burden(), &ScoringConfig::default());
        assert_eq!(verdict.winner, Outcome::Draw);
        assert_eq!(verdict.confidence, 50.0);
        assert!(verdict.voting_issues.is_empty());
        assert_eq!(verdict.display.pro, 50.0);
        assert_eq!(verdict.display.con, 50.0);
    }

    #[test]
    fn test_confidence_stays_within_bounds() {
        let issues: Vec<Issue> = (0..8)
            .map(|i| issue(&format!("issue-{i}"), Outcome::Pro, 5.0))
            .collect();
        let verdict = calculate_verdict(&issues, &[], &[], &no_burden(), &ScoringConfig::default());
        assert!(verdict.confidence <= 95.0);
        assert!(verdict.confidence >= 0.0);
        // One-sided sweep maxes out
        assert_eq!(verdict.confidence, 95.0);
    }

    #[test]
    fn test_voting_issues_ranked_by_centrality_and_capped() {
        let issues: Vec<Issue> = (0..7)
            .map(|i| issue(&format!("issue-{i}"), Outcome::Con, i as f64))
            .collect();
        let arguments = vec![];
        let verdict = calculate_verdict(
            &issues,
            &arguments,
            &[],
            &no_burden(),
            &ScoringConfig::default(),
        );
        assert_eq!(verdict.winner, Outcome::Con);
        assert_eq!(verdict.voting_issues.len(), 5);
        assert_eq!(verdict.voting_issues[0], "issue-6");
        assert_eq!(verdict.voting_issues[4], "issue-2");
    }

    #[test]
    fn test_draw_has_no_voting_issues() {
        let issues = vec![issue("issue-0", Outcome::Pro, 5.0), issue("issue-1", Outcome::Con, 5.0)];
        let verdict = calculate_verdict(&issues, &[], &[], &no_burden(), &ScoringConfig::default());
        assert_eq!(verdict.winner, Outcome::Draw);
        assert!(verdict.voting_issues.is_empty());
        assert!(verdict.summary.contains("draw"));
    }
}
