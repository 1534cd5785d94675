//! Initial argument status resolution.
//!
//! Runs after linking and before clash evaluation. Clash refinement in
//! `service::clash` may move statuses further; transitions are one-way within
//! a run and statuses are never re-derived afterwards.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::model::argument::{Argument, ArgumentStatus, Position};

/// Assign each argument its pre-clash status.
///
/// Concession flag -> conceded. With responses -> contested. Without
/// responses: dropped when the opposing side was active strictly later (they
/// had the chance to respond and chose not to), extended otherwise.
pub fn resolve_initial_statuses(arguments: &mut [Argument], concessions: &HashSet<String>) {
    let latest_pro = latest_timestamp(arguments, Position::Pro);
    let latest_con = latest_timestamp(arguments, Position::Con);

    for argument in arguments.iter_mut() {
        if concessions.contains(&argument.id) {
            argument.status = ArgumentStatus::Conceded;
            continue;
        }

        if !argument.responses.is_empty() {
            argument.status = ArgumentStatus::Contested;
            continue;
        }

        let latest_opposite = match argument.position {
            Position::Pro => latest_con,
            Position::Con => latest_pro,
        };
        argument.status = match latest_opposite {
            Some(latest) if latest > argument.timestamp => ArgumentStatus::Dropped,
            _ => ArgumentStatus::Extended,
        };
    }
}

fn latest_timestamp(arguments: &[Argument], position: Position) -> Option<DateTime<Utc>> {
    arguments
        .iter()
        .filter(|a| a.position == position)
        .map(|a| a.timestamp)
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn argument(id: &str, position: Position, minute: u32) -> Argument {
        Argument {
            id: id.to_string(),
            source_comment_id: format!("c-{id}"),
            author: format!("author-{id}"),
            position,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
            claim: "A claim".to_string(),
            warrant: None,
            impact: None,
            responds_to: None,
            responses: Vec::new(),
            status: ArgumentStatus::Extended,
            evaluation: None,
        }
    }

    #[test]
    fn test_concession_flag_wins() {
        let mut arguments = vec![argument("a1", Position::Pro, 0)];
        arguments[0].responses.push("b1".to_string());
        let concessions = HashSet::from(["a1".to_string()]);
        resolve_initial_statuses(&mut arguments, &concessions);
        assert_eq!(arguments[0].status, ArgumentStatus::Conceded);
    }

    #[test]
    fn test_responded_argument_is_contested() {
        let mut arguments = vec![
            argument("a1", Position::Pro, 0),
            argument("b1", Position::Con, 5),
        ];
        arguments[0].responses.push("b1".to_string());
        arguments[1].responds_to = Some("a1".to_string());
        resolve_initial_statuses(&mut arguments, &HashSet::new());
        assert_eq!(arguments[0].status, ArgumentStatus::Contested);
    }

    // Last word in the thread: no opposing activity afterwards
    #[test]
    fn test_unanswered_after_opponent_stopped_is_extended() {
        let mut arguments = vec![
            argument("b1", Position::Con, 0),
            argument("a1", Position::Pro, 10),
        ];
        resolve_initial_statuses(&mut arguments, &HashSet::new());
        assert_eq!(arguments[1].status, ArgumentStatus::Extended);
    }

    // Opponent posted later elsewhere and never answered: dropped
    #[test]
    fn test_unanswered_with_later_opposition_is_dropped() {
        let mut arguments = vec![
            argument("a1", Position::Pro, 0),
            argument("b1", Position::Con, 10),
        ];
        resolve_initial_statuses(&mut arguments, &HashSet::new());
        assert_eq!(arguments[0].status, ArgumentStatus::Dropped);
        // The later con argument itself had no later pro activity
        assert_eq!(arguments[1].status, ArgumentStatus::Extended);
    }

    #[test]
    fn test_equal_timestamp_is_not_dropped() {
        let mut arguments = vec![
            argument("a1", Position::Pro, 0),
            argument("b1", Position::Con, 0),
        ];
        resolve_initial_statuses(&mut arguments, &HashSet::new());
        assert_eq!(arguments[0].status, ArgumentStatus::Extended);
        assert_eq!(arguments[1].status, ArgumentStatus::Extended);
    }

    #[test]
    fn test_no_opposition_at_all_is_extended() {
        let mut arguments = vec![argument("a1", Position::Pro, 0)];
        resolve_initial_statuses(&mut arguments, &HashSet::new());
        assert_eq!(arguments[0].status, ArgumentStatus::Extended);
    }
}
