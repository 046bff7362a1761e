// Event timeline normalization: stable chronological order, a single
// in-match clock, and per-player forward-filled ball recovery times.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::event::Event;

/// An event placed on the match clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    pub event: Event,
    /// Seconds since kick-off.
    pub event_time: u32,
    /// Clock time of this player's latest ball recovery at or before this
    /// event. `None` before the player's first recovery.
    pub last_recovery_time: Option<u32>,
}

/// Sort events in place by `(match_id, period, minute, second)`.
///
/// The sort is stable: events sharing a second keep their input order.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by_key(|e| (e.match_id, e.period, e.minute, e.second));
}

/// Sort the events, stamp each with its clock time and carry each player's
/// most recent recovery time forward.
///
/// Grouping is by `(match_id, player_name)`. Events without a player form a
/// group of their own.
pub fn normalize(mut events: Vec<Event>) -> Vec<TimedEvent> {
    sort_events(&mut events);

    let mut last_recovery: HashMap<(u64, Option<String>), u32> = HashMap::new();
    let mut timeline = Vec::with_capacity(events.len());

    for event in events {
        let event_time = event.event_time();
        let key = (event.match_id, event.player_name.clone());
        if event.is_ball_recovery() {
            last_recovery.insert(key.clone(), event_time);
        }
        let last_recovery_time = last_recovery.get(&key).copied();
        timeline.push(TimedEvent {
            event,
            event_time,
            last_recovery_time,
        });
    }

    debug!(
        "normalized {} events, {} player groups with a recovery",
        timeline.len(),
        last_recovery.len()
    );
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{BALL_RECOVERY, SHOT};

    fn ev(id: &str, player: Option<&str>, period: u32, minute: u32, second: u32, kind: &str) -> Event {
        Event {
            id: id.into(),
            match_id: 1,
            period,
            minute,
            second,
            type_name: kind.into(),
            player_name: player.map(Into::into),
            team_name: "T".into(),
            x: None,
            y: None,
            outcome_name: None,
            shot_xg: None,
            pass_shot_assist: false,
        }
    }

    fn ids(timeline: &[TimedEvent]) -> Vec<&str> {
        timeline.iter().map(|t| t.event.id.as_str()).collect()
    }

    #[test]
    fn recovery_then_shots_for_one_player() {
        let events = vec![
            ev("r", Some("A"), 1, 10, 0, BALL_RECOVERY),
            ev("s1", Some("A"), 1, 10, 30, SHOT),
            ev("s2", Some("A"), 1, 40, 0, SHOT),
        ];
        let timeline = normalize(events);
        let times: Vec<u32> = timeline.iter().map(|t| t.event_time).collect();
        assert_eq!(times, vec![600, 630, 2400]);
        assert_eq!(timeline[0].last_recovery_time, Some(600));
        assert_eq!(timeline[1].last_recovery_time, Some(600));
        assert_eq!(timeline[2].last_recovery_time, Some(600));
    }

    #[test]
    fn sorts_unordered_input() {
        let events = vec![
            ev("c", Some("A"), 2, 50, 0, SHOT),
            ev("a", Some("A"), 1, 5, 0, SHOT),
            ev("b", Some("A"), 1, 5, 1, SHOT),
        ];
        let timeline = normalize(events);
        assert_eq!(ids(&timeline), vec!["a", "b", "c"]);
    }

    #[test]
    fn sort_is_stable_within_a_second() {
        let mut events = vec![
            ev("x", Some("A"), 1, 3, 3, SHOT),
            ev("first", Some("B"), 1, 1, 0, SHOT),
            ev("y", Some("B"), 1, 3, 3, SHOT),
            ev("z", None, 1, 3, 3, SHOT),
        ];
        sort_events(&mut events);
        let order: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec!["first", "x", "y", "z"]);

        // idempotent
        let before = events.clone();
        sort_events(&mut events);
        assert_eq!(events, before);
    }

    #[test]
    fn no_recovery_before_first_one() {
        let events = vec![
            ev("s0", Some("A"), 1, 1, 0, SHOT),
            ev("r", Some("A"), 1, 2, 0, BALL_RECOVERY),
            ev("s1", Some("A"), 1, 3, 0, SHOT),
        ];
        let timeline = normalize(events);
        assert_eq!(timeline[0].last_recovery_time, None);
        assert_eq!(timeline[2].last_recovery_time, Some(120));
    }

    #[test]
    fn later_recovery_supersedes_earlier() {
        let events = vec![
            ev("r1", Some("A"), 1, 1, 0, BALL_RECOVERY),
            ev("s1", Some("A"), 1, 2, 0, SHOT),
            ev("r2", Some("A"), 2, 50, 0, BALL_RECOVERY),
            ev("s2", Some("A"), 2, 51, 0, SHOT),
        ];
        let timeline = normalize(events);
        assert_eq!(timeline[1].last_recovery_time, Some(60));
        assert_eq!(timeline[3].last_recovery_time, Some(2700 + 3000));
    }

    #[test]
    fn recoveries_do_not_leak_across_players() {
        let events = vec![
            ev("ra", Some("A"), 1, 1, 0, BALL_RECOVERY),
            ev("sb", Some("B"), 1, 2, 0, SHOT),
            ev("rb", Some("B"), 1, 3, 0, BALL_RECOVERY),
            ev("sa", Some("A"), 1, 4, 0, SHOT),
            ev("sb2", Some("B"), 1, 5, 0, SHOT),
        ];
        let timeline = normalize(events);
        let by_id = |id: &str| timeline.iter().find(|t| t.event.id == id).unwrap().last_recovery_time;
        assert_eq!(by_id("sb"), None);
        assert_eq!(by_id("sa"), Some(60));
        assert_eq!(by_id("sb2"), Some(180));
    }

    #[test]
    fn playerless_events_form_their_own_group() {
        let events = vec![
            ev("r", None, 1, 1, 0, BALL_RECOVERY),
            ev("s", Some("A"), 1, 2, 0, SHOT),
            ev("n", None, 1, 3, 0, SHOT),
        ];
        let timeline = normalize(events);
        assert_eq!(timeline[1].last_recovery_time, None);
        assert_eq!(timeline[2].last_recovery_time, Some(60));
    }

    #[test]
    fn groups_are_per_match() {
        let mut other = ev("r", Some("A"), 1, 1, 0, BALL_RECOVERY);
        other.match_id = 2;
        let events = vec![other, ev("s", Some("A"), 1, 2, 0, SHOT)];
        let timeline = normalize(events);
        let shot = timeline.iter().find(|t| t.event.id == "s").unwrap();
        assert_eq!(shot.last_recovery_time, None);
    }
}
