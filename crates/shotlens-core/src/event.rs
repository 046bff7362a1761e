// Raw match events as delivered by the event data provider.

use serde::{Deserialize, Serialize};

/// Event type marking a player regaining possession.
pub const BALL_RECOVERY: &str = "Ball Recovery";
pub const SHOT: &str = "Shot";
pub const PASS: &str = "Pass";

/// Shot outcome names.
pub const GOAL: &str = "Goal";
pub const ON_TARGET: &str = "On Target";

/// Fixed length of one period in seconds (45 minutes). Stoppage time is not
/// modelled, so clocks in later periods are approximate.
pub const PERIOD_SECONDS: u32 = 45 * 60;

/// One in-match occurrence. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub match_id: u64,
    /// Half or extra-time segment, starting at 1.
    pub period: u32,
    pub minute: u32,
    pub second: u32,
    pub type_name: String,
    pub player_name: Option<String>,
    pub team_name: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub outcome_name: Option<String>,
    /// Expected-goals value, present on shots only.
    pub shot_xg: Option<f64>,
    /// Pass that led directly to a shot.
    #[serde(default)]
    pub pass_shot_assist: bool,
}

impl Event {
    pub fn is_shot(&self) -> bool {
        self.type_name == SHOT
    }

    pub fn is_pass(&self) -> bool {
        self.type_name == PASS
    }

    pub fn is_ball_recovery(&self) -> bool {
        self.type_name == BALL_RECOVERY
    }

    pub fn is_goal(&self) -> bool {
        self.outcome_name.as_deref() == Some(GOAL)
    }

    /// Outcome comparison is case-insensitive; exports disagree on "On target"
    /// vs "On Target".
    pub fn is_on_target(&self) -> bool {
        self.outcome_name
            .as_deref()
            .is_some_and(|o| o.eq_ignore_ascii_case(ON_TARGET))
    }

    pub fn is_by(&self, player: &str) -> bool {
        self.player_name.as_deref() == Some(player)
    }

    /// Seconds since kick-off, see [`event_time`].
    pub fn event_time(&self) -> u32 {
        event_time(self.period, self.minute, self.second)
    }

    /// Coordinates when the event carries a location.
    pub fn location(&self) -> Option<(f64, f64)> {
        Some((self.x?, self.y?))
    }
}

/// Seconds elapsed since match start: `(period - 1) * 2700 + minute * 60 + second`.
///
/// The provider's `minute` keeps counting across periods (a second-half event
/// reads 50:00, not 05:00), so later periods overshoot the real clock. That
/// offset is kept as-is for compatibility with published numbers.
pub fn event_time(period: u32, minute: u32, second: u32) -> u32 {
    period.saturating_sub(1) * PERIOD_SECONDS + minute * 60 + second
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(outcome: Option<&str>) -> Event {
        Event {
            id: "s1".into(),
            match_id: 1,
            period: 1,
            minute: 0,
            second: 0,
            type_name: SHOT.into(),
            player_name: Some("A".into()),
            team_name: "T".into(),
            x: Some(100.0),
            y: None,
            outcome_name: outcome.map(Into::into),
            shot_xg: None,
            pass_shot_assist: false,
        }
    }

    #[test]
    fn event_time_uses_fixed_half_length() {
        assert_eq!(event_time(1, 10, 0), 600);
        assert_eq!(event_time(1, 10, 30), 630);
        assert_eq!(event_time(2, 45, 0), 5400);
        assert_eq!(event_time(3, 90, 15), 2 * 2700 + 5415);
    }

    #[test]
    fn event_time_tolerates_zero_period() {
        assert_eq!(event_time(0, 1, 1), 61);
    }

    #[test]
    fn on_target_is_case_insensitive() {
        assert!(shot(Some("On Target")).is_on_target());
        assert!(shot(Some("On target")).is_on_target());
        assert!(!shot(Some("Goal")).is_on_target());
        assert!(!shot(None).is_on_target());
    }

    #[test]
    fn goal_and_location() {
        let e = shot(Some("Goal"));
        assert!(e.is_goal());
        assert!(e.is_shot());
        assert!(e.is_by("A"));
        assert!(!e.is_by("B"));
        // y missing
        assert_eq!(e.location(), None);
    }
}
