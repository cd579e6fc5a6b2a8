//! HUD counters written into the host page

use crate::sim::Snapshot;

/// DOM id of the score counter
pub const SCORE_ID: &str = "hud-score";
/// DOM id of the balls-remaining counter
pub const REMAINING_ID: &str = "hud-remaining";

/// Element id and text for every HUD counter
pub fn hud_entries(snapshot: &Snapshot) -> [(&'static str, String); 2] {
    [
        (SCORE_ID, snapshot.score.to_string()),
        (REMAINING_ID, snapshot.remaining().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Session;
    use crate::tuning::Tuning;

    #[test]
    fn test_entries_target_counter_ids() {
        let mut session = Session::racked(Tuning::default());
        session.score = 2;
        session.balls[1].potted = true;
        session.balls[2].potted = true;

        let entries = hud_entries(&session.snapshot());
        assert_eq!(entries[0], ("hud-score", "2".to_string()));
        assert_eq!(entries[1], ("hud-remaining", "5".to_string()));
    }
}
