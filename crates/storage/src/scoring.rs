//! Points tables for the two scored session kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two scored sessions of a round. Threaded explicitly through the
/// pipeline and the event-record keys instead of a boolean flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Race,
    Sprint,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Race => "race",
            EventKind::Sprint => "sprint",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const RACE_POINTS: [i64; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];
const SPRINT_POINTS: [i64; 8] = [8, 7, 6, 5, 4, 3, 2, 1];

/// Points scored for a finishing position in the given session kind.
///
/// Unclassified (`None`) and out-of-the-points positions score zero; the
/// function is total over all inputs.
pub fn points(position: Option<i64>, kind: EventKind) -> i64 {
    let Some(position) = position else { return 0 };
    if position < 1 {
        return 0;
    }
    let table: &[i64] = match kind {
        EventKind::Race => &RACE_POINTS,
        EventKind::Sprint => &SPRINT_POINTS,
    };
    table.get(position as usize - 1).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn race_table_matches_regulations() {
        let expected = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];
        for (i, &pts) in expected.iter().enumerate() {
            assert_eq!(points(Some(i as i64 + 1), EventKind::Race), pts);
        }
        assert_eq!(points(Some(11), EventKind::Race), 0);
        assert_eq!(points(Some(20), EventKind::Race), 0);
    }

    #[test]
    fn sprint_table_matches_regulations() {
        let expected = [8, 7, 6, 5, 4, 3, 2, 1];
        for (i, &pts) in expected.iter().enumerate() {
            assert_eq!(points(Some(i as i64 + 1), EventKind::Sprint), pts);
        }
        assert_eq!(points(Some(9), EventKind::Sprint), 0);
    }

    #[test]
    fn unclassified_scores_zero() {
        assert_eq!(points(None, EventKind::Race), 0);
        assert_eq!(points(None, EventKind::Sprint), 0);
    }

    #[test]
    fn degenerate_positions_score_zero() {
        assert_eq!(points(Some(0), EventKind::Race), 0);
        assert_eq!(points(Some(-3), EventKind::Sprint), 0);
        assert_eq!(points(Some(i64::MAX), EventKind::Race), 0);
    }
}
