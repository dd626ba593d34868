use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-event aggregate for one team in one round, folded from the driver
/// rows of the same event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamEvent {
    pub team: String,
    pub points: i64,
    pub wins: i64,
    pub podiums: i64,
    pub fastest_laps: i64,
    pub color: Option<String>,
}

/// One team's cumulative line in the season standings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamStanding {
    pub team: String,
    pub color: Option<String>,
    pub race_points: i64,
    pub sprint_points: i64,
    pub total_points: i64,
    pub wins: i64,
    pub podiums: i64,
    pub fastest_laps: i64,
    pub position: i64,
}

/// Canonicalizes a provider color token to a `#`-prefixed form. The store
/// keeps the canonical token; anything fancier is presentation.
pub fn normalize_color(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with('#') {
        Some(raw.to_string())
    } else {
        Some(format!("#{raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_bare_tokens() {
        assert_eq!(normalize_color(Some("FF8000")), Some("#FF8000".to_string()));
    }

    #[test]
    fn keeps_prefixed_tokens() {
        assert_eq!(normalize_color(Some("#3671C6")), Some("#3671C6".to_string()));
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(normalize_color(None), None);
        assert_eq!(normalize_color(Some("  ")), None);
    }
}
