//! Evidence records attached to bot replies
//!
//! The backend cites the rows it answered from. Each citation is tagged by
//! the table it came from, so the wire field `table` selects the variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of a cited row
///
/// Games are keyed by integer id; player box scores by a composite
/// `"<person>_<game>"` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// A row from `game_details`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvidence {
    pub id: RecordId,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub home_points: Option<u32>,
    #[serde(default)]
    pub away_points: Option<u32>,
    #[serde(default)]
    pub game_date: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    /// Arrival position within the owning message
    #[serde(skip)]
    ordinal: usize,
}

impl GameEvidence {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            home_team: String::new(),
            away_team: String::new(),
            home_points: None,
            away_points: None,
            game_date: None,
            display_name: None,
            pinned: false,
            ordinal: 0,
        }
    }

    fn label(&self) -> String {
        if self.home_team.is_empty() && self.away_team.is_empty() {
            return format!("Game {}", self.id);
        }
        let mut label = format!("{} @ {}", self.away_team, self.home_team);
        if let (Some(away), Some(home)) = (self.away_points, self.home_points) {
            label.push_str(&format!(" {}-{}", away, home));
        }
        if let Some(date) = &self.game_date {
            label.push_str(&format!(" ({})", date));
        }
        label
    }
}

/// A row from `player_box_scores`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEvidence {
    pub id: RecordId,
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub points: Option<u32>,
    #[serde(default)]
    pub rebounds: Option<u32>,
    #[serde(default)]
    pub assists: Option<u32>,
    #[serde(default)]
    pub game_id: Option<RecordId>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(skip)]
    ordinal: usize,
}

impl PlayerEvidence {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            player_name: String::new(),
            team: String::new(),
            points: None,
            rebounds: None,
            assists: None,
            game_id: None,
            display_name: None,
            pinned: false,
            ordinal: 0,
        }
    }

    fn label(&self) -> String {
        if self.player_name.is_empty() {
            return format!("Player {}", self.id);
        }
        let mut label = self.player_name.clone();
        if !self.team.is_empty() {
            label.push_str(&format!(" ({})", self.team));
        }
        let stats: Vec<String> = [
            self.points.map(|v| format!("{} pts", v)),
            self.rebounds.map(|v| format!("{} reb", v)),
            self.assists.map(|v| format!("{} ast", v)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !stats.is_empty() {
            label.push_str(&format!(": {}", stats.join(", ")));
        }
        label
    }
}

/// A citation attached to a bot reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table")]
pub enum Evidence {
    #[serde(rename = "game_details")]
    Game(GameEvidence),
    #[serde(rename = "player_box_scores")]
    Player(PlayerEvidence),
}

impl Evidence {
    /// Wire name of the source table
    pub fn table(&self) -> &'static str {
        match self {
            Evidence::Game(_) => "game_details",
            Evidence::Player(_) => "player_box_scores",
        }
    }

    pub fn id(&self) -> &RecordId {
        match self {
            Evidence::Game(g) => &g.id,
            Evidence::Player(p) => &p.id,
        }
    }

    /// Server-provided name, or a label built from the record fields
    pub fn display_name(&self) -> String {
        let explicit = match self {
            Evidence::Game(g) => g.display_name.as_deref(),
            Evidence::Player(p) => p.display_name.as_deref(),
        };
        match explicit {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => match self {
                Evidence::Game(g) => g.label(),
                Evidence::Player(p) => p.label(),
            },
        }
    }

    pub fn is_pinned(&self) -> bool {
        match self {
            Evidence::Game(g) => g.pinned,
            Evidence::Player(p) => p.pinned,
        }
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        match self {
            Evidence::Game(g) => g.pinned = pinned,
            Evidence::Player(p) => p.pinned = pinned,
        }
    }

    pub(crate) fn ordinal(&self) -> usize {
        match self {
            Evidence::Game(g) => g.ordinal,
            Evidence::Player(p) => p.ordinal,
        }
    }

    pub(crate) fn set_ordinal(&mut self, ordinal: usize) {
        match self {
            Evidence::Game(g) => g.ordinal = ordinal,
            Evidence::Player(p) => p.ordinal = ordinal,
        }
    }
}

impl From<GameEvidence> for Evidence {
    fn from(g: GameEvidence) -> Self {
        Evidence::Game(g)
    }
}

impl From<PlayerEvidence> for Evidence {
    fn from(p: PlayerEvidence) -> Self {
        Evidence::Player(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_sparse_game_row() {
        let evidence: Evidence =
            serde_json::from_value(json!({"table": "game_details", "id": 22300061})).unwrap();

        assert_eq!(evidence.table(), "game_details");
        assert_eq!(evidence.id(), &RecordId::Number(22300061));
        assert!(!evidence.is_pinned());
        assert_eq!(evidence.display_name(), "Game 22300061");
    }

    #[test]
    fn test_decode_player_row_with_composite_id() {
        let evidence: Evidence = serde_json::from_value(json!({
            "table": "player_box_scores",
            "id": "2544_22300061",
            "player_name": "LeBron James",
            "team": "Lakers",
            "points": 31,
            "assists": 8,
            "game_id": 22300061
        }))
        .unwrap();

        match &evidence {
            Evidence::Player(p) => {
                assert_eq!(p.id, RecordId::from("2544_22300061"));
                assert_eq!(p.rebounds, None);
                assert_eq!(p.game_id, Some(RecordId::Number(22300061)));
            }
            other => panic!("expected player evidence, got {:?}", other),
        }
        assert_eq!(evidence.display_name(), "LeBron James (Lakers): 31 pts, 8 ast");
    }

    #[test]
    fn test_unknown_table_is_rejected() {
        let result = serde_json::from_value::<Evidence>(json!({"table": "teams", "id": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn test_server_display_name_wins() {
        let mut game = GameEvidence::new(7);
        game.home_team = "Lakers".to_string();
        game.away_team = "Celtics".to_string();
        game.display_name = Some("Finals Game 7".to_string());
        assert_eq!(Evidence::from(game).display_name(), "Finals Game 7");
    }

    #[test]
    fn test_game_label_includes_score_and_date() {
        let mut game = GameEvidence::new(7);
        game.home_team = "Lakers".to_string();
        game.away_team = "Celtics".to_string();
        game.home_points = Some(112);
        game.away_points = Some(104);
        game.game_date = Some("2024-02-01".to_string());
        assert_eq!(
            Evidence::from(game).display_name(),
            "Celtics @ Lakers 104-112 (2024-02-01)"
        );
    }

    #[test]
    fn test_pinned_accessor_is_shared_across_variants() {
        let mut items = vec![
            Evidence::from(GameEvidence::new(1)),
            Evidence::from(PlayerEvidence::new("3_1")),
        ];
        for item in &mut items {
            item.set_pinned(true);
        }
        assert!(items.iter().all(Evidence::is_pinned));
    }
}
