use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use types::{Game, LoserPoints, Player, Round, DEFAULT_TARGET_SCORE};

/// Stored form of a game. Field names and layout follow the JSON the scorekeeper
/// has always written, so older records still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: String,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
    #[serde(default)]
    pub target_score: Option<u32>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rounds: Vec<RoundRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub id: String,
    pub winner_id: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub points_gained: u64,
    #[serde(default)]
    pub losers_points: Vec<LoserPointsRecord>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoserPointsRecord {
    pub player_id: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub points: u32,
}

/// Older records hold whatever the points form produced: negative numbers,
/// `null` for unparseable input, occasionally a string. Anything that is not a
/// non-negative number reads as 0.
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|_| 0))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_u64(deserializer).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

impl GameRecord {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Target score with the stored default applied. A zero target never existed
    /// as a real setting and is read as the default too.
    pub fn effective_target_score(&self) -> u32 {
        self.target_score
            .filter(|&target| target > 0)
            .unwrap_or(DEFAULT_TARGET_SCORE)
    }

    pub fn effective_updated_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

impl From<&Game> for GameRecord {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id.to_string(),
            players: game
                .players
                .iter()
                .map(|p| PlayerRecord {
                    id: p.id.to_string(),
                    name: p.name.clone(),
                    score: p.score,
                })
                .collect(),
            target_score: Some(game.target_score),
            created_at: game.created_at,
            updated_at: Some(game.updated_at),
            rounds: game.rounds.iter().map(RoundRecord::from).collect(),
        }
    }
}

impl From<&Round> for RoundRecord {
    fn from(round: &Round) -> Self {
        Self {
            id: round.id.to_string(),
            winner_id: round.winner_id.to_string(),
            points_gained: round.points_gained,
            losers_points: round
                .losers_points
                .iter()
                .map(|lp| LoserPointsRecord {
                    player_id: lp.player_id.to_string(),
                    points: lp.points,
                })
                .collect(),
            timestamp: round.timestamp,
        }
    }
}

impl From<GameRecord> for Game {
    fn from(record: GameRecord) -> Self {
        let target_score = record.effective_target_score();
        let updated_at = record.effective_updated_at();
        Game {
            id: record.id.into(),
            players: record
                .players
                .into_iter()
                .map(|p| Player::new_with_id(p.id.into(), p.name, p.score))
                .collect(),
            target_score,
            created_at: record.created_at,
            updated_at,
            rounds: record.rounds.into_iter().map(Round::from).collect(),
        }
    }
}

impl From<RoundRecord> for Round {
    fn from(record: RoundRecord) -> Self {
        Round {
            id: record.id.into(),
            winner_id: record.winner_id.into(),
            points_gained: record.points_gained,
            losers_points: record
                .losers_points
                .into_iter()
                .map(|lp| LoserPoints::new(lp.player_id, lp.points))
                .collect(),
            timestamp: record.timestamp,
        }
    }
}
