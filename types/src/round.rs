use chrono::{DateTime, Utc};

use crate::{clock, PlayerId, RoundId};

/// Points a losing player still held when the round ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoserPoints {
    pub player_id: PlayerId,
    pub points: u32,
}

impl LoserPoints {
    pub fn new(player_id: impl Into<PlayerId>, points: u32) -> Self {
        Self {
            player_id: player_id.into(),
            points,
        }
    }
}

/// One scoring event. The winner gains the sum of the points the other players
/// had left, nobody loses anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    pub id: RoundId,
    pub winner_id: PlayerId,
    pub points_gained: u64,
    pub losers_points: Vec<LoserPoints>,
    pub timestamp: DateTime<Utc>,
}

impl Round {
    pub fn new(winner_id: PlayerId, losers_points: Vec<LoserPoints>) -> Self {
        Self {
            id: RoundId::generate(),
            winner_id,
            points_gained: total_points(&losers_points),
            losers_points,
            timestamp: clock::now(),
        }
    }
}

pub fn total_points(losers_points: &[LoserPoints]) -> u64 {
    losers_points.iter().map(|lp| u64::from(lp.points)).sum()
}
