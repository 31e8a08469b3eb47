//! Turns what people type into the validated values the game core accepts.
//!
//! Points are read leniently: the leading number is used and anything that
//! isn't a number counts as 0. Only an explicit negative number is refused.

use regex::{Captures, Regex};
use types::{Game, LoserPoints, PlayerId, ValidationError, DEFAULT_TARGET_SCORE, MIN_TARGET_SCORE};

fn leading_number(input: &str) -> Option<Captures<'_>> {
    Regex::new(r"^\s*(?<sign>[+-]?)(?<digits>\d+)")
        .expect("Valid number regex")
        .captures(input)
}

fn digits_value(captures: &Captures<'_>) -> u32 {
    captures["digits"].parse().unwrap_or(u32::MAX)
}

pub fn parse_points(input: &str) -> Result<u32, ValidationError> {
    let Some(captures) = leading_number(input) else {
        return Ok(0);
    };
    let value = digits_value(&captures);
    if &captures["sign"] == "-" && value > 0 {
        return Err(ValidationError::NegativePoints(input.trim().to_string()));
    }
    Ok(value)
}

/// Unreadable or zero input falls back to the default target; anything below
/// the minimum is raised to it.
pub fn parse_target(input: &str) -> u32 {
    let target = match leading_number(input) {
        Some(captures) if &captures["sign"] == "-" => 0,
        Some(captures) => match digits_value(&captures) {
            0 => DEFAULT_TARGET_SCORE,
            value => value,
        },
        None => DEFAULT_TARGET_SCORE,
    };
    target.max(MIN_TARGET_SCORE)
}

/// Splits `NAME=POINTS` (or `NAME:POINTS`). A bare name means 0 points.
pub fn parse_loser_entry(input: &str) -> Result<(String, u32), ValidationError> {
    let entry_re = Regex::new(r"^\s*(?<player>[^=:]*?)\s*[=:]\s*(?<points>.*)$")
        .expect("Valid loser entry regex");
    match entry_re.captures(input) {
        Some(captures) => Ok((
            captures["player"].to_string(),
            parse_points(&captures["points"])?,
        )),
        None => Ok((input.trim().to_string(), 0)),
    }
}

/// Finds a player by id, or by name ignoring case.
pub fn resolve_player(game: &Game, reference: &str) -> Result<PlayerId, ValidationError> {
    let reference = reference.trim();
    game.players
        .iter()
        .find(|p| p.id.as_str() == reference)
        .or_else(|| game.player_by_name(reference))
        .map(|p| p.id.clone())
        .ok_or_else(|| ValidationError::UnknownPlayerName(reference.to_string()))
}

pub fn parse_losers_points<S: AsRef<str>>(
    game: &Game,
    entries: &[S],
) -> Result<Vec<LoserPoints>, ValidationError> {
    entries
        .iter()
        .map(|entry| -> Result<LoserPoints, ValidationError> {
            let (player, points) = parse_loser_entry(entry.as_ref())?;
            Ok(LoserPoints::new(resolve_player(game, &player)?, points))
        })
        .collect()
}
