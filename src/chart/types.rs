// src/chart/types.rs

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::teams::Team;

/// Offense, defense or special teams. Declaration order is the sort order
/// used for position groups everywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Offense,
    Defense,
    Special,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Offense, Unit::Defense, Unit::Special];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Offense => "offense",
            Unit::Defense => "defense",
            Unit::Special => "special",
        }
    }

    /// Table order on an ESPN depth-chart page.
    pub fn from_table_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Unit::Offense),
            1 => Some(Unit::Defense),
            2 => Some(Unit::Special),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "offense" | "o" => Ok(Unit::Offense),
            "defense" | "d" => Ok(Unit::Defense),
            "special" | "special teams" | "st" => Ok(Unit::Special),
            other => Err(format!("unknown unit {:?}", other)),
        }
    }
}

/// One depth-chart entry. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub team: String,
    pub position_group: Unit,
    pub position: String,
    pub depth_slot: u32,
    pub player_name: String,
}

impl PlayerRecord {
    pub const HEADER: [&'static str; 5] =
        ["team", "position_group", "position", "depth_slot", "player_name"];

    pub fn new(
        team: impl Into<String>,
        position_group: Unit,
        position: impl Into<String>,
        depth_slot: u32,
        player_name: impl Into<String>,
    ) -> Self {
        Self {
            team: team.into(),
            position_group,
            position: position.into(),
            depth_slot,
            player_name: player_name.into(),
        }
    }
}

/// What a page says about a player beyond the depth chart: injury
/// designation, profile link and ESPN's player UID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PlayerDetails {
    pub injury_status: Option<String>,
    pub player_url: Option<String>,
    pub player_uid: Option<String>,
}

impl PlayerDetails {
    /// Fill fields still missing here from `other`.
    pub fn merge(&mut self, other: &PlayerDetails) {
        if self.injury_status.is_none() {
            self.injury_status = other.injury_status.clone();
        }
        if self.player_url.is_none() {
            self.player_url = other.player_url.clone();
        }
        if self.player_uid.is_none() {
            self.player_uid = other.player_uid.clone();
        }
    }
}

/// A depth-chart record together with the player details seen in its cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthEntry {
    pub record: PlayerRecord,
    pub details: PlayerDetails,
}

impl From<PlayerRecord> for DepthEntry {
    fn from(record: PlayerRecord) -> Self {
        Self {
            record,
            details: PlayerDetails::default(),
        }
    }
}

/// Everything parsed from one team's page, in page order.
#[derive(Debug, Clone)]
pub struct TeamDepthChart {
    pub team: Team,
    pub records: Vec<PlayerRecord>,
}

impl TeamDepthChart {
    pub fn new(team: Team, records: Vec<PlayerRecord>) -> Self {
        Self { team, records }
    }

    pub fn unit_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for r in &self.records {
            counts[r.position_group as usize] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_parses_loose_spellings() {
        assert_eq!("Offense".parse::<Unit>(), Ok(Unit::Offense));
        assert_eq!(" defense ".parse::<Unit>(), Ok(Unit::Defense));
        assert_eq!("special_teams".parse::<Unit>(), Ok(Unit::Special));
        assert_eq!("Special Teams".parse::<Unit>(), Ok(Unit::Special));
        assert!("kicking".parse::<Unit>().is_err());
    }

    #[test]
    fn unit_order_is_offense_defense_special() {
        let mut units = vec![Unit::Special, Unit::Offense, Unit::Defense];
        units.sort();
        assert_eq!(units, Unit::ALL.to_vec());
    }
}
