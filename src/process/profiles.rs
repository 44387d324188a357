// src/process/profiles.rs
//
// One row per player: every depth-chart entry a player holds on a team,
// folded into primary, secondary and tertiary roles.

use csv::WriterBuilder;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

use super::csv_io::{read_details, read_records, replace_file};
use super::unit::team_csv_files;
use crate::chart::{normalize_position, special_teams_rank, DepthEntry, PlayerDetails, Unit};
use crate::config::{Config, TEAM_FILE_SUFFIX};
use crate::error::{DepthChartError, Result};

/// A single role a player holds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Role {
    pub unit: Unit,
    pub position: String,
    pub depth_slot: u32,
}

impl Role {
    fn sort_key(&self) -> (Unit, usize, &str, u32) {
        let special = match self.unit {
            Unit::Special => special_teams_rank(&self.position),
            _ => 0,
        };
        (self.unit, special, self.position.as_str(), self.depth_slot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub team: String,
    pub player_name: String,
    /// Ordered by unit (offense first), then special-teams rank, position
    /// and depth.
    pub roles: Vec<Role>,
    /// First status, link and UID seen for the player.
    pub details: PlayerDetails,
}

impl PlayerProfile {
    pub fn primary(&self) -> Option<&Role> {
        self.roles.first()
    }
}

const PROFILE_HEADER: [&str; 11] = [
    "team",
    "player_name",
    "primary_position",
    "primary_depth",
    "secondary_position",
    "secondary_depth",
    "tertiary_position",
    "tertiary_depth",
    "player_uid",
    "player_url",
    "injury_status",
];

#[derive(Debug, Serialize)]
struct ProfileRow<'a> {
    team: &'a str,
    player_name: &'a str,
    primary_position: Option<&'a str>,
    primary_depth: Option<u32>,
    secondary_position: Option<&'a str>,
    secondary_depth: Option<u32>,
    tertiary_position: Option<&'a str>,
    tertiary_depth: Option<u32>,
    player_uid: Option<&'a str>,
    player_url: Option<&'a str>,
    injury_status: Option<&'a str>,
}

impl<'a> From<&'a PlayerProfile> for ProfileRow<'a> {
    fn from(p: &'a PlayerProfile) -> Self {
        let pos = |i: usize| p.roles.get(i).map(|r| r.position.as_str());
        let depth = |i: usize| p.roles.get(i).map(|r| r.depth_slot);
        Self {
            team: &p.team,
            player_name: &p.player_name,
            primary_position: pos(0),
            primary_depth: depth(0),
            secondary_position: pos(1),
            secondary_depth: depth(1),
            tertiary_position: pos(2),
            tertiary_depth: depth(2),
            player_uid: p.details.player_uid.as_deref(),
            player_url: p.details.player_url.as_deref(),
            injury_status: p.details.injury_status.as_deref(),
        }
    }
}

/// (player name, team, UID). Two players sharing a name on one team stay
/// apart when the page gave them different UIDs.
type PlayerKey = (String, String, Option<String>);

#[derive(Default)]
struct Folded {
    roles: Vec<Role>,
    details: PlayerDetails,
}

/// Group entries by player and order each player's roles. Profiles come
/// back sorted by player name.
pub fn build_profiles<I>(entries: I) -> Vec<PlayerProfile>
where
    I: IntoIterator,
    I::Item: Into<DepthEntry>,
{
    let mut by_player: BTreeMap<PlayerKey, Folded> = BTreeMap::new();
    for DepthEntry { record: r, details } in entries.into_iter().map(Into::into) {
        let name = r.player_name.trim().to_string();
        if name.is_empty() {
            continue;
        }
        let key = (name, r.team.trim().to_string(), details.player_uid.clone());
        let folded = by_player.entry(key).or_default();
        folded.roles.push(Role {
            unit: r.position_group,
            position: normalize_position(&r.position).label,
            depth_slot: r.depth_slot,
        });
        folded.details.merge(&details);
    }

    // entries without a UID join the one same-named player that has one
    let orphans: Vec<PlayerKey> = by_player.keys().filter(|k| k.2.is_none()).cloned().collect();
    for key in orphans {
        let owner = {
            let mut owners = by_player
                .keys()
                .filter(|k| k.0 == key.0 && k.1 == key.1 && k.2.is_some());
            match (owners.next(), owners.next()) {
                (Some(owner), None) => Some(owner.clone()),
                _ => None,
            }
        };
        let Some(owner) = owner else {
            continue;
        };
        if let Some(orphan) = by_player.remove(&key) {
            let target = by_player.entry(owner).or_default();
            target.roles.extend(orphan.roles);
            target.details.merge(&orphan.details);
        }
    }

    by_player
        .into_iter()
        .map(|((player_name, team, _), mut folded)| {
            folded.roles.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
            folded.roles.dedup();
            PlayerProfile {
                team,
                player_name,
                roles: folded.roles,
                details: folded.details,
            }
        })
        .collect()
}

pub fn write_profiles(path: &Path, profiles: &[PlayerProfile]) -> Result<()> {
    replace_file(path, |out, tmp_path| {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);
        let csv_err = |e| DepthChartError::csv(tmp_path, e);
        wtr.write_record(PROFILE_HEADER).map_err(csv_err)?;
        for p in profiles {
            wtr.serialize(ProfileRow::from(p)).map_err(csv_err)?;
        }
        wtr.flush().map_err(|e| DepthChartError::io(tmp_path, e))
    })
}

fn slug_of(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()?.strip_suffix(TEAM_FILE_SUFFIX)
}

/// A team's entries: the details file when the scrape left one, the plain
/// team file otherwise.
fn team_entries(config: &Config, team_file: &Path, slug: &str) -> Result<Vec<DepthEntry>> {
    let details = config.details_path(slug);
    if details.is_file() {
        return read_details(&details);
    }
    Ok(read_records(team_file)?
        .into_iter()
        .map(DepthEntry::from)
        .collect())
}

/// Write `<slug>_player_profiles.csv` for every per-team CSV.
#[instrument(level = "info", skip(config))]
pub fn build_team_profiles(config: &Config) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for input in team_csv_files(config)? {
        let Some(slug) = slug_of(&input) else {
            continue;
        };
        let profiles = build_profiles(team_entries(config, &input, slug)?);
        let out = config.profiles_path(slug);
        if config.dry_run {
            info!(path = %out.display(), players = profiles.len(), "dry run: would write profiles");
        } else {
            write_profiles(&out, &profiles)?;
            debug!(path = %out.display(), players = profiles.len(), "wrote profiles");
        }
        written.push(out);
    }
    info!(files = written.len(), "player profiles done");
    Ok(written)
}
