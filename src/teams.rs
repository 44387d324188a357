// src/teams.rs

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DepthChartError, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.espn.com/nfl/team/depth/_/name/";

/// One club as ESPN addresses it: display name, URL abbreviation and slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub abbrev: String,
    pub slug: String,
}

impl Team {
    pub fn new(name: &str, abbrev: &str, slug: &str) -> Self {
        Self {
            name: name.to_string(),
            abbrev: abbrev.to_string(),
            slug: slug.to_string(),
        }
    }

    /// `<base>/<abbrev>/<slug>`, e.g. `.../name/ari/arizona-cardinals`.
    pub fn depth_chart_url(&self, base_url: &str) -> Result<Url> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|e| DepthChartError::Config(format!("bad base URL {}: {}", base_url, e)))?;
        base.join(&format!("{}/{}", self.abbrev, self.slug))
            .map_err(|e| DepthChartError::Config(format!("bad team URL for {}: {}", self.abbrev, e)))
    }
}

static NFL_TEAMS: &[(&str, &str, &str)] = &[
    ("Arizona Cardinals", "ari", "arizona-cardinals"),
    ("Atlanta Falcons", "atl", "atlanta-falcons"),
    ("Baltimore Ravens", "bal", "baltimore-ravens"),
    ("Buffalo Bills", "buf", "buffalo-bills"),
    ("Carolina Panthers", "car", "carolina-panthers"),
    ("Chicago Bears", "chi", "chicago-bears"),
    ("Cincinnati Bengals", "cin", "cincinnati-bengals"),
    ("Cleveland Browns", "cle", "cleveland-browns"),
    ("Dallas Cowboys", "dal", "dallas-cowboys"),
    ("Denver Broncos", "den", "denver-broncos"),
    ("Detroit Lions", "det", "detroit-lions"),
    ("Green Bay Packers", "gb", "green-bay-packers"),
    ("Houston Texans", "hou", "houston-texans"),
    ("Indianapolis Colts", "ind", "indianapolis-colts"),
    ("Jacksonville Jaguars", "jax", "jacksonville-jaguars"),
    ("Kansas City Chiefs", "kc", "kansas-city-chiefs"),
    ("Las Vegas Raiders", "lv", "las-vegas-raiders"),
    ("Los Angeles Chargers", "lac", "los-angeles-chargers"),
    ("Los Angeles Rams", "lar", "los-angeles-rams"),
    ("Miami Dolphins", "mia", "miami-dolphins"),
    ("Minnesota Vikings", "min", "minnesota-vikings"),
    ("New England Patriots", "ne", "new-england-patriots"),
    ("New Orleans Saints", "no", "new-orleans-saints"),
    ("New York Giants", "nyg", "new-york-giants"),
    ("New York Jets", "nyj", "new-york-jets"),
    ("Philadelphia Eagles", "phi", "philadelphia-eagles"),
    ("Pittsburgh Steelers", "pit", "pittsburgh-steelers"),
    ("San Francisco 49ers", "sf", "san-francisco-49ers"),
    ("Seattle Seahawks", "sea", "seattle-seahawks"),
    ("Tampa Bay Buccaneers", "tb", "tampa-bay-buccaneers"),
    ("Tennessee Titans", "ten", "tennessee-titans"),
    ("Washington Commanders", "wsh", "washington-commanders"),
];

/// The full 32-team league in alphabetical order.
pub fn nfl_teams() -> Vec<Team> {
    NFL_TEAMS
        .iter()
        .map(|&(name, abbrev, slug)| Team::new(name, abbrev, slug))
        .collect()
}

/// Keep only the teams named by `abbrevs`, in the order given.
/// Matching is case-insensitive; an unknown abbreviation is an error.
pub fn select_teams(all: &[Team], abbrevs: &[String]) -> Result<Vec<Team>> {
    abbrevs
        .iter()
        .map(|wanted| {
            let wanted = wanted.trim();
            all.iter()
                .find(|t| t.abbrev.eq_ignore_ascii_case(wanted))
                .cloned()
                .ok_or_else(|| DepthChartError::Config(format!("unknown team abbreviation {:?}", wanted)))
        })
        .collect()
}
