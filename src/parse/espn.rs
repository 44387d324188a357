// src/parse/espn.rs
//
// ESPN splits every formation into two side-by-side tables: a fixed-left
// table holding the position labels and a scrolling table holding one cell
// per depth slot. Rows are aligned by index.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use super::text::{clean_text, depth_slots, is_empty_slot};
use super::{FormationTable, PlayerCell, PositionRow};
use crate::chart::PlayerDetails;

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("ESPN selector should parse")
}

static CONTAINER: Lazy<Selector> = Lazy::new(|| sel("div.ResponsiveTable"));
static TITLE: Lazy<Selector> = Lazy::new(|| sel("div.Table__Title"));
static FIXED_LEFT_ROWS: Lazy<Selector> = Lazy::new(|| sel("table.Table--fixed-left tbody tr"));
static SCROLLER_TABLE: Lazy<Selector> = Lazy::new(|| sel("div.Table__Scroller table"));
static HEADER_CELLS: Lazy<Selector> = Lazy::new(|| sel("thead th"));
static BODY_ROWS: Lazy<Selector> = Lazy::new(|| sel("tbody tr"));
static CELLS: Lazy<Selector> = Lazy::new(|| sel("td"));
static PLAYER_LINK: Lazy<Selector> = Lazy::new(|| sel("a"));
static INJURY: Lazy<Selector> = Lazy::new(|| sel("span.nfl-injuries-status"));

/// All `div.ResponsiveTable` formations on the page, in page order.
pub fn extract(document: &Html) -> Vec<FormationTable> {
    document
        .select(&CONTAINER)
        .map(|container| {
            let title = container
                .select(&TITLE)
                .next()
                .map(|t| clean_text(&t.text().collect::<String>()))
                .filter(|t| !t.is_empty());
            let rows = extract_rows(container);
            debug!(title = ?title, rows = rows.len(), "ESPN formation table");
            FormationTable {
                title,
                html: container.html(),
                rows,
            }
        })
        .collect()
}

fn extract_rows(container: ElementRef<'_>) -> Vec<PositionRow> {
    let positions: Vec<String> = container
        .select(&FIXED_LEFT_ROWS)
        .filter_map(|row| {
            let text = clean_text(&row.text().collect::<String>());
            text.split_whitespace().next().map(str::to_string)
        })
        .collect();
    if positions.is_empty() {
        return Vec::new();
    }

    let Some(scroller) = container.select(&SCROLLER_TABLE).next() else {
        debug!("formation has positions but no scroller table");
        return Vec::new();
    };

    let headers: Vec<String> = scroller
        .select(&HEADER_CELLS)
        .map(|th| clean_text(&th.text().collect::<String>()))
        .collect();

    let player_rows: Vec<Vec<Option<PlayerCell>>> = scroller
        .select(&BODY_ROWS)
        .map(|row| row.select(&CELLS).map(player_cell).collect())
        .collect();

    positions
        .into_iter()
        .zip(player_rows)
        .map(|(position, players)| {
            let depths = depth_slots(&headers, players.len());
            trace!(%position, slots = players.len(), "position row");
            PositionRow {
                position,
                slots: depths.into_iter().zip(players).collect(),
            }
        })
        .collect()
}

/// The player in one depth cell, or `None` for an empty slot. The link's
/// href and `data-player-uid` and any injury designation ride along.
pub(super) fn player_cell(cell: ElementRef<'_>) -> Option<PlayerCell> {
    let status = cell
        .select(&INJURY)
        .next()
        .map(|s| clean_text(&s.text().collect::<String>()))
        .filter(|s| !s.is_empty());
    let link = cell.select(&PLAYER_LINK).next();

    let name = match link {
        Some(link) => clean_text(&link.text().collect::<String>()),
        None => {
            let text = clean_text(&cell.text().collect::<String>());
            let stripped = status
                .as_deref()
                .and_then(|st| text.strip_suffix(st))
                .map(|t| t.trim_end().to_string());
            stripped.unwrap_or(text)
        }
    };
    if is_empty_slot(&name) {
        return None;
    }

    let attr = |key: &str| {
        link.and_then(|a| a.value().attr(key))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    Some(PlayerCell {
        name,
        details: PlayerDetails {
            injury_status: status,
            player_url: attr("href"),
            player_uid: attr("data-player-uid"),
        },
    })
}
