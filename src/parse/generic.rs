// src/parse/generic.rs
//
// Fallback for pages that render a depth chart as one plain table with a
// "Pos"/"Position" first column. Two shapes are understood:
//
//   wide: Pos | Starter | 2nd | ...       one column per depth slot
//   long: Pos | Player | Depth            one player per row, Depth optional

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

use super::espn::player_cell;
use super::text::{clean_text, depth_slots, parse_depth_label};
use super::{FormationTable, PlayerCell, PositionRow};

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("table selector should parse")
}

static TABLES: Lazy<Selector> = Lazy::new(|| sel("table"));
static CAPTION: Lazy<Selector> = Lazy::new(|| sel("caption"));
static HEADER_CELLS: Lazy<Selector> = Lazy::new(|| sel("thead th, thead td"));
static FIRST_ROW_CELLS: Lazy<Selector> = Lazy::new(|| sel("tr:first-child th"));
static BODY_ROWS: Lazy<Selector> = Lazy::new(|| sel("tbody tr"));
static CELLS: Lazy<Selector> = Lazy::new(|| sel("td, th"));

/// Where the player and depth live in a long-layout table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Wide,
    Long { name: usize, depth: Option<usize> },
}

pub fn extract(document: &Html) -> Vec<FormationTable> {
    document
        .select(&TABLES)
        .filter_map(|table| {
            let headers = header_labels(table);
            let first = headers.first()?;
            if !is_position_header(first) {
                return None;
            }
            let title = table
                .select(&CAPTION)
                .next()
                .map(|c| clean_text(&c.text().collect::<String>()))
                .filter(|t| !t.is_empty());
            let layout = detect_layout(&headers);
            let rows = match layout {
                Layout::Wide => wide_rows(table, &headers[1..]),
                Layout::Long { name, depth } => long_rows(table, name, depth),
            };
            debug!(title = ?title, ?layout, rows = rows.len(), "generic depth table");
            Some(FormationTable {
                title,
                html: table.html(),
                rows,
            })
        })
        .collect()
}

fn header_labels(table: ElementRef<'_>) -> Vec<String> {
    let mut headers: Vec<String> = table
        .select(&HEADER_CELLS)
        .map(|th| clean_text(&th.text().collect::<String>()))
        .collect();
    if headers.is_empty() {
        headers = table
            .select(&FIRST_ROW_CELLS)
            .map(|th| clean_text(&th.text().collect::<String>()))
            .collect();
    }
    headers
}

fn is_position_header(label: &str) -> bool {
    matches!(
        label.to_lowercase().as_str(),
        "pos" | "pos." | "position" | "positions"
    )
}

fn is_name_header(label: &str) -> bool {
    matches!(
        label.to_lowercase().as_str(),
        "player" | "players" | "name" | "player name" | "player_name"
    )
}

fn is_depth_header(label: &str) -> bool {
    matches!(
        label.to_lowercase().as_str(),
        "depth" | "depth slot" | "depth_slot" | "slot" | "string"
    )
}

/// Long as soon as a player or depth column is named. Otherwise every
/// column after the position is a depth slot, numbered from its header
/// ("Starter", "2nd") or left to right.
fn detect_layout(headers: &[String]) -> Layout {
    let rest = || headers.iter().enumerate().skip(1);
    let name = rest().find(|(_, h)| is_name_header(h)).map(|(i, _)| i);
    let depth = rest().find(|(_, h)| is_depth_header(h)).map(|(i, _)| i);

    match (name, depth) {
        (Some(name), depth) => Layout::Long { name, depth },
        (None, Some(depth)) => {
            // first column that is neither position nor depth holds the player
            let name = rest().map(|(i, _)| i).find(|&i| i != depth).unwrap_or(depth + 1);
            Layout::Long {
                name,
                depth: Some(depth),
            }
        }
        (None, None) => Layout::Wide,
    }
}

/// Cells of one body row, with the position label split off. Header rows
/// repeated inside tbody are dropped.
fn row_cells<'a>(row: ElementRef<'a>) -> Option<(String, Vec<ElementRef<'a>>)> {
    let cells: Vec<ElementRef<'a>> = row.select(&CELLS).collect();
    let position = clean_text(&cells.first()?.text().collect::<String>());
    let position = position.split_whitespace().next()?.to_string();
    if is_position_header(&position) {
        return None;
    }
    Some((position, cells))
}

fn wide_rows(table: ElementRef<'_>, depth_headers: &[String]) -> Vec<PositionRow> {
    table
        .select(&BODY_ROWS)
        .filter_map(|row| {
            let (position, cells) = row_cells(row)?;
            let players: Vec<Option<PlayerCell>> = cells[1..].iter().copied().map(player_cell).collect();
            let depths = depth_slots(depth_headers, players.len());
            Some(PositionRow {
                position,
                slots: depths.into_iter().zip(players).collect(),
            })
        })
        .collect()
}

/// One row per player. Depth comes from the depth column when it reads as
/// a number; otherwise rows are numbered 1, 2, ... per position in table
/// order.
fn long_rows(table: ElementRef<'_>, name: usize, depth: Option<usize>) -> Vec<PositionRow> {
    let mut seen: HashMap<String, u32> = HashMap::new();
    table
        .select(&BODY_ROWS)
        .filter_map(|row| {
            let (position, cells) = row_cells(row)?;
            let sequential = {
                let n = seen.entry(position.clone()).or_insert(0);
                *n += 1;
                *n
            };
            let depth_slot = depth
                .and_then(|i| cells.get(i))
                .and_then(|c| parse_depth_label(&c.text().collect::<String>()))
                .unwrap_or(sequential);
            let player = cells.get(name).copied().and_then(player_cell);
            Some(PositionRow {
                position,
                slots: vec![(depth_slot, player)],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn layout_from_headers() {
        assert_eq!(detect_layout(&labels(&["Pos", "Starter", "2nd", ""])), Layout::Wide);
        assert_eq!(detect_layout(&labels(&["Pos", "", ""])), Layout::Wide);
        assert_eq!(
            detect_layout(&labels(&["Pos", "Player", "Depth"])),
            Layout::Long {
                name: 1,
                depth: Some(2)
            }
        );
        assert_eq!(
            detect_layout(&labels(&["Position", "Name"])),
            Layout::Long { name: 1, depth: None }
        );
        assert_eq!(
            detect_layout(&labels(&["Pos", "Depth", "Athlete"])),
            Layout::Long {
                name: 2,
                depth: Some(1)
            }
        );
    }
}
