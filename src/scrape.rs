// src/scrape.rs
//
// Fetch, parse and write every configured team, a few at a time.

use futures::{stream::FuturesUnordered, StreamExt};
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

use crate::chart::TeamDepthChart;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{save_snapshots, PageSource};
use crate::parse::{classify_tables, extract_tables, parse_depth_entries};
use crate::process::{write_details, write_records};
use crate::report::ScrapeReport;
use crate::teams::Team;

/// Fetch one page, parse it and write `<slug>_depth_chart.csv` plus the
/// `<slug>_player_details.csv` sidecar.
#[instrument(level = "debug", skip(source, config, team), fields(team = %team.abbrev))]
async fn scrape_team<S: PageSource>(source: &S, config: &Config, team: Team) -> Result<(TeamDepthChart, PathBuf)> {
    let html = source.fetch(&team).await?;
    let entries = parse_depth_entries(&team, &html)?;
    let records = entries.iter().map(|e| e.record.clone()).collect();
    let chart = TeamDepthChart::new(team, records);
    let out = config.team_csv_path(&chart.team);

    if config.dry_run {
        info!(path = %out.display(), rows = chart.records.len(), "dry run: would write team table");
        return Ok((chart, out));
    }

    if config.save_html {
        let tables = extract_tables(&html);
        save_snapshots(&config.html_dir, &chart.team, &classify_tables(&tables))?;
    }
    write_records(&out, &chart.records)?;
    write_details(&config.details_path(&chart.team.slug), &entries)?;
    let [offense, defense, special] = chart.unit_counts();
    debug!(offense, defense, special, "unit breakdown");
    Ok((chart, out))
}

fn settle(report: &mut ScrapeReport, team: String, res: Result<(TeamDepthChart, PathBuf)>) -> Result<()> {
    match res {
        Ok((chart, path)) => {
            info!(team = %team, path = %path.display(), rows = chart.records.len(), "team written");
            report.record_written(&team, &path, chart.records.len());
            Ok(())
        }
        Err(e) if e.is_team_scoped() => {
            warn!(team = %team, error = %e, "skipping team");
            report.record_skipped(&team, &e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Run the scrape stage over `config.teams`.
///
/// At most `config.concurrency` teams are in flight. A team whose page
/// cannot be fetched or parsed is logged and skipped; any other failure
/// ends the stage. Returns after every team has finished.
#[instrument(level = "info", skip(source, config), fields(teams = config.teams.len(), concurrency = config.concurrency))]
pub async fn scrape<S: PageSource>(source: &S, config: &Config) -> Result<ScrapeReport> {
    let mut report = ScrapeReport::start();
    let limit = config.concurrency.max(1);

    let mut tasks = FuturesUnordered::new();
    for team in config.teams.iter().cloned() {
        let name = team.name.clone();
        tasks.push(async move { (name, scrape_team(source, config, team).await) });

        // throttle concurrency
        if tasks.len() >= limit {
            if let Some((team, res)) = tasks.next().await {
                settle(&mut report, team, res)?;
            }
        }
    }

    // drain remaining tasks
    while let Some((team, res)) = tasks.next().await {
        settle(&mut report, team, res)?;
    }

    report.finish();
    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "scrape finished"
    );
    if !config.dry_run {
        report.write_json(&config.report_path())?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticPages;
    use crate::parse::fixtures::{ESPN_PAGE, NO_TABLE_PAGE, PLAIN_TABLE_PAGE};
    use crate::process::{read_details, read_records};
    use anyhow::Result;
    use tempfile::tempdir;

    fn teams() -> Vec<Team> {
        vec![
            Team::new("Team A", "ta", "team-a"),
            Team::new("Team B", "tb", "team-b"),
            Team::new("Team C", "tc", "team-c"),
        ]
    }

    fn config_in(root: &std::path::Path, concurrency: usize) -> Config {
        Config {
            team_csv_dir: root.join("team_CSV"),
            combined_dir: root.join("combined_depth_charts"),
            html_dir: root.join("team_tables"),
            concurrency,
            teams: teams(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn table_less_page_is_skipped_others_written() -> Result<()> {
        let tmp = tempdir()?;
        let config = config_in(tmp.path(), 2);
        let pages = StaticPages::default()
            .with("ta", ESPN_PAGE)
            .with("tb", NO_TABLE_PAGE)
            .with("tc", PLAIN_TABLE_PAGE);

        let report = scrape(&pages, &config).await?;

        assert_eq!(report.written.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].team, "Team B");
        assert!(!report.is_total_failure());

        assert!(config.team_csv_path(&teams()[0]).is_file());
        assert!(!config.team_csv_path(&teams()[1]).exists());
        assert!(config.team_csv_path(&teams()[2]).is_file());

        let saved = ScrapeReport::read_json(&config.report_path())?;
        assert_eq!(saved.skipped, report.skipped);
        Ok(())
    }

    #[tokio::test]
    async fn written_rows_carry_team_name() -> Result<()> {
        let tmp = tempdir()?;
        let mut config = config_in(tmp.path(), 1);
        config.teams.truncate(1);
        let pages = StaticPages::default().with("ta", ESPN_PAGE);

        scrape(&pages, &config).await?;
        let rows = read_records(&config.team_csv_path(&config.teams[0]))?;
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.team == "Team A"));

        let details = read_details(&config.details_path("team-a"))?;
        assert_eq!(details.len(), rows.len());
        let kyler = details
            .iter()
            .find(|e| e.record.player_name == "Kyler Murray")
            .map(|e| e.details.player_uid.as_deref());
        assert_eq!(kyler, Some(Some("s:20~l:28~a:1")));
        Ok(())
    }

    #[tokio::test]
    async fn every_team_failing_is_total_failure() -> Result<()> {
        let tmp = tempdir()?;
        let config = config_in(tmp.path(), 4);

        let report = scrape(&StaticPages::default(), &config).await?;
        assert!(report.is_total_failure());
        assert_eq!(report.skipped.len(), 3);
        assert!(report.skipped[0].reason.contains("404"));
        Ok(())
    }

    #[tokio::test]
    async fn save_html_writes_snapshots() -> Result<()> {
        let tmp = tempdir()?;
        let mut config = config_in(tmp.path(), 1);
        config.teams.truncate(1);
        config.save_html = true;
        let pages = StaticPages::default().with("ta", ESPN_PAGE);

        scrape(&pages, &config).await?;
        assert!(config.html_dir.join("team-a_depth_chart_offense.html").is_file());
        assert!(config.html_dir.join("team-a_depth_chart_special_teams.html").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn dry_run_touches_nothing() -> Result<()> {
        let tmp = tempdir()?;
        let mut config = config_in(tmp.path(), 2);
        config.dry_run = true;
        let pages = StaticPages::default().with("ta", ESPN_PAGE);

        let report = scrape(&pages, &config).await?;
        assert_eq!(report.written.len(), 1);
        assert!(!config.team_csv_dir.exists());
        assert!(!config.report_path().exists());
        Ok(())
    }
}
