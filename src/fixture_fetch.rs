use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Days, NaiveDate};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::api::FootballApi;
use crate::config::Config;
use crate::model::{Fixture, Standings};
use crate::standings::fetch_all_standings;

/// A fixture as the upstream lists it, before filtering and enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRow {
    pub id: u64,
    pub home_id: u32,
    pub away_id: u32,
    pub home_name: String,
    pub away_name: String,
    pub competition_id: u32,
    pub date_unix: Option<i64>,
}

pub struct FixtureWindowFetch {
    pub fixtures: Vec<Fixture>,
    pub days_fetched: usize,
    pub days_failed: usize,
    pub leagues_with_standings: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Vec<WireMatch>>,
}

#[derive(Debug, Deserialize)]
struct WireMatch {
    id: Option<u64>,
    #[serde(rename = "homeID")]
    home_id: Option<i64>,
    #[serde(rename = "awayID")]
    away_id: Option<i64>,
    #[serde(default)]
    home_name: Option<String>,
    #[serde(default)]
    away_name: Option<String>,
    competition_id: Option<u32>,
    #[serde(default)]
    date_unix: Option<i64>,
}

/// Standings for every league, then one fixture request per day from
/// `today` through `today + window_days`. Failing days are skipped.
pub fn fetch_fixture_window(
    api: &dyn FootballApi,
    cfg: &Config,
    today: NaiveDate,
) -> FixtureWindowFetch {
    let standings = fetch_all_standings(api, &cfg.competitions);
    let mut errors = standings.errors;
    let mut fixtures = Vec::new();
    let mut days_fetched = 0usize;
    let mut days_failed = 0usize;

    for offset in 0..=cfg.window_days {
        let Some(date) = today.checked_add_days(Days::new(offset as u64)) else {
            break;
        };
        match api.matches_on(date) {
            Ok(rows) => {
                days_fetched += 1;
                let before = fixtures.len();
                fixtures.extend(build_fixtures(
                    rows,
                    cfg,
                    &standings.tables,
                ));
                debug!(%date, kept = fixtures.len() - before, "fixtures for day");
            }
            Err(err) => {
                days_failed += 1;
                let msg = format!("{err:#}");
                warn!(%date, error = %msg, "fixtures unavailable, skipping day");
                errors.push(format!("{date}: {msg}"));
            }
        }
    }

    info!(
        fixtures = fixtures.len(),
        days_fetched,
        days_failed,
        leagues = standings.tables.len(),
        "fixture window fetched"
    );

    FixtureWindowFetch {
        fixtures,
        days_fetched,
        days_failed,
        leagues_with_standings: standings.tables.len(),
        errors,
    }
}

/// Drops fixtures outside the configured competitions and attaches table
/// positions. Positions outside `[1, league_size]` are left unknown.
pub fn build_fixtures(
    rows: Vec<MatchRow>,
    cfg: &Config,
    tables: &HashMap<u32, Standings>,
) -> Vec<Fixture> {
    let league_size = cfg.scoring.league_size;
    let position = |table: Option<&Standings>, team: u32| {
        table
            .and_then(|t| t.get(&team).copied())
            .filter(|p| (1..=league_size).contains(p))
    };

    rows.into_iter()
        .filter_map(|row| {
            let competition = cfg.competition_name(row.competition_id)?;
            if row.home_id == row.away_id {
                debug!(id = row.id, team = row.home_id, "dropping fixture against itself");
                return None;
            }
            let table = tables.get(&row.competition_id);
            Some(Fixture {
                id: row.id,
                home_id: row.home_id,
                away_id: row.away_id,
                home_position: position(table, row.home_id),
                away_position: position(table, row.away_id),
                home_name: row.home_name,
                away_name: row.away_name,
                competition: competition.to_string(),
                date: kickoff_date(row.date_unix),
            })
        })
        .collect()
}

pub fn parse_matches_json(raw: &str) -> Result<Vec<MatchRow>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let resp: MatchesResponse = serde_json::from_str(trimmed).context("invalid matches json")?;
    if resp.success == Some(false) {
        return Err(anyhow!(
            "matches rejected: {}",
            resp.message.unwrap_or_else(|| "no message".to_string())
        ));
    }

    Ok(resp
        .data
        .unwrap_or_default()
        .into_iter()
        .filter_map(|m| {
            Some(MatchRow {
                id: m.id?,
                home_id: u32::try_from(m.home_id?).ok()?,
                away_id: u32::try_from(m.away_id?).ok()?,
                home_name: m.home_name.unwrap_or_default(),
                away_name: m.away_name.unwrap_or_default(),
                competition_id: m.competition_id?,
                date_unix: m.date_unix,
            })
        })
        .collect())
}

/// UTC calendar date of a unix kickoff; zero or missing means unknown.
pub fn kickoff_date(date_unix: Option<i64>) -> Option<String> {
    let secs = date_unix.filter(|s| *s > 0)?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn row(id: u64, home: u32, away: u32, comp: u32) -> MatchRow {
        MatchRow {
            id,
            home_id: home,
            away_id: away,
            home_name: format!("H{home}"),
            away_name: format!("A{away}"),
            competition_id: comp,
            date_unix: Some(1_760_800_000),
        }
    }

    #[test]
    fn kickoff_date_formats_utc_day() {
        assert_eq!(kickoff_date(Some(1_760_800_000)).as_deref(), Some("2025-10-18"));
        assert_eq!(kickoff_date(Some(0)), None);
        assert_eq!(kickoff_date(None), None);
    }

    #[test]
    fn filters_unknown_competitions_and_self_matches() {
        let cfg = Config::new("k", PathBuf::from("/tmp"));
        let rows = vec![row(1, 10, 20, 12325), row(2, 10, 20, 999), row(3, 5, 5, 12325)];
        let fixtures = build_fixtures(rows, &cfg, &HashMap::new());
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].competition, "Premier league");
        assert_eq!(fixtures[0].home_position, None);
    }

    #[test]
    fn attaches_positions_within_league_size() {
        let cfg = Config::new("k", PathBuf::from("/tmp"));
        let mut tables = HashMap::new();
        tables.insert(12325, Standings::from([(10, 1), (20, 25)]));
        let fixtures = build_fixtures(vec![row(1, 10, 20, 12325)], &cfg, &tables);
        assert_eq!(fixtures[0].home_position, Some(1));
        assert_eq!(fixtures[0].away_position, None);
    }
}
