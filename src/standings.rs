use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::FootballApi;
use crate::config::Competition;
use crate::model::Standings;

pub struct StandingsFetch {
    /// Keyed by competition id. Leagues that failed are simply absent.
    pub tables: HashMap<u32, Standings>,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LeagueTeamsResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Vec<LeagueTeamRow>>,
}

#[derive(Debug, Deserialize)]
struct LeagueTeamRow {
    id: Option<u32>,
    table_position: Option<i64>,
}

/// One request per league, sequentially. A failing league is logged and
/// skipped so its fixtures keep null positions.
pub fn fetch_all_standings(api: &dyn FootballApi, competitions: &[Competition]) -> StandingsFetch {
    let mut tables = HashMap::new();
    let mut errors = Vec::new();

    for comp in competitions {
        match api.league_table(comp.id) {
            Ok(table) if table.is_empty() => {
                warn!(league = %comp.name, "standings empty");
                errors.push(format!("{}: no standings", comp.name));
            }
            Ok(table) => {
                debug!(league = %comp.name, teams = table.len(), "standings loaded");
                tables.insert(comp.id, table);
            }
            Err(err) => {
                let msg = format!("{err:#}");
                warn!(league = %comp.name, error = %msg, "standings unavailable");
                errors.push(format!("{}: {msg}", comp.name));
            }
        }
    }

    StandingsFetch { tables, errors }
}

pub fn parse_league_teams_json(raw: &str) -> Result<Standings> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Standings::new());
    }
    let resp: LeagueTeamsResponse =
        serde_json::from_str(trimmed).context("invalid league-teams json")?;
    if resp.success == Some(false) {
        return Err(anyhow!(
            "league-teams rejected: {}",
            resp.message.unwrap_or_else(|| "no message".to_string())
        ));
    }

    Ok(resp
        .data
        .unwrap_or_default()
        .into_iter()
        .filter_map(|row| {
            let id = row.id?;
            let pos = u32::try_from(row.table_position?).ok().filter(|p| *p >= 1)?;
            Some((id, pos))
        })
        .collect())
}
