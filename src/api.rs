use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use tracing::warn;

use crate::config::Config;
use crate::fixture_fetch::{MatchRow, parse_matches_json};
use crate::http_client::{get_json, http_client};
use crate::model::{Standings, TeamStats};
use crate::persist::write_snapshot;
use crate::standings::parse_league_teams_json;
use crate::team_form::parse_team_form_json;

/// Upstream sports-data source. One blocking round trip per call.
pub trait FootballApi {
    fn league_table(&self, season_id: u32) -> Result<Standings>;

    fn matches_on(&self, date: NaiveDate) -> Result<Vec<MatchRow>>;

    /// `Ok(None)` when the source has no statistics for the team.
    fn team_form(&self, team_id: u32) -> Result<Option<TeamStats>>;
}

pub struct HttpFootballApi {
    client: &'static Client,
    base: String,
    key: String,
    snapshot_dir: Option<PathBuf>,
}

impl HttpFootballApi {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base: cfg.api_base.trim_end_matches('/').to_string(),
            key: cfg.api_key.clone(),
            snapshot_dir: cfg.snapshots.then(|| cfg.data_dir.clone()),
        })
    }

    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
        let url = format!("{}/{endpoint}", self.base);
        let mut query = Vec::with_capacity(params.len() + 1);
        query.push(("key", self.key.clone()));
        query.extend(params.iter().cloned());
        get_json(self.client, &url, &query).with_context(|| format!("{endpoint} request failed"))
    }

    fn snapshot(&self, name: &str, body: &str) {
        let Some(dir) = self.snapshot_dir.as_ref() else {
            return;
        };
        if let Err(err) = write_snapshot(dir, name, body) {
            warn!(name, error = %err, "could not write response snapshot");
        }
    }
}

impl FootballApi for HttpFootballApi {
    fn league_table(&self, season_id: u32) -> Result<Standings> {
        let body = self.get(
            "league-teams",
            &[
                ("season_id", season_id.to_string()),
                ("include", "stats".to_string()),
            ],
        )?;
        self.snapshot(&format!("league_teams_{season_id}.json"), &body);
        parse_league_teams_json(&body)
    }

    fn matches_on(&self, date: NaiveDate) -> Result<Vec<MatchRow>> {
        let body = self.get(
            "todays-matches",
            &[("date", date.format("%Y-%m-%d").to_string())],
        )?;
        parse_matches_json(&body)
    }

    fn team_form(&self, team_id: u32) -> Result<Option<TeamStats>> {
        let body = self.get("lastx", &[("team_id", team_id.to_string())])?;
        self.snapshot(&format!("team_stats_{team_id}.json"), &body);
        parse_team_form_json(team_id, &body)
    }
}
