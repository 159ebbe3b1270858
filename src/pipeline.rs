use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::api::FootballApi;
use crate::cache::BoundedCache;
use crate::config::Config;
use crate::error::PredictError;
use crate::fixture_fetch::fetch_fixture_window;
use crate::lookup;
use crate::model::{Fixture, ProbabilityResult, TeamStats};
use crate::persist;
use crate::win_prob;

/// Summary of one fetch cycle.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub fixtures: usize,
    pub days_fetched: usize,
    pub days_failed: usize,
    pub leagues_with_standings: usize,
    /// False when no day could be fetched and the previous set was kept.
    pub persisted: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheReport {
    pub stats_hits: u64,
    pub stats_misses: u64,
    pub lookup_hits: u64,
    pub lookup_misses: u64,
}

/// Fetch, lookup and scoring for one process lifetime. Owns the memo caches.
pub struct Pipeline<A: FootballApi> {
    cfg: Config,
    api: A,
    fixtures: Option<Vec<Fixture>>,
    stats_cache: BoundedCache<u32, Option<TeamStats>>,
    lookup_cache: BoundedCache<(u32, u32), Option<Fixture>>,
}

impl<A: FootballApi> Pipeline<A> {
    pub fn new(cfg: Config, api: A) -> Self {
        let capacity = cfg.cache_capacity;
        Self {
            cfg,
            api,
            fixtures: None,
            stats_cache: BoundedCache::new(capacity),
            lookup_cache: BoundedCache::new(capacity),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches the window starting at `today` and supersedes the persisted set.
    /// When every day fails the previous set stays in place.
    pub fn refresh_fixtures(&mut self, today: NaiveDate) -> Result<RefreshReport> {
        let fetch = fetch_fixture_window(&self.api, &self.cfg, today);
        let mut report = RefreshReport {
            fixtures: fetch.fixtures.len(),
            days_fetched: fetch.days_fetched,
            days_failed: fetch.days_failed,
            leagues_with_standings: fetch.leagues_with_standings,
            persisted: false,
            errors: fetch.errors,
        };
        if fetch.days_fetched == 0 {
            warn!(
                days_failed = report.days_failed,
                "no fixture day fetched, keeping previous fixture set"
            );
            return Ok(report);
        }

        persist::save_fixtures(&self.cfg.fixtures_path(), &fetch.fixtures)
            .context("persist fixture set")?;
        report.persisted = true;
        self.fixtures = Some(fetch.fixtures);
        // Lookups were answered against the old set.
        self.lookup_cache = BoundedCache::new(self.cfg.cache_capacity);
        Ok(report)
    }

    /// The persisted set, read from disk once per process.
    pub fn fixtures(&mut self) -> Result<&[Fixture]> {
        if self.fixtures.is_none() {
            let loaded = persist::load_fixtures(&self.cfg.fixtures_path())?;
            info!(count = loaded.len(), "loaded persisted fixture set");
            self.fixtures = Some(loaded);
        }
        Ok(self.fixtures.as_deref().unwrap_or_default())
    }

    pub fn find_fixture(&mut self, team_a: u32, team_b: u32) -> Result<Option<Fixture>> {
        let key = (team_a, team_b);
        if let Some(hit) = self.lookup_cache.get(&key) {
            debug!(team_a, team_b, "fixture lookup served from cache");
            return Ok(hit);
        }
        let found = lookup::find_fixture(self.fixtures()?, team_a, team_b).cloned();
        self.lookup_cache.insert(key, found.clone());
        Ok(found)
    }

    pub fn team_stats(&mut self, team_id: u32) -> Result<Option<TeamStats>> {
        let api = &self.api;
        self.stats_cache.get_or_try_insert_with(team_id, || {
            debug!(team_id, "fetching team form");
            let stats = api.team_form(team_id)?;
            if stats.as_ref().is_some_and(TeamStats::is_empty) {
                warn!(team_id, "team form record has no usable signals");
            }
            Ok(stats)
        })
    }

    /// Scores the fixture between the two teams. Stats are assigned by the
    /// fixture's home/away ids, whatever order the teams were given in.
    pub fn predict(&mut self, team_a: u32, team_b: u32) -> Result<ProbabilityResult, PredictError> {
        if team_a == team_b {
            return Err(PredictError::InvalidInput(format!(
                "team {team_a} cannot play itself"
            )));
        }
        let fixture = self
            .find_fixture(team_a, team_b)
            .map_err(PredictError::Storage)?
            .ok_or(PredictError::FixtureNotFound { team_a, team_b })?;

        let home = self
            .team_stats(fixture.home_id)
            .map_err(PredictError::Upstream)?;
        let away = self
            .team_stats(fixture.away_id)
            .map_err(PredictError::Upstream)?;

        win_prob::compute_match_probabilities(
            &fixture,
            home.as_ref(),
            away.as_ref(),
            &self.cfg.scoring,
        )
    }

    pub fn cache_report(&self) -> CacheReport {
        CacheReport {
            stats_hits: self.stats_cache.hits(),
            stats_misses: self.stats_cache.misses(),
            lookup_hits: self.lookup_cache.hits(),
            lookup_misses: self.lookup_cache.misses(),
        }
    }
}
