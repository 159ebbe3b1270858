use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::win_prob::ScoringParams;

pub const DEFAULT_API_BASE: &str = "https://api.football-data-api.com";
const DATA_DIR: &str = "matchday_odds";
pub const MAX_WINDOW_DAYS: u32 = 31;

// Season id doubles as the fixture `competition_id` upstream.
const DEFAULT_COMPETITIONS: &[(u32, &str)] = &[
    (12336, "Chance liga"),
    (12529, "Bundesliga"),
    (12530, "Serie A"),
    (12337, "Ligue 1"),
    (12325, "Premier league"),
    (12316, "La Liga"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competition {
    pub id: u32,
    pub name: String,
}

/// Immutable settings handed to the pipeline at construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub competitions: Vec<Competition>,
    pub window_days: u32,
    pub data_dir: PathBuf,
    pub cache_capacity: usize,
    pub snapshots: bool,
    pub scoring: ScoringParams,
}

impl Config {
    pub fn new(api_key: impl Into<String>, data_dir: PathBuf) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            competitions: default_competitions(),
            window_days: 7,
            data_dir,
            cache_capacity: 128,
            snapshots: false,
            scoring: ScoringParams::default(),
        }
    }

    /// Reads `.env.local`, `.env` and then the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let api_key = env::var("FOOTBALL_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .context("FOOTBALL_API_KEY is not set")?;
        let data_dir = env::var("MATCHDAY_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_data_dir)
            .unwrap_or_else(|| PathBuf::from("matchday_data"));

        let mut cfg = Config::new(api_key.trim(), data_dir);
        if let Some(base) = env::var("FOOTBALL_API_BASE").ok().and_then(non_empty) {
            cfg.api_base = base.trim_end_matches('/').to_string();
        }
        if let Ok(raw) = env::var("MATCHDAY_COMPETITIONS") {
            if !raw.trim().is_empty() {
                cfg.competitions = parse_competitions(&raw)?;
            }
        }
        if let Some(days) = env_parse::<u32>("MATCHDAY_WINDOW_DAYS") {
            cfg.window_days = check_window_days(days)?;
        }
        cfg.cache_capacity = env_parse("MATCHDAY_CACHE_CAPACITY").unwrap_or(cfg.cache_capacity);
        cfg.snapshots = env::var("MATCHDAY_SNAPSHOTS")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);
        if let Some(size) = env_parse::<u32>("MATCHDAY_LEAGUE_SIZE") {
            cfg.scoring.league_size = size;
        }
        if let Some(scale) = env_parse::<f64>("MATCHDAY_DRAW_SCALE") {
            cfg.scoring.draw_scale = scale;
        }
        if let Some(adv) = env_parse::<f64>("MATCHDAY_HOME_ADVANTAGE") {
            cfg.scoring.weights.home_advantage = adv;
        }
        cfg.scoring.validate()?;
        Ok(cfg)
    }

    pub fn competition_name(&self, id: u32) -> Option<&str> {
        self.competitions
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    pub fn fixtures_path(&self) -> PathBuf {
        self.data_dir.join("fixtures.json")
    }
}

pub fn default_competitions() -> Vec<Competition> {
    DEFAULT_COMPETITIONS
        .iter()
        .map(|(id, name)| Competition {
            id: *id,
            name: (*name).to_string(),
        })
        .collect()
}

/// Parses `id:Name,id:Name`.
pub fn parse_competitions(raw: &str) -> Result<Vec<Competition>> {
    let mut out = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (id, name) = part
            .split_once(':')
            .ok_or_else(|| anyhow!("competition entry `{part}` is not `id:name`"))?;
        let id = id
            .trim()
            .parse::<u32>()
            .with_context(|| format!("competition id in `{part}`"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow!("competition {id} has an empty name"));
        }
        out.push(Competition {
            id,
            name: name.to_string(),
        });
    }
    if out.is_empty() {
        return Err(anyhow!("no competitions configured"));
    }
    Ok(out)
}

/// One request is issued per day, so the window is capped.
pub fn check_window_days(days: u32) -> Result<u32> {
    if days > MAX_WINDOW_DAYS {
        return Err(anyhow!(
            "fixture window of {days} days exceeds the {MAX_WINDOW_DAYS}-day limit"
        ));
    }
    Ok(days)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn default_data_dir() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(DATA_DIR));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(DATA_DIR))
}
