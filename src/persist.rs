use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::model::Fixture;

/// Replaces the persisted fixture set. Never merges with the previous one.
pub fn save_fixtures(path: &Path, fixtures: &[Fixture]) -> Result<()> {
    let json = serde_json::to_string_pretty(fixtures).context("serialize fixtures")?;
    write_atomic(path, json.as_bytes())?;
    info!(path = %path.display(), count = fixtures.len(), "fixture set persisted");
    Ok(())
}

/// An absent file is an empty set, not an error.
pub fn load_fixtures(path: &Path) -> Result<Vec<Fixture>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no persisted fixture set");
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("read fixtures {}", path.display()));
        }
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).with_context(|| format!("invalid fixtures json {}", path.display()))
}

/// Keeps a raw upstream body next to the fixture set, e.g. `league_teams_12325.json`.
pub fn write_snapshot(dir: &Path, name: &str, body: &str) -> Result<()> {
    write_atomic(&dir.join(name), body.as_bytes())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(id: u64) -> Fixture {
        Fixture {
            id,
            home_id: 1,
            away_id: 2,
            home_name: "Sparta".to_string(),
            away_name: "Slavia".to_string(),
            competition: "Chance liga".to_string(),
            date: Some("2026-10-19".to_string()),
            home_position: Some(2),
            away_position: None,
        }
    }

    #[test]
    fn save_overwrites_previous_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("fixtures.json");
        save_fixtures(&path, &[fixture(1), fixture(2)]).unwrap();
        save_fixtures(&path, &[fixture(3)]).unwrap();
        let loaded = load_fixtures(&path).unwrap();
        assert_eq!(loaded, vec![fixture(3)]);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_fixtures(&dir.path().join("fixtures.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_fixtures(&path).is_err());
    }

    #[test]
    fn snapshot_lands_under_name() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(dir.path(), "team_stats_7.json", "{\"data\":[]}").unwrap();
        let raw = fs::read_to_string(dir.path().join("team_stats_7.json")).unwrap();
        assert_eq!(raw, "{\"data\":[]}");
    }
}
