use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::model::TeamStats;

const GOALS_KEYS: &[&str] = &["goals_scored_per_match", "goalsScoredPerMatch"];
const CLEAN_SHEETS_KEYS: &[&str] = &["clean_sheets_ratio", "cleanSheetsRatio"];
const FORM_KEYS: &[&str] = &["form_ratio", "formRatio"];

/// Reads the team's form record from a `lastx` response.
///
/// The record is the first element of `data` when it is a list, `data`
/// itself when it is an object, otherwise the root. Each field may sit on the
/// record or in its nested `stats` object; missing fields count as zero.
pub fn parse_team_form_json(team_id: u32, raw: &str) -> Result<Option<TeamStats>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid lastx json")?;
    if root.get("success").and_then(|v| v.as_bool()) == Some(false) {
        let msg = root
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("no message");
        return Err(anyhow!("lastx rejected: {msg}"));
    }

    let record = match root.get("data") {
        Some(Value::Array(items)) => items.first(),
        Some(Value::Null) => None,
        Some(obj @ Value::Object(_)) => Some(obj),
        Some(_) => None,
        None if has_form_fields(&root) => Some(&root),
        None => None,
    };
    let Some(record) = record.filter(|r| r.is_object()) else {
        return Ok(None);
    };

    Ok(Some(TeamStats::new(
        team_id,
        pick_f64(record, GOALS_KEYS),
        pick_f64(record, CLEAN_SHEETS_KEYS),
        pick_f64(record, FORM_KEYS),
    )))
}

fn has_form_fields(record: &Value) -> bool {
    let nested = record.get("stats");
    [GOALS_KEYS, CLEAN_SHEETS_KEYS, FORM_KEYS]
        .iter()
        .flat_map(|keys| keys.iter())
        .any(|key| record.get(*key).is_some() || nested.is_some_and(|s| s.get(*key).is_some()))
}

fn pick_f64(record: &Value, keys: &[&str]) -> f64 {
    let nested = record.get("stats");
    for key in keys {
        let found = record
            .get(*key)
            .or_else(|| nested.and_then(|s| s.get(*key)));
        if let Some(v) = found.and_then(as_f64) {
            return v;
        }
    }
    0.0
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_suffix('%') {
                Some(pct) => pct.trim().parse::<f64>().ok().map(|v| v / 100.0),
                None => s.parse::<f64>().ok(),
            }
        }
        _ => None,
    }
}
