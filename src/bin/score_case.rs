use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use matchday_odds::logging::init_logging;
use matchday_odds::model::{Fixture, TeamStats};
use matchday_odds::win_prob::{self, ScoringParams};

#[derive(Debug, serde::Deserialize)]
struct ScoreCase {
    fixture: Fixture,
    home: Option<TeamStats>,
    away: Option<TeamStats>,
    #[serde(default)]
    params: Option<ScoringParams>,
}

fn main() -> Result<()> {
    init_logging();
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/score_case.json"));

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let case: ScoreCase = serde_json::from_str(&raw).context("invalid score case json")?;
    let params = case.params.unwrap_or_default();
    params.validate()?;

    // No network: scores one stored case so weights can be tuned by hand.
    let result = win_prob::compute_match_probabilities(
        &case.fixture,
        case.home.as_ref(),
        case.away.as_ref(),
        &params,
    )?;

    println!("{} vs {}", result.home_name, result.away_name);
    println!("Home: {}% ({:.4})", result.percents.home, result.probs.home);
    println!("Draw: {}% ({:.4})", result.percents.draw, result.probs.draw);
    println!("Away: {}% ({:.4})", result.percents.away, result.probs.away);

    Ok(())
}
