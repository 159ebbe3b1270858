use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;

use matchday_odds::api::HttpFootballApi;
use matchday_odds::config::Config;
use matchday_odds::error::PredictError;
use matchday_odds::logging::init_logging;
use matchday_odds::model::{Fixture, ProbabilityResult};
use matchday_odds::pipeline::Pipeline;

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    offline: bool,
    teams: Option<(String, String)>,
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = parse_args(std::env::args().skip(1).collect());
    let cfg = Config::from_env()?;
    let api = HttpFootballApi::from_config(&cfg)?;
    let mut pipeline = Pipeline::new(cfg, api);

    if !args.offline {
        let report = pipeline.refresh_fixtures(Utc::now().date_naive())?;
        if !report.persisted {
            println!("Fixture source unavailable, using the previously stored fixtures");
        }
        println!(
            "Fetched {} fixtures ({} days, {} leagues with standings)",
            report.fixtures, report.days_fetched, report.leagues_with_standings
        );
        if !report.errors.is_empty() {
            println!("Skipped: {}", report.errors.len());
            for err in report.errors.iter().take(8) {
                println!(" - {err}");
            }
        }
    }

    let (raw_a, raw_b) = match args.teams {
        Some(pair) => pair,
        None => (prompt("First team ID: ")?, prompt("Second team ID: ")?),
    };
    let (team_a, team_b) = match (parse_team_id(&raw_a), parse_team_id(&raw_b)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(err), _) | (_, Err(err)) => {
            println!("{err}");
            return Ok(ExitCode::from(2));
        }
    };

    match lookup_outcome(pipeline.find_fixture(team_a, team_b), team_a, team_b) {
        LookupOutcome::Found(line) => println!("\n{line}"),
        LookupOutcome::NotFound(line) => {
            println!("{line}");
            return Ok(ExitCode::SUCCESS);
        }
        LookupOutcome::Failed(line) => {
            println!("{line}");
            return Ok(ExitCode::FAILURE);
        }
    }

    match pipeline.predict(team_a, team_b) {
        Ok(result) => {
            print_result(&result);
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ PredictError::InvalidInput(_)) => {
            println!("{err}");
            Ok(ExitCode::from(2))
        }
        Err(err) if err.is_not_found() => {
            println!("No fixture found between teams {team_a} and {team_b}.");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("Cannot compute probabilities: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[derive(Debug, PartialEq)]
enum LookupOutcome {
    Found(String),
    NotFound(String),
    Failed(String),
}

fn lookup_outcome(found: Result<Option<Fixture>>, team_a: u32, team_b: u32) -> LookupOutcome {
    match found {
        Ok(Some(f)) => LookupOutcome::Found(format!(
            "Fixture: {} vs {} ({}, {})",
            f.home_name,
            f.away_name,
            f.competition,
            f.date.as_deref().unwrap_or("date unknown")
        )),
        Ok(None) => LookupOutcome::NotFound(format!(
            "No fixture found between teams {team_a} and {team_b}."
        )),
        Err(err) => LookupOutcome::Failed(format!("Cannot read stored fixtures: {err:#}")),
    }
}

fn print_result(result: &ProbabilityResult) {
    let p = result.percents;
    println!("\nOutcome probabilities:");
    println!("{} win: {}%", result.home_name, p.home);
    println!("Draw: {}%", p.draw);
    println!("{} win: {}%", result.away_name, p.away);
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush().context("flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read team id")?;
    Ok(line.trim().to_string())
}

fn parse_team_id(raw: &str) -> Result<u32, PredictError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| PredictError::InvalidInput(format!("`{trimmed}` is not a numeric team ID")))
}

fn parse_args(args: Vec<String>) -> CliArgs {
    let mut out = CliArgs::default();
    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx].as_str();
        if arg == "--offline" {
            out.offline = true;
        } else if let Some(pair) = arg.strip_prefix("--teams=") {
            if let Some((a, b)) = pair.split_once(',') {
                out.teams = Some((a.to_string(), b.to_string()));
            }
        } else if arg == "--teams" {
            if let (Some(a), Some(b)) = (args.get(idx + 1), args.get(idx + 2)) {
                out.teams = Some((a.clone(), b.clone()));
                idx += 2;
            }
        }
        idx += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_teams_and_offline() {
        let parsed = parse_args(args(&["--offline", "--teams", "59", "93"]));
        assert!(parsed.offline);
        assert_eq!(parsed.teams, Some(("59".to_string(), "93".to_string())));

        let parsed = parse_args(args(&["--teams=1,2"]));
        assert!(!parsed.offline);
        assert_eq!(parsed.teams, Some(("1".to_string(), "2".to_string())));
    }

    #[test]
    fn incomplete_teams_flag_is_ignored() {
        assert_eq!(parse_args(args(&["--teams", "5"])), CliArgs::default());
    }

    #[test]
    fn non_numeric_team_id_is_invalid_input() {
        assert!(matches!(
            parse_team_id("abc"),
            Err(PredictError::InvalidInput(_))
        ));
        assert_eq!(parse_team_id(" 42 ").unwrap(), 42);
        assert!(parse_team_id("-3").is_err());
    }

    #[test]
    fn lookup_outcome_maps_each_case() {
        let fixture = Fixture {
            id: 7001,
            home_id: 59,
            away_id: 93,
            home_name: "Arsenal".to_string(),
            away_name: "Burnley".to_string(),
            competition: "Premier league".to_string(),
            date: None,
            home_position: Some(1),
            away_position: None,
        };
        assert_eq!(
            lookup_outcome(Ok(Some(fixture)), 59, 93),
            LookupOutcome::Found(
                "Fixture: Arsenal vs Burnley (Premier league, date unknown)".to_string()
            )
        );
        assert!(matches!(
            lookup_outcome(Ok(None), 59, 93),
            LookupOutcome::NotFound(_)
        ));
        let failed = lookup_outcome(Err(anyhow::anyhow!("invalid fixtures json")), 59, 93);
        assert_eq!(
            failed,
            LookupOutcome::Failed("Cannot read stored fixtures: invalid fixtures json".to_string())
        );
    }
}
