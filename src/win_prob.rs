use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::error::PredictError;
use crate::model::{Fixture, OutcomePercents, OutcomeProbs, ProbabilityResult, TeamStats};

const DEFAULT_LEAGUE_SIZE: u32 = 20;
const DEFAULT_DRAW_SCALE: f64 = 0.28;

/// Relative weight of each signal. Only the ratios between teams matter, so
/// the signal weights need not sum to one (defaults sum to 0.65).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub goals: f64,
    pub clean_sheets: f64,
    pub form: f64,
    pub position: f64,
    /// Home aggregate is multiplied by `1 + home_advantage`.
    pub home_advantage: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            goals: 0.15,
            clean_sheets: 0.10,
            form: 0.10,
            position: 0.30,
            home_advantage: 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default = "default_league_size")]
    pub league_size: u32,
    /// Draw probability of a perfectly even fixture.
    #[serde(default = "default_draw_scale")]
    pub draw_scale: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            league_size: DEFAULT_LEAGUE_SIZE,
            draw_scale: DEFAULT_DRAW_SCALE,
        }
    }
}

fn default_league_size() -> u32 {
    DEFAULT_LEAGUE_SIZE
}

fn default_draw_scale() -> f64 {
    DEFAULT_DRAW_SCALE
}

impl ScoringParams {
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        let named = [
            ("goals", w.goals),
            ("clean_sheets", w.clean_sheets),
            ("form", w.form),
            ("position", w.position),
            ("home_advantage", w.home_advantage),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(anyhow!("weight `{name}` must be a non-negative number, got {value}"));
            }
        }
        if self.league_size == 0 {
            return Err(anyhow!("league size must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.draw_scale) {
            return Err(anyhow!("draw scale must lie in [0, 1], got {}", self.draw_scale));
        }
        Ok(())
    }
}

/// Refuses to score when either side has no statistics.
pub fn compute_match_probabilities(
    fixture: &Fixture,
    home: Option<&TeamStats>,
    away: Option<&TeamStats>,
    params: &ScoringParams,
) -> Result<ProbabilityResult, PredictError> {
    let home = home.ok_or(PredictError::InsufficientStats {
        team_id: fixture.home_id,
    })?;
    let away = away.ok_or(PredictError::InsufficientStats {
        team_id: fixture.away_id,
    })?;
    Ok(score_fixture(fixture, home, away, params))
}

pub fn score_fixture(
    fixture: &Fixture,
    home: &TeamStats,
    away: &TeamStats,
    params: &ScoringParams,
) -> ProbabilityResult {
    let home_score = team_score(home, fixture.home_position, params)
        * (1.0 + signal(params.weights.home_advantage));
    let away_score = team_score(away, fixture.away_position, params);

    let probs = outcome_probs(home_score, away_score, params.draw_scale);
    ProbabilityResult {
        home_name: fixture.home_name.clone(),
        away_name: fixture.away_name.clone(),
        probs,
        percents: round_percents(&probs),
    }
}

/// Weighted aggregate of one team's signals, before any home advantage.
pub fn team_score(stats: &TeamStats, position: Option<u32>, params: &ScoringParams) -> f64 {
    let w = &params.weights;
    signal(stats.goals_scored_per_match) * w.goals
        + signal(stats.clean_sheets_ratio) * w.clean_sheets
        + signal(stats.form_ratio) * w.form
        + position_strength(position, params.league_size) * w.position
}

/// `(max - position) / max`; unknown or out-of-range positions count as last place.
pub fn position_strength(position: Option<u32>, league_size: u32) -> f64 {
    let max = league_size.max(1);
    let pos = position.filter(|p| (1..=max).contains(p)).unwrap_or(max);
    (max - pos) as f64 / max as f64
}

/// `None` when neither team has a usable score.
pub fn raw_home_share(home_score: f64, away_score: f64) -> Option<f64> {
    let total = home_score + away_score;
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    Some(home_score / total)
}

pub fn draw_probability(raw_home_win: f64, draw_scale: f64) -> f64 {
    let imbalance = (raw_home_win - 0.5).abs().min(0.5);
    draw_scale * (1.0 - 2.0 * imbalance)
}

pub fn outcome_probs(home_score: f64, away_score: f64, draw_scale: f64) -> OutcomeProbs {
    let Some(raw) = raw_home_share(home_score, away_score) else {
        return OutcomeProbs {
            home: 0.5,
            draw: 0.0,
            away: 0.5,
        };
    };
    let draw = draw_probability(raw, draw_scale.clamp(0.0, 1.0));
    rebalance(raw, draw)
}

/// Away takes the remainder. When home and draw over-claim, away is floored
/// at exactly zero and the other two are rescaled to sum to one.
pub fn rebalance(home: f64, draw: f64) -> OutcomeProbs {
    let away = 1.0 - home - draw;
    if away >= 0.0 {
        return OutcomeProbs { home, draw, away };
    }
    let claimed = home + draw;
    OutcomeProbs {
        home: home / claimed,
        draw: draw / claimed,
        away: 0.0,
    }
}

/// Largest-remainder rounding to whole percentage points summing to 100.
pub fn round_percents(probs: &OutcomeProbs) -> OutcomePercents {
    let scaled = [probs.home, probs.draw, probs.away].map(|p| signal(p).min(1.0) * 100.0);
    let mut whole = scaled.map(|v| v.floor() as u32);
    let assigned: u32 = whole.iter().sum();
    let mut missing = 100u32.saturating_sub(assigned);

    let mut order = [0usize, 1, 2];
    // Stable sort keeps home, draw, away order on equal remainders.
    order.sort_by(|&a, &b| {
        let ra = scaled[a] - scaled[a].floor();
        let rb = scaled[b] - scaled[b].floor();
        rb.total_cmp(&ra)
    });
    for idx in order.iter().cycle() {
        if missing == 0 {
            break;
        }
        whole[*idx] += 1;
        missing -= 1;
    }

    OutcomePercents {
        home: whole[0].min(100) as u8,
        draw: whole[1].min(100) as u8,
        away: whole[2].min(100) as u8,
    }
}

fn signal(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_strength_rewards_top_of_table() {
        assert_eq!(position_strength(Some(1), 20), 19.0 / 20.0);
        assert_eq!(position_strength(Some(20), 20), 0.0);
        assert_eq!(position_strength(None, 20), 0.0);
        // Out of range is treated like a missing position.
        assert_eq!(position_strength(Some(0), 20), 0.0);
        assert_eq!(position_strength(Some(27), 20), 0.0);
    }

    #[test]
    fn draw_peaks_at_even_match() {
        assert!((draw_probability(0.5, 0.28) - 0.28).abs() < 1e-12);
        assert!(draw_probability(0.99, 0.28) < 0.01);
        assert!(draw_probability(0.01, 0.28) < 0.01);
        assert_eq!(draw_probability(1.0, 0.28), 0.0);
        assert_eq!(draw_probability(0.0, 0.28), 0.0);
    }

    #[test]
    fn rebalance_floors_away_at_zero() {
        let p = rebalance(0.7, 0.5);
        assert_eq!(p.away, 0.0);
        assert!((p.sum() - 1.0).abs() < 1e-12);
        assert!((p.home / p.draw - 0.7 / 0.5).abs() < 1e-9);
    }

    #[test]
    fn rebalance_leaves_valid_triples_alone() {
        let p = rebalance(0.5, 0.2);
        assert_eq!(p.home, 0.5);
        assert_eq!(p.draw, 0.2);
        assert!((p.away - 0.3).abs() < 1e-12);
    }

    #[test]
    fn round_percents_corrects_drift() {
        let third = 1.0 / 3.0;
        let p = round_percents(&OutcomeProbs {
            home: third,
            draw: third,
            away: third,
        });
        assert_eq!(p.total(), 100);
        assert_eq!(p.home, 34);

        let p = round_percents(&OutcomeProbs {
            home: 0.555,
            draw: 0.225,
            away: 0.22,
        });
        assert_eq!(p.total(), 100);
    }

    #[test]
    fn zero_scores_split_evenly_without_draw() {
        let p = outcome_probs(0.0, 0.0, 0.28);
        assert_eq!((p.home, p.draw, p.away), (0.5, 0.0, 0.5));
    }

    #[test]
    fn validate_rejects_bad_params() {
        let mut p = ScoringParams::default();
        assert!(p.validate().is_ok());
        p.draw_scale = 1.5;
        assert!(p.validate().is_err());
        p = ScoringParams::default();
        p.weights.form = -0.1;
        assert!(p.validate().is_err());
        p = ScoringParams::default();
        p.league_size = 0;
        assert!(p.validate().is_err());
    }
}
