use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `team_id -> table_position` for one competition (1 = best).
pub type Standings = HashMap<u32, u32>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u64,
    pub home_id: u32,
    pub away_id: u32,
    pub home_name: String,
    pub away_name: String,
    pub competition: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub home_position: Option<u32>,
    #[serde(default)]
    pub away_position: Option<u32>,
}

impl Fixture {
    /// True when the fixture pairs the two teams, in either order.
    pub fn involves(&self, team_a: u32, team_b: u32) -> bool {
        (self.home_id == team_a && self.away_id == team_b)
            || (self.home_id == team_b && self.away_id == team_a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team_id: u32,
    #[serde(default)]
    pub goals_scored_per_match: f64,
    #[serde(default)]
    pub clean_sheets_ratio: f64,
    #[serde(default)]
    pub form_ratio: f64,
}

impl TeamStats {
    /// Builds stats with every signal clamped to a finite non-negative value.
    pub fn new(team_id: u32, goals: f64, clean_sheets: f64, form: f64) -> Self {
        Self {
            team_id,
            goals_scored_per_match: non_negative(goals),
            clean_sheets_ratio: non_negative(clean_sheets),
            form_ratio: non_negative(form),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.goals_scored_per_match == 0.0
            && self.clean_sheets_ratio == 0.0
            && self.form_ratio == 0.0
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Unrounded three-way distribution, each component in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbs {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeProbs {
    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

/// Whole percentage points; always sums to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomePercents {
    pub home: u8,
    pub draw: u8,
    pub away: u8,
}

impl OutcomePercents {
    pub fn total(&self) -> u32 {
        self.home as u32 + self.draw as u32 + self.away as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityResult {
    pub home_name: String,
    pub away_name: String,
    pub probs: OutcomeProbs,
    pub percents: OutcomePercents,
}
