use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use matchday_odds::lookup::find_fixture;
use matchday_odds::model::{Fixture, TeamStats};
use matchday_odds::team_form::parse_team_form_json;
use matchday_odds::win_prob::{ScoringParams, score_fixture};

const LASTX_JSON: &str = r#"{"success":true,"data":[{"id":59,"goals_scored_per_match":2.4,
"stats":{"clean_sheets_ratio":0.4,"form_ratio":0.8}}]}"#;

fn sample_fixtures(n: u32) -> Vec<Fixture> {
    (0..n)
        .map(|i| Fixture {
            id: i as u64,
            home_id: i * 2,
            away_id: i * 2 + 1,
            home_name: format!("Home {i}"),
            away_name: format!("Away {i}"),
            competition: "Premier league".to_string(),
            date: Some("2026-10-24".to_string()),
            home_position: Some(i % 20 + 1),
            away_position: Some((i + 7) % 20 + 1),
        })
        .collect()
}

fn bench_score_fixture(c: &mut Criterion) {
    let params = ScoringParams::default();
    let fixture = sample_fixtures(1).remove(0);
    let home = TeamStats::new(0, 2.5, 0.4, 0.8);
    let away = TeamStats::new(1, 0.8, 0.1, 0.3);
    c.bench_function("score_fixture", |b| {
        b.iter(|| {
            let r = score_fixture(black_box(&fixture), &home, &away, &params);
            black_box(r.percents);
        })
    });
}

fn bench_lookup(c: &mut Criterion) {
    let fixtures = sample_fixtures(400);
    c.bench_function("find_fixture_last", |b| {
        b.iter(|| black_box(find_fixture(&fixtures, black_box(799), black_box(798)).is_some()))
    });
}

fn bench_team_form_parse(c: &mut Criterion) {
    c.bench_function("team_form_parse", |b| {
        b.iter(|| {
            let stats = parse_team_form_json(59, black_box(LASTX_JSON)).unwrap();
            black_box(stats);
        })
    });
}

criterion_group!(
    benches,
    bench_score_fixture,
    bench_lookup,
    bench_team_form_parse
);
criterion_main!(benches);
