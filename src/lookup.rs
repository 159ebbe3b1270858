use crate::model::Fixture;

/// First fixture pairing the two teams, in either home/away order.
///
/// Fixtures are not deduplicated, so when the window holds two meetings of
/// the same teams the earliest-listed one wins.
pub fn find_fixture(fixtures: &[Fixture], team_a: u32, team_b: u32) -> Option<&Fixture> {
    fixtures.iter().find(|f| f.involves(team_a, team_b))
}
