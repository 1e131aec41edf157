use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{MatchResult, Team};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TeamStanding {
    pub team_id: i64,
    pub team_name: String,
    pub matches_played: u32,
    pub points_for: f64,
    pub points_against: f64,
}

/// Aggregate scored matches per team. Matches without a result yet do not
/// count. Sorted by points won, then team name.
#[must_use]
pub fn flight_standings(teams: &[Team], results: &[MatchResult]) -> Vec<TeamStanding> {
    let mut standings: HashMap<i64, TeamStanding> = teams
        .iter()
        .map(|t| {
            (
                t.team_id,
                TeamStanding {
                    team_id: t.team_id,
                    team_name: t.name.clone(),
                    matches_played: 0,
                    points_for: 0.0,
                    points_against: 0.0,
                },
            )
        })
        .collect();

    for result in results {
        let (Some(home_score), Some(away_score)) = (result.home_score, result.away_score) else {
            continue;
        };
        for (team_id, scored, conceded) in [
            (result.home_team_id, home_score, away_score),
            (result.away_team_id, away_score, home_score),
        ] {
            if let Some(standing) = standings.get_mut(&team_id) {
                standing.matches_played += 1;
                standing.points_for += scored;
                standing.points_against += conceded;
            }
        }
    }

    let mut standings: Vec<TeamStanding> = standings.into_values().collect();
    standings.sort_by(|a, b| {
        b.points_for
            .total_cmp(&a.points_for)
            .then_with(|| a.team_name.cmp(&b.team_name))
    });
    standings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(team_id: i64, name: &str) -> Team {
        Team {
            team_id,
            flight_id: 1,
            name: name.to_string(),
        }
    }

    fn result(match_id: i64, home: i64, away: i64, scores: Option<(f64, f64)>) -> MatchResult {
        MatchResult {
            match_id,
            flight_id: 1,
            week: i32::try_from(match_id).unwrap(),
            home_team_id: home,
            away_team_id: away,
            home_score: scores.map(|s| s.0),
            away_score: scores.map(|s| s.1),
        }
    }

    #[test]
    fn ranks_by_points_then_name() {
        let teams = [team(1, "Birdies"), team(2, "Aces"), team(3, "Bogeys")];
        let results = [
            result(1, 1, 2, Some((5.5, 5.5))),
            result(2, 3, 1, Some((8.0, 3.0))),
            result(3, 2, 3, None),
        ];
        let standings = flight_standings(&teams, &results);
        let names: Vec<&str> = standings.iter().map(|s| s.team_name.as_str()).collect();
        assert_eq!(vec!["Birdies", "Bogeys", "Aces"], names);
        assert_eq!(2, standings[0].matches_played);
        assert_eq!(1, standings[2].matches_played);
        assert!((standings[2].points_against - 5.5).abs() < f64::EPSILON);
    }
}
