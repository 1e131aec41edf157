use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Golfer {
    pub golfer_id: i64,
    pub name: String,
    pub handicap_index: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Team {
    pub team_id: i64,
    pub flight_id: i64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MatchResult {
    pub match_id: i64,
    pub flight_id: i64,
    pub week: i32,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_score: Option<f64>,
    pub away_score: Option<f64>,
}
