use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use super::round_validation::{
    HoleValidationRequest, RoundValidationRequest, RoundValidationResponse, validate_round,
};
use crate::handicap::{HandicapSystem, MatchPoints};

/// How teammates' hole scores combine into one team score.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum TeamFormat {
    /// Sum of every teammate's score.
    #[default]
    StrokePlay,
    /// Sum of the `count` lowest scores; fewer are summed as they are.
    BestBall { count: NonZeroUsize },
    /// One team ball.
    Scramble,
}

impl TeamFormat {
    fn team_gross(self, scores: &mut [i32]) -> i32 {
        match self {
            Self::StrokePlay => scores.iter().sum(),
            Self::BestBall { count } => {
                scores.sort_unstable();
                scores.iter().take(count.get()).sum()
            }
            Self::Scramble => scores.iter().copied().min().unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TeamRoundRequest {
    pub golfer_id: Option<i64>,
    pub course_handicap: i32,
    pub holes: Vec<HoleValidationRequest>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MatchValidationRequest {
    pub date_played: NaiveDate,
    #[serde(default)]
    pub format: TeamFormat,
    pub home_team: Vec<TeamRoundRequest>,
    pub away_team: Vec<TeamRoundRequest>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HoleWinner {
    Home,
    Away,
    Tie,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MatchHoleResult {
    pub number: i32,
    pub par: i32,
    pub stroke_index: i32,
    pub home_gross: Option<i32>,
    pub away_gross: Option<i32>,
    pub home_handicap_strokes: i32,
    pub away_handicap_strokes: i32,
    pub home_net: Option<i32>,
    pub away_net: Option<i32>,
    /// `None` when either side had nobody on the hole; no points change hands.
    pub winner: Option<HoleWinner>,
    pub home_points: f64,
    pub away_points: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MatchValidationResponse {
    pub date_played: NaiveDate,
    pub format: TeamFormat,
    pub handicap_system: HandicapSystem,
    pub home_team_handicap: i32,
    pub away_team_handicap: i32,
    pub home_rounds: Vec<RoundValidationResponse>,
    pub away_rounds: Vec<RoundValidationResponse>,
    pub holes: Vec<MatchHoleResult>,
    pub home_net_total: i32,
    pub away_net_total: i32,
    pub total_net_winner: Option<HoleWinner>,
    pub home_score: f64,
    pub away_score: f64,
    pub neutral_holes: Vec<i32>,
    pub is_valid: bool,
}

struct HoleLayout {
    par: i32,
    stroke_index: i32,
}

fn winner_of(home: i32, away: i32) -> HoleWinner {
    match home.cmp(&away) {
        std::cmp::Ordering::Less => HoleWinner::Home,
        std::cmp::Ordering::Greater => HoleWinner::Away,
        std::cmp::Ordering::Equal => HoleWinner::Tie,
    }
}

fn points_for(winner: HoleWinner, win: f64, tie: f64, loss: f64) -> (f64, f64) {
    match winner {
        HoleWinner::Home => (win, loss),
        HoleWinner::Away => (loss, win),
        HoleWinner::Tie => (tie, tie),
    }
}

fn team_gross_at(format: TeamFormat, rounds: &[RoundValidationResponse], number: i32) -> Option<i32> {
    let mut scores: Vec<i32> = rounds
        .iter()
        .filter_map(|r| r.hole(number).map(|h| h.gross_score))
        .collect();
    if scores.is_empty() {
        None
    } else {
        Some(format.team_gross(&mut scores))
    }
}

fn team_handicap(team: &[TeamRoundRequest]) -> i32 {
    team.iter()
        .fold(0_i32, |total, r| total.saturating_add(r.course_handicap))
}

fn validate_team(
    date_played: NaiveDate,
    team: &[TeamRoundRequest],
) -> Vec<RoundValidationResponse> {
    team.iter()
        .map(|round| {
            validate_round(&RoundValidationRequest {
                date_played,
                course_handicap: round.course_handicap,
                holes: round.holes.clone(),
            })
        })
        .collect()
}

/// Score a team match hole by hole. The team with the higher combined course
/// handicap receives strokes for the difference on the hardest holes.
#[must_use]
pub fn validate_match(request: &MatchValidationRequest) -> MatchValidationResponse {
    let system = HandicapSystem::for_date(request.date_played);
    let points: MatchPoints = system.match_points();

    let home_rounds = validate_team(request.date_played, &request.home_team);
    let away_rounds = validate_team(request.date_played, &request.away_team);

    let home_team_handicap = team_handicap(&request.home_team);
    let away_team_handicap = team_handicap(&request.away_team);
    let handicap_difference =
        i32::try_from(home_team_handicap.abs_diff(away_team_handicap)).unwrap_or(i32::MAX);

    let mut layout: BTreeMap<i32, HoleLayout> = BTreeMap::new();
    for hole in request
        .home_team
        .iter()
        .chain(request.away_team.iter())
        .flat_map(|r| r.holes.iter())
    {
        layout.entry(hole.number).or_insert(HoleLayout {
            par: hole.par,
            stroke_index: hole.stroke_index,
        });
    }

    let mut holes = Vec::with_capacity(layout.len());
    let mut neutral_holes = Vec::new();
    let (mut home_net_total, mut away_net_total) = (0, 0);
    let (mut home_score, mut away_score) = (0.0, 0.0);

    for (&number, hole) in &layout {
        let strokes = system.hole_handicap_strokes(hole.stroke_index, handicap_difference);
        let (home_handicap_strokes, away_handicap_strokes) =
            match home_team_handicap.cmp(&away_team_handicap) {
                std::cmp::Ordering::Greater => (strokes, 0),
                std::cmp::Ordering::Less => (0, strokes),
                std::cmp::Ordering::Equal => (0, 0),
            };

        let home_gross = team_gross_at(request.format, &home_rounds, number);
        let away_gross = team_gross_at(request.format, &away_rounds, number);
        let home_net = home_gross.map(|g| g.saturating_sub(home_handicap_strokes));
        let away_net = away_gross.map(|g| g.saturating_sub(away_handicap_strokes));

        let winner = match (home_net, away_net) {
            (Some(home), Some(away)) => {
                home_net_total += home;
                away_net_total += away;
                Some(winner_of(home, away))
            }
            _ => {
                neutral_holes.push(number);
                None
            }
        };
        let (home_points, away_points) = winner.map_or((0.0, 0.0), |w| {
            points_for(w, points.hole_win, points.hole_tie, points.hole_loss)
        });
        home_score += home_points;
        away_score += away_points;

        holes.push(MatchHoleResult {
            number,
            par: hole.par,
            stroke_index: hole.stroke_index,
            home_gross,
            away_gross,
            home_handicap_strokes,
            away_handicap_strokes,
            home_net,
            away_net,
            winner,
            home_points,
            away_points,
        });
    }

    let contested = holes.iter().any(|h| h.winner.is_some());
    let total_net_winner = contested.then(|| winner_of(home_net_total, away_net_total));
    if let Some(w) = total_net_winner {
        let (home, away) = points_for(
            w,
            points.total_net_win,
            points.total_net_tie,
            points.total_net_loss,
        );
        home_score += home;
        away_score += away;
    }

    let is_valid = home_rounds
        .iter()
        .chain(away_rounds.iter())
        .all(|r| r.is_valid);

    MatchValidationResponse {
        date_played: request.date_played,
        format: request.format,
        handicap_system: system,
        home_team_handicap,
        away_team_handicap,
        home_rounds,
        away_rounds,
        holes,
        home_net_total,
        away_net_total,
        total_net_winner,
        home_score,
        away_score,
        neutral_holes,
        is_valid,
    }
}
