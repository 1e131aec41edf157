use assert_float_eq::*;
use chrono::NaiveDate;

use rusty_golf_league::handicap::HandicapSystem;
use rusty_golf_league::score::{
    HoleValidationRequest, MatchValidationRequest, RoundValidationRequest, TeamFormat,
    TeamRoundRequest, validate_match, validate_round,
};
use rusty_golf_league::LeagueError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn nine_holes(gross: [i32; 9]) -> Vec<HoleValidationRequest> {
    let layout = [(4, 7), (4, 1), (3, 15), (5, 3), (4, 11), (4, 5), (3, 17), (5, 9), (4, 13)];
    layout
        .iter()
        .zip(gross)
        .enumerate()
        .map(|(i, (&(par, stroke_index), gross_score))| HoleValidationRequest {
            number: i32::try_from(i).unwrap() + 1,
            par,
            stroke_index,
            gross_score,
        })
        .collect()
}

#[test]
fn test1_adjusted_gross_current_rules() {
    let response = validate_round(&RoundValidationRequest {
        date_played: date(2023, 6, 6),
        course_handicap: 15,
        holes: vec![HoleValidationRequest {
            number: 1,
            par: 4,
            stroke_index: 7,
            gross_score: 11,
        }],
    });
    let hole = &response.holes[0];
    assert_eq!(1, hole.handicap_strokes);
    assert_eq!(
        7,
        HandicapSystem::Current.hole_maximum_strokes(4, 7, Some(15))
    );
    assert_eq!(7, hole.adjusted_gross_score);
    assert_eq!(10, hole.net_score);
    // pace of play cap is 2 * par + strokes
    assert_eq!(Some(9), hole.max_gross_score);
    assert!(!hole.is_valid);
}

#[test]
fn test1_course_handicap() {
    assert_eq!(
        15,
        HandicapSystem::Current.course_handicap(36, 34.7, 134, 13.1)
    );
}

#[test]
fn test1_score_differential_current_rules() {
    let differential = HandicapSystem::Current.score_differential(70.9, 121, 83, 0.0);
    assert_float_absolute_eq!(11.3, differential, 1e-9);
}

#[test]
fn test1_legacy_index_short_record() {
    let index = HandicapSystem::Legacy
        .handicap_index(&[13.4, 16.7, 21.2, 13.9])
        .unwrap();
    assert_float_absolute_eq!(13.1, index, 1e-9);
}

#[test]
fn test1_legacy_index_full_record() {
    let index = HandicapSystem::Legacy
        .handicap_index(&[4.5, 5.6, 3.4, 8.7, 6.8, 10.2, 4.3, 8.8, 6.2, 4.8])
        .unwrap();
    assert_float_absolute_eq!(4.3, index, 1e-9);
}

#[test]
fn test1_all_holes_tied_split_the_points() {
    let team = |golfer_id| TeamRoundRequest {
        golfer_id: Some(golfer_id),
        course_handicap: 8,
        holes: nine_holes([5, 5, 4, 6, 5, 5, 3, 6, 5]),
    };
    let response = validate_match(&MatchValidationRequest {
        date_played: date(2023, 7, 11),
        format: TeamFormat::StrokePlay,
        home_team: vec![team(1)],
        away_team: vec![team(2)],
    });
    assert!(response.is_valid);
    assert!(response.neutral_holes.is_empty());
    assert_eq!(response.home_net_total, response.away_net_total);
    assert_float_absolute_eq!(5.5, response.home_score);
    assert_float_absolute_eq!(5.5, response.away_score);
    assert_float_absolute_eq!(11.0, response.home_score + response.away_score);
}

#[test]
fn test1_illegal_card() {
    let request = RoundValidationRequest {
        date_played: date(2023, 7, 11),
        course_handicap: 12,
        // hole 3: gross 0; hole 4: par 5 with one stroke allows at most 11
        holes: nine_holes([5, 6, 0, 12, 5, 5, 3, 6, 4]),
    };
    let response = validate_round(&request);
    assert!(!response.is_valid);
    assert!(!response.holes[2].is_valid);
    assert!(!response.holes[3].is_valid);
    assert_eq!(Some(11), response.holes[3].max_gross_score);
    assert_eq!(vec![3, 4], response.invalid_holes());
    assert!(response.holes.iter().filter(|h| h.is_valid).count() == 7);

    match response.into_result() {
        Err(LeagueError::InvalidCard { holes }) => assert_eq!(vec![3, 4], holes),
        other => panic!("expected an invalid card, got {other:?}"),
    }
}

#[test]
fn test1_legacy_card_has_no_pace_of_play_cap() {
    let response = validate_round(&RoundValidationRequest {
        date_played: date(2021, 8, 10),
        course_handicap: 6,
        holes: nine_holes([5, 6, 4, 14, 5, 5, 3, 6, 4]),
    });
    assert!(response.is_valid);
    assert_eq!(None, response.holes[3].max_gross_score);
    // equitable stroke control caps a 6 handicap at 7
    assert_eq!(7, response.holes[3].adjusted_gross_score);
}

#[test]
fn test1_plus_handicap_gives_strokes_back() {
    let response = validate_round(&RoundValidationRequest {
        date_played: date(2023, 7, 11),
        course_handicap: -3,
        holes: vec![HoleValidationRequest {
            number: 9,
            par: 4,
            stroke_index: 16,
            gross_score: 4,
        }],
    });
    assert_eq!(-1, response.holes[0].handicap_strokes);
    assert_eq!(5, response.holes[0].net_score);
}
