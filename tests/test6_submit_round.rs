mod common;

use assert_float_eq::*;

use rusty_golf_league::controller::submit::{HoleScoreInput, RoundSubmission, submit_round};
use rusty_golf_league::model::{RoundType, ScoringType};
use rusty_golf_league::{LeagueError, Storage};

fn submission(golfer_ids: Vec<i64>, gross: [i32; 9]) -> RoundSubmission {
    RoundSubmission {
        tee_id: 1,
        date_played: common::date(2023, 8, 1),
        round_type: RoundType::Flight,
        scoring_type: ScoringType::Individual,
        golfer_ids,
        course_handicap: None,
        holes: gross
            .iter()
            .enumerate()
            .map(|(i, &gross_score)| HoleScoreInput {
                number: i32::try_from(i).unwrap() + 1,
                gross_score,
            })
            .collect(),
    }
}

#[tokio::test]
async fn test6_stores_round_with_derived_fields() -> Result<(), Box<dyn std::error::Error>> {
    let storage = common::setup_test_storage("").await?;

    let summary = submit_round(&storage, &submission(vec![1], [5, 6, 4, 9, 5, 5, 3, 6, 4])).await?;
    // index 12.0 on a 35.0 / 113 tee with par 36: 12 - 1
    assert_eq!(11, summary.playing_handicap);
    assert_eq!(47, summary.gross_score);
    assert_eq!(46, summary.adjusted_gross_score);
    assert_eq!(41, summary.net_score);
    assert_eq!(36, summary.par);
    assert_float_absolute_eq!(11.0, summary.score_differential, 1e-9);

    let rounds = storage
        .rounds_for_golfer(1, common::date(2023, 1, 1), common::date(2023, 12, 31))
        .await?;
    assert_eq!(1, rounds.len());
    assert_eq!(summary.round_id, rounds[0].round_id);
    assert_eq!(36, rounds[0].par);
    assert_eq!(46, rounds[0].adjusted_gross_score);

    let holes = storage.hole_results_for_rounds(&[summary.round_id]).await?;
    assert_eq!(9, holes.len());
    assert_eq!(8, holes[3].adjusted_gross_score);
    assert_eq!(1, holes[3].handicap_strokes);
    assert_eq!(0, holes[2].handicap_strokes);
    Ok(())
}

#[tokio::test]
async fn test6_course_handicap_override() -> Result<(), Box<dyn std::error::Error>> {
    let storage = common::setup_test_storage("").await?;

    let mut request = submission(vec![2], [5, 5, 4, 6, 5, 5, 3, 6, 4]);
    let missing = submit_round(&storage, &request).await;
    assert!(matches!(missing, Err(LeagueError::MissingPrerequisite(_))));

    request.course_handicap = Some(18);
    let summary = submit_round(&storage, &request).await?;
    assert_eq!(18, summary.playing_handicap);
    Ok(())
}

#[tokio::test]
async fn test6_invalid_card_is_not_stored() -> Result<(), Box<dyn std::error::Error>> {
    let storage = common::setup_test_storage("").await?;

    let result = submit_round(&storage, &submission(vec![1], [5, 6, 0, 20, 5, 5, 3, 6, 4])).await;
    match result {
        Err(LeagueError::InvalidCard { holes }) => assert_eq!(vec![3, 4], holes),
        other => panic!("expected an invalid card, got {other:?}"),
    }
    let rounds = storage
        .rounds_for_golfer(1, common::date(2023, 1, 1), common::date(2023, 12, 31))
        .await?;
    assert!(rounds.is_empty());
    Ok(())
}

#[tokio::test]
async fn test6_unknown_references() -> Result<(), Box<dyn std::error::Error>> {
    let storage = common::setup_test_storage("").await?;

    let mut unknown_tee = submission(vec![1], [4; 9]);
    unknown_tee.tee_id = 9;
    assert!(matches!(
        submit_round(&storage, &unknown_tee).await,
        Err(LeagueError::MissingPrerequisite(_))
    ));

    let unknown_golfer = submission(vec![40], [4; 9]);
    assert!(matches!(
        submit_round(&storage, &unknown_golfer).await,
        Err(LeagueError::MissingPrerequisite(_))
    ));

    let mut unknown_hole = submission(vec![1], [4; 9]);
    unknown_hole.holes[8].number = 10;
    assert!(matches!(
        submit_round(&storage, &unknown_hole).await,
        Err(LeagueError::MissingPrerequisite(_))
    ));

    assert!(matches!(
        submit_round(&storage, &submission(vec![], [4; 9])).await,
        Err(LeagueError::MissingPrerequisite(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test6_card_must_cover_every_hole_once() -> Result<(), Box<dyn std::error::Error>> {
    let storage = common::setup_test_storage("").await?;

    let mut short = submission(vec![1], [4; 9]);
    short.holes.truncate(1);
    match submit_round(&storage, &short).await {
        Err(LeagueError::InvalidCard { holes }) => assert_eq!(vec![2, 3, 4, 5, 6, 7, 8, 9], holes),
        other => panic!("expected an invalid card, got {other:?}"),
    }

    let mut repeated = submission(vec![1], [4; 9]);
    repeated.holes[8].number = 3;
    match submit_round(&storage, &repeated).await {
        Err(LeagueError::InvalidCard { holes }) => assert_eq!(vec![3, 9], holes),
        other => panic!("expected an invalid card, got {other:?}"),
    }

    let rounds = storage
        .rounds_for_golfer(1, common::date(2023, 1, 1), common::date(2023, 12, 31))
        .await?;
    assert!(rounds.is_empty());
    Ok(())
}

#[tokio::test]
async fn test6_individual_round_names_one_golfer() -> Result<(), Box<dyn std::error::Error>> {
    let storage = common::setup_test_storage("").await?;

    let mut shared = submission(vec![1, 3], [5, 5, 4, 6, 5, 5, 3, 6, 4]);
    shared.course_handicap = Some(20);
    assert!(matches!(
        submit_round(&storage, &shared).await,
        Err(LeagueError::InvalidRequest(_))
    ));
    let rounds = storage
        .rounds_for_golfer(3, common::date(2023, 1, 1), common::date(2023, 12, 31))
        .await?;
    assert!(rounds.is_empty());

    shared.scoring_type = ScoringType::Group;
    let summary = submit_round(&storage, &shared).await?;
    assert_eq!(20, summary.playing_handicap);
    Ok(())
}
