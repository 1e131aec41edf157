mod common;

use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{App, test};
use serde_json::{Value, json};

use rusty_golf_league::record::RecordConfig;
use rusty_golf_league::score::{MatchValidationResponse, RoundValidationResponse};
use rusty_golf_league::server;

fn hole(number: i32, par: i32, stroke_index: i32, gross_score: i32) -> Value {
    json!({ "number": number, "par": par, "stroke_index": stroke_index, "gross_score": gross_score })
}

#[actix_web::test]
async fn test8_validate_round_endpoint() {
    let app = test::init_service(App::new().configure(server::configure)).await;

    let body = json!({
        "date_played": "2023-06-06",
        "course_handicap": 15,
        "holes": [hole(1, 4, 7, 11), hole(2, 4, 1, 5)]
    });
    let req = test::TestRequest::post()
        .uri("/rounds/validate")
        .set_json(&body)
        .to_request();
    let response: RoundValidationResponse = test::call_and_read_body_json(&app, req).await;
    assert!(!response.is_valid);
    assert_eq!(7, response.holes[0].adjusted_gross_score);
    assert!(response.holes[1].is_valid);
}

#[actix_web::test]
async fn test8_validate_match_endpoint() {
    let app = test::init_service(App::new().configure(server::configure)).await;

    let body = json!({
        "date_played": "2023-06-06",
        "format": { "format": "best_ball", "count": 1 },
        "home_team": [
            { "golfer_id": 1, "course_handicap": 4, "holes": [hole(1, 4, 7, 4), hole(2, 4, 1, 5)] },
            { "golfer_id": 2, "course_handicap": 6, "holes": [hole(1, 4, 7, 6), hole(2, 4, 1, 4)] }
        ],
        "away_team": [
            { "golfer_id": 3, "course_handicap": 10, "holes": [hole(1, 4, 7, 5), hole(2, 4, 1, 5)] }
        ]
    });
    let req = test::TestRequest::post()
        .uri("/matches/validate")
        .set_json(&body)
        .to_request();
    let response: MatchValidationResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(10, response.home_team_handicap);
    assert_eq!(Some(4), response.holes[0].home_gross);
    assert!((response.home_score + response.away_score - 4.0).abs() < 1e-9);
}

#[actix_web::test]
async fn test8_best_ball_of_zero_is_a_bad_request() {
    let app = test::init_service(App::new().configure(server::configure)).await;

    let body = json!({
        "date_played": "2023-06-06",
        "format": { "format": "best_ball", "count": 0 },
        "home_team": [{ "golfer_id": 1, "course_handicap": 4, "holes": [hole(1, 4, 7, 4)] }],
        "away_team": [{ "golfer_id": 3, "course_handicap": 10, "holes": [hole(1, 4, 7, 5)] }]
    });
    let req = test::TestRequest::post()
        .uri("/matches/validate")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(StatusCode::BAD_REQUEST, resp.status());
}

#[actix_web::test]
async fn test8_extreme_course_handicap_is_scored() {
    let app = test::init_service(App::new().configure(server::configure)).await;

    let body = json!({
        "date_played": "2021-06-06",
        "course_handicap": i32::MIN,
        "holes": [hole(1, 4, 18, 5)]
    });
    let req = test::TestRequest::post()
        .uri("/rounds/validate")
        .set_json(&body)
        .to_request();
    let response: RoundValidationResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(-1, response.holes[0].handicap_strokes);
}

#[actix_web::test]
async fn test8_storage_backed_endpoints() -> Result<(), Box<dyn std::error::Error>> {
    let storage = common::setup_test_storage(include_str!("test_flight.sql")).await?;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(storage))
            .app_data(Data::new(RecordConfig::default()))
            .configure(server::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/flights/1/standings").to_request();
    let standings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!("Birdie Hunters", standings[0]["team_name"]);

    let req = test::TestRequest::get()
        .uri("/golfers/1/handicap-record?as_of=2023-07-11&today=2023-07-31")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(StatusCode::OK, resp.status());

    let req = test::TestRequest::get()
        .uri("/golfers/404/handicap-record?as_of=2023-07-11")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(StatusCode::NOT_FOUND, resp.status());

    let bad_card = json!({
        "tee_id": 1,
        "date_played": "2023-08-01",
        "round_type": "flight",
        "scoring_type": "individual",
        "golfer_ids": [1],
        "course_handicap": null,
        "holes": [{ "number": 1, "gross_score": 0 }]
    });
    let req = test::TestRequest::post()
        .uri("/rounds")
        .set_json(&bad_card)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, resp.status());

    let shared_card = json!({
        "tee_id": 1,
        "date_played": "2023-08-01",
        "round_type": "flight",
        "scoring_type": "individual",
        "golfer_ids": [1, 3],
        "course_handicap": 20,
        "holes": (1..=9).map(|n| json!({ "number": n, "gross_score": 5 })).collect::<Vec<_>>()
    });
    let req = test::TestRequest::post()
        .uri("/rounds")
        .set_json(&shared_card)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(StatusCode::BAD_REQUEST, resp.status());

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    Ok(())
}
