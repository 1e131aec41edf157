use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{ScoringSnapshot, Storage, StorageError};
use crate::model::{
    Gender, Golfer, HandicapIndex, Hole, HoleResult, MatchResult, NewRound, QualifyingScore,
    RoundCard, RoundRepair, RoundSummary, RoundType, ScoringType, Team, Tee,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const TABLES_AND_DDL: &[(&str, &str)] = &[
    ("course", include_str!("../sql/schema/sqlite/01_course.sql")),
    ("golfer", include_str!("../sql/schema/sqlite/02_golfer.sql")),
    ("flight", include_str!("../sql/schema/sqlite/03_flight.sql")),
    ("golf_round", include_str!("../sql/schema/sqlite/04_round.sql")),
    (
        "qualifying_score",
        include_str!("../sql/schema/sqlite/05_qualifying_score.sql"),
    ),
    (
        "handicap_index",
        include_str!("../sql/schema/sqlite/06_handicap_index.sql"),
    ),
];

pub const TABLE_DROP: &str = include_str!("../sql/schema/sqlite/00_table_drop.sql");

const ROUND_SUMMARY_SELECT: &str = "\
SELECT r.round_id, r.date_played, r.round_type, r.scoring_type, r.tee_id, \
       c.name AS course_name, t.name AS tee_name, t.rating AS tee_rating, t.slope AS tee_slope, \
       (SELECT COALESCE(SUM(h.par), 0) FROM hole h WHERE h.tee_id = t.tee_id) AS tee_par, \
       r.playing_handicap, \
       (SELECT COALESCE(SUM(hr.par), 0) FROM hole_result hr WHERE hr.round_id = r.round_id) AS par, \
       r.gross_score, r.adjusted_gross_score, r.net_score, r.score_differential \
FROM golf_round r \
JOIN round_golfer rg ON rg.round_id = r.round_id \
JOIN tee t ON t.tee_id = r.tee_id \
JOIN track tr ON tr.track_id = t.track_id \
JOIN course c ON c.course_id = tr.course_id \
WHERE rg.golfer_id = ?1 AND r.date_played BETWEEN ?2 AND ?3 \
ORDER BY r.date_played DESC, r.round_id DESC";

fn parse_date(value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| StorageError::new(format!("bad date '{value}': {e}")))
}

fn format_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// SQLite-backed store. One connection behind an async mutex: every trait
/// call holds the lock for its whole read or write, which is what makes a
/// snapshot consistent and a batch atomic.
#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// # Errors
    ///
    /// Will return `Err` if the database file cannot be opened
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the in-memory database cannot be created
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::open(":memory:")
    }

    /// # Errors
    ///
    /// Will return `Err` if any DDL statement fails
    pub async fn create_schema(&self) -> Result<(), StorageError> {
        let schema = TABLES_AND_DDL
            .iter()
            .map(|(_, ddl)| *ddl)
            .collect::<Vec<_>>()
            .join("\n");
        self.execute_batch(&schema).await
    }

    /// # Errors
    ///
    /// Will return `Err` if the batch fails; nothing from it is kept
    pub async fn execute_batch(&self, sql: &str) -> Result<(), StorageError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.commit()?;
        Ok(())
    }
}

fn query_golfers(conn: &Connection, golfer_id: Option<i64>) -> Result<Vec<Golfer>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT golfer_id, name, handicap_index FROM golfer \
         WHERE ?1 IS NULL OR golfer_id = ?1 ORDER BY golfer_id",
    )?;
    let golfers = stmt
        .query_map(params![golfer_id], |row| {
            Ok(Golfer {
                golfer_id: row.get("golfer_id")?,
                name: row.get("name")?,
                handicap_index: row.get("handicap_index")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(golfers)
}

fn query_tee(conn: &Connection, tee_id: i64) -> Result<Option<Tee>, StorageError> {
    let header = conn
        .query_row(
            "SELECT t.tee_id, c.name AS course_name, tr.name AS track_name, t.name, t.color, \
                    t.gender, t.rating, t.slope \
             FROM tee t \
             JOIN track tr ON tr.track_id = t.track_id \
             JOIN course c ON c.course_id = tr.course_id \
             WHERE t.tee_id = ?1",
            params![tee_id],
            |row| {
                Ok((
                    row.get::<_, String>("course_name")?,
                    row.get::<_, String>("track_name")?,
                    row.get::<_, String>("name")?,
                    row.get::<_, Option<String>>("color")?,
                    row.get::<_, String>("gender")?,
                    row.get::<_, f64>("rating")?,
                    row.get::<_, i32>("slope")?,
                ))
            },
        )
        .optional()?;

    let Some((course_name, track_name, name, color, gender, rating, slope)) = header else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT number, par, stroke_index, yardage FROM hole WHERE tee_id = ?1 ORDER BY number",
    )?;
    let holes = stmt
        .query_map(params![tee_id], |row| {
            Ok(Hole {
                number: row.get("number")?,
                par: row.get("par")?,
                stroke_index: row.get("stroke_index")?,
                yardage: row.get("yardage")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Tee {
        tee_id,
        course_name,
        track_name,
        name,
        color,
        gender: gender.parse::<Gender>()?,
        rating,
        slope,
        holes,
    }))
}

struct RoundSummaryRow {
    round_id: i64,
    date_played: String,
    round_type: String,
    scoring_type: String,
    tee_id: i64,
    course_name: String,
    tee_name: String,
    tee_par: i32,
    tee_rating: f64,
    tee_slope: i32,
    playing_handicap: i32,
    par: i32,
    gross_score: i32,
    adjusted_gross_score: i32,
    net_score: i32,
    score_differential: f64,
}

impl TryFrom<RoundSummaryRow> for RoundSummary {
    type Error = StorageError;

    fn try_from(row: RoundSummaryRow) -> Result<Self, Self::Error> {
        Ok(RoundSummary {
            round_id: row.round_id,
            date_played: parse_date(&row.date_played)?,
            round_type: row.round_type.parse::<RoundType>()?,
            scoring_type: row.scoring_type.parse::<ScoringType>()?,
            tee_id: row.tee_id,
            course_name: row.course_name,
            tee_name: row.tee_name,
            tee_par: row.tee_par,
            tee_rating: row.tee_rating,
            tee_slope: row.tee_slope,
            playing_handicap: row.playing_handicap,
            par: row.par,
            gross_score: row.gross_score,
            adjusted_gross_score: row.adjusted_gross_score,
            net_score: row.net_score,
            score_differential: row.score_differential,
        })
    }
}

fn query_rounds_for_golfer(
    conn: &Connection,
    golfer_id: i64,
    min_date: NaiveDate,
    max_date: NaiveDate,
) -> Result<Vec<RoundSummary>, StorageError> {
    let mut stmt = conn.prepare(ROUND_SUMMARY_SELECT)?;
    let rows = stmt
        .query_map(
            params![golfer_id, format_date(min_date), format_date(max_date)],
            |row| {
                Ok(RoundSummaryRow {
                    round_id: row.get("round_id")?,
                    date_played: row.get("date_played")?,
                    round_type: row.get("round_type")?,
                    scoring_type: row.get("scoring_type")?,
                    tee_id: row.get("tee_id")?,
                    course_name: row.get("course_name")?,
                    tee_name: row.get("tee_name")?,
                    tee_par: row.get("tee_par")?,
                    tee_rating: row.get("tee_rating")?,
                    tee_slope: row.get("tee_slope")?,
                    playing_handicap: row.get("playing_handicap")?,
                    par: row.get("par")?,
                    gross_score: row.get("gross_score")?,
                    adjusted_gross_score: row.get("adjusted_gross_score")?,
                    net_score: row.get("net_score")?,
                    score_differential: row.get("score_differential")?,
                })
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(RoundSummary::try_from).collect()
}

fn query_hole_results(
    conn: &Connection,
    round_ids: &[i64],
) -> Result<Vec<HoleResult>, StorageError> {
    if round_ids.is_empty() {
        return Ok(vec![]);
    }
    let placeholders = vec!["?"; round_ids.len()].join(", ");
    let query = format!(
        "SELECT round_id, hole_number, par, stroke_index, gross_score, handicap_strokes, \
                adjusted_gross_score, net_score \
         FROM hole_result WHERE round_id IN ({placeholders}) ORDER BY round_id, hole_number"
    );
    let mut stmt = conn.prepare(&query)?;
    let results = stmt
        .query_map(params_from_iter(round_ids.iter()), |row| {
            Ok(HoleResult {
                round_id: row.get("round_id")?,
                hole_number: row.get("hole_number")?,
                par: row.get("par")?,
                stroke_index: row.get("stroke_index")?,
                gross_score: row.get("gross_score")?,
                handicap_strokes: row.get("handicap_strokes")?,
                adjusted_gross_score: row.get("adjusted_gross_score")?,
                net_score: row.get("net_score")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(results)
}

fn query_qualifying_scores(
    conn: &Connection,
    golfer_id: i64,
    min_year: i32,
) -> Result<Vec<QualifyingScore>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT qualifying_score_id, golfer_id, date_played, score_differential, course_name, \
                tee_rating, tee_slope, adjusted_gross_score \
         FROM qualifying_score \
         WHERE golfer_id = ?1 AND CAST(substr(date_played, 1, 4) AS INTEGER) >= ?2 \
         ORDER BY date_played DESC, qualifying_score_id DESC",
    )?;
    let rows = stmt
        .query_map(params![golfer_id, min_year], |row| {
            Ok((
                row.get::<_, String>("date_played")?,
                QualifyingScore {
                    qualifying_score_id: row.get("qualifying_score_id")?,
                    golfer_id: row.get("golfer_id")?,
                    date_played: NaiveDate::default(),
                    score_differential: row.get("score_differential")?,
                    course_name: row.get("course_name")?,
                    tee_rating: row.get("tee_rating")?,
                    tee_slope: row.get("tee_slope")?,
                    adjusted_gross_score: row.get("adjusted_gross_score")?,
                },
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter()
        .map(|(date_played, score)| {
            Ok(QualifyingScore {
                date_played: parse_date(&date_played)?,
                ..score
            })
        })
        .collect()
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn golfers(&self) -> Result<Vec<Golfer>, StorageError> {
        let conn = self.conn.lock().await;
        query_golfers(&conn, None)
    }

    async fn golfer(&self, golfer_id: i64) -> Result<Option<Golfer>, StorageError> {
        let conn = self.conn.lock().await;
        Ok(query_golfers(&conn, Some(golfer_id))?.into_iter().next())
    }

    async fn tee_metadata(&self, tee_id: i64) -> Result<Option<Tee>, StorageError> {
        let conn = self.conn.lock().await;
        query_tee(&conn, tee_id)
    }

    async fn rounds_for_golfer(
        &self,
        golfer_id: i64,
        min_date: NaiveDate,
        max_date: NaiveDate,
    ) -> Result<Vec<RoundSummary>, StorageError> {
        let conn = self.conn.lock().await;
        query_rounds_for_golfer(&conn, golfer_id, min_date, max_date)
    }

    async fn hole_results_for_rounds(
        &self,
        round_ids: &[i64],
    ) -> Result<Vec<HoleResult>, StorageError> {
        let conn = self.conn.lock().await;
        query_hole_results(&conn, round_ids)
    }

    async fn qualifying_scores_for_golfer(
        &self,
        golfer_id: i64,
        min_year: i32,
    ) -> Result<Vec<QualifyingScore>, StorageError> {
        let conn = self.conn.lock().await;
        query_qualifying_scores(&conn, golfer_id, min_year)
    }

    async fn scoring_snapshot(
        &self,
        golfer_id: i64,
        min_date: NaiveDate,
        max_date: NaiveDate,
    ) -> Result<ScoringSnapshot, StorageError> {
        let conn = self.conn.lock().await;
        let rounds = query_rounds_for_golfer(&conn, golfer_id, min_date, max_date)?;
        let qualifying_scores = query_qualifying_scores(&conn, golfer_id, min_date.year())?;
        let mut tees = HashMap::new();
        for round in &rounds {
            if tees.contains_key(&round.tee_id) {
                continue;
            }
            let tee = query_tee(&conn, round.tee_id)?.ok_or_else(|| {
                StorageError::new(format!("tee {} not found", round.tee_id))
            })?;
            tees.insert(round.tee_id, tee);
        }
        Ok(ScoringSnapshot {
            rounds,
            qualifying_scores,
            tees,
        })
    }

    async fn handicap_history(&self, golfer_id: i64) -> Result<Vec<HandicapIndex>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT golfer_id, round_id, date_posted, round_number, value FROM handicap_index \
             WHERE golfer_id = ?1 ORDER BY date_posted, handicap_index_id",
        )?;
        let rows = stmt
            .query_map(params![golfer_id], |row| {
                Ok((
                    row.get::<_, String>("date_posted")?,
                    HandicapIndex {
                        golfer_id: row.get("golfer_id")?,
                        round_id: row.get("round_id")?,
                        date_posted: NaiveDate::default(),
                        round_number: row.get("round_number")?,
                        value: row.get("value")?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(date_posted, entry)| {
                Ok(HandicapIndex {
                    date_posted: parse_date(&date_posted)?,
                    ..entry
                })
            })
            .collect()
    }

    async fn commit_handicap_batch(&self, entries: &[HandicapIndex]) -> Result<(), StorageError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        for entry in entries {
            let date_posted = format_date(entry.date_posted);
            tx.execute(
                "INSERT INTO handicap_index (golfer_id, round_id, date_posted, round_number, value) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.golfer_id,
                    entry.round_id,
                    date_posted,
                    entry.round_number,
                    entry.value
                ],
            )?;
            let updated = tx.execute(
                "UPDATE golfer SET handicap_index = ?1, handicap_index_updated = ?2 \
                 WHERE golfer_id = ?3",
                params![entry.value, date_posted, entry.golfer_id],
            )?;
            if updated != 1 {
                return Err(StorageError::new(format!(
                    "golfer {} not found",
                    entry.golfer_id
                )));
            }
        }
        tx.commit()?;
        Ok(())
    }

    async fn rounds_played_in_year(&self, year: i32) -> Result<Vec<RoundCard>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT r.round_id, r.date_played, r.playing_handicap, t.rating, t.slope, \
                    r.adjusted_gross_score, r.net_score, r.score_differential \
             FROM golf_round r JOIN tee t ON t.tee_id = r.tee_id \
             WHERE r.date_played BETWEEN ?1 AND ?2 \
             ORDER BY r.date_played, r.round_id",
        )?;
        let rows = stmt
            .query_map(
                params![format!("{year:04}-01-01"), format!("{year:04}-12-31")],
                |row| {
                    Ok((
                        row.get::<_, String>("date_played")?,
                        RoundCard {
                            round_id: row.get("round_id")?,
                            date_played: NaiveDate::default(),
                            playing_handicap: row.get("playing_handicap")?,
                            tee_rating: row.get("rating")?,
                            tee_slope: row.get("slope")?,
                            adjusted_gross_score: row.get("adjusted_gross_score")?,
                            net_score: row.get("net_score")?,
                            score_differential: row.get("score_differential")?,
                            hole_results: vec![],
                        },
                    ))
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let round_ids: Vec<i64> = rows.iter().map(|(_, card)| card.round_id).collect();
        let mut holes_by_round: HashMap<i64, Vec<HoleResult>> = HashMap::new();
        for hole in query_hole_results(&conn, &round_ids)? {
            holes_by_round.entry(hole.round_id).or_default().push(hole);
        }

        rows.into_iter()
            .map(|(date_played, card)| {
                Ok(RoundCard {
                    date_played: parse_date(&date_played)?,
                    hole_results: holes_by_round.remove(&card.round_id).unwrap_or_default(),
                    ..card
                })
            })
            .collect()
    }

    async fn apply_round_repairs(
        &self,
        repairs: &[RoundRepair],
        updated_at: NaiveDateTime,
    ) -> Result<(), StorageError> {
        let updated_at = updated_at.format(TIMESTAMP_FORMAT).to_string();
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        for repair in repairs {
            for hole in &repair.hole_results {
                tx.execute(
                    "UPDATE hole_result SET handicap_strokes = ?1, adjusted_gross_score = ?2, \
                     net_score = ?3 WHERE round_id = ?4 AND hole_number = ?5",
                    params![
                        hole.handicap_strokes,
                        hole.adjusted_gross_score,
                        hole.net_score,
                        repair.round_id,
                        hole.hole_number
                    ],
                )?;
            }
            tx.execute(
                "UPDATE golf_round SET adjusted_gross_score = ?1, net_score = ?2, \
                 score_differential = ?3, date_updated = ?4 WHERE round_id = ?5",
                params![
                    repair.adjusted_gross_score,
                    repair.net_score,
                    repair.score_differential,
                    updated_at,
                    repair.round_id
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn insert_round(&self, round: &NewRound) -> Result<i64, StorageError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let date_played = format_date(round.date_played);
        tx.execute(
            "INSERT INTO golf_round (tee_id, date_played, round_type, scoring_type, \
                playing_handicap, gross_score, adjusted_gross_score, net_score, \
                score_differential, date_updated) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'))",
            params![
                round.tee_id,
                date_played,
                round.round_type.to_string(),
                round.scoring_type.to_string(),
                round.playing_handicap,
                round.gross_score,
                round.adjusted_gross_score,
                round.net_score,
                round.score_differential
            ],
        )?;
        let round_id = tx.last_insert_rowid();
        for golfer_id in &round.golfer_ids {
            tx.execute(
                "INSERT INTO round_golfer (round_id, golfer_id) VALUES (?1, ?2)",
                params![round_id, golfer_id],
            )?;
        }
        for hole in &round.hole_results {
            tx.execute(
                "INSERT INTO hole_result (round_id, hole_number, par, stroke_index, gross_score, \
                    handicap_strokes, adjusted_gross_score, net_score) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    round_id,
                    hole.hole_number,
                    hole.par,
                    hole.stroke_index,
                    hole.gross_score,
                    hole.handicap_strokes,
                    hole.adjusted_gross_score,
                    hole.net_score
                ],
            )?;
        }
        tx.commit()?;
        Ok(round_id)
    }

    async fn teams_in_flight(&self, flight_id: i64) -> Result<Vec<Team>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT team_id, flight_id, name FROM team WHERE flight_id = ?1 ORDER BY team_id",
        )?;
        let teams = stmt
            .query_map(params![flight_id], |row| {
                Ok(Team {
                    team_id: row.get("team_id")?,
                    flight_id: row.get("flight_id")?,
                    name: row.get("name")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(teams)
    }

    async fn match_results(&self, flight_id: i64) -> Result<Vec<MatchResult>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT match_id, flight_id, week, home_team_id, away_team_id, home_score, away_score \
             FROM flight_match WHERE flight_id = ?1 ORDER BY week, match_id",
        )?;
        let results = stmt
            .query_map(params![flight_id], |row| {
                Ok(MatchResult {
                    match_id: row.get("match_id")?,
                    flight_id: row.get("flight_id")?,
                    week: row.get("week")?,
                    home_team_id: row.get("home_team_id")?,
                    away_team_id: row.get("away_team_id")?,
                    home_score: row.get("home_score")?,
                    away_score: row.get("away_score")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(results)
    }
}
