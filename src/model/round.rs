use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    Qualifying,
    Flight,
    Playoff,
    Tournament,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoringType {
    Individual,
    Group,
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoundType::Qualifying => "qualifying",
            RoundType::Flight => "flight",
            RoundType::Playoff => "playoff",
            RoundType::Tournament => "tournament",
        };
        write!(f, "{s}")
    }
}

impl FromStr for RoundType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qualifying" => Ok(Self::Qualifying),
            "flight" => Ok(Self::Flight),
            "playoff" => Ok(Self::Playoff),
            "tournament" => Ok(Self::Tournament),
            other => Err(format!("unknown round type '{other}'")),
        }
    }
}

impl fmt::Display for ScoringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoringType::Individual => "individual",
            ScoringType::Group => "group",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ScoringType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Self::Individual),
            "group" => Ok(Self::Group),
            other => Err(format!("unknown scoring type '{other}'")),
        }
    }
}

/// Derived per-hole values. Always a pure function of gross score, course
/// handicap and the hole.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoleScore {
    pub handicap_strokes: i32,
    pub adjusted_gross_score: i32,
    pub net_score: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HoleResult {
    pub round_id: i64,
    pub hole_number: i32,
    pub par: i32,
    pub stroke_index: i32,
    pub gross_score: i32,
    pub handicap_strokes: i32,
    pub adjusted_gross_score: i32,
    pub net_score: i32,
}

impl HoleResult {
    #[must_use]
    pub fn derived(&self) -> HoleScore {
        HoleScore {
            handicap_strokes: self.handicap_strokes,
            adjusted_gross_score: self.adjusted_gross_score,
            net_score: self.net_score,
        }
    }

    pub fn apply(&mut self, score: HoleScore) {
        self.handicap_strokes = score.handicap_strokes;
        self.adjusted_gross_score = score.adjusted_gross_score;
        self.net_score = score.net_score;
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RoundSummary {
    pub round_id: i64,
    pub date_played: NaiveDate,
    pub round_type: RoundType,
    pub scoring_type: ScoringType,
    pub tee_id: i64,
    pub course_name: String,
    pub tee_name: String,
    pub tee_par: i32,
    pub tee_rating: f64,
    pub tee_slope: i32,
    pub playing_handicap: i32,
    pub par: i32,
    pub gross_score: i32,
    pub adjusted_gross_score: i32,
    pub net_score: i32,
    pub score_differential: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QualifyingScore {
    pub qualifying_score_id: i64,
    pub golfer_id: i64,
    pub date_played: NaiveDate,
    pub score_differential: f64,
    pub course_name: Option<String>,
    pub tee_rating: Option<f64>,
    pub tee_slope: Option<i32>,
    pub adjusted_gross_score: Option<i32>,
}

/// One appended entry of a golfer's index history.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HandicapIndex {
    pub golfer_id: i64,
    pub round_id: Option<i64>,
    pub date_posted: NaiveDate,
    pub round_number: i64,
    pub value: f64,
}

/// Everything needed to recompute the derived fields of one stored card.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RoundCard {
    pub round_id: i64,
    pub date_played: NaiveDate,
    pub playing_handicap: i32,
    pub tee_rating: f64,
    pub tee_slope: i32,
    pub adjusted_gross_score: i32,
    pub net_score: i32,
    pub score_differential: f64,
    pub hole_results: Vec<HoleResult>,
}

/// Rows rewritten for one round by the hole-result repair.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RoundRepair {
    pub round_id: i64,
    pub hole_results: Vec<HoleResult>,
    pub adjusted_gross_score: i32,
    pub net_score: i32,
    pub score_differential: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewRound {
    pub tee_id: i64,
    pub date_played: NaiveDate,
    pub round_type: RoundType,
    pub scoring_type: ScoringType,
    pub golfer_ids: Vec<i64>,
    pub playing_handicap: i32,
    pub gross_score: i32,
    pub adjusted_gross_score: i32,
    pub net_score: i32,
    pub score_differential: f64,
    pub hole_results: Vec<HoleResult>,
}
