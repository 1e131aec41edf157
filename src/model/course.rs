use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Mens,
    Ladies,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Mens => "mens",
            Gender::Ladies => "ladies",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mens" => Ok(Self::Mens),
            "ladies" => Ok(Self::Ladies),
            other => Err(format!("unknown tee gender '{other}'")),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Hole {
    pub number: i32,
    pub par: i32,
    pub stroke_index: i32,
    pub yardage: Option<i32>,
}

/// A rated set of tees on one 9-hole track. Rating is expressed over 9 holes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Tee {
    pub tee_id: i64,
    pub course_name: String,
    pub track_name: String,
    pub name: String,
    pub color: Option<String>,
    pub gender: Gender,
    pub rating: f64,
    pub slope: i32,
    pub holes: Vec<Hole>,
}

impl Tee {
    #[must_use]
    pub fn par(&self) -> i32 {
        self.holes.iter().map(|h| h.par).sum()
    }

    #[must_use]
    pub fn hole(&self, number: i32) -> Option<&Hole> {
        self.holes.iter().find(|h| h.number == number)
    }
}
