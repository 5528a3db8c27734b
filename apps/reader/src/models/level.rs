use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// HSK proficiency level, 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Hsk1,
    Hsk2,
    Hsk3,
    Hsk4,
    Hsk5,
}

impl Level {
    pub const ALL: [Level; 5] = [Level::Hsk1, Level::Hsk2, Level::Hsk3, Level::Hsk4, Level::Hsk5];

    pub fn number(self) -> u8 {
        match self {
            Level::Hsk1 => 1,
            Level::Hsk2 => 2,
            Level::Hsk3 => 3,
            Level::Hsk4 => 4,
            Level::Hsk5 => 5,
        }
    }

    pub fn from_number(n: u8) -> Option<Level> {
        Level::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HSK{}", self.number())
    }
}

/// Accepts "HSK3", "hsk3" or a bare "3".
impl FromStr for Level {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = match trimmed.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("hsk") => &trimmed[3..],
            _ => trimmed,
        };
        digits
            .parse::<u8>()
            .ok()
            .and_then(Level::from_number)
            .ok_or_else(|| AppError::Input(format!("unknown level '{s}' (expected HSK1..HSK5)")))
    }
}

/// Coarse article length target selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
    Extended,
}

impl LengthBucket {
    /// Approximate character count requested from the generator.
    pub fn target_chars(self) -> usize {
        match self {
            LengthBucket::Short => 40,
            LengthBucket::Medium => 80,
            LengthBucket::Long => 150,
            LengthBucket::Extended => 400,
        }
    }

    /// Hard ceiling applied by the normalizer.
    pub fn ceiling(self) -> usize {
        match self {
            LengthBucket::Extended => 450,
            _ => 250,
        }
    }

    /// Range label shown to learners.
    pub fn label(self) -> &'static str {
        match self {
            LengthBucket::Short => "1-50字",
            LengthBucket::Medium => "50-100字",
            LengthBucket::Long => "100-200字",
            LengthBucket::Extended => "200字以上",
        }
    }
}

impl FromStr for LengthBucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(LengthBucket::Short),
            "medium" => Ok(LengthBucket::Medium),
            "long" => Ok(LengthBucket::Long),
            "extended" => Ok(LengthBucket::Extended),
            other => Err(AppError::Input(format!(
                "unknown length '{other}' (expected short, medium, long or extended)"
            ))),
        }
    }
}
