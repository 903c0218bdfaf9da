//! Grading lottery.
//!
//! A grade is chosen from a single uniform sample partitioned into
//! cumulative bands, rarest first. The mint flag is a second, independent
//! sample that can only succeed at the top grade.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UniformSource;

/// Probability of each grade, rarest first. Sums to 1.
const GRADE_BANDS: [(u8, f64); 10] = [
    (10, 0.02),
    (9, 0.08),
    (8, 0.10),
    (7, 0.14),
    (6, 0.18),
    (5, 0.18),
    (4, 0.12),
    (3, 0.09),
    (2, 0.06),
    (1, 0.03),
];

const MINT_CHANCE: f64 = 1.0 / 3.0;

/// Validation error for out-of-range grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("grade must be between 1 and 10, got {0}")]
pub struct GradeOutOfRange(pub i64);

/// Card quality rating in `1..=10`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(10);

    /// Construct a grade, rejecting values outside `1..=10`.
    pub fn new(value: i64) -> Result<Self, GradeOutOfRange> {
        u8::try_from(value)
            .ok()
            .filter(|grade| (1..=10).contains(grade))
            .map(Self)
            .ok_or(GradeOutOfRange(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Statistics band this grade falls into.
    pub fn band(self) -> GradeBand {
        match self.0 {
            10 => GradeBand::Gem,
            8 | 9 => GradeBand::High,
            5..=7 => GradeBand::Mid,
            _ => GradeBand::Low,
        }
    }
}

impl TryFrom<i64> for Grade {
    type Error = GradeOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Grade> for i64 {
    fn from(value: Grade) -> Self {
        Self::from(value.0)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Coarse grouping of grades used by profile statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeBand {
    /// Grade 10.
    Gem,
    /// Grades 8 and 9.
    High,
    /// Grades 5 to 7.
    Mid,
    /// Grades 1 to 4.
    Low,
}

/// Map a sample in `[0, 1)` to a grade via cumulative thresholds.
///
/// Samples at or beyond the final threshold (floating point slack) land in
/// the most common remaining band, grade 1.
pub fn grade_for_sample(sample: f64) -> Grade {
    let mut cumulative = 0.0;
    for (grade, probability) in GRADE_BANDS {
        cumulative += probability;
        if sample < cumulative {
            return Grade(grade);
        }
    }
    Grade::MIN
}

/// Roll a grade, consuming exactly one sample.
pub fn roll_grade(source: &dyn UniformSource) -> Grade {
    grade_for_sample(source.next_unit())
}

/// Roll the mint flag for `grade`, consuming exactly one sample.
///
/// Only grade 10 can be mint. The sample is drawn for every grade so the
/// random stream stays aligned regardless of the grade rolled.
pub fn roll_mint(source: &dyn UniformSource, grade: Grade) -> bool {
    let sample = source.next_unit();
    grade == Grade::MAX && sample < MINT_CHANCE
}
