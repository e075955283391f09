#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ModelError, Result};

/// Department identifier, stored upper-cased (`BAKERY`, `BUTCHERY`, `HMR`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DepartmentCode(String);

impl DepartmentCode {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidDepartment(value));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DepartmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DepartmentCode {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DepartmentCode> for String {
    fn from(code: DepartmentCode) -> Self {
        code.0
    }
}

impl FromStr for DepartmentCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Composite schedule identifier of the form `<date>-<recipeCode>-<index>`.
///
/// The date is ISO formatted and therefore contains dashes itself; the recipe
/// code is whatever sits between the date and the trailing index segment, so
/// recipe codes such as `BR-001` are preserved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleId {
    pub date: NaiveDate,
    pub recipe_code: String,
    pub index: u32,
}

const DATE_PREFIX_LEN: usize = 10;

impl ScheduleId {
    pub fn new(date: NaiveDate, recipe_code: impl Into<String>, index: u32) -> Self {
        Self {
            date,
            recipe_code: recipe_code.into(),
            index,
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = |reason: &str| ModelError::InvalidScheduleId {
            id: raw.to_string(),
            reason: reason.to_string(),
        };

        let (date_part, rest) = match (raw.get(..DATE_PREFIX_LEN), raw.get(DATE_PREFIX_LEN..)) {
            (Some(date), Some(rest)) if rest.starts_with('-') => (date, &rest[1..]),
            _ => return Err(invalid("expected <date>-<recipeCode>-<index>")),
        };
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|_| invalid("date prefix is not YYYY-MM-DD"))?;
        let (recipe_code, index) = rest
            .rsplit_once('-')
            .ok_or_else(|| invalid("missing index segment"))?;
        if recipe_code.trim().is_empty() {
            return Err(invalid("empty recipe code"));
        }
        let index = index
            .parse::<u32>()
            .map_err(|_| invalid("index segment is not a number"))?;

        Ok(Self {
            date,
            recipe_code: recipe_code.to_string(),
            index,
        })
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.date.format("%Y-%m-%d"),
            self.recipe_code,
            self.index
        )
    }
}

impl FromStr for ScheduleId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ScheduleId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ScheduleId> for String {
    fn from(id: ScheduleId) -> Self {
        id.to_string()
    }
}

/// Deterministic audit record uid.
///
/// First 16 bytes of SHA-256 over the schedule id and the confirmation date,
/// rendered as lowercase hex. Confirming the same schedule twice on one day
/// yields the same uid.
pub fn audit_uid(schedule_id: &str, confirmed_on: NaiveDate) -> String {
    let mut hasher = Sha256::new();
    hasher.update(schedule_id.as_bytes());
    hasher.update(b"\x1f");
    hasher.update(confirmed_on.format("%Y-%m-%d").to_string().as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}
