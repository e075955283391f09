//! Scheduled production runs and their status machine.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, Result};
use crate::ids::{DepartmentCode, ScheduleId};

/// Lifecycle of a production run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScheduleStatus {
    #[default]
    Planned,
    Scheduled,
    Completed,
    Cancelled,
}

impl ScheduleStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Allowed transitions. `Completed` and `Cancelled` are terminal.
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Planned, Self::Scheduled | Self::Cancelled)
                | (Self::Scheduled, Self::Completed | Self::Cancelled | Self::Planned)
        )
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A planned or completed production run of one recipe on one date.
///
/// `ingredient_suppliers` is positionally aligned with the recipe's
/// ingredient list at confirmation time: entry `i` names the supplier chosen
/// for ingredient `i`. Blank entries mean "not chosen".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledProductionItem {
    pub id: String,
    pub recipe_code: String,
    pub department: DepartmentCode,
    pub planned_qty: f64,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub handler_name: String,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_qty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<u8>,
    #[serde(default)]
    pub ingredient_suppliers: Vec<String>,
    /// Fields this crate does not model, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScheduledProductionItem {
    /// Create a `Planned` run whose id is derived from date, recipe and index.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        recipe_code: impl Into<String>,
        index: u32,
        department: DepartmentCode,
        planned_qty: f64,
        start_time: NaiveTime,
        end_time: NaiveTime,
        handler_name: impl Into<String>,
    ) -> Result<Self> {
        check_quantity(planned_qty)?;
        let recipe_code = recipe_code.into();
        let id = ScheduleId::new(date, recipe_code.clone(), index).to_string();
        Ok(Self {
            id,
            recipe_code,
            department,
            planned_qty,
            date,
            start_time,
            end_time,
            handler_name: handler_name.into(),
            status: ScheduleStatus::Planned,
            actual_qty: None,
            quality_score: None,
            ingredient_suppliers: Vec::new(),
            extra: Map::new(),
        })
    }

    pub fn schedule_id(&self) -> Result<ScheduleId> {
        ScheduleId::parse(&self.id)
    }

    pub fn transition(&mut self, next: ScheduleStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(ModelError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Record the production outcome and move the run to `Completed`.
    pub fn complete(&mut self, actual_qty: f64, quality_score: Option<u8>) -> Result<()> {
        check_quantity(actual_qty)?;
        if let Some(score) = quality_score
            && !(1..=10).contains(&score)
        {
            return Err(ModelError::InvalidQualityScore(score));
        }
        self.transition(ScheduleStatus::Completed)?;
        self.actual_qty = Some(actual_qty);
        self.quality_score = quality_score;
        Ok(())
    }

    /// Supplier the user picked for ingredient `index`, if non-blank.
    pub fn confirmed_supplier(&self, index: usize) -> Option<&str> {
        self.ingredient_suppliers
            .get(index)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

fn check_quantity(value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidQuantity(value))
    }
}

/// `HH:MM` wall-clock times, also accepting `HH:MM:SS` on input.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
