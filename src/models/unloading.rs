use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::reconciliation::{Differences, ReconciliationWindow, StockPair};

/// Lifecycle status of an unloading.
///
/// `Pending`, `InProgress` and `Complete` are derived from the discharged
/// volume. `Partial` is a manual marker that only callers assign.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UnloadingStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "complete")]
    Complete,
}

impl UnloadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnloadingStatus::Pending => "pending",
            UnloadingStatus::InProgress => "in_progress",
            UnloadingStatus::Partial => "partial",
            UnloadingStatus::Complete => "complete",
        }
    }
}

impl FromStr for UnloadingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(UnloadingStatus::Pending),
            "in_progress" | "in-progress" => Ok(UnloadingStatus::InProgress),
            "partial" => Ok(UnloadingStatus::Partial),
            "complete" | "completed" => Ok(UnloadingStatus::Complete),
            other => Err(format!("Unknown unloading status '{}'", other)),
        }
    }
}

/// One fuel delivery being discharged into storage.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "unloadings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub freight_id: Uuid,
    pub load_date: NaiveDate,
    pub unload_date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))")]
    pub total_volume: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))")]
    pub discharged_volume: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub system_stock_before: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub system_stock_after: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub gauge_stock_before: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub gauge_stock_after: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub refuel_during_unload: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((8, 4)))", nullable)]
    pub temperature: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((8, 4)))", nullable)]
    pub density: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub system_difference: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub gauge_difference: Option<Decimal>,
    pub status: UnloadingStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::unloading_stage::Entity")]
    Stages,
}

impl Related<super::unloading_stage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Readings window spanning the whole unloading, independent of stages.
    pub fn window(&self) -> ReconciliationWindow {
        ReconciliationWindow {
            system: StockPair::new(self.system_stock_before, self.system_stock_after),
            gauge: StockPair::new(self.gauge_stock_before, self.gauge_stock_after),
            discharged: self.discharged_volume,
            refuel: self.refuel_during_unload,
        }
    }

    /// Recomputes `system_difference` and `gauge_difference` from the event's
    /// own readings.
    pub fn compute_differences(&mut self) -> Differences {
        let differences = self.window().differences();
        self.system_difference = differences.system;
        self.gauge_difference = differences.gauge;
        differences
    }

    pub fn differences(&self) -> Differences {
        Differences {
            system: self.system_difference,
            gauge: self.gauge_difference,
        }
    }

    pub fn is_over_delivered(&self) -> bool {
        self.discharged_volume > self.total_volume
    }
}
