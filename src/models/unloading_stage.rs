use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::reconciliation::{Differences, ReconciliationWindow, StockPair};

/// One partial session of a multi-session unloading.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "unloading_stages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub unloading_id: Uuid,
    pub stage_date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))")]
    pub stage_volume: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub system_stock_before: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub system_stock_after: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub gauge_stock_before: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub gauge_stock_after: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub refuel_during_stage: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub system_difference: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub gauge_difference: Option<Decimal>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::unloading::Entity",
        from = "Column::UnloadingId",
        to = "super::unloading::Column::Id",
        on_delete = "Cascade"
    )]
    Unloading,
}

impl Related<super::unloading::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unloading.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Readings window of this session only.
    pub fn window(&self) -> ReconciliationWindow {
        ReconciliationWindow {
            system: StockPair::new(self.system_stock_before, self.system_stock_after),
            gauge: StockPair::new(self.gauge_stock_before, self.gauge_stock_after),
            discharged: self.stage_volume,
            refuel: self.refuel_during_stage,
        }
    }

    pub fn compute_differences(&mut self) -> Differences {
        let differences = self.window().differences();
        self.system_difference = differences.system;
        self.gauge_difference = differences.gauge;
        differences
    }
}
