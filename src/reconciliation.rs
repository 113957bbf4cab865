//! Stock reconciliation for fuel unloadings.
//!
//! Everything in this module is synchronous and free of I/O. Callers load a
//! consistent snapshot of one unloading and its stages, run the operations
//! below in order, and persist the result:
//!
//! 1. [`UnloadingAggregate::recompute_discharged_volume`]
//! 2. [`UnloadingAggregate::recompute_status`]
//! 3. [`UnloadingAggregate::compute_differences`]
//!
//! Values are kept at full precision; rounding is a display concern.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{
    unloading::{self, UnloadingStatus},
    unloading_stage,
};

/// Before/after tank readings of one kind (system or gauge).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockPair {
    pub before: Option<Decimal>,
    pub after: Option<Decimal>,
}

impl StockPair {
    pub fn new(before: Option<Decimal>, after: Option<Decimal>) -> Self {
        Self { before, after }
    }
}

/// Unexplained stock difference across an unloading window.
///
/// `(after - before) - discharged + refuel`. Returns `None` when either
/// reading is missing. A missing refuel counts as zero. Negative values mean
/// the tank lost more than the discharge explains; positive values are a gain.
pub fn discrepancy(
    before: Option<Decimal>,
    after: Option<Decimal>,
    discharged: Decimal,
    refuel: Option<Decimal>,
) -> Option<Decimal> {
    let (before, after) = (before?, after?);
    let refuel = refuel.unwrap_or(Decimal::ZERO);
    Some((after - before) - discharged + refuel)
}

/// System and gauge discrepancies. They are never combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Differences {
    #[schema(value_type = Option<String>, example = "-24500")]
    pub system: Option<Decimal>,
    #[schema(value_type = Option<String>, example = "-30")]
    pub gauge: Option<Decimal>,
}

/// Inputs for one discrepancy computation, either a whole unloading or a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationWindow {
    pub system: StockPair,
    pub gauge: StockPair,
    pub discharged: Decimal,
    pub refuel: Option<Decimal>,
}

impl ReconciliationWindow {
    pub fn differences(&self) -> Differences {
        Differences {
            system: discrepancy(
                self.system.before,
                self.system.after,
                self.discharged,
                self.refuel,
            ),
            gauge: discrepancy(
                self.gauge.before,
                self.gauge.after,
                self.discharged,
                self.refuel,
            ),
        }
    }
}

/// Status implied by the discharged volume. Never yields `Partial`.
pub fn derive_status(discharged: Decimal, total: Decimal) -> UnloadingStatus {
    if discharged >= total {
        UnloadingStatus::Complete
    } else if discharged > Decimal::ZERO {
        UnloadingStatus::InProgress
    } else {
        UnloadingStatus::Pending
    }
}

/// An unloading together with the stages it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct UnloadingAggregate {
    pub event: unloading::Model,
    pub stages: Vec<unloading_stage::Model>,
}

impl UnloadingAggregate {
    pub fn new(event: unloading::Model, stages: Vec<unloading_stage::Model>) -> Self {
        Self { event, stages }
    }

    /// Sum of stage volumes, or the declared total when no stage was recorded
    /// (a single-shot unloading is fully discharged).
    pub fn recompute_discharged_volume(&mut self) -> Decimal {
        self.event.discharged_volume = if self.stages.is_empty() {
            self.event.total_volume
        } else {
            self.stages.iter().map(|stage| stage.stage_volume).sum()
        };
        self.event.discharged_volume
    }

    /// Derives `pending`, `in_progress` or `complete` from the current
    /// discharged volume. Overwrites a manual `partial` marker.
    pub fn recompute_status(&mut self) -> UnloadingStatus {
        self.event.status = derive_status(self.event.discharged_volume, self.event.total_volume);
        self.event.status
    }

    /// Event-level differences, measured over the whole unloading window.
    pub fn compute_differences(&mut self) -> Differences {
        self.event.compute_differences()
    }

    /// Runs the full chain after the stage set changed.
    pub fn recompute(&mut self) -> Differences {
        self.recompute_discharged_volume();
        self.recompute_status();
        self.compute_differences()
    }

    /// Computes the stage's own differences and takes ownership of it.
    pub fn add_stage(&mut self, mut stage: unloading_stage::Model) -> unloading_stage::Model {
        stage.unloading_id = self.event.id;
        stage.compute_differences();
        self.stages.push(stage.clone());
        self.sort_stages();
        self.recompute();
        stage
    }

    /// Replaces a stage with the same id. Returns `false` when it is not owned.
    pub fn replace_stage(&mut self, mut stage: unloading_stage::Model) -> bool {
        let Some(slot) = self.stages.iter_mut().find(|s| s.id == stage.id) else {
            return false;
        };
        stage.unloading_id = self.event.id;
        stage.compute_differences();
        *slot = stage;
        self.sort_stages();
        self.recompute();
        true
    }

    /// Drops a stage. Returns the removed record when it was owned.
    pub fn remove_stage(&mut self, stage_id: uuid::Uuid) -> Option<unloading_stage::Model> {
        let position = self.stages.iter().position(|s| s.id == stage_id)?;
        let removed = self.stages.remove(position);
        self.recompute();
        Some(removed)
    }

    pub fn stage(&self, stage_id: uuid::Uuid) -> Option<&unloading_stage::Model> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    pub fn is_over_delivered(&self) -> bool {
        self.event.is_over_delivered()
    }

    fn sort_stages(&mut self) {
        self.stages
            .sort_by(|a, b| a.stage_date.cmp(&b.stage_date).then(a.created_at.cmp(&b.created_at)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn event(total: Decimal) -> unloading::Model {
        let now = Utc::now();
        unloading::Model {
            id: Uuid::new_v4(),
            freight_id: Uuid::new_v4(),
            load_date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
            unload_date: NaiveDate::from_ymd_opt(2026, 1, 21).unwrap(),
            total_volume: total,
            discharged_volume: Decimal::ZERO,
            system_stock_before: None,
            system_stock_after: None,
            gauge_stock_before: None,
            gauge_stock_after: None,
            refuel_during_unload: None,
            temperature: None,
            density: None,
            system_difference: None,
            gauge_difference: None,
            status: UnloadingStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn stage(volume: Decimal, day: u32) -> unloading_stage::Model {
        unloading_stage::Model {
            id: Uuid::new_v4(),
            unloading_id: Uuid::nil(),
            stage_date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            stage_volume: volume,
            system_stock_before: None,
            system_stock_after: None,
            gauge_stock_before: None,
            gauge_stock_after: None,
            refuel_during_stage: None,
            system_difference: None,
            gauge_difference: None,
            notes: None,
            created_at: Utc::now() + Duration::milliseconds(day as i64),
        }
    }

    #[test]
    fn discrepancy_applies_refuel_offset() {
        let result = discrepancy(Some(dec!(100)), Some(dec!(85)), dec!(20), Some(dec!(5)));
        assert_eq!(result, Some(dec!(-30)));
    }

    #[test]
    fn missing_refuel_equals_zero_refuel() {
        let without = discrepancy(Some(dec!(50000)), Some(dec!(37500)), dec!(12000), None);
        let zero = discrepancy(
            Some(dec!(50000)),
            Some(dec!(37500)),
            dec!(12000),
            Some(Decimal::ZERO),
        );
        assert_eq!(without, zero);
        assert_eq!(without, Some(dec!(-24500)));
    }

    #[rstest]
    #[case(None, Some(dec!(10)))]
    #[case(Some(dec!(10)), None)]
    #[case(None, None)]
    fn missing_reading_is_not_computable(
        #[case] before: Option<Decimal>,
        #[case] after: Option<Decimal>,
    ) {
        assert_eq!(discrepancy(before, after, dec!(5), Some(dec!(1))), None);
    }

    #[test]
    fn discrepancy_keeps_full_precision() {
        let result = discrepancy(
            Some(dec!(1000.123)),
            Some(dec!(1500.4567)),
            dec!(500.0001),
            Some(dec!(0.0002)),
        );
        assert_eq!(result, Some(dec!(0.3338)));
    }

    #[test]
    fn one_missing_kind_leaves_other_computable() {
        let window = ReconciliationWindow {
            system: StockPair::new(Some(dec!(100)), Some(dec!(85))),
            gauge: StockPair::new(Some(dec!(100)), None),
            discharged: dec!(20),
            refuel: Some(dec!(5)),
        };
        let differences = window.differences();
        assert_eq!(differences.system, Some(dec!(-30)));
        assert_eq!(differences.gauge, None);
    }

    #[rstest]
    #[case(dec!(0), dec!(40), UnloadingStatus::Pending)]
    #[case(dec!(20), dec!(40), UnloadingStatus::InProgress)]
    #[case(dec!(40), dec!(40), UnloadingStatus::Complete)]
    #[case(dec!(45), dec!(40), UnloadingStatus::Complete)]
    fn status_follows_discharged_volume(
        #[case] discharged: Decimal,
        #[case] total: Decimal,
        #[case] expected: UnloadingStatus,
    ) {
        assert_eq!(derive_status(discharged, total), expected);
    }

    #[test]
    fn stages_sum_into_discharged_volume() {
        let mut aggregate =
            UnloadingAggregate::new(event(dec!(40)), vec![stage(dec!(10.0), 21), stage(dec!(15.5), 22)]);
        assert_eq!(aggregate.recompute_discharged_volume(), dec!(25.5));
    }

    #[test]
    fn no_stages_means_single_shot() {
        let mut aggregate = UnloadingAggregate::new(event(dec!(40.0)), vec![]);
        assert_eq!(aggregate.recompute_discharged_volume(), dec!(40.0));
        assert_eq!(aggregate.recompute_status(), UnloadingStatus::Complete);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut aggregate =
            UnloadingAggregate::new(event(dec!(40)), vec![stage(dec!(10.0), 21), stage(dec!(15.5), 22)]);
        let first = aggregate.recompute();
        let snapshot = aggregate.clone();
        let second = aggregate.recompute();
        assert_eq!(first, second);
        assert_eq!(snapshot, aggregate);
    }

    #[test]
    fn partial_survives_until_explicit_recompute() {
        let mut aggregate = UnloadingAggregate::new(event(dec!(40)), vec![stage(dec!(10), 21)]);
        aggregate.event.status = UnloadingStatus::Partial;

        aggregate.compute_differences();
        assert_eq!(aggregate.event.status, UnloadingStatus::Partial);

        aggregate.recompute_discharged_volume();
        assert_eq!(aggregate.recompute_status(), UnloadingStatus::InProgress);
    }

    #[test]
    fn first_stage_of_large_delivery() {
        let mut aggregate = UnloadingAggregate::new(event(dec!(30000)), vec![]);
        let mut first = stage(dec!(12000), 21);
        first.system_stock_before = Some(dec!(50000));
        first.system_stock_after = Some(dec!(37500));
        first.refuel_during_stage = Some(Decimal::ZERO);

        let added = aggregate.add_stage(first);

        assert_eq!(added.system_difference, Some(dec!(-24500)));
        assert_eq!(added.unloading_id, aggregate.event.id);
        assert_eq!(aggregate.event.discharged_volume, dec!(12000));
        assert_eq!(aggregate.event.status, UnloadingStatus::InProgress);
    }

    #[test]
    fn event_differences_ignore_stage_readings() {
        let mut base = event(dec!(1000));
        base.system_stock_before = Some(dec!(5000));
        base.system_stock_after = Some(dec!(3990));
        let mut aggregate = UnloadingAggregate::new(base, vec![]);

        let mut s = stage(dec!(1000), 21);
        s.system_stock_before = Some(dec!(9999));
        s.system_stock_after = Some(dec!(1));
        aggregate.add_stage(s);

        // (3990 - 5000) - 1000 + 0
        assert_eq!(aggregate.event.system_difference, Some(dec!(-2010)));
    }

    #[test]
    fn removing_last_stage_falls_back_to_single_shot() {
        let only = stage(dec!(10), 21);
        let only_id = only.id;
        let mut aggregate = UnloadingAggregate::new(event(dec!(40)), vec![]);
        aggregate.add_stage(only);
        assert_eq!(aggregate.event.status, UnloadingStatus::InProgress);

        let removed = aggregate.remove_stage(only_id);

        assert!(removed.is_some());
        assert_eq!(aggregate.event.discharged_volume, dec!(40));
        assert_eq!(aggregate.event.status, UnloadingStatus::Complete);
    }

    #[test]
    fn replace_stage_updates_totals() {
        let first = stage(dec!(10), 21);
        let mut edited = first.clone();
        let mut aggregate = UnloadingAggregate::new(event(dec!(40)), vec![]);
        aggregate.add_stage(first);
        aggregate.add_stage(stage(dec!(5), 22));

        edited.stage_volume = dec!(35);
        assert!(aggregate.replace_stage(edited));

        assert_eq!(aggregate.event.discharged_volume, dec!(40));
        assert_eq!(aggregate.event.status, UnloadingStatus::Complete);
        assert!(!aggregate.replace_stage(stage(dec!(1), 23)));
    }

    #[test]
    fn over_delivery_is_complete_and_flagged() {
        let mut aggregate = UnloadingAggregate::new(event(dec!(40)), vec![]);
        aggregate.add_stage(stage(dec!(30), 21));
        aggregate.add_stage(stage(dec!(15), 22));

        assert_eq!(aggregate.event.discharged_volume, dec!(45));
        assert_eq!(aggregate.event.status, UnloadingStatus::Complete);
        assert!(aggregate.is_over_delivered());
    }
}
