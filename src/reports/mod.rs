//! Plain-text summaries that operators paste into messaging apps.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

use crate::reconciliation::UnloadingAggregate;

const DATE_FORMAT: &str = "%d/%m/%y";

/// Rounds for display; stored values keep full precision.
fn fixed(value: Option<Decimal>, places: u32) -> String {
    match value {
        None => String::new(),
        Some(v) => {
            let rounded = v.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven);
            let rounded = if rounded.is_zero() {
                Decimal::new(0, places)
            } else {
                rounded
            };
            format!("{:.*}", places as usize, rounded)
        }
    }
}

fn liters(value: Option<Decimal>) -> String {
    fixed(value, 0)
}

fn date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Renders the operator summary of one unloading and its stages.
pub fn operator_summary(aggregate: &UnloadingAggregate) -> String {
    let event = &aggregate.event;
    let mut text = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(text, "Freight: {}", event.freight_id);
    let _ = writeln!(text, "Load date: {}", date(event.load_date));
    let _ = writeln!(text, "Unload date: {}", date(event.unload_date));
    let _ = writeln!(text, "Volume: {}", liters(Some(event.total_volume)));
    let _ = writeln!(text, "Discharged: {}", liters(Some(event.discharged_volume)));
    let _ = writeln!(text, "Status: {}", event.status);
    let _ = writeln!(text);
    let _ = writeln!(text, "System reading");
    let _ = writeln!(text, "Before: {}", liters(event.system_stock_before));
    let _ = writeln!(text, "After: {}", liters(event.system_stock_after));
    let _ = writeln!(text, "Difference: {}", liters(event.system_difference));
    let _ = writeln!(text);
    let _ = writeln!(text, "Temperature: {}", fixed(event.temperature, 1));
    let _ = writeln!(text, "Density: {}", fixed(event.density, 4));
    let _ = writeln!(text);
    let _ = writeln!(text, "Gauge reading");
    let _ = writeln!(text, "Before: {}", liters(event.gauge_stock_before));
    let _ = writeln!(text, "After: {}", liters(event.gauge_stock_after));
    let _ = write!(text, "Difference: {}", liters(event.gauge_difference));

    if !aggregate.stages.is_empty() {
        let _ = write!(text, "\n\nStages");
        for (index, stage) in aggregate.stages.iter().enumerate() {
            let _ = write!(
                text,
                "\n{}. {} | volume {} | system diff {} | gauge diff {}",
                index + 1,
                date(stage.stage_date),
                liters(Some(stage.stage_volume)),
                liters(stage.system_difference),
                liters(stage.gauge_difference),
            );
        }
    }

    if aggregate.is_over_delivered() {
        let _ = write!(
            text,
            "\n\nOver-delivery: {} above declared volume",
            liters(Some(event.discharged_volume - event.total_volume))
        );
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        unloading::{self, UnloadingStatus},
        unloading_stage,
    };
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn event() -> unloading::Model {
        let now = Utc::now();
        unloading::Model {
            id: Uuid::new_v4(),
            freight_id: Uuid::nil(),
            load_date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
            unload_date: NaiveDate::from_ymd_opt(2026, 1, 21).unwrap(),
            total_volume: dec!(30000),
            discharged_volume: dec!(12000),
            system_stock_before: Some(dec!(50000)),
            system_stock_after: Some(dec!(37500.5)),
            gauge_stock_before: None,
            gauge_stock_after: None,
            refuel_during_unload: None,
            temperature: Some(dec!(25.25)),
            density: Some(dec!(0.745)),
            system_difference: Some(dec!(-24499.5)),
            gauge_difference: None,
            status: UnloadingStatus::InProgress,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn summary_rounds_for_display_only() {
        let aggregate = UnloadingAggregate::new(event(), vec![]);

        let text = operator_summary(&aggregate);

        assert!(text.contains("Load date: 20/01/26"));
        assert!(text.contains("Volume: 30000"));
        assert!(text.contains("After: 37500\n"));
        assert!(text.contains("Difference: -24500\n"));
        assert!(text.contains("Density: 0.7450"));
        assert!(text.ends_with("Difference: "));
        assert_eq!(aggregate.event.system_stock_after, Some(dec!(37500.5)));
    }

    #[test]
    fn summary_lists_stages_and_over_delivery() {
        let mut base = event();
        base.total_volume = dec!(100);
        base.discharged_volume = dec!(120);
        let stage = unloading_stage::Model {
            id: Uuid::new_v4(),
            unloading_id: base.id,
            stage_date: NaiveDate::from_ymd_opt(2026, 1, 22).unwrap(),
            stage_volume: dec!(120),
            system_stock_before: None,
            system_stock_after: None,
            gauge_stock_before: None,
            gauge_stock_after: None,
            refuel_during_stage: None,
            system_difference: None,
            gauge_difference: Some(dec!(-0.4)),
            notes: None,
            created_at: Utc::now(),
        };
        let aggregate = UnloadingAggregate::new(base, vec![stage]);

        let text = operator_summary(&aggregate);

        assert!(text.contains("1. 22/01/26 | volume 120 | system diff  | gauge diff 0"));
        assert!(text.ends_with("Over-delivery: 20 above declared volume"));
    }
}
