use crate::{
    common::{
        deserialize_decimal, deserialize_optional_decimal, fits_column, validate_density,
        validate_positive_volume, validate_temperature, validate_volume, VOLUME_INTEGER_DIGITS,
    },
    db::{DatabaseAccess, DbPool},
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        unloading::{self, UnloadingStatus},
        unloading_stage,
    },
    reconciliation::UnloadingAggregate,
    reports,
};
use chrono::{NaiveDate, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, Unchanged,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Tank readings taken around an unloading window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct StockReadings {
    /// Automated tank monitor reading before the discharge
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_volume")]
    #[schema(value_type = Option<String>, example = "50000")]
    pub system_stock_before: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_volume")]
    #[schema(value_type = Option<String>, example = "37500")]
    pub system_stock_after: Option<Decimal>,
    /// Dipstick reading before the discharge
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_volume")]
    #[schema(value_type = Option<String>)]
    pub gauge_stock_before: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_volume")]
    #[schema(value_type = Option<String>)]
    pub gauge_stock_after: Option<Decimal>,
}

fn check_dates(load_date: NaiveDate, unload_date: NaiveDate) -> Result<(), ValidationError> {
    if load_date > unload_date {
        let mut err = ValidationError::new("load_date_after_unload_date");
        err.message = Some("load_date must not be after unload_date".into());
        return Err(err);
    }
    Ok(())
}

fn validate_new_unloading_dates(input: &NewUnloading) -> Result<(), ValidationError> {
    check_dates(input.load_date, input.unload_date)
}

fn validate_edit_dates(input: &UnloadingEdit) -> Result<(), ValidationError> {
    check_dates(input.load_date, input.unload_date)
}

/// Request to register a new unloading.
///
/// Numeric fields accept JSON numbers or back-office formatted strings
/// (`"1.234,56"`). When `discharged_volume` is omitted the delivery is treated
/// as single-shot and fully discharged.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_new_unloading_dates"))]
pub struct NewUnloading {
    pub freight_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2026-01-20")]
    pub load_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-01-21")]
    pub unload_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_decimal")]
    #[validate(custom = "validate_positive_volume")]
    #[schema(value_type = String, example = "30000")]
    pub total_volume: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_volume")]
    #[schema(value_type = Option<String>, example = "0")]
    pub discharged_volume: Option<Decimal>,
    #[serde(flatten)]
    #[validate]
    pub readings: StockReadings,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_volume")]
    #[schema(value_type = Option<String>)]
    pub refuel_during_unload: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_temperature")]
    #[schema(value_type = Option<String>, example = "25,5")]
    pub temperature: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_density")]
    #[schema(value_type = Option<String>, example = "0,7450")]
    pub density: Option<Decimal>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Replacement of the editable fields of an unloading.
///
/// `total_volume` is fixed at creation. Absent readings are stored as absent.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_edit_dates"))]
pub struct UnloadingEdit {
    #[schema(value_type = String, format = Date)]
    pub load_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub unload_date: NaiveDate,
    #[serde(flatten)]
    #[validate]
    pub readings: StockReadings,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_volume")]
    #[schema(value_type = Option<String>)]
    pub refuel_during_unload: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_temperature")]
    #[schema(value_type = Option<String>)]
    pub temperature: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_density")]
    #[schema(value_type = Option<String>)]
    pub density: Option<Decimal>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// One partial session. A missing volume counts as zero.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewStage {
    #[schema(value_type = String, format = Date, example = "2026-01-21")]
    pub stage_date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_volume")]
    #[schema(value_type = Option<String>, example = "12000")]
    pub stage_volume: Option<Decimal>,
    #[serde(flatten)]
    #[validate]
    pub readings: StockReadings,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    #[validate(custom = "validate_volume")]
    #[schema(value_type = Option<String>, example = "0")]
    pub refuel_during_stage: Option<Decimal>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Filters for listing unloadings. Dates apply to `unload_date`, inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnloadingFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<UnloadingStatus>,
    pub freight_id: Option<Uuid>,
}

/// Service for recording unloadings and keeping their figures reconciled
#[derive(Clone)]
pub struct UnloadingService {
    db: DatabaseAccess,
    event_sender: Arc<EventSender>,
}

impl UnloadingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db: DatabaseAccess::new(db_pool),
            event_sender,
        }
    }

    /// Registers an unloading and computes its initial figures
    #[instrument(skip(self, input), fields(freight_id = %input.freight_id))]
    pub async fn create(&self, input: NewUnloading) -> Result<UnloadingAggregate, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let event = unloading::Model {
            id: Uuid::new_v4(),
            freight_id: input.freight_id,
            load_date: input.load_date,
            unload_date: input.unload_date,
            total_volume: input.total_volume,
            discharged_volume: Decimal::ZERO,
            system_stock_before: input.readings.system_stock_before,
            system_stock_after: input.readings.system_stock_after,
            gauge_stock_before: input.readings.gauge_stock_before,
            gauge_stock_after: input.readings.gauge_stock_after,
            refuel_during_unload: input.refuel_during_unload,
            temperature: input.temperature,
            density: input.density,
            system_difference: None,
            gauge_difference: None,
            status: UnloadingStatus::Pending,
            notes: normalize_notes(input.notes),
            created_at: now,
            updated_at: now,
        };

        let mut aggregate = UnloadingAggregate::new(event, Vec::new());
        match input.discharged_volume {
            Some(discharged) => aggregate.event.discharged_volume = discharged,
            None => {
                aggregate.recompute_discharged_volume();
            }
        }
        aggregate.recompute_status();
        aggregate.compute_differences();
        ensure_storable(&aggregate)?;

        let to_insert = aggregate.event.clone();
        self.db
            .transaction::<_, _, ServiceError>(move |txn| {
                Box::pin(async move {
                    let existing = unloading::Entity::find()
                        .filter(unloading::Column::FreightId.eq(to_insert.freight_id))
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    if existing.is_some() {
                        return Err(duplicate_freight(to_insert.freight_id));
                    }

                    event_active_model(&to_insert)
                        .insert(txn)
                        .await
                        .map_err(|e| match e.sql_err() {
                            Some(SqlErr::UniqueConstraintViolation(_)) => {
                                duplicate_freight(to_insert.freight_id)
                            }
                            _ => ServiceError::db_error(e),
                        })?;
                    Ok(())
                })
            })
            .await?;

        counter!("unloadings.created", 1);
        info!(
            unloading_id = %aggregate.event.id,
            status = %aggregate.event.status,
            "Unloading created"
        );

        self.event_sender
            .send_or_log(Event::UnloadingCreated {
                unloading_id: aggregate.event.id,
                freight_id: aggregate.event.freight_id,
            })
            .await;
        self.publish_transitions(None, &aggregate.event).await;

        Ok(aggregate)
    }

    /// Fetches an unloading with its stages ordered by date
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<UnloadingAggregate, ServiceError> {
        load_aggregate(self.db.get_pool(), id).await
    }

    /// Lists unloadings, newest unload date first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: UnloadingFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<unloading::Model>, u64), ServiceError> {
        let mut query = unloading::Entity::find();

        if let Some(date_from) = filter.date_from {
            query = query.filter(unloading::Column::UnloadDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(unloading::Column::UnloadDate.lte(date_to));
        }
        if let Some(status) = filter.status {
            query = query.filter(unloading::Column::Status.eq(status));
        }
        if let Some(freight_id) = filter.freight_id {
            query = query.filter(unloading::Column::FreightId.eq(freight_id));
        }

        let paginator = query
            .order_by_desc(unloading::Column::UnloadDate)
            .order_by_desc(unloading::Column::CreatedAt)
            .paginate(self.db.get_pool(), per_page.max(1));

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((items, total))
    }

    /// Replaces dates, readings and observations, then recomputes the
    /// event differences only. Volume and status are left alone, so a manual
    /// `partial` marker survives.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UnloadingEdit,
    ) -> Result<UnloadingAggregate, ServiceError> {
        input.validate()?;

        let aggregate = self
            .db
            .transaction::<_, _, ServiceError>(move |txn| {
                Box::pin(async move {
                    let mut aggregate = load_aggregate(txn, id).await?;
                    let event = &mut aggregate.event;
                    event.load_date = input.load_date;
                    event.unload_date = input.unload_date;
                    event.system_stock_before = input.readings.system_stock_before;
                    event.system_stock_after = input.readings.system_stock_after;
                    event.gauge_stock_before = input.readings.gauge_stock_before;
                    event.gauge_stock_after = input.readings.gauge_stock_after;
                    event.refuel_during_unload = input.refuel_during_unload;
                    event.temperature = input.temperature;
                    event.density = input.density;
                    event.notes = normalize_notes(input.notes);
                    event.updated_at = Utc::now();

                    aggregate.compute_differences();
                    ensure_storable(&aggregate)?;
                    save_event(txn, &aggregate.event).await?;
                    Ok(aggregate)
                })
            })
            .await?;

        self.event_sender
            .send_or_log(Event::UnloadingUpdated(id))
            .await;
        Ok(aggregate)
    }

    /// Assigns a status directly. This is the only way to reach `partial`.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: Uuid,
        status: UnloadingStatus,
    ) -> Result<UnloadingAggregate, ServiceError> {
        let (before, aggregate) = self
            .db
            .transaction::<_, _, ServiceError>(move |txn| {
                Box::pin(async move {
                    let mut aggregate = load_aggregate(txn, id).await?;
                    let before = aggregate.event.clone();
                    aggregate.event.status = status;
                    aggregate.event.updated_at = Utc::now();
                    save_event(txn, &aggregate.event).await?;
                    Ok((before, aggregate))
                })
            })
            .await?;

        self.publish_transitions(Some(&before), &aggregate.event)
            .await;
        Ok(aggregate)
    }

    /// Recomputes volume, status and differences from the stored stages
    #[instrument(skip(self))]
    pub async fn recompute(&self, id: Uuid) -> Result<UnloadingAggregate, ServiceError> {
        let (before, aggregate) = self
            .db
            .transaction::<_, _, ServiceError>(move |txn| {
                Box::pin(async move {
                    let mut aggregate = load_aggregate(txn, id).await?;
                    let before = aggregate.event.clone();
                    aggregate.recompute();
                    aggregate.event.updated_at = Utc::now();
                    ensure_storable(&aggregate)?;
                    save_event(txn, &aggregate.event).await?;
                    Ok((before, aggregate))
                })
            })
            .await?;

        self.publish_transitions(Some(&before), &aggregate.event)
            .await;
        Ok(aggregate)
    }

    /// Records a stage and reconciles the owning unloading
    #[instrument(skip(self, input))]
    pub async fn add_stage(
        &self,
        id: Uuid,
        input: NewStage,
    ) -> Result<(UnloadingAggregate, unloading_stage::Model), ServiceError> {
        input.validate()?;

        let (before, aggregate, stage) = self
            .db
            .transaction::<_, _, ServiceError>(move |txn| {
                Box::pin(async move {
                    let mut aggregate = load_aggregate(txn, id).await?;
                    let before = aggregate.event.clone();

                    let stage = aggregate.add_stage(stage_from_input(
                        Uuid::new_v4(),
                        id,
                        input,
                        Utc::now(),
                    ));
                    aggregate.event.updated_at = Utc::now();
                    ensure_storable(&aggregate)?;

                    stage_active_model(&stage)
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    save_event(txn, &aggregate.event).await?;
                    Ok((before, aggregate, stage))
                })
            })
            .await?;

        counter!("unloadings.stages_added", 1);
        info!(
            unloading_id = %id,
            stage_id = %stage.id,
            discharged_volume = %aggregate.event.discharged_volume,
            "Unloading stage added"
        );

        self.event_sender
            .send_or_log(Event::UnloadingStageAdded {
                unloading_id: id,
                stage_id: stage.id,
                stage_volume: stage.stage_volume,
            })
            .await;
        self.publish_transitions(Some(&before), &aggregate.event)
            .await;

        Ok((aggregate, stage))
    }

    /// Replaces a stage's data and reconciles the owning unloading
    #[instrument(skip(self, input))]
    pub async fn update_stage(
        &self,
        id: Uuid,
        stage_id: Uuid,
        input: NewStage,
    ) -> Result<(UnloadingAggregate, unloading_stage::Model), ServiceError> {
        input.validate()?;

        let (before, aggregate, stage) = self
            .db
            .transaction::<_, _, ServiceError>(move |txn| {
                Box::pin(async move {
                    let mut aggregate = load_aggregate(txn, id).await?;
                    let before = aggregate.event.clone();

                    let created_at = aggregate
                        .stage(stage_id)
                        .map(|existing| existing.created_at)
                        .ok_or_else(|| stage_not_found(id, stage_id))?;
                    let replacement = stage_from_input(stage_id, id, input, created_at);
                    aggregate.replace_stage(replacement);
                    aggregate.event.updated_at = Utc::now();
                    ensure_storable(&aggregate)?;

                    let stage = aggregate
                        .stage(stage_id)
                        .cloned()
                        .ok_or_else(|| stage_not_found(id, stage_id))?;

                    let mut active = stage_active_model(&stage);
                    active.id = Unchanged(stage.id);
                    active.update(txn).await.map_err(ServiceError::db_error)?;
                    save_event(txn, &aggregate.event).await?;
                    Ok((before, aggregate, stage))
                })
            })
            .await?;

        self.event_sender
            .send_or_log(Event::UnloadingStageUpdated {
                unloading_id: id,
                stage_id,
            })
            .await;
        self.publish_transitions(Some(&before), &aggregate.event)
            .await;

        Ok((aggregate, stage))
    }

    /// Removes a stage and reconciles the owning unloading
    #[instrument(skip(self))]
    pub async fn remove_stage(
        &self,
        id: Uuid,
        stage_id: Uuid,
    ) -> Result<UnloadingAggregate, ServiceError> {
        let (before, aggregate) = self
            .db
            .transaction::<_, _, ServiceError>(move |txn| {
                Box::pin(async move {
                    let mut aggregate = load_aggregate(txn, id).await?;
                    let before = aggregate.event.clone();

                    let removed = aggregate
                        .remove_stage(stage_id)
                        .ok_or_else(|| stage_not_found(id, stage_id))?;
                    aggregate.event.updated_at = Utc::now();
                    ensure_storable(&aggregate)?;

                    removed
                        .delete(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    save_event(txn, &aggregate.event).await?;
                    Ok((before, aggregate))
                })
            })
            .await?;

        counter!("unloadings.stages_removed", 1);
        self.event_sender
            .send_or_log(Event::UnloadingStageRemoved {
                unloading_id: id,
                stage_id,
            })
            .await;
        self.publish_transitions(Some(&before), &aggregate.event)
            .await;

        Ok(aggregate)
    }

    /// Deletes an unloading together with its stages
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let stages_removed = self
            .db
            .transaction::<_, _, ServiceError>(move |txn| {
                Box::pin(async move {
                    let event = unloading::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| unloading_not_found(id))?;

                    let stages = unloading_stage::Entity::delete_many()
                        .filter(unloading_stage::Column::UnloadingId.eq(id))
                        .exec(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    event.delete(txn).await.map_err(ServiceError::db_error)?;
                    Ok(stages.rows_affected)
                })
            })
            .await?;

        counter!("unloadings.deleted", 1);
        info!(unloading_id = %id, stages_removed, "Unloading deleted");
        self.event_sender
            .send_or_log(Event::UnloadingDeleted {
                unloading_id: id,
                stages_removed,
            })
            .await;
        Ok(())
    }

    /// Plain-text operator summary of a stored unloading
    #[instrument(skip(self))]
    pub async fn summary(&self, id: Uuid) -> Result<String, ServiceError> {
        let aggregate = self.get(id).await?;
        Ok(reports::operator_summary(&aggregate))
    }

    async fn publish_transitions(
        &self,
        before: Option<&unloading::Model>,
        after: &unloading::Model,
    ) {
        let old_status = before.map(|model| model.status);

        if let Some(old_status) = old_status {
            if old_status != after.status {
                self.event_sender
                    .send_or_log(Event::UnloadingStatusChanged {
                        unloading_id: after.id,
                        old_status,
                        new_status: after.status,
                    })
                    .await;
            }
        }

        if after.status == UnloadingStatus::Complete
            && old_status != Some(UnloadingStatus::Complete)
        {
            self.event_sender
                .send_or_log(Event::UnloadingCompleted(after.id))
                .await;
        }

        let was_over_delivered = before.map(|model| model.is_over_delivered()).unwrap_or(false);
        if after.is_over_delivered() && !was_over_delivered {
            warn!(
                unloading_id = %after.id,
                total_volume = %after.total_volume,
                discharged_volume = %after.discharged_volume,
                "Discharged volume exceeds declared total"
            );
            counter!("unloadings.over_delivered", 1);
            self.event_sender
                .send_or_log(Event::UnloadingOverDelivered {
                    unloading_id: after.id,
                    total_volume: after.total_volume,
                    discharged_volume: after.discharged_volume,
                })
                .await;
        }
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn unloading_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("Unloading {} not found", id))
}

fn stage_not_found(id: Uuid, stage_id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!(
        "Stage {} not found on unloading {}",
        stage_id, id
    ))
}

fn duplicate_freight(freight_id: Uuid) -> ServiceError {
    ServiceError::Conflict(format!(
        "Freight {} already has an unloading",
        freight_id
    ))
}

/// Derived figures (stage sum, differences) can outgrow the volume columns
/// even when every input fits.
fn ensure_storable(aggregate: &UnloadingAggregate) -> Result<(), ServiceError> {
    let event = &aggregate.event;
    let derived = [
        Some(event.discharged_volume),
        event.system_difference,
        event.gauge_difference,
    ]
    .into_iter()
    .chain(
        aggregate
            .stages
            .iter()
            .flat_map(|stage| [stage.system_difference, stage.gauge_difference]),
    )
    .flatten();

    for value in derived {
        if !fits_column(&value, VOLUME_INTEGER_DIGITS) {
            return Err(ServiceError::ValidationError(format!(
                "Derived figure {} exceeds the storable range",
                value
            )));
        }
    }
    Ok(())
}

fn stage_from_input(
    stage_id: Uuid,
    unloading_id: Uuid,
    input: NewStage,
    created_at: chrono::DateTime<Utc>,
) -> unloading_stage::Model {
    unloading_stage::Model {
        id: stage_id,
        unloading_id,
        stage_date: input.stage_date,
        stage_volume: input.stage_volume.unwrap_or(Decimal::ZERO),
        system_stock_before: input.readings.system_stock_before,
        system_stock_after: input.readings.system_stock_after,
        gauge_stock_before: input.readings.gauge_stock_before,
        gauge_stock_after: input.readings.gauge_stock_after,
        refuel_during_stage: input.refuel_during_stage,
        system_difference: None,
        gauge_difference: None,
        notes: normalize_notes(input.notes),
        created_at,
    }
}

/// Loads an unloading and its stages through `conn`.
async fn load_aggregate<C>(conn: &C, id: Uuid) -> Result<UnloadingAggregate, ServiceError>
where
    C: ConnectionTrait,
{
    let event = unloading::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| unloading_not_found(id))?;

    let stages = unloading_stage::Entity::find()
        .filter(unloading_stage::Column::UnloadingId.eq(id))
        .order_by_asc(unloading_stage::Column::StageDate)
        .order_by_asc(unloading_stage::Column::CreatedAt)
        .all(conn)
        .await
        .map_err(ServiceError::db_error)?;

    Ok(UnloadingAggregate::new(event, stages))
}

async fn save_event<C>(conn: &C, event: &unloading::Model) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    let mut active = event_active_model(event);
    active.id = Unchanged(event.id);
    active.update(conn).await.map_err(ServiceError::db_error)?;
    Ok(())
}

fn event_active_model(model: &unloading::Model) -> unloading::ActiveModel {
    unloading::ActiveModel {
        id: Set(model.id),
        freight_id: Set(model.freight_id),
        load_date: Set(model.load_date),
        unload_date: Set(model.unload_date),
        total_volume: Set(model.total_volume),
        discharged_volume: Set(model.discharged_volume),
        system_stock_before: Set(model.system_stock_before),
        system_stock_after: Set(model.system_stock_after),
        gauge_stock_before: Set(model.gauge_stock_before),
        gauge_stock_after: Set(model.gauge_stock_after),
        refuel_during_unload: Set(model.refuel_during_unload),
        temperature: Set(model.temperature),
        density: Set(model.density),
        system_difference: Set(model.system_difference),
        gauge_difference: Set(model.gauge_difference),
        status: Set(model.status),
        notes: Set(model.notes.clone()),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    }
}

fn stage_active_model(model: &unloading_stage::Model) -> unloading_stage::ActiveModel {
    unloading_stage::ActiveModel {
        id: Set(model.id),
        unloading_id: Set(model.unloading_id),
        stage_date: Set(model.stage_date),
        stage_volume: Set(model.stage_volume),
        system_stock_before: Set(model.system_stock_before),
        system_stock_after: Set(model.system_stock_after),
        gauge_stock_before: Set(model.gauge_stock_before),
        gauge_stock_after: Set(model.gauge_stock_after),
        refuel_during_stage: Set(model.refuel_during_stage),
        system_difference: Set(model.system_difference),
        gauge_difference: Set(model.gauge_difference),
        notes: Set(model.notes.clone()),
        created_at: Set(model.created_at),
    }
}
