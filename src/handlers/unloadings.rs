use crate::{
    errors::ServiceError,
    models::{
        unloading::{self, UnloadingStatus},
        unloading_stage,
    },
    reconciliation::UnloadingAggregate,
    services::unloading::{NewStage, NewUnloading, UnloadingEdit, UnloadingFilter},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UnloadingListQuery {
    /// Earliest unload date, inclusive
    #[param(value_type = Option<String>, format = Date)]
    pub date_from: Option<NaiveDate>,
    /// Latest unload date, inclusive
    #[param(value_type = Option<String>, format = Date)]
    pub date_to: Option<NaiveDate>,
    /// pending, in_progress, partial or complete
    #[param(value_type = Option<String>)]
    pub status: Option<UnloadingStatus>,
    pub freight_id: Option<Uuid>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StageResponse {
    pub id: Uuid,
    pub unloading_id: Uuid,
    #[schema(value_type = String, format = Date)]
    pub stage_date: NaiveDate,
    #[schema(value_type = String, example = "12000")]
    pub stage_volume: Decimal,
    #[schema(value_type = Option<String>)]
    pub system_stock_before: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub system_stock_after: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub gauge_stock_before: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub gauge_stock_after: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub refuel_during_stage: Option<Decimal>,
    /// Unexplained gain (positive) or loss (negative) on the tank monitor
    #[schema(value_type = Option<String>, example = "-24500")]
    pub system_difference: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub gauge_difference: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<unloading_stage::Model> for StageResponse {
    fn from(model: unloading_stage::Model) -> Self {
        Self {
            id: model.id,
            unloading_id: model.unloading_id,
            stage_date: model.stage_date,
            stage_volume: model.stage_volume,
            system_stock_before: model.system_stock_before,
            system_stock_after: model.system_stock_after,
            gauge_stock_before: model.gauge_stock_before,
            gauge_stock_after: model.gauge_stock_after,
            refuel_during_stage: model.refuel_during_stage,
            system_difference: model.system_difference,
            gauge_difference: model.gauge_difference,
            notes: model.notes,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnloadingResponse {
    pub id: Uuid,
    pub freight_id: Uuid,
    #[schema(value_type = String, format = Date)]
    pub load_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub unload_date: NaiveDate,
    /// Declared freight volume in liters
    #[schema(value_type = String, example = "30000")]
    pub total_volume: Decimal,
    /// Sum of stage volumes, or the total for single-shot deliveries
    #[schema(value_type = String, example = "12000")]
    pub discharged_volume: Decimal,
    #[schema(value_type = Option<String>)]
    pub system_stock_before: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub system_stock_after: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub gauge_stock_before: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub gauge_stock_after: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub refuel_during_unload: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub temperature: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub density: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub system_difference: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub gauge_difference: Option<Decimal>,
    pub status: UnloadingStatus,
    /// More fuel was discharged than the freight declared
    pub over_delivered: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present on single-unloading responses, omitted in listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<StageResponse>>,
}

impl From<unloading::Model> for UnloadingResponse {
    fn from(model: unloading::Model) -> Self {
        Self {
            over_delivered: model.is_over_delivered(),
            id: model.id,
            freight_id: model.freight_id,
            load_date: model.load_date,
            unload_date: model.unload_date,
            total_volume: model.total_volume,
            discharged_volume: model.discharged_volume,
            system_stock_before: model.system_stock_before,
            system_stock_after: model.system_stock_after,
            gauge_stock_before: model.gauge_stock_before,
            gauge_stock_after: model.gauge_stock_after,
            refuel_during_unload: model.refuel_during_unload,
            temperature: model.temperature,
            density: model.density,
            system_difference: model.system_difference,
            gauge_difference: model.gauge_difference,
            status: model.status,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
            stages: None,
        }
    }
}

impl From<UnloadingAggregate> for UnloadingResponse {
    fn from(aggregate: UnloadingAggregate) -> Self {
        let mut response = UnloadingResponse::from(aggregate.event);
        response.stages = Some(
            aggregate
                .stages
                .into_iter()
                .map(StageResponse::from)
                .collect(),
        );
        response
    }
}

/// A stage mutation together with the reconciled unloading
#[derive(Debug, Serialize, ToSchema)]
pub struct StageMutationResponse {
    pub stage: StageResponse,
    pub unloading: UnloadingResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    #[schema(example = "partial")]
    pub status: UnloadingStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub text: String,
}

pub fn unloading_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_unloadings).post(create_unloading))
        .route(
            "/:id",
            get(get_unloading)
                .put(update_unloading)
                .delete(delete_unloading),
        )
        .route("/:id/stages", post(add_stage))
        .route(
            "/:id/stages/:stage_id",
            put(update_stage).delete(remove_stage),
        )
        .route("/:id/status", put(set_status))
        .route("/:id/recompute", post(recompute_unloading))
        .route("/:id/summary", get(get_summary))
}

#[utoipa::path(
    get,
    path = "/api/v1/unloadings",
    params(UnloadingListQuery),
    responses(
        (status = 200, description = "Unloadings listed", body = ApiResponse<PaginatedResponse<UnloadingResponse>>),
        (status = 400, description = "Invalid filter", body = crate::errors::ErrorResponse)
    ),
    tag = "unloadings"
)]
pub async fn list_unloadings(
    State(state): State<AppState>,
    query: Result<Query<UnloadingListQuery>, QueryRejection>,
) -> ApiResult<PaginatedResponse<UnloadingResponse>> {
    let Query(query) = query?;
    let page = query.page.unwrap_or(1).max(1);
    let limit = state.config.page_size(query.limit);

    let filter = UnloadingFilter {
        date_from: query.date_from,
        date_to: query.date_to,
        status: query.status,
        freight_id: query.freight_id,
    };
    let (records, total) = state.services.unloadings.list(filter, page, limit).await?;
    let items: Vec<UnloadingResponse> = records.into_iter().map(UnloadingResponse::from).collect();

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/unloadings",
    request_body = NewUnloading,
    responses(
        (status = 201, description = "Unloading created", body = ApiResponse<UnloadingResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Freight already unloaded", body = crate::errors::ErrorResponse)
    ),
    tag = "unloadings"
)]
pub async fn create_unloading(
    State(state): State<AppState>,
    payload: Result<Json<NewUnloading>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UnloadingResponse>>), ServiceError> {
    let Json(payload) = payload?;
    let aggregate = state.services.unloadings.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UnloadingResponse::from(aggregate))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/unloadings/:id",
    params(("id" = Uuid, Path, description = "Unloading ID")),
    responses(
        (status = 200, description = "Unloading fetched", body = ApiResponse<UnloadingResponse>),
        (status = 404, description = "Unloading not found", body = crate::errors::ErrorResponse)
    ),
    tag = "unloadings"
)]
pub async fn get_unloading(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<UnloadingResponse> {
    let Path(id) = path?;
    let aggregate = state.services.unloadings.get(id).await?;
    Ok(Json(ApiResponse::success(UnloadingResponse::from(aggregate))))
}

#[utoipa::path(
    put,
    path = "/api/v1/unloadings/:id",
    params(("id" = Uuid, Path, description = "Unloading ID")),
    request_body = UnloadingEdit,
    responses(
        (status = 200, description = "Unloading updated", body = ApiResponse<UnloadingResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unloading not found", body = crate::errors::ErrorResponse)
    ),
    tag = "unloadings"
)]
pub async fn update_unloading(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UnloadingEdit>, JsonRejection>,
) -> ApiResult<UnloadingResponse> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let aggregate = state.services.unloadings.update(id, payload).await?;
    Ok(Json(ApiResponse::success(UnloadingResponse::from(aggregate))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/unloadings/:id",
    params(("id" = Uuid, Path, description = "Unloading ID")),
    responses(
        (status = 204, description = "Unloading and its stages deleted"),
        (status = 404, description = "Unloading not found", body = crate::errors::ErrorResponse)
    ),
    tag = "unloadings"
)]
pub async fn delete_unloading(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ServiceError> {
    let Path(id) = path?;
    state.services.unloadings.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/unloadings/:id/stages",
    params(("id" = Uuid, Path, description = "Unloading ID")),
    request_body = NewStage,
    responses(
        (status = 201, description = "Stage recorded", body = ApiResponse<StageMutationResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unloading not found", body = crate::errors::ErrorResponse)
    ),
    tag = "unloadings"
)]
pub async fn add_stage(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<NewStage>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<StageMutationResponse>>), ServiceError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let (aggregate, stage) = state.services.unloadings.add_stage(id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(StageMutationResponse {
            stage: StageResponse::from(stage),
            unloading: UnloadingResponse::from(aggregate),
        })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/unloadings/:id/stages/:stage_id",
    params(
        ("id" = Uuid, Path, description = "Unloading ID"),
        ("stage_id" = Uuid, Path, description = "Stage ID")
    ),
    request_body = NewStage,
    responses(
        (status = 200, description = "Stage updated", body = ApiResponse<StageMutationResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unloading or stage not found", body = crate::errors::ErrorResponse)
    ),
    tag = "unloadings"
)]
pub async fn update_stage(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    payload: Result<Json<NewStage>, JsonRejection>,
) -> ApiResult<StageMutationResponse> {
    let Path((id, stage_id)) = path?;
    let Json(payload) = payload?;
    let (aggregate, stage) = state
        .services
        .unloadings
        .update_stage(id, stage_id, payload)
        .await?;
    Ok(Json(ApiResponse::success(StageMutationResponse {
        stage: StageResponse::from(stage),
        unloading: UnloadingResponse::from(aggregate),
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/unloadings/:id/stages/:stage_id",
    params(
        ("id" = Uuid, Path, description = "Unloading ID"),
        ("stage_id" = Uuid, Path, description = "Stage ID")
    ),
    responses(
        (status = 200, description = "Stage removed", body = ApiResponse<UnloadingResponse>),
        (status = 404, description = "Unloading or stage not found", body = crate::errors::ErrorResponse)
    ),
    tag = "unloadings"
)]
pub async fn remove_stage(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> ApiResult<UnloadingResponse> {
    let Path((id, stage_id)) = path?;
    let aggregate = state
        .services
        .unloadings
        .remove_stage(id, stage_id)
        .await?;
    Ok(Json(ApiResponse::success(UnloadingResponse::from(aggregate))))
}

#[utoipa::path(
    put,
    path = "/api/v1/unloadings/:id/status",
    params(("id" = Uuid, Path, description = "Unloading ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status assigned", body = ApiResponse<UnloadingResponse>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unloading not found", body = crate::errors::ErrorResponse)
    ),
    tag = "unloadings"
)]
pub async fn set_status(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SetStatusRequest>, JsonRejection>,
) -> ApiResult<UnloadingResponse> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let aggregate = state
        .services
        .unloadings
        .set_status(id, payload.status)
        .await?;
    Ok(Json(ApiResponse::success(UnloadingResponse::from(aggregate))))
}

#[utoipa::path(
    post,
    path = "/api/v1/unloadings/:id/recompute",
    params(("id" = Uuid, Path, description = "Unloading ID")),
    responses(
        (status = 200, description = "Volume, status and differences recomputed", body = ApiResponse<UnloadingResponse>),
        (status = 404, description = "Unloading not found", body = crate::errors::ErrorResponse)
    ),
    tag = "unloadings"
)]
pub async fn recompute_unloading(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<UnloadingResponse> {
    let Path(id) = path?;
    let aggregate = state.services.unloadings.recompute(id).await?;
    Ok(Json(ApiResponse::success(UnloadingResponse::from(aggregate))))
}

#[utoipa::path(
    get,
    path = "/api/v1/unloadings/:id/summary",
    params(("id" = Uuid, Path, description = "Unloading ID")),
    responses(
        (status = 200, description = "Operator summary", body = ApiResponse<SummaryResponse>),
        (status = 404, description = "Unloading not found", body = crate::errors::ErrorResponse)
    ),
    tag = "unloadings"
)]
pub async fn get_summary(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<SummaryResponse> {
    let Path(id) = path?;
    let text = state.services.unloadings.summary(id).await?;
    Ok(Json(ApiResponse::success(SummaryResponse { text })))
}
