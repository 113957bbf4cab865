use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Unloading API",
        version = "0.1.0",
        description = r#"
# Fuel Unloading Reconciliation API

Records fuel deliveries to a station and reconciles tank readings against the
volume actually discharged.

## Features

- **Unloadings**: One record per freight, single-shot or split into stages
- **Stages**: Partial sessions with their own readings and differences
- **Reconciliation**: System (tank monitor) and gauge (dipstick) differences
- **Operator summary**: Plain-text block for messaging apps

## Numeric input

Numeric fields accept JSON numbers or strings in the back-office format:
`"1.234,56"`, `"12,5"`, `"R$ 1.500,00"`. Blank strings mean absent.

## Error Handling

```json
{
  "error": "Conflict",
  "message": "Freight 7f0c... already has an unloading",
  "request_id": "5f1d...",
  "timestamp": "2026-01-21T10:00:00Z"
}
```

## Pagination

List endpoints accept `page` (default 1) and `limit` (server default and cap
come from configuration).
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "unloadings", description = "Unloading and stage endpoints")
    ),
    paths(
        crate::handlers::unloadings::list_unloadings,
        crate::handlers::unloadings::create_unloading,
        crate::handlers::unloadings::get_unloading,
        crate::handlers::unloadings::update_unloading,
        crate::handlers::unloadings::delete_unloading,
        crate::handlers::unloadings::add_stage,
        crate::handlers::unloadings::update_stage,
        crate::handlers::unloadings::remove_stage,
        crate::handlers::unloadings::set_status,
        crate::handlers::unloadings::recompute_unloading,
        crate::handlers::unloadings::get_summary,
    ),
    components(
        schemas(
            crate::services::unloading::NewUnloading,
            crate::services::unloading::UnloadingEdit,
            crate::services::unloading::NewStage,
            crate::services::unloading::StockReadings,
            crate::handlers::unloadings::UnloadingResponse,
            crate::handlers::unloadings::StageResponse,
            crate::handlers::unloadings::StageMutationResponse,
            crate::handlers::unloadings::SetStatusRequest,
            crate::handlers::unloadings::SummaryResponse,
            crate::models::unloading::UnloadingStatus,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDocV1::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_unloading_routes() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Unloading API"));
        assert!(json.contains("/api/v1/unloadings"));
        assert!(json.contains("/api/v1/unloadings/:id/summary"));
    }
}
