use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, IdPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestValidationResponse, DuplicateResourceResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ItemResult;
use crate::models::{CreateItem, Item, ItemPage, ItemQuery, ItemStats, SortOrder, UpdateItem};
use crate::repository::ItemRepository;
use crate::service::ItemService;

/// OpenAPI documentation for the Items API
#[derive(OpenApi)]
#[openapi(
    paths(list_items, create_item, get_item, update_item),
    components(
        schemas(Item, CreateItem, UpdateItem, ItemPage, SortOrder),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            DuplicateResourceResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Items", description = "Product catalog items")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the Stats API
#[derive(OpenApi)]
#[openapi(
    paths(get_stats),
    components(schemas(ItemStats, Item), responses(InternalServerErrorResponse)),
    tags(
        (name = "Stats", description = "Aggregate catalog statistics")
    )
)]
pub struct StatsApiDoc;

/// Create the items router with all HTTP endpoints
pub fn router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/{id}", get(get_item).patch(update_item))
        .with_state(shared_service)
}

/// Create the stats router
///
/// Pass a clone of the service given to [`router`] so both share one stats
/// cache and one write lock.
pub fn stats_router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    Router::new()
        .route("/", get(get_stats))
        .with_state(Arc::new(service))
}

/// List items with search, ordering and pagination
#[utoipa::path(
    get,
    path = "",
    tag = "Items",
    params(ItemQuery),
    responses(
        (status = 200, description = "One page of matching items", body = ItemPage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ItemQuery>,
) -> ItemResult<Json<ItemPage>> {
    let page = service.list_items(query).await?;
    Ok(Json(page))
}

/// Create a new item
#[utoipa::path(
    post,
    path = "",
    tag = "Items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created successfully", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateItem>,
) -> ItemResult<impl IntoResponse> {
    let item = service.create_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Get an item by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = u64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    IdPath(id): IdPath,
) -> ItemResult<Json<Item>> {
    let item = service.get_item(id).await?;
    Ok(Json(item))
}

/// Partially update an item
///
/// The body is taken as raw JSON and decoded by the service once the item
/// is found, so an unknown id is a 404 for any well-formed JSON body.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = u64, Path, description = "Item ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated successfully", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    IdPath(id): IdPath,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Json(body) = payload?;
    let item = service.patch_item(id, body).await?;
    Ok(Json(item))
}

/// Collection statistics
#[utoipa::path(
    get,
    path = "",
    tag = "Stats",
    responses(
        (status = 200, description = "Aggregate statistics", body = ItemStats),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_stats<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
) -> ItemResult<Json<ItemStats>> {
    let stats = service.stats().await?;
    Ok(Json(stats))
}
