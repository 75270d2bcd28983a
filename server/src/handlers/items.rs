//! Lost and found item reports.
//!
//! Each resource carries its [`ItemKind`] as resource data.

use actix_web::{web, HttpResponse};
use log::info;
use lost_found_security_core::http::security::AuthenticatedUser;

use crate::error::ApiError;
use crate::model::{Item, ItemKind, NewItem};
use crate::AppState;

fn not_found(id: u64) -> ApiError {
    ApiError::NotFound(format!("Item {} not found", id))
}

pub async fn create_item(
    user: AuthenticatedUser,
    kind: web::Data<ItemKind>,
    state: web::Data<AppState>,
    body: web::Json<NewItem>,
) -> Result<HttpResponse, ApiError> {
    let new_item = body.into_inner();
    if new_item.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Item name is required".to_string()));
    }

    let item = state
        .items
        .create(**kind, new_item, user.get_username())
        .await;
    info!("{} reported {:?} item {}", user.get_username(), item.kind, item.id);
    Ok(HttpResponse::Created().json(item))
}

pub async fn list_items(
    kind: web::Data<ItemKind>,
    state: web::Data<AppState>,
) -> web::Json<Vec<Item>> {
    web::Json(state.items.list(**kind).await)
}

pub async fn my_items(
    user: AuthenticatedUser,
    kind: web::Data<ItemKind>,
    state: web::Data<AppState>,
) -> web::Json<Vec<Item>> {
    web::Json(
        state
            .items
            .list_by_reporter(**kind, user.get_username())
            .await,
    )
}

pub async fn get_item(
    kind: web::Data<ItemKind>,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<web::Json<Item>, ApiError> {
    let id = path.into_inner();
    state
        .items
        .get(**kind, id)
        .await
        .map(web::Json)
        .ok_or_else(|| not_found(id))
}

/// Only the reporter may withdraw a report.
pub async fn delete_item(
    user: AuthenticatedUser,
    kind: web::Data<ItemKind>,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let item = state
        .items
        .get(**kind, id)
        .await
        .ok_or_else(|| not_found(id))?;

    if item.reporter != user.get_username() {
        return Err(ApiError::Forbidden(
            "Only the reporter may delete this item".to_string(),
        ));
    }

    state.items.remove(**kind, id).await;
    info!("{} deleted {:?} item {}", user.get_username(), item.kind, id);
    Ok(HttpResponse::NoContent().finish())
}
