//! Customer CRUD handlers
//!
//! Thin HTTP wrappers over [`RecordStore`]: validation failures map to
//! 400, unknown ids to 404, store I/O failures to 500.

use actix_web::web::{Data, Json, Path};
use actix_web::{HttpRequest, HttpResponse};
use tracing::error;

use crate::data::CustomerDraft;
use crate::store::StoreError;

use super::{authorized, AppState};

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().body("invalid or missing bearer token")
}

fn store_error(e: StoreError) -> HttpResponse {
    match e {
        StoreError::MissingField(field) => {
            HttpResponse::BadRequest().body(format!("missing required field: {}", field))
        }
        other => {
            error!(error = %other, "record store operation failed");
            HttpResponse::InternalServerError().body("record store failure")
        }
    }
}

pub async fn list(req: HttpRequest, state: Data<AppState>) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    match state.store.list() {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => store_error(e),
    }
}

pub async fn get_one(req: HttpRequest, state: Data<AppState>, id: Path<String>) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    match state.store.get(&id) {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().body(format!("no record with id {}", id)),
        Err(e) => store_error(e),
    }
}

pub async fn create(
    req: HttpRequest,
    state: Data<AppState>,
    draft: Json<CustomerDraft>,
) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    match state.store.create(draft.into_inner()) {
        Ok(record) => HttpResponse::Created().json(record),
        Err(e) => store_error(e),
    }
}

pub async fn update(
    req: HttpRequest,
    state: Data<AppState>,
    id: Path<String>,
    draft: Json<CustomerDraft>,
) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    match state.store.update(&id, draft.into_inner()) {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().body(format!("no record with id {}", id)),
        Err(e) => store_error(e),
    }
}

pub async fn remove(req: HttpRequest, state: Data<AppState>, id: Path<String>) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    match state.store.delete(&id) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().body(format!("no record with id {}", id)),
        Err(e) => store_error(e),
    }
}
