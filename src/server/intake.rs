//! Form intake handler
//!
//! Receives form submission values in the fixed column order used by the
//! intake form (timestamp, owner name, reading, email, phone, address,
//! pet name, pet category, age, weight, notes) and creates a record from
//! them. This is the server side of the form-relay path.

use actix_web::web::{Data, Json};
use actix_web::{HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::data::{CustomerDraft, PetCategory};
use crate::store::StoreError;

use super::{authorized, AppState};

/// Payload posted by the relay: one submission's values, in form order.
#[derive(Debug, Deserialize)]
pub struct IntakePayload {
    pub values: Vec<String>,
}

/// Maps fixed-order form values to a draft. Missing trailing columns are
/// treated as empty; numeric fields default to zero when unparsable.
fn draft_from_values(values: &[String]) -> CustomerDraft {
    let cell = |idx: usize| -> String {
        values
            .get(idx)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    CustomerDraft {
        // Column 0 is the submission timestamp, not a record field.
        owner_name: cell(1),
        owner_reading: cell(2),
        email: cell(3),
        phone: cell(4),
        address: cell(5),
        pet_name: cell(6),
        pet_category: PetCategory::parse(&cell(7)),
        age: cell(8).parse().unwrap_or(0),
        weight: cell(9).parse().unwrap_or(0.0),
        notes: cell(10),
        last_visit: None,
    }
}

pub async fn process(
    req: HttpRequest,
    state: Data<AppState>,
    payload: Json<IntakePayload>,
) -> HttpResponse {
    if !authorized(&req, &state) {
        return HttpResponse::Unauthorized().body("invalid or missing bearer token");
    }

    let draft = draft_from_values(&payload.values);
    match state.store.create(draft) {
        Ok(record) => HttpResponse::Created().json(record),
        Err(StoreError::MissingField(field)) => {
            HttpResponse::BadRequest().body(format!("missing required field: {}", field))
        }
        Err(e) => {
            tracing::error!(error = %e, "intake failed");
            HttpResponse::InternalServerError().body("record store failure")
        }
    }
}
