pub mod auth;
pub mod health;
pub mod notes;

use actix_web::HttpResponse;

use crate::db::StoreError;

/// Map a store failure onto the HTTP contract. Sqlite errors are logged
/// and answered with a generic 500 so internals never leak to clients.
pub fn store_error_response(err: StoreError) -> HttpResponse {
    match err {
        StoreError::Conflict { .. } => HttpResponse::Conflict().json(serde_json::json!({
            "error": err.to_string()
        })),
        StoreError::Unauthorized => HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid credentials"
        })),
        StoreError::NotFound { .. } => HttpResponse::NotFound().json(serde_json::json!({
            "error": err.to_string()
        })),
        StoreError::Sqlite(e) => {
            log::error!("Database error: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}
