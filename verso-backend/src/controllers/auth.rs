//! Signup and login endpoints
//!
//! Passwords are bcrypt-hashed before they reach the store; the stored hash
//! never leaves the backend.

use actix_web::{web, HttpResponse, Responder};

use crate::auth::password;
use crate::controllers::store_error_response;
use crate::models::{LoginRequest, SignupRequest};
use crate::AppState;

/// Register a new user
async fn signup(data: web::Data<AppState>, body: web::Json<SignupRequest>) -> impl Responder {
    let username = body.username.trim();
    let email = body.email.trim();

    if username.is_empty() || email.is_empty() || body.password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "username, email and password are required"
        }));
    }

    let password_hash = match password::hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => {
            log::error!("Failed to hash password: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    match data.db.create_user(username, email, &password_hash) {
        Ok(user) => HttpResponse::Created().json(serde_json::json!({
            "message": "User created successfully",
            "user_id": user.id
        })),
        Err(e) => store_error_response(e),
    }
}

/// Log in with username or email
async fn login(data: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    if body.username_or_email.is_empty() || body.password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "username_or_email and password are required"
        }));
    }

    match data
        .db
        .authenticate_user(&body.username_or_email, &body.password)
    {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Login successful",
            "user_id": user.id
        })),
        Err(e) => store_error_response(e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login)),
    );
}
