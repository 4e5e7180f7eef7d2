//! Notes REST API - create, read, update, delete, share, version history.
//!
//! Handlers validate field presence and delegate to the store; every store
//! failure maps through `store_error_response`. No per-note access checks
//! are enforced on reads.

use actix_web::{web, HttpResponse, Responder};

use crate::controllers::store_error_response;
use crate::models::{
    CreateNoteRequest, ShareNoteRequest, UpdateNoteRequest, VersionHistoryResponse,
};
use crate::AppState;

/// Create a note owned by `user_id`, recording its initial version
async fn create_note(
    data: web::Data<AppState>,
    body: web::Json<CreateNoteRequest>,
) -> impl Responder {
    if body.title.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "title is required"
        }));
    }

    match data.db.create_note(&body.title, &body.content, body.user_id) {
        Ok(note) => HttpResponse::Created().json(serde_json::json!({
            "message": "Note created successfully",
            "note_id": note.id
        })),
        Err(e) => store_error_response(e),
    }
}

/// Read a note's live title and content
async fn get_note(data: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let note_id = path.into_inner();

    match data.db.get_note(note_id) {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => store_error_response(e),
    }
}

/// Replace a note's content, appending a new version
async fn update_note(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateNoteRequest>,
) -> impl Responder {
    let note_id = path.into_inner();

    match data
        .db
        .update_note_content(note_id, &body.content, body.user_id)
    {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Note updated successfully"
        })),
        Err(e) => store_error_response(e),
    }
}

/// Delete a note and its version history
async fn delete_note(data: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let note_id = path.into_inner();

    match data.db.delete_note(note_id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Note deleted successfully"
        })),
        Err(e) => store_error_response(e),
    }
}

/// Reassign ownership through a candidate list (last valid candidate wins).
/// An empty list is a vacuous success: the note is checked, nothing changes.
async fn share_note(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ShareNoteRequest>,
) -> impl Responder {
    let note_id = path.into_inner();

    match data.db.transfer_ownership(note_id, &body.user_ids) {
        Ok(note) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Note shared successfully",
            "owner_id": note.owner_id
        })),
        Err(e) => store_error_response(e),
    }
}

/// Version history, most recent first
async fn get_version_history(data: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let note_id = path.into_inner();

    match data.db.get_version_history(note_id) {
        Ok(versions) => HttpResponse::Ok().json(VersionHistoryResponse { note_id, versions }),
        Err(e) => store_error_response(e),
    }
}

/// All notes owned by a user, newest activity first
async fn list_user_notes(data: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let user_id = path.into_inner();

    match data.db.list_notes_for_user(user_id) {
        Ok(notes) => HttpResponse::Ok().json(serde_json::json!({
            "user_id": user_id,
            "notes": notes
        })),
        Err(e) => store_error_response(e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notes")
            .route("", web::post().to(create_note))
            .route("/{id}", web::get().to(get_note))
            .route("/{id}", web::put().to(update_note))
            .route("/{id}", web::delete().to(delete_note))
            .route("/{id}/share", web::post().to(share_note))
            .route("/{id}/versions", web::get().to(get_version_history)),
    );
    cfg.service(
        web::scope("/api/users").route("/{id}/notes", web::get().to(list_user_notes)),
    );
}
