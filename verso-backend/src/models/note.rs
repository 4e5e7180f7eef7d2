use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A titled, owned text document. `content` is the live text and always
/// mirrors the newest row of the note's version log.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An immutable snapshot of a note's content at one point in time
#[derive(Debug, Clone, Serialize)]
pub struct NoteVersion {
    pub version_id: i64,
    pub note_id: i64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub author_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub content: String,
    /// User recorded as the author of the new version. Falls back to the
    /// note's current owner when omitted.
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ShareNoteRequest {
    pub user_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct VersionHistoryResponse {
    pub note_id: i64,
    pub versions: Vec<NoteVersion>,
}
