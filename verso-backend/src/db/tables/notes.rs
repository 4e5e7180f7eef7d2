//! Note and version-log database operations
//!
//! Every content mutation appends an immutable version row in the same
//! transaction as the live-content write, so the note and its log can never
//! be observed out of step. The log is append-only and ordered by
//! (timestamp, version_id); rows leave it only when the parent note is
//! deleted.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Transaction};

use super::super::{sqlite, Database, StoreError, StoreResult};
use crate::models::{Note, NoteVersion};

impl Database {
    /// Create a note together with its initial version. Fails with
    /// `NotFound` if the owner does not resolve to an existing user.
    pub fn create_note(&self, title: &str, content: &str, owner_id: i64) -> StoreResult<Note> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        if !user_exists(&tx, owner_id)? {
            return Err(StoreError::not_found("user", owner_id));
        }

        let now = Utc::now();
        let now_str = now.to_rfc3339();

        tx.execute(
            "INSERT INTO notes (title, content, owner_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![title, content, owner_id, &now_str],
        )?;
        let note_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO note_versions (note_id, content, timestamp, author_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![note_id, content, &now_str, owner_id],
        )?;

        tx.commit()?;

        Ok(Note {
            id: note_id,
            title: title.to_string(),
            content: content.to_string(),
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace a note's live content and append a version recording the
    /// edit. The editor is taken as given and not checked against the
    /// current owner; when omitted, the owner is recorded as the author.
    pub fn update_note_content(
        &self,
        note_id: i64,
        new_content: &str,
        editor_id: Option<i64>,
    ) -> StoreResult<Note> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let mut note = match select_note(&tx, note_id)? {
            Some(note) => note,
            None => return Err(StoreError::not_found("note", note_id)),
        };

        let author_id = editor_id.unwrap_or(note.owner_id);
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        tx.execute(
            "UPDATE notes SET content = ?1, updated_at = ?2 WHERE id = ?3",
            params![new_content, &now_str, note_id],
        )?;

        tx.execute(
            "INSERT INTO note_versions (note_id, content, timestamp, author_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![note_id, new_content, &now_str, author_id],
        )?;

        tx.commit()?;

        note.content = new_content.to_string();
        note.updated_at = now;
        Ok(note)
    }

    /// Delete a note and its whole version log as one operation
    pub fn delete_note(&self, note_id: i64) -> StoreResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM note_versions WHERE note_id = ?1", [note_id])?;
        let rows_affected = tx.execute("DELETE FROM notes WHERE id = ?1", [note_id])?;
        if rows_affected == 0 {
            // Dropping the transaction rolls back the version delete
            return Err(StoreError::not_found("note", note_id));
        }

        tx.commit()?;
        Ok(())
    }

    /// Reassign a note's owner through a list of candidates, in order.
    ///
    /// Each valid candidate overwrites `owner_id`, so only the last one in
    /// the list ends up as owner - this is single-owner reassignment worded
    /// as a share API, not a multi-user ACL. A missing candidate aborts the
    /// walk with `NotFound` naming that id; assignments already applied for
    /// earlier candidates stay in place.
    pub fn transfer_ownership(&self, note_id: i64, candidate_ids: &[i64]) -> StoreResult<Note> {
        let conn = self.conn.lock().unwrap();

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1)",
            [note_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StoreError::not_found("note", note_id));
        }

        for &candidate_id in candidate_ids {
            let user_ok: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
                [candidate_id],
                |row| row.get(0),
            )?;
            if !user_ok {
                return Err(StoreError::not_found("user", candidate_id));
            }

            conn.execute(
                "UPDATE notes SET owner_id = ?1 WHERE id = ?2",
                params![candidate_id, note_id],
            )?;
        }

        let note = conn
            .query_row(
                "SELECT id, title, content, owner_id, created_at, updated_at
                 FROM notes WHERE id = ?1",
                [note_id],
                Self::row_to_note,
            )
            .optional()?;

        note.ok_or_else(|| StoreError::not_found("note", note_id))
    }

    /// Fetch a note's live state. No access check - any caller may read.
    pub fn get_note(&self, note_id: i64) -> StoreResult<Note> {
        let conn = self.conn.lock().unwrap();

        let note = conn
            .query_row(
                "SELECT id, title, content, owner_id, created_at, updated_at
                 FROM notes WHERE id = ?1",
                [note_id],
                Self::row_to_note,
            )
            .optional()?;

        note.ok_or_else(|| StoreError::not_found("note", note_id))
    }

    /// Version log for a note, most recent first. A note that is absent and
    /// a note with no versions are the same `NotFound` - the latter cannot
    /// arise through the API since creation is transactional.
    pub fn get_version_history(&self, note_id: i64) -> StoreResult<Vec<NoteVersion>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT version_id, note_id, content, timestamp, author_id
             FROM note_versions WHERE note_id = ?1
             ORDER BY timestamp DESC, version_id DESC",
        )?;

        let versions = stmt
            .query_map([note_id], Self::row_to_version)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if versions.is_empty() {
            return Err(StoreError::not_found("note", note_id));
        }

        Ok(versions)
    }

    /// All notes currently owned by a user, newest activity first
    pub fn list_notes_for_user(&self, owner_id: i64) -> StoreResult<Vec<Note>> {
        let conn = self.conn.lock().unwrap();

        let user_ok: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
            [owner_id],
            |row| row.get(0),
        )?;
        if !user_ok {
            return Err(StoreError::not_found("user", owner_id));
        }

        let mut stmt = conn.prepare(
            "SELECT id, title, content, owner_id, created_at, updated_at
             FROM notes WHERE owner_id = ?1
             ORDER BY updated_at DESC, id DESC",
        )?;

        let notes = stmt
            .query_map([owner_id], Self::row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }

    fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
        let created_at_str: String = row.get(4)?;
        let updated_at_str: String = row.get(5)?;

        Ok(Note {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            owner_id: row.get(3)?,
            created_at: sqlite::parse_timestamp(4, &created_at_str)?,
            updated_at: sqlite::parse_timestamp(5, &updated_at_str)?,
        })
    }

    fn row_to_version(row: &rusqlite::Row) -> rusqlite::Result<NoteVersion> {
        let timestamp_str: String = row.get(3)?;

        Ok(NoteVersion {
            version_id: row.get(0)?,
            note_id: row.get(1)?,
            content: row.get(2)?,
            timestamp: sqlite::parse_timestamp(3, &timestamp_str)?,
            author_id: row.get(4)?,
        })
    }
}

fn user_exists(tx: &Transaction, user_id: i64) -> rusqlite::Result<bool> {
    tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        [user_id],
        |row| row.get(0),
    )
}

fn select_note(tx: &Transaction, note_id: i64) -> rusqlite::Result<Option<Note>> {
    tx.query_row(
        "SELECT id, title, content, owner_id, created_at, updated_at
         FROM notes WHERE id = ?1",
        [note_id],
        Database::row_to_note,
    )
    .optional()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::new_in_memory().expect("Failed to open database")
    }

    // Hash contents are never inspected here, so a placeholder is enough
    fn make_user(db: &Database, name: &str) -> i64 {
        db.create_user(name, &format!("{}@example.com", name), "hash")
            .expect("Failed to create user")
            .id
    }

    #[test]
    fn test_create_note_writes_initial_version() {
        let db = test_db();
        let owner = make_user(&db, "alice");

        let note = db
            .create_note("Shopping", "milk", owner)
            .expect("Failed to create note");

        let history = db
            .get_version_history(note.id)
            .expect("Failed to get history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "milk");
        assert_eq!(history[0].author_id, owner);
        assert_eq!(history[0].content, note.content);
    }

    #[test]
    fn test_create_note_unknown_owner() {
        let db = test_db();
        let err = db.create_note("t", "c", 42).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "user", id: 42 }));
    }

    #[test]
    fn test_update_appends_versions_in_order() {
        let db = test_db();
        let owner = make_user(&db, "alice");
        let note = db
            .create_note("Doc", "v0", owner)
            .expect("Failed to create note");

        for i in 1..=3 {
            db.update_note_content(note.id, &format!("v{}", i), Some(owner))
                .expect("Failed to update note");
        }

        let history = db
            .get_version_history(note.id)
            .expect("Failed to get history");
        assert_eq!(history.len(), 4);

        // Most recent first
        let contents: Vec<&str> = history.iter().map(|v| v.content.as_str()).collect();
        assert_eq!(contents, vec!["v3", "v2", "v1", "v0"]);

        // Non-decreasing timestamps walking backwards through the log
        for pair in history.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }

        let live = db.get_note(note.id).expect("Failed to get note");
        assert_eq!(live.content, "v3");
        assert_eq!(live.content, history[0].content);
    }

    #[test]
    fn test_update_records_editor_as_author() {
        let db = test_db();
        let owner = make_user(&db, "alice");
        let editor = make_user(&db, "bob");
        let note = db
            .create_note("Doc", "draft", owner)
            .expect("Failed to create note");

        db.update_note_content(note.id, "edited", Some(editor))
            .expect("Failed to update note");

        let history = db
            .get_version_history(note.id)
            .expect("Failed to get history");
        assert_eq!(history[0].author_id, editor);
        assert_eq!(history[1].author_id, owner);
    }

    #[test]
    fn test_update_defaults_author_to_owner() {
        let db = test_db();
        let owner = make_user(&db, "alice");
        let note = db
            .create_note("Doc", "draft", owner)
            .expect("Failed to create note");

        db.update_note_content(note.id, "edited", None)
            .expect("Failed to update note");

        let history = db
            .get_version_history(note.id)
            .expect("Failed to get history");
        assert_eq!(history[0].author_id, owner);
    }

    #[test]
    fn test_update_missing_note() {
        let db = test_db();
        let err = db.update_note_content(7, "x", None).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "note", id: 7 }));
    }

    #[test]
    fn test_delete_removes_note_and_history() {
        let db = test_db();
        let owner = make_user(&db, "alice");
        let note = db
            .create_note("Doc", "c", owner)
            .expect("Failed to create note");
        db.update_note_content(note.id, "c2", Some(owner))
            .expect("Failed to update note");

        db.delete_note(note.id).expect("Failed to delete note");

        assert!(matches!(
            db.get_note(note.id).unwrap_err(),
            StoreError::NotFound { entity: "note", .. }
        ));
        assert!(matches!(
            db.get_version_history(note.id).unwrap_err(),
            StoreError::NotFound { entity: "note", .. }
        ));
    }

    #[test]
    fn test_delete_missing_note() {
        let db = test_db();
        let err = db.delete_note(3).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "note", id: 3 }));
    }

    #[test]
    fn test_transfer_last_candidate_wins() {
        let db = test_db();
        let owner = make_user(&db, "alice");
        let u1 = make_user(&db, "bob");
        let u2 = make_user(&db, "carol");
        let note = db
            .create_note("Doc", "c", owner)
            .expect("Failed to create note");

        let note = db
            .transfer_ownership(note.id, &[u1, u2])
            .expect("Failed to transfer");
        assert_eq!(note.owner_id, u2);
    }

    #[test]
    fn test_transfer_missing_candidate_keeps_last_valid() {
        let db = test_db();
        let owner = make_user(&db, "alice");
        let u1 = make_user(&db, "bob");
        let note = db
            .create_note("Doc", "c", owner)
            .expect("Failed to create note");

        let err = db.transfer_ownership(note.id, &[u1, 999]).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "user", id: 999 }));

        // u1 was validated and applied before the walk aborted
        let live = db.get_note(note.id).expect("Failed to get note");
        assert_eq!(live.owner_id, u1);
    }

    #[test]
    fn test_transfer_missing_note() {
        let db = test_db();
        let u1 = make_user(&db, "bob");
        let err = db.transfer_ownership(12, &[u1]).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "note", id: 12 }));
    }

    #[test]
    fn test_transfer_empty_candidate_list_is_vacuous() {
        let db = test_db();
        let owner = make_user(&db, "alice");
        let note = db
            .create_note("Doc", "c", owner)
            .expect("Failed to create note");

        let note = db
            .transfer_ownership(note.id, &[])
            .expect("Empty transfer should succeed");
        assert_eq!(note.owner_id, owner);
    }

    #[test]
    fn test_corrupt_timestamp_surfaces_as_error() {
        let db = test_db();
        let owner = make_user(&db, "alice");
        let note = db
            .create_note("Doc", "c", owner)
            .expect("Failed to create note");

        {
            let conn = db.conn.lock().unwrap();
            conn.execute(
                "UPDATE note_versions SET timestamp = 'garbage' WHERE note_id = ?1",
                [note.id],
            )
            .expect("Failed to corrupt timestamp");
        }

        let err = db.get_version_history(note.id).unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn test_transfer_does_not_touch_version_log() {
        let db = test_db();
        let owner = make_user(&db, "alice");
        let u1 = make_user(&db, "bob");
        let note = db
            .create_note("Doc", "c", owner)
            .expect("Failed to create note");

        db.transfer_ownership(note.id, &[u1])
            .expect("Failed to transfer");

        let history = db
            .get_version_history(note.id)
            .expect("Failed to get history");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_list_notes_for_user() {
        let db = test_db();
        let alice = make_user(&db, "alice");
        let bob = make_user(&db, "bob");

        db.create_note("A", "1", alice).expect("Failed to create");
        db.create_note("B", "2", alice).expect("Failed to create");
        db.create_note("C", "3", bob).expect("Failed to create");

        let notes = db.list_notes_for_user(alice).expect("Failed to list");
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.owner_id == alice));

        let err = db.list_notes_for_user(555).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "user", id: 555 }));
    }

    #[test]
    fn test_shopping_scenario() {
        let db = test_db();
        let user = make_user(&db, "alice");

        let note = db
            .create_note("Shopping", "milk", user)
            .expect("Failed to create note");

        let history = db.get_version_history(note.id).expect("Failed to get history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "milk");

        db.update_note_content(note.id, "milk, eggs", Some(user))
            .expect("Failed to update note");

        let history = db.get_version_history(note.id).expect("Failed to get history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "milk, eggs");

        let live = db.get_note(note.id).expect("Failed to get note");
        assert_eq!(live.content, "milk, eggs");

        db.delete_note(note.id).expect("Failed to delete note");
        assert!(db.get_note(note.id).is_err());
    }
}
