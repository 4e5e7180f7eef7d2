pub mod note;
pub mod user;

pub use note::{
    CreateNoteRequest, Note, NoteVersion, ShareNoteRequest, UpdateNoteRequest,
    VersionHistoryResponse,
};
pub use user::{LoginRequest, SignupRequest, User};
