//! Storage layer: identity store and note store.
//!
//! The token service and the note service depend only on the traits in
//! [`traits`]. [`SqliteStore`] implements both and is the handle the CLI
//! constructs, injects, and closes.

mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteStore;
pub use traits::{IdentityStore, NoteStore};
pub use types::{NewNote, NewUser, Note, User};
