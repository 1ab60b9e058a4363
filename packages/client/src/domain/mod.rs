//! Domain layer for the session client.
//!
//! Everything here is synchronous and transport-free: the session state
//! machine, the local view, and the admission rules can be driven
//! deterministically from tests.

pub mod admission;
pub mod error;
pub mod mime;
pub mod session;
pub mod value_object;
pub mod view;

pub use admission::{MAX_FILE_SIZE, admit_file_size};
pub use error::{AdmissionError, SessionError, ValueObjectError};
pub use session::{ConnectionState, SelectedFile, Session};
pub use value_object::{DisplayName, MessageText};
pub use view::{ChatEntry, FileEntry, Origin, PreviewKind, View, ViewEntry};
