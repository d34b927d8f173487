//! Application-Layer: Bibliothek, Session, History und Projekt-Einstellungen.

pub mod history;
pub mod library;
pub mod preferences;
/// Bearbeitungs-Session mit Commands, Drags und Undo/Redo
pub mod session;

pub use history::{EditHistory, Snapshot};
pub use library::PathLibrary;
pub use preferences::{LengthUnit, ProjectPreferences, PREFERENCES_FILE_NAME};
pub use session::{DragTarget, EditorSession, PathCommand, PendingMove};
