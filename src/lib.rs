//! Pathweaver Library.
//! Pfadmodell aus Wegpunkten und kubischen Splines, als Library exportiert für
//! Tests, CLI und Wiederverwendung.

pub mod app;
pub mod codec;
pub mod core;
pub mod shared;

pub use app::{DragTarget, EditorSession, PathCommand, PathLibrary, PendingMove, ProjectPreferences};
pub use codec::{parse_path, read_path_file, write_path, write_path_file};
pub use core::{
    Curve, CurveKind, Path, PathError, PathResult, Spline, TangentScaling, Vector2, Waypoint,
};
pub use shared::PlannerOptions;
