//! Core-Domänentypen: Vektoren, Wegpunkte, Splines, Tangenten-Solver und Pfad.

pub mod error;
pub mod path;
pub mod spline;
pub mod tangent;
pub mod vector;
/// Wegpunkt mit Position, Tangente und Sperr-Flag
pub mod waypoint;

pub use error::{PathError, PathResult};
pub use path::{validate_name, Path, MIN_WAYPOINTS};
pub use spline::{Curve, CurveKind, Spline, SPLINE_TANGENT_SCALE};
pub use tangent::TangentScaling;
pub use vector::Vector2;
pub use waypoint::Waypoint;
