//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die von `core`, `codec` und `app`
//! gelesen werden, ohne dass diese Layer voneinander abhängen.

pub mod options;

pub use options::PlannerOptions;
pub use options::{HISTORY_DEPTH, LENGTH_SEGMENTS, PICK_RADIUS, SAMPLES_PER_SPLINE};
