//! Import/Export von Pfaden im `.path`-Datensatzformat.
//!
//! Eine Datei pro Pfad, benannt nach dem Pfadnamen. Jede Zeile ist ein
//! Wegpunkt `X,Y,Tangent X,Tangent Y,Fixed Theta`; die letzte Spalte ist das
//! Sperr-Flag und darf fehlen.

pub mod parser;
pub mod writer;

/// Dateiendung der Pfad-Dateien (ohne Punkt)
pub const PATH_FILE_EXTENSION: &str = "path";
/// Kopfzeile, die der Writer immer schreibt
pub const PATH_HEADER: &str = "X,Y,Tangent X,Tangent Y,Fixed Theta";

pub use parser::{parse_path, read_path_file};
pub use writer::{path_file_name, write_path, write_path_file};
