//! Fehlertypen des Pfadmodells.

use thiserror::Error;

/// Ergebnis-Typ für alle Kernoperationen auf Pfaden.
pub type PathResult<T> = Result<T, PathError>;

/// Fehler, die Kernoperationen an die Aufrufer-Grenze (UI, Session) zurückgeben.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// Ungültiger Wegpunkt- oder Spline-Index
    #[error("Index {index} ausserhalb des gueltigen Bereichs (Laenge {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Strukturell unzulässige Bearbeitung (Endpunkt löschen/entsperren, Minimalgröße)
    #[error("Unzulaessige Operation: {0}")]
    InvalidOperation(String),

    /// Nachbarpunkte machen die Tangenten-Berechnung schlecht konditioniert
    #[error("Degenerierte Geometrie: {0}")]
    DegenerateGeometry(String),

    /// Pfadname ist bereits vergeben
    #[error("Pfadname bereits vergeben: '{0}'")]
    NameCollision(String),
}

impl PathError {
    /// Erzeugt einen [`PathError::InvalidOperation`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Erzeugt einen [`PathError::DegenerateGeometry`].
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }
}
