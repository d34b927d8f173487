//! Wegpunkt: Position, Tangente und Sperr-Flag.
//!
//! Ein Wegpunkt kennt weder seine Nachbarn noch den Pfad, zu dem er gehört.
//! Nachbarschaft ergibt sich ausschließlich aus der Reihenfolge im [`Path`](super::Path).

use super::vector::{angle, Vector2};

/// Ein vom Benutzer gesetzter Punkt auf dem Feld.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    position: Vector2,
    tangent: Vector2,
    tangent_locked: bool,
}

impl Waypoint {
    /// Erstellt einen neuen Wegpunkt.
    ///
    /// - `position`: Feldkoordinaten in der Längeneinheit des Projekts
    /// - `tangent`: Richtung und Betrag der Kurvengeschwindigkeit an diesem Punkt
    /// - `tangent_locked`: Tangente fest (Endpunkte oder manuell gezogen)
    pub fn new(position: Vector2, tangent: Vector2, tangent_locked: bool) -> Self {
        Self {
            position,
            tangent,
            tangent_locked,
        }
    }

    /// Position auf dem Feld
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Setzt die Position. Löst keine Neuberechnung aus.
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Tangentenvektor
    pub fn tangent(&self) -> Vector2 {
        self.tangent
    }

    /// Setzt die Tangente. Löst keine Neuberechnung aus.
    pub fn set_tangent(&mut self, tangent: Vector2) {
        self.tangent = tangent;
    }

    pub fn is_tangent_locked(&self) -> bool {
        self.tangent_locked
    }

    pub fn set_tangent_locked(&mut self, locked: bool) {
        self.tangent_locked = locked;
    }

    /// Fahrtrichtung am Wegpunkt in Radiant (0 bei Nulltangente).
    pub fn heading(&self) -> f64 {
        angle(self.tangent)
    }

    /// Position dieses Wegpunkts relativ zu einem anderen.
    pub fn relative_to(&self, other: &Waypoint) -> Vector2 {
        self.position - other.position
    }
}
