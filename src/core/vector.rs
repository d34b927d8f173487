//! 2D-Vektor für Feldkoordinaten und Tangenten.
//!
//! `Vector2` ist ein reiner Werttyp (`glam::DVec2`, f64). Arithmetik (+, -, Skalar-*),
//! `length()` und `distance()` kommen direkt aus glam; hier liegen nur die
//! Ergänzungen, die das Pfadmodell zusätzlich braucht.

pub use glam::DVec2 as Vector2;

/// Toleranz, unter der eine Länge als Null gilt.
pub const LENGTH_EPSILON: f64 = 1e-12;

/// Winkel des Vektors in Radiant (`atan2(y, x)`).
///
/// Für den Nullvektor ist das Ergebnis per Konvention 0.
pub fn angle(v: Vector2) -> f64 {
    if v.x == 0.0 && v.y == 0.0 {
        return 0.0;
    }
    v.y.atan2(v.x)
}

/// 2D-Kreuzprodukt `a.x * b.y - a.y * b.x`.
pub fn cross(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Prüft ob beide Komponenten endlich sind.
pub fn is_finite_vec(v: Vector2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Prüft ob der Vektor praktisch die Länge 0 hat.
pub fn is_zero_length(v: Vector2) -> bool {
    v.length_squared() <= LENGTH_EPSILON * LENGTH_EPSILON
}
