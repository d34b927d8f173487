//! Kurvensegmente zwischen zwei aufeinanderfolgenden Wegpunkten.
//!
//! Ein Spline ist vollständig aus seinen beiden Endpunkt-Wegpunkten ableitbar
//! und wird nie separat gespeichert.

use serde::{Deserialize, Serialize};

use super::vector::Vector2;
use super::waypoint::Waypoint;

/// Faktor k der Hermite→Bézier-Umrechnung: `P1 = P0 + T0·k`, `P2 = P3 - T1·k`.
pub const SPLINE_TANGENT_SCALE: f64 = 1.0 / 3.0;

/// Welche Kurvenvariante ein Pfad für seine Splines baut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Nur die Sehne zwischen den Endpunkten (Vorschau während Drags)
    Null,
    /// Kubische Bézier-Kurve aus Positionen und Tangenten
    #[default]
    CubicBezier,
}

/// Geometrie eines Segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// Sehne ohne Kontrollpunkte
    Null { start: Vector2, end: Vector2 },
    /// Kubische Bézier-Kurve `[P0, P1, P2, P3]`
    CubicBezier { control_points: [Vector2; 4] },
}

/// Ein Kurvensegment zwischen `waypoints[start]` und `waypoints[end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spline {
    start: usize,
    end: usize,
    curve: Curve,
}

impl Spline {
    /// Baut ein Segment aus dem aktuellen Zustand beider Endpunkte neu auf.
    ///
    /// Reine Funktion: gleiche Eingaben liefern identische Kontrollpunkte.
    pub fn rebuild(
        start_index: usize,
        start: &Waypoint,
        end: &Waypoint,
        kind: CurveKind,
    ) -> Self {
        let curve = match kind {
            CurveKind::Null => Curve::Null {
                start: start.position(),
                end: end.position(),
            },
            CurveKind::CubicBezier => {
                let p0 = start.position();
                let p3 = end.position();
                let p1 = p0 + start.tangent() * SPLINE_TANGENT_SCALE;
                let p2 = p3 - end.tangent() * SPLINE_TANGENT_SCALE;
                Curve::CubicBezier {
                    control_points: [p0, p1, p2, p3],
                }
            }
        };

        Self {
            start: start_index,
            end: start_index + 1,
            curve,
        }
    }

    /// Gleiche Geometrie, neue Position in der Spline-Liste (nach Einfügen/Löschen).
    pub(crate) fn reindexed(self, start_index: usize) -> Self {
        Self {
            start: start_index,
            end: start_index + 1,
            curve: self.curve,
        }
    }

    /// Index des Start-Wegpunkts
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index des End-Wegpunkts
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn kind(&self) -> CurveKind {
        match self.curve {
            Curve::Null { .. } => CurveKind::Null,
            Curve::CubicBezier { .. } => CurveKind::CubicBezier,
        }
    }

    /// Kontrollpunkte der Bézier-Kurve (None für die Null-Variante).
    pub fn control_points(&self) -> Option<[Vector2; 4]> {
        match self.curve {
            Curve::Null { .. } => None,
            Curve::CubicBezier { control_points } => Some(control_points),
        }
    }

    /// Evaluiert die Kurve bei `t ∈ [0, 1]` (Werte außerhalb werden geklemmt).
    pub fn sample(&self, t: f64) -> Vector2 {
        let t = t.clamp(0.0, 1.0);
        match self.curve {
            // Gewichtete Summe statt lerp: trifft bei t = 1 exakt den Endpunkt
            Curve::Null { start, end } => start * (1.0 - t) + end * t,
            Curve::CubicBezier { control_points } => cubic_bezier(control_points, t),
        }
    }

    /// Ableitung nach `t` (Geschwindigkeit entlang der Kurve).
    pub fn derivative(&self, t: f64) -> Vector2 {
        let t = t.clamp(0.0, 1.0);
        match self.curve {
            Curve::Null { start, end } => end - start,
            Curve::CubicBezier {
                control_points: [p0, p1, p2, p3],
            } => {
                let inv = 1.0 - t;
                3.0 * inv * inv * (p1 - p0) + 6.0 * inv * t * (p2 - p1) + 3.0 * t * t * (p3 - p2)
            }
        }
    }

    /// Approximierte Bogenlänge über `segments` Polylinien-Stücke (mindestens 1).
    pub fn length(&self, segments: usize) -> f64 {
        let segments = segments.max(1);
        let mut length = 0.0;
        let mut prev = self.sample(0.0);
        for i in 1..=segments {
            let p = self.sample(i as f64 / segments as f64);
            length += prev.distance(p);
            prev = p;
        }
        length
    }
}

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
fn cubic_bezier([p0, p1, p2, p3]: [Vector2; 4], t: f64) -> Vector2 {
    let inv = 1.0 - t;
    let inv2 = inv * inv;
    let t2 = t * t;
    inv2 * inv * p0 + 3.0 * inv2 * t * p1 + 3.0 * inv * t2 * p2 + t2 * t * p3
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wp(x: f64, y: f64, tx: f64, ty: f64) -> Waypoint {
        Waypoint::new(Vector2::new(x, y), Vector2::new(tx, ty), true)
    }

    #[test]
    fn test_control_points_from_hermite_data() {
        let a = wp(0.0, 0.0, 3.0, 0.0);
        let b = wp(10.0, 0.0, 0.0, 6.0);
        let spline = Spline::rebuild(4, &a, &b, CurveKind::CubicBezier);

        let [p0, p1, p2, p3] = spline.control_points().expect("Bezier erwartet");
        assert_eq!(p0, Vector2::new(0.0, 0.0));
        assert_relative_eq!(p1.x, 1.0);
        assert_relative_eq!(p1.y, 0.0);
        assert_relative_eq!(p2.x, 10.0);
        assert_relative_eq!(p2.y, -2.0);
        assert_eq!(p3, Vector2::new(10.0, 0.0));
        assert_eq!((spline.start(), spline.end()), (4, 5));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let a = wp(1.0, 2.0, 4.0, -1.0);
        let b = wp(7.0, 3.0, 2.0, 2.0);
        let first = Spline::rebuild(0, &a, &b, CurveKind::CubicBezier);
        let second = Spline::rebuild(0, &a, &b, CurveKind::CubicBezier);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_hits_endpoints_and_clamps() {
        let a = wp(0.0, 0.0, 3.0, 3.0);
        let b = wp(9.0, 1.0, 3.0, -3.0);
        let spline = Spline::rebuild(0, &a, &b, CurveKind::CubicBezier);

        assert_eq!(spline.sample(0.0), a.position());
        assert_eq!(spline.sample(1.0), b.position());
        assert_eq!(spline.sample(-1.0), a.position());
        assert_eq!(spline.sample(2.0), b.position());
    }

    #[test]
    fn test_derivative_at_ends_matches_tangents() {
        let a = wp(0.0, 0.0, 3.0, 1.5);
        let b = wp(9.0, 1.0, -2.0, 6.0);
        let spline = Spline::rebuild(0, &a, &b, CurveKind::CubicBezier);

        // B'(0) = 3(P1 - P0) = T0, B'(1) = 3(P3 - P2) = T1
        let d0 = spline.derivative(0.0);
        let d1 = spline.derivative(1.0);
        assert_relative_eq!(d0.x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(d0.y, 1.5, epsilon = 1e-12);
        assert_relative_eq!(d1.x, -2.0, epsilon = 1e-12);
        assert_relative_eq!(d1.y, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_straight_spline_length_is_exact() {
        let a = wp(0.0, 0.0, 10.0, 0.0);
        let b = wp(10.0, 0.0, 10.0, 0.0);
        let spline = Spline::rebuild(0, &a, &b, CurveKind::CubicBezier);
        assert_relative_eq!(spline.length(1), 10.0, epsilon = 1e-12);
        assert_relative_eq!(spline.length(64), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_length_grows_with_more_segments() {
        let a = wp(0.0, 0.0, 0.0, 20.0);
        let b = wp(10.0, 0.0, 0.0, -20.0);
        let spline = Spline::rebuild(0, &a, &b, CurveKind::CubicBezier);

        let coarse = spline.length(2);
        let fine = spline.length(256);
        assert!(fine >= coarse, "Polylinie unterschaetzt die Bogenlaenge");
        assert!(fine > 10.0);
        assert_eq!(spline.length(0), spline.length(1));
    }

    #[test]
    fn test_null_curve_is_chord() {
        let a = wp(0.0, 0.0, 0.0, 20.0);
        let b = wp(6.0, 8.0, 0.0, -20.0);
        let spline = Spline::rebuild(0, &a, &b, CurveKind::Null);

        assert_eq!(spline.kind(), CurveKind::Null);
        assert!(spline.control_points().is_none());
        assert_eq!(spline.sample(0.5), Vector2::new(3.0, 4.0));
        assert_relative_eq!(spline.length(16), 10.0, epsilon = 1e-12);
    }
}
