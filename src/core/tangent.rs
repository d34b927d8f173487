//! Analytische Tangenten-Berechnung für ungesperrte innere Wegpunkte.
//!
//! Aus den Positionen von Vorgänger, Wegpunkt und Nachfolger wird über eine
//! reduzierte kubische Gleichung (trigonometrische Cardano-Lösung) der
//! Kurvenparameter `t` bestimmt, an dem der Wegpunkt liegt, und daraus die
//! Tangente einer durch alle drei Punkte laufenden Kurve rekonstruiert.

use serde::{Deserialize, Serialize};

use super::error::{PathError, PathResult};
use super::vector::{cross, is_finite_vec, is_zero_length, Vector2, LENGTH_EPSILON};

/// Mindestabstand von `t² - t` zu 0, darunter gilt die Lösung als degeneriert.
const ROOT_EPSILON: f64 = 1e-12;

/// Wie der Betrag einer berechneten Tangente nachbearbeitet wird.
///
/// Gilt nur für Solver-Ergebnisse, nie für gesetzte oder geladene Tangenten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TangentScaling {
    /// Tangente unverändert übernehmen
    #[default]
    Raw,
    /// Richtung behalten, Betrag auf `sqrt(|t|)` setzen (WPILib-Pfade)
    SqrtMagnitude,
}

impl TangentScaling {
    /// Wendet die Skalierung auf eine berechnete Tangente an.
    pub fn apply(self, tangent: Vector2) -> Vector2 {
        match self {
            TangentScaling::Raw => tangent,
            TangentScaling::SqrtMagnitude => {
                let length = tangent.length();
                if length <= LENGTH_EPSILON {
                    return tangent;
                }
                tangent * (length.sqrt() / length)
            }
        }
    }
}

/// Berechnet die Tangente für `cur` aus seinen direkten Nachbarn.
///
/// # Fehler
/// `DegenerateGeometry`, wenn `prev` und `next` zusammenfallen, eine Koordinate
/// nicht endlich ist oder die gewählte Wurzel auf 0 bzw. 1 fällt.
pub fn solve(prev: Vector2, cur: Vector2, next: Vector2) -> PathResult<Vector2> {
    if !(is_finite_vec(prev) && is_finite_vec(cur) && is_finite_vec(next)) {
        return Err(PathError::degenerate("nicht endliche Koordinaten"));
    }

    let baseline = next - prev;
    let baseline_length = baseline.length();
    if baseline_length <= LENGTH_EPSILON {
        return Err(PathError::degenerate(
            "Vorgaenger und Nachfolger liegen aufeinander",
        ));
    }

    // Rahmen: prev im Ursprung, next im Abstand 1
    let p2_scaled = (cur - prev) / baseline_length;
    let p3_scaled = baseline / baseline_length;

    // p2 im gedrehten Rahmen, in dem p3 auf der positiven x-Achse liegt
    let r = Vector2::new(p2_scaled.dot(p3_scaled), -cross(p2_scaled, p3_scaled));

    let beta = 1.0 - 2.0 * r.x;
    let gamma = (4.0 * (r.x - r.length_squared()) - 3.0).powi(3) / 27.0;

    let t = select_root(cubic_roots(beta, gamma));
    let denominator = t * t - t;
    if !t.is_finite() || denominator.abs() <= ROOT_EPSILON {
        return Err(PathError::degenerate(format!(
            "kein Kurvenparameter im offenen Intervall (t = {t})"
        )));
    }

    let a1 = ((cur - prev) - baseline * t) / denominator;
    let a2 = baseline - a1;
    let tangent = (a1 * (2.0 * t) + a2) / 3.0;

    if !is_finite_vec(tangent) || is_zero_length(tangent) {
        return Err(PathError::degenerate("Tangente ist nicht darstellbar"));
    }
    Ok(tangent)
}

/// Variante für optionale Nachbarn: fehlt einer (Endpunkt), ist das Ergebnis
/// der Nullvektor und der Aufrufer behandelt es als "keine Änderung".
pub fn solve_with_neighbors(
    prev: Option<Vector2>,
    cur: Vector2,
    next: Option<Vector2>,
) -> PathResult<Vector2> {
    match (prev, next) {
        (Some(prev), Some(next)) => solve(prev, cur, next),
        _ => Ok(Vector2::ZERO),
    }
}

/// Drei Kandidaten für `t` aus `beta` und `gamma` (trigonometrisches Verfahren).
fn cubic_roots(beta: f64, gamma: f64) -> [f64; 3] {
    let lambda = (-gamma).powf(1.0 / 6.0);
    // Analytisch immer >= 0, Rundung kann knapp darunter landen
    let radicand = (-gamma - beta * beta).max(0.0).sqrt();

    let phi1 = radicand.atan2(beta) / 3.0;
    let ur = lambda * phi1.cos();
    let ui = lambda * phi1.sin();

    let phi2 = (-radicand).atan2(beta) / 3.0;
    let zr = lambda * phi2.cos();
    let zi = lambda * phi2.sin();

    let sqrt3 = 3.0_f64.sqrt();
    let t1 = 0.5 + ur + zr / 2.0;
    let t2 = 0.5 - 0.25 * (ur + zr + sqrt3 * (ui - zi));
    let t3 = 0.5 - 0.25 * (ur + zr - sqrt3 * (ui - zi));
    [t1, t2, t3]
}

/// Erste Wurzel (in fester Reihenfolge) im offenen Intervall (0, 1), sonst `t3`.
fn select_root(roots: [f64; 3]) -> f64 {
    roots
        .iter()
        .copied()
        .find(|&t| t > 0.0 && t < 1.0)
        .unwrap_or(roots[2])
}
