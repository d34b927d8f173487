//! Der Pfad: geordnete Wegpunkte und die Splines dazwischen.
//!
//! Der Pfad ist alleiniger Besitzer seiner Wegpunkte und Splines. Nachbarn werden
//! nie gespeichert, sondern über `index - 1` / `index + 1` abgeleitet. Jede
//! öffentliche Operation hinterlässt einen konsistenten Pfad oder schlägt fehl,
//! bevor etwas verändert wurde.

use super::error::{PathError, PathResult};
use super::spline::{CurveKind, Spline};
use super::tangent::{self, TangentScaling};
use super::vector::{is_finite_vec, is_zero_length, Vector2};
use super::waypoint::Waypoint;
use crate::shared::PlannerOptions;

/// Minimale Anzahl Wegpunkte eines Pfads (Start und Ende).
pub const MIN_WAYPOINTS: usize = 2;

/// Geordnete Kette aus Wegpunkten und kubischen Segmenten.
///
/// Invarianten nach jeder erfolgreichen Operation:
/// - `splines.len() == waypoints.len() - 1`, `splines[i]` verbindet `i` und `i + 1`
/// - erster und letzter Wegpunkt haben eine gesperrte Tangente
/// - alle Positionen und Tangenten sind endlich
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    name: String,
    waypoints: Vec<Waypoint>,
    splines: Vec<Spline>,
    curve_kind: CurveKind,
    tangent_scaling: TangentScaling,
}

impl Path {
    /// Erstellt einen Pfad aus zwei gesperrten Endpunkten.
    pub fn new(
        name: impl Into<String>,
        start: Vector2,
        start_tangent: Vector2,
        end: Vector2,
        end_tangent: Vector2,
    ) -> PathResult<Self> {
        Self::from_waypoints(
            name,
            vec![
                Waypoint::new(start, start_tangent, true),
                Waypoint::new(end, end_tangent, true),
            ],
        )
    }

    /// Erstellt einen Pfad mit den Standard-Endpunkten aus den Optionen.
    pub fn with_defaults(name: impl Into<String>, options: &PlannerOptions) -> PathResult<Self> {
        let path = Self::new(
            name,
            Vector2::from(options.default_start),
            Vector2::from(options.default_start_tangent),
            Vector2::from(options.default_end),
            Vector2::from(options.default_end_tangent),
        )?;
        Ok(path.with_tangent_scaling(options.tangent_scaling))
    }

    /// Erstellt einen Pfad aus einer Wegpunktliste.
    ///
    /// Tangenten werden unverändert übernommen; Start und Ende werden gesperrt.
    pub fn from_waypoints(name: impl Into<String>, mut waypoints: Vec<Waypoint>) -> PathResult<Self> {
        let name = name.into();
        validate_name(&name)?;

        if waypoints.len() < MIN_WAYPOINTS {
            return Err(PathError::invalid(format!(
                "ein Pfad braucht mindestens {MIN_WAYPOINTS} Wegpunkte, erhalten: {}",
                waypoints.len()
            )));
        }
        for (index, waypoint) in waypoints.iter().enumerate() {
            ensure_finite(waypoint.position(), "Position")
                .and_then(|_| ensure_valid_tangent(waypoint.tangent()))
                .map_err(|err| PathError::invalid(format!("Wegpunkt {index}: {err}")))?;
        }

        let last = waypoints.len() - 1;
        waypoints[0].set_tangent_locked(true);
        waypoints[last].set_tangent_locked(true);

        let mut path = Self {
            name,
            waypoints,
            splines: Vec::new(),
            curve_kind: CurveKind::default(),
            tangent_scaling: TangentScaling::default(),
        };
        path.rebuild_all_splines();
        Ok(path)
    }

    /// Setzt die Kurvenvariante und baut alle Splines neu.
    pub fn with_curve_kind(mut self, kind: CurveKind) -> Self {
        self.set_curve_kind(kind);
        self
    }

    /// Setzt die Betragsregel für berechnete Tangenten (ohne Neuberechnung).
    pub fn with_tangent_scaling(mut self, scaling: TangentScaling) -> Self {
        self.tangent_scaling = scaling;
        self
    }

    pub fn curve_kind(&self) -> CurveKind {
        self.curve_kind
    }

    /// Wechselt die Kurvenvariante; alle Splines werden neu aufgebaut.
    pub fn set_curve_kind(&mut self, kind: CurveKind) {
        if self.curve_kind != kind {
            self.curve_kind = kind;
            self.rebuild_all_splines();
        }
    }

    pub fn tangent_scaling(&self) -> TangentScaling {
        self.tangent_scaling
    }

    /// Wechselt die Betragsregel und berechnet alle ungesperrten Tangenten neu.
    pub fn set_tangent_scaling(&mut self, scaling: TangentScaling) {
        if self.tangent_scaling != scaling {
            self.tangent_scaling = scaling;
            self.resolve_unlocked_tangents();
        }
    }

    // ── Lesender Zugriff ────────────────────────────────────────────

    /// Anzeigename, zugleich Basisname der Pfad-Datei
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Benennt den Pfad um (nur Namensprüfung, keine Eindeutigkeit).
    pub fn rename(&mut self, new_name: impl Into<String>) -> PathResult<()> {
        let new_name = new_name.into();
        validate_name(&new_name)?;
        self.name = new_name;
        Ok(())
    }

    /// Anzahl der Wegpunkte (immer >= 2)
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Ein Pfad ist nie leer; vorhanden für die übliche `len`/`is_empty`-Paarung.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn waypoint(&self, index: usize) -> PathResult<&Waypoint> {
        self.check_index(index)?;
        Ok(&self.waypoints[index])
    }

    pub fn splines(&self) -> &[Spline] {
        &self.splines
    }

    pub fn spline(&self, index: usize) -> PathResult<&Spline> {
        self.splines.get(index).ok_or(PathError::IndexOutOfRange {
            index,
            len: self.splines.len(),
        })
    }

    /// Erster Wegpunkt
    pub fn start(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    /// Letzter Wegpunkt
    pub fn end(&self) -> &Waypoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    /// Prüft ob der Index ein innerer Wegpunkt ist (weder Start noch Ende).
    pub fn is_interior(&self, index: usize) -> bool {
        index > 0 && index < self.waypoints.len().saturating_sub(1)
    }

    /// Prüft ob der Wegpunkt gelöscht werden darf.
    pub fn is_deletable(&self, index: usize) -> bool {
        self.waypoints.len() > MIN_WAYPOINTS && self.is_interior(index)
    }

    /// Dichte Punktliste entlang aller Splines; der Endpunkt kommt genau einmal vor.
    pub fn sample_polyline(&self, samples_per_spline: usize) -> Vec<Vector2> {
        let samples = samples_per_spline.max(1);
        let mut result = Vec::with_capacity(self.splines.len() * samples + 1);
        for spline in &self.splines {
            for i in 0..samples {
                result.push(spline.sample(i as f64 / samples as f64));
            }
        }
        result.push(self.end().position());
        result
    }

    /// Summe der approximierten Spline-Längen.
    pub fn total_length(&self, segments: usize) -> f64 {
        self.splines.iter().map(|s| s.length(segments)).sum()
    }

    /// Findet den nächstgelegenen Wegpunkt innerhalb von `max_distance`.
    pub fn nearest_waypoint(&self, query: Vector2, max_distance: f64) -> Option<usize> {
        self.waypoints
            .iter()
            .enumerate()
            .map(|(index, wp)| (index, wp.position().distance(query)))
            .filter(|(_, distance)| *distance <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    // ── Bearbeitung ─────────────────────────────────────────────────

    /// Verschiebt einen Wegpunkt.
    ///
    /// Berechnet die Tangente des Wegpunkts und seiner beiden Nachbarn neu (nur
    /// ungesperrte innere Punkte, keine weitere Kaskade) und baut alle Splines
    /// neu, die einen dieser Punkte berühren.
    pub fn move_waypoint(&mut self, index: usize, position: Vector2) -> PathResult<()> {
        self.check_index(index)?;
        ensure_finite(position, "Position")?;

        self.waypoints[index].set_position(position);

        let first = index.saturating_sub(1);
        let last = (index + 1).min(self.waypoints.len() - 1);
        for i in first..=last {
            self.resolve_if_unlocked(i);
        }
        self.rebuild_splines_touching(first, last);
        Ok(())
    }

    /// Setzt eine Tangente direkt und sperrt sie.
    ///
    /// Nachbarn werden nicht neu berechnet, nur die angrenzenden Splines.
    pub fn set_tangent(&mut self, index: usize, tangent: Vector2) -> PathResult<()> {
        self.check_index(index)?;
        ensure_valid_tangent(tangent)?;

        let waypoint = &mut self.waypoints[index];
        waypoint.set_tangent(tangent);
        waypoint.set_tangent_locked(true);
        self.rebuild_splines_touching(index, index);
        Ok(())
    }

    /// Sperrt die aktuelle Tangente ohne sie zu verändern.
    pub fn lock_tangent(&mut self, index: usize) -> PathResult<()> {
        self.set_tangent_locked(index, true)
    }

    /// Setzt das Sperr-Flag; Entsperren ist nur für innere Wegpunkte erlaubt.
    pub fn set_tangent_locked(&mut self, index: usize, locked: bool) -> PathResult<()> {
        if locked {
            self.check_index(index)?;
            self.waypoints[index].set_tangent_locked(true);
            Ok(())
        } else {
            self.unlock_tangent(index)
        }
    }

    /// Entsperrt die Tangente eines inneren Wegpunkts und berechnet sie sofort neu.
    pub fn unlock_tangent(&mut self, index: usize) -> PathResult<()> {
        self.check_index(index)?;
        if !self.is_interior(index) {
            return Err(PathError::invalid(
                "Tangenten von Start- und Endpunkt bleiben gesperrt",
            ));
        }

        self.waypoints[index].set_tangent_locked(false);
        self.resolve_if_unlocked(index);
        self.rebuild_splines_touching(index, index);
        Ok(())
    }

    /// Fügt einen ungesperrten Wegpunkt zwischen `after` und `after + 1` ein.
    ///
    /// Starttangente ist die Gerade zum nächsten Punkt; danach werden der neue
    /// Punkt und beide Nachbarn neu berechnet. Gibt den neuen Index zurück.
    pub fn insert_waypoint(&mut self, after: usize, position: Vector2) -> PathResult<usize> {
        if after >= self.waypoints.len().saturating_sub(1) {
            return Err(PathError::IndexOutOfRange {
                index: after,
                len: self.waypoints.len(),
            });
        }
        ensure_finite(position, "Position")?;

        let prev = self.waypoints[after];
        let next = self.waypoints[after + 1];
        let mut initial_tangent = next.position() - position;
        if is_zero_length(initial_tangent) {
            initial_tangent = next.position() - prev.position();
        }
        if is_zero_length(initial_tangent) {
            initial_tangent = prev.tangent();
        }

        let index = after + 1;
        self.waypoints
            .insert(index, Waypoint::new(position, initial_tangent, false));
        let spline = Spline::rebuild(
            index,
            &self.waypoints[index],
            &self.waypoints[index + 1],
            self.curve_kind,
        );
        self.splines.insert(index, spline);
        self.reindex_splines_from(index + 1);

        for i in after..=index + 1 {
            self.resolve_if_unlocked(i);
        }
        self.rebuild_splines_touching(after, index + 1);

        log::debug!(
            "Pfad '{}': Wegpunkt {} eingefuegt bei ({:.3}, {:.3})",
            self.name,
            index,
            position.x,
            position.y
        );
        Ok(index)
    }

    /// Teilt einen Spline in der Mitte (`sample(0.5)`) durch einen neuen Wegpunkt.
    pub fn insert_waypoint_on_spline(&mut self, spline_index: usize) -> PathResult<usize> {
        let midpoint = self.spline(spline_index)?.sample(0.5);
        self.insert_waypoint(spline_index, midpoint)
    }

    /// Entfernt einen inneren Wegpunkt.
    ///
    /// Die beiden angrenzenden Splines verschmelzen zu einem; beide ehemaligen
    /// Nachbarn werden neu berechnet. Gibt den entfernten Wegpunkt zurück.
    pub fn remove_waypoint(&mut self, index: usize) -> PathResult<Waypoint> {
        self.check_index(index)?;
        if !self.is_interior(index) {
            return Err(PathError::invalid(
                "Start- und Endpunkt koennen nicht entfernt werden",
            ));
        }
        if self.waypoints.len() <= MIN_WAYPOINTS {
            return Err(PathError::invalid(format!(
                "ein Pfad braucht mindestens {MIN_WAYPOINTS} Wegpunkte"
            )));
        }

        let removed = self.waypoints.remove(index);
        self.splines.remove(index);
        self.reindex_splines_from(index);

        for i in index - 1..=index {
            self.resolve_if_unlocked(i);
        }
        self.rebuild_splines_touching(index - 1, index);

        log::debug!("Pfad '{}': Wegpunkt {} entfernt", self.name, index);
        Ok(removed)
    }

    /// Erstellt eine unabhängige Kopie mit neuem Namen.
    ///
    /// Alle Wegpunkte werden mit Tangente und Sperr-Flag kopiert; Splines werden
    /// neu aufgebaut. Der neue Name darf nicht dem eigenen entsprechen.
    pub fn duplicate(&self, new_name: impl Into<String>) -> PathResult<Path> {
        let new_name = new_name.into();
        validate_name(&new_name)?;
        if new_name == self.name {
            return Err(PathError::NameCollision(new_name));
        }

        let mut copy = Self {
            name: new_name,
            waypoints: self.waypoints.clone(),
            splines: Vec::with_capacity(self.splines.len()),
            curve_kind: self.curve_kind,
            tangent_scaling: self.tangent_scaling,
        };
        copy.rebuild_all_splines();
        Ok(copy)
    }

    /// Berechnet alle ungesperrten inneren Tangenten neu (z.B. nach dem Laden).
    ///
    /// Bei degenerierter Geometrie bleibt die bisherige Tangente erhalten.
    pub fn resolve_unlocked_tangents(&mut self) {
        for i in 1..self.waypoints.len() - 1 {
            self.resolve_if_unlocked(i);
        }
        self.rebuild_all_splines();
    }

    // ── Interne Hilfen ──────────────────────────────────────────────

    fn check_index(&self, index: usize) -> PathResult<()> {
        if index < self.waypoints.len() {
            Ok(())
        } else {
            Err(PathError::IndexOutOfRange {
                index,
                len: self.waypoints.len(),
            })
        }
    }

    /// Berechnet die Tangente neu, falls der Punkt innen liegt und ungesperrt ist.
    fn resolve_if_unlocked(&mut self, index: usize) -> bool {
        if !self.is_interior(index) || self.waypoints[index].is_tangent_locked() {
            return false;
        }

        let prev = self.waypoints[index - 1].position();
        let cur = self.waypoints[index].position();
        let next = self.waypoints[index + 1].position();

        match tangent::solve(prev, cur, next) {
            Ok(solved) => {
                let scaled = self.tangent_scaling.apply(solved);
                if is_finite_vec(scaled) && !is_zero_length(scaled) {
                    self.waypoints[index].set_tangent(scaled);
                    true
                } else {
                    false
                }
            }
            Err(err) => {
                log::debug!(
                    "Pfad '{}': Tangente von Wegpunkt {} bleibt unveraendert ({})",
                    self.name,
                    index,
                    err
                );
                false
            }
        }
    }

    /// Baut alle Splines neu, die einen Wegpunkt aus `first..=last` berühren.
    fn rebuild_splines_touching(&mut self, first: usize, last: usize) {
        let spline_count = self.splines.len();
        if spline_count == 0 {
            return;
        }
        let from = first.saturating_sub(1);
        let to = last.min(spline_count - 1);
        for i in from..=to {
            self.splines[i] = Spline::rebuild(
                i,
                &self.waypoints[i],
                &self.waypoints[i + 1],
                self.curve_kind,
            );
        }
    }

    /// Passt die Indizes aller Splines ab `from` an ihre Position an.
    fn reindex_splines_from(&mut self, from: usize) {
        for i in from..self.splines.len() {
            self.splines[i] = self.splines[i].reindexed(i);
        }
    }

    fn rebuild_all_splines(&mut self) {
        let kind = self.curve_kind;
        self.splines = self
            .waypoints
            .windows(2)
            .enumerate()
            .map(|(i, pair)| Spline::rebuild(i, &pair[0], &pair[1], kind))
            .collect();
    }
}

/// Prüft einen Pfadnamen (nicht leer, als Dateiname verwendbar).
pub fn validate_name(name: &str) -> PathResult<()> {
    if name.trim().is_empty() {
        return Err(PathError::invalid("Pfadname darf nicht leer sein"));
    }
    if name
        .chars()
        .any(|c| matches!(c, '/' | '\\' | ':') || c.is_control())
    {
        return Err(PathError::invalid(format!(
            "Pfadname '{name}' enthaelt unzulaessige Zeichen"
        )));
    }
    Ok(())
}

fn ensure_finite(v: Vector2, what: &str) -> PathResult<()> {
    if is_finite_vec(v) {
        Ok(())
    } else {
        Err(PathError::invalid(format!("{what} ist nicht endlich: {v:?}")))
    }
}

fn ensure_valid_tangent(tangent: Vector2) -> PathResult<()> {
    ensure_finite(tangent, "Tangente")?;
    if is_zero_length(tangent) {
        return Err(PathError::invalid("Tangente darf nicht der Nullvektor sein"));
    }
    Ok(())
}
