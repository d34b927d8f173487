//! Bearbeitungs-Session: zentrale Command-Verarbeitung über einer `PathLibrary`.
//!
//! Jeder Command legt vorher einen Undo-Snapshot ab, markiert den betroffenen
//! Pfad als geändert und speichert bei aktivem Autosave sofort. Drags laufen
//! über einen vom Aufrufer gehaltenen `PendingMove` und erzeugen beim
//! Abschluss genau einen Undo-Schritt.

use super::history::{EditHistory, Snapshot};
use super::library::PathLibrary;
use crate::core::{CurveKind, Path, TangentScaling, Vector2};
use anyhow::{Context, Result};
use indexmap::IndexSet;
use std::sync::Arc;

/// Mutierende Schritte auf Pfaden und der Bibliothek.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    /// Wegpunkt verschieben
    MoveWaypoint {
        path: String,
        index: usize,
        position: Vector2,
    },
    /// Tangente setzen und sperren
    SetTangent {
        path: String,
        index: usize,
        tangent: Vector2,
    },
    /// Aktuelle Tangente sperren
    LockTangent { path: String, index: usize },
    /// Tangente entsperren und neu berechnen (nur innere Wegpunkte)
    UnlockTangent { path: String, index: usize },
    /// Wegpunkt nach `after` einfügen
    InsertWaypoint {
        path: String,
        after: usize,
        position: Vector2,
    },
    /// Spline in der Mitte teilen
    SplitSpline { path: String, spline: usize },
    /// Inneren Wegpunkt entfernen
    RemoveWaypoint { path: String, index: usize },
    /// Kurvenvariante eines Pfads wechseln
    SetCurveKind { path: String, kind: CurveKind },
    /// Betragsregel eines Pfads wechseln
    SetTangentScaling {
        path: String,
        scaling: TangentScaling,
    },
    /// Neuen Pfad mit Standard-Endpunkten anlegen
    CreatePath { name: String },
    /// Pfad duplizieren
    DuplicatePath { source: String, new_name: String },
    /// Pfad umbenennen
    RenamePath { old_name: String, new_name: String },
    /// Pfad schließen und Datei löschen
    RemovePath { name: String },
}

/// Was ein Drag bewegt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// Position des Wegpunkts
    Waypoint,
    /// Spitze des Tangenten-Griffs (Tangente = Griff - Position)
    Tangent,
}

/// Laufender Drag, gehalten vom Aufrufer (kein globaler Drag-Zustand).
#[derive(Debug, Clone)]
pub struct PendingMove {
    path: String,
    index: usize,
    target: DragTarget,
    original: Arc<Path>,
    before: Snapshot,
}

impl PendingMove {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn target(&self) -> DragTarget {
        self.target
    }
}

/// Eine Bearbeitungs-Session über den geöffneten Pfaden.
#[derive(Debug)]
pub struct EditorSession {
    library: PathLibrary,
    history: EditHistory,
    dirty: IndexSet<String>,
}

impl EditorSession {
    /// Erstellt eine Session; Undo-Tiefe aus den Optionen der Bibliothek.
    pub fn new(library: PathLibrary) -> Self {
        let history = EditHistory::new_with_capacity(library.options().history_depth);
        Self {
            library,
            history,
            dirty: IndexSet::new(),
        }
    }

    pub fn library(&self) -> &PathLibrary {
        &self.library
    }

    /// Lesender Zugriff auf einen Pfad
    pub fn path(&self, name: &str) -> Option<&Path> {
        self.library.get(name)
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    /// Namen aller ungespeicherten Pfade
    pub fn dirty_paths(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Führt einen Command aus.
    ///
    /// Schlägt der Command fehl, bleibt der Zustand unverändert und es entsteht
    /// kein Undo-Schritt.
    pub fn apply(&mut self, command: PathCommand) -> Result<()> {
        log::debug!("Command: {:?}", command);
        let before = Snapshot::new(self.library.snapshot());
        self.execute(command)?;
        self.history.record_snapshot(before);
        self.autosave()
    }

    fn execute(&mut self, command: PathCommand) -> Result<()> {
        match command {
            // === Wegpunkte ===
            PathCommand::MoveWaypoint {
                path,
                index,
                position,
            } => self.edit(&path, |p| p.move_waypoint(index, position))?,
            PathCommand::SetTangent {
                path,
                index,
                tangent,
            } => self.edit(&path, |p| p.set_tangent(index, tangent))?,
            PathCommand::LockTangent { path, index } => {
                self.edit(&path, |p| p.lock_tangent(index))?
            }
            PathCommand::UnlockTangent { path, index } => {
                self.edit(&path, |p| p.unlock_tangent(index))?
            }
            PathCommand::InsertWaypoint {
                path,
                after,
                position,
            } => self.edit(&path, |p| p.insert_waypoint(after, position).map(|_| ()))?,
            PathCommand::SplitSpline { path, spline } => {
                self.edit(&path, |p| p.insert_waypoint_on_spline(spline).map(|_| ()))?
            }
            PathCommand::RemoveWaypoint { path, index } => {
                self.edit(&path, |p| p.remove_waypoint(index).map(|_| ()))?
            }
            PathCommand::SetCurveKind { path, kind } => self.edit(&path, |p| {
                p.set_curve_kind(kind);
                Ok(())
            })?,
            PathCommand::SetTangentScaling { path, scaling } => self.edit(&path, |p| {
                p.set_tangent_scaling(scaling);
                Ok(())
            })?,

            // === Bibliothek ===
            PathCommand::CreatePath { name } => {
                self.library.create_path(&name)?;
                self.dirty.insert(name);
            }
            PathCommand::DuplicatePath { source, new_name } => {
                self.library.duplicate_path(&source, &new_name)?;
                self.dirty.insert(new_name);
            }
            PathCommand::RenamePath { old_name, new_name } => {
                self.library.rename_path(&old_name, &new_name)?;
                if self.dirty.shift_remove(&old_name) {
                    self.dirty.insert(new_name);
                }
            }
            PathCommand::RemovePath { name } => {
                self.library.remove_path(&name)?;
                self.dirty.shift_remove(&name);
            }
        }
        Ok(())
    }

    /// Wendet eine Core-Operation auf einen Pfad an und markiert ihn als geändert.
    fn edit<F>(&mut self, name: &str, operation: F) -> Result<()>
    where
        F: FnOnce(&mut Path) -> crate::core::PathResult<()>,
    {
        let path = self.library.path_mut(name)?;
        operation(path).with_context(|| format!("Bearbeitung von '{}' fehlgeschlagen", name))?;
        self.dirty.insert(name.to_string());
        Ok(())
    }

    // ── Drag ────────────────────────────────────────────────────────

    /// Beginnt einen Drag auf einem Wegpunkt oder seinem Tangenten-Griff.
    pub fn begin_drag(&self, path: &str, index: usize, target: DragTarget) -> Result<PendingMove> {
        let original = self
            .library
            .get_arc(path)
            .with_context(|| format!("Pfad '{}' ist nicht geoeffnet", path))?;
        original.waypoint(index)?;

        Ok(PendingMove {
            path: path.to_string(),
            index,
            target,
            original: Arc::clone(original),
            before: Snapshot::new(self.library.snapshot()),
        })
    }

    /// Zwischenschritt eines Drags; ohne Undo-Schritt und ohne Speichern.
    pub fn drag_to(&mut self, pending: &PendingMove, position: Vector2) -> Result<()> {
        let index = pending.index;
        match pending.target {
            DragTarget::Waypoint => {
                self.edit(&pending.path, |p| p.move_waypoint(index, position))
            }
            DragTarget::Tangent => self.edit(&pending.path, |p| {
                let anchor = p.waypoint(index)?.position();
                p.set_tangent(index, position - anchor)
            }),
        }
    }

    /// Schließt einen Drag ab: ein Undo-Schritt, danach Autosave.
    pub fn finish_drag(&mut self, pending: PendingMove) -> Result<()> {
        if self.drag_changed_path(&pending) {
            self.history.record_snapshot(pending.before);
        }
        self.autosave()
    }

    /// Bricht einen Drag ab und stellt den Pfad von vor dem Drag wieder her.
    pub fn cancel_drag(&mut self, pending: PendingMove) -> Result<()> {
        if !self.library.contains(&pending.path) {
            return Ok(());
        }
        let changed = self.drag_changed_path(&pending);
        self.library.restore_arc(pending.original)?;
        if changed {
            self.dirty.insert(pending.path);
        }
        self.autosave()
    }

    /// Inhaltsvergleich: `edit` klont das Arc auch bei fehlgeschlagenen Schritten.
    fn drag_changed_path(&self, pending: &PendingMove) -> bool {
        self.library.get_arc(&pending.path).is_some_and(|current| {
            !Arc::ptr_eq(current, &pending.original) && **current != *pending.original
        })
    }

    // ── Undo/Redo ───────────────────────────────────────────────────

    /// Macht den letzten Schritt rückgängig. `false`, wenn nichts da war.
    pub fn undo(&mut self) -> Result<bool> {
        let current = Snapshot::new(self.library.snapshot());
        match self.history.pop_undo_with_current(current) {
            Some(previous) => {
                self.restore(previous)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stellt den zuletzt rückgängig gemachten Schritt wieder her.
    pub fn redo(&mut self) -> Result<bool> {
        let current = Snapshot::new(self.library.snapshot());
        match self.history.pop_redo_with_current(current) {
            Some(next) => {
                self.restore(next)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) -> Result<()> {
        let replaced = self.library.replace_paths(snapshot.paths);

        for name in replaced.keys() {
            if !self.library.contains(name) {
                self.library.delete_file(name)?;
                self.dirty.shift_remove(name);
            }
        }
        for (name, path) in self.library.arcs() {
            let unchanged = replaced
                .get(name)
                .is_some_and(|old| Arc::ptr_eq(old, path));
            if !unchanged {
                self.dirty.insert(name.to_string());
            }
        }
        self.autosave()
    }

    // ── Persistenz ──────────────────────────────────────────────────

    /// Speichert alle geänderten Pfade; ohne Verzeichnis passiert nichts.
    ///
    /// Gibt die Anzahl geschriebener Dateien zurück.
    pub fn flush(&mut self) -> Result<usize> {
        if self.library.directory().is_none() {
            return Ok(0);
        }

        let pending: Vec<String> = self.dirty.iter().cloned().collect();
        let mut written = 0;
        for name in pending {
            if self.library.contains(&name) {
                self.library.save_path(&name)?;
                written += 1;
            }
            self.dirty.shift_remove(&name);
        }
        Ok(written)
    }

    fn autosave(&mut self) -> Result<()> {
        if self.library.options().autosave {
            self.flush()?;
        }
        Ok(())
    }
}
