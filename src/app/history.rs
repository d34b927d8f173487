use crate::core::Path;
use indexmap::IndexMap;
use std::sync::Arc;

/// Zustand aller geöffneten Pfade zu einem Zeitpunkt.
///
/// Nutzt Arc-Clone (Copy-on-Write): Das Erstellen eines Snapshots kostet nur
/// einen Ref-Count pro Pfad, der eigentliche Klon eines Pfads passiert erst
/// beim nächsten `Arc::make_mut()` in einer Bearbeitung.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub paths: IndexMap<String, Arc<Path>>,
}

impl Snapshot {
    pub fn new(paths: IndexMap<String, Arc<Path>>) -> Self {
        Self { paths }
    }
}

/// Einfacher Undo/Redo-Manager mit Snapshotting.
#[derive(Debug, Default)]
pub struct EditHistory {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl EditHistory {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe (0 = kein Undo).
    pub fn new_with_capacity(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Zustand vor einer Änderung ablegen; leert den Redo-Stack.
    pub fn record_snapshot(&mut self, snap: Snapshot) {
        self.redo_stack.clear();
        push_bounded(&mut self.undo_stack, snap, self.max_depth);
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pop undo stack and push `current` onto redo stack; returns the snapshot to apply.
    pub fn pop_undo_with_current(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo_stack.pop()?;
        push_bounded(&mut self.redo_stack, current, self.max_depth);
        Some(prev)
    }

    /// Pop redo stack and push `current` onto undo stack; returns the snapshot to apply.
    pub fn pop_redo_with_current(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        push_bounded(&mut self.undo_stack, current, self.max_depth);
        Some(next)
    }
}

fn push_bounded(stack: &mut Vec<Snapshot>, snap: Snapshot, max_depth: usize) {
    if max_depth == 0 {
        return;
    }
    if stack.len() >= max_depth {
        stack.remove(0);
    }
    stack.push(snap);
}
