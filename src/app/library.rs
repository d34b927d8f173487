//! Sammlung der geöffneten Pfade eines Projektverzeichnisses.

use crate::codec::{self, PATH_FILE_EXTENSION};
use crate::core::{validate_name, Path, PathError};
use crate::shared::PlannerOptions;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;

/// Geordnete Abbildung Name → Pfad, optional an ein Verzeichnis gebunden.
///
/// Pfade liegen als `Arc<Path>` vor: Snapshots für Undo sind O(1), der
/// eigentliche Klon passiert erst beim nächsten `Arc::make_mut()`.
#[derive(Debug, Clone, Default)]
pub struct PathLibrary {
    directory: Option<PathBuf>,
    paths: IndexMap<String, Arc<Path>>,
    options: PlannerOptions,
}

impl PathLibrary {
    /// Erstellt eine leere Bibliothek ohne Verzeichnis (nur im Speicher).
    pub fn new(options: PlannerOptions) -> Self {
        Self {
            directory: None,
            paths: IndexMap::new(),
            options,
        }
    }

    /// Öffnet ein Projektverzeichnis und lädt alle `*.path`-Dateien.
    ///
    /// Unlesbare Dateien werden protokolliert und übersprungen.
    pub fn open_directory(dir: &std::path::Path, options: PlannerOptions) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Projektverzeichnis nicht lesbar: {}", dir.display()))?;

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|file| {
                file.is_file()
                    && file
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case(PATH_FILE_EXTENSION))
            })
            .collect();
        files.sort();

        let mut library = Self {
            directory: Some(dir.to_path_buf()),
            paths: IndexMap::with_capacity(files.len()),
            options,
        };
        for file in files {
            match codec::read_path_file(&file, &library.options) {
                Ok(path) => {
                    library
                        .paths
                        .insert(path.name().to_string(), Arc::new(path));
                }
                Err(e) => log::warn!("Pfad-Datei uebersprungen: {:#}", e),
            }
        }

        log::info!(
            "Projekt geoeffnet: {} ({} Pfade)",
            dir.display(),
            library.paths.len()
        );
        Ok(library)
    }

    pub fn directory(&self) -> Option<&std::path::Path> {
        self.directory.as_deref()
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Namen in Anzeigereihenfolge
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.paths.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.paths.get(name).map(Arc::as_ref)
    }

    /// Veränderbarer Zugriff (Copy-on-Write, falls ein Snapshot den Pfad teilt).
    pub fn path_mut(&mut self, name: &str) -> Result<&mut Path> {
        self.paths
            .get_mut(name)
            .map(Arc::make_mut)
            .with_context(|| format!("Pfad '{}' ist nicht geoeffnet", name))
    }

    /// Legt einen neuen Pfad mit den Standard-Endpunkten an.
    pub fn create_path(&mut self, name: &str) -> Result<&Path> {
        self.ensure_name_free(name)?;
        let path = Path::with_defaults(name, &self.options)?;
        self.insert(path)
    }

    /// Fügt einen fertigen Pfad hinzu.
    pub fn insert(&mut self, path: Path) -> Result<&Path> {
        self.ensure_name_free(path.name())?;
        let name = path.name().to_string();
        let (index, _) = self.paths.insert_full(name, Arc::new(path));
        Ok(self.paths[index].as_ref())
    }

    /// Schließt einen Pfad und löscht seine Datei.
    ///
    /// Schlägt das Löschen fehl, bleibt der Pfad geöffnet.
    pub fn remove_path(&mut self, name: &str) -> Result<Arc<Path>> {
        if !self.contains(name) {
            anyhow::bail!("Pfad '{}' ist nicht geoeffnet", name);
        }
        self.delete_file(name)?;
        self.paths
            .shift_remove(name)
            .with_context(|| format!("Pfad '{}' ist nicht geoeffnet", name))
    }

    /// Benennt einen Pfad um; Position in der Liste und Datei wandern mit.
    pub fn rename_path(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if old_name == new_name {
            return Ok(());
        }
        validate_name(new_name)?;
        self.ensure_name_free(new_name)?;

        let index = self
            .paths
            .get_index_of(old_name)
            .with_context(|| format!("Pfad '{}' ist nicht geoeffnet", old_name))?;
        let mut path = Arc::clone(&self.paths[index]);
        Arc::make_mut(&mut path).rename(new_name)?;

        // Erst die Datei, dann die Liste: ein Fehler lässt beides unverändert
        if let Some(dir) = &self.directory {
            let old_file = dir.join(codec::path_file_name(old_name));
            if old_file.exists() {
                let new_file = dir.join(codec::path_file_name(new_name));
                std::fs::rename(&old_file, &new_file).with_context(|| {
                    format!("Datei nicht umbenennbar: {}", old_file.display())
                })?;
            }
        }

        self.paths.shift_remove_index(index);
        self.paths.shift_insert(index, new_name.to_string(), path);
        log::info!("Pfad umbenannt: '{}' -> '{}'", old_name, new_name);
        Ok(())
    }

    /// Dupliziert einen geöffneten Pfad unter neuem Namen.
    pub fn duplicate_path(&mut self, source: &str, new_name: &str) -> Result<&Path> {
        self.ensure_name_free(new_name)?;
        let copy = self
            .get(source)
            .with_context(|| format!("Pfad '{}' ist nicht geoeffnet", source))?
            .duplicate(new_name)?;
        self.insert(copy)
    }

    /// Liefert `base`, sonst `base (2)`, `base (3)`, ... (erster freier Name).
    ///
    /// Ein vorhandenes Suffix ` (n)` an `base` wird vorher entfernt.
    pub fn suggest_unique_name(&self, base: &str) -> String {
        let trimmed = base.trim();
        let stem = match Regex::new(r"^(.*?) \((\d+)\)$") {
            Ok(re) => re
                .captures(trimmed)
                .and_then(|caps| caps.get(1))
                .map_or(trimmed, |m| m.as_str()),
            Err(_) => trimmed,
        };

        if !self.contains(stem) {
            return stem.to_string();
        }
        (2..)
            .map(|n| format!("{} ({})", stem, n))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| stem.to_string())
    }

    /// Schreibt einen Pfad nach `<dir>/<name>.path`.
    pub fn save_path(&self, name: &str) -> Result<PathBuf> {
        let dir = self
            .directory
            .as_deref()
            .context("Kein Projektverzeichnis gesetzt")?;
        let path = self
            .get(name)
            .with_context(|| format!("Pfad '{}' ist nicht geoeffnet", name))?;
        codec::write_path_file(dir, path)
    }

    /// Speichert alle Pfade; gibt die Anzahl geschriebener Dateien zurück.
    pub fn save_all(&self) -> Result<usize> {
        for name in self.paths.keys() {
            self.save_path(name)?;
        }
        Ok(self.paths.len())
    }

    /// O(1)-Snapshot aller Pfade (nur Arc-Klone).
    pub(crate) fn snapshot(&self) -> IndexMap<String, Arc<Path>> {
        self.paths.clone()
    }

    /// Ersetzt den Pfad-Bestand und gibt den vorherigen zurück.
    pub(crate) fn replace_paths(
        &mut self,
        paths: IndexMap<String, Arc<Path>>,
    ) -> IndexMap<String, Arc<Path>> {
        std::mem::replace(&mut self.paths, paths)
    }

    pub(crate) fn get_arc(&self, name: &str) -> Option<&Arc<Path>> {
        self.paths.get(name)
    }

    pub(crate) fn arcs(&self) -> impl Iterator<Item = (&str, &Arc<Path>)> {
        self.paths.iter().map(|(name, path)| (name.as_str(), path))
    }

    /// Setzt einen geteilten Pfad unter seinem Namen zurück (Drag-Abbruch).
    pub(crate) fn restore_arc(&mut self, path: Arc<Path>) -> Result<()> {
        let slot = self
            .paths
            .get_mut(path.name())
            .with_context(|| format!("Pfad '{}' ist nicht geoeffnet", path.name()))?;
        *slot = path;
        Ok(())
    }

    /// Löscht die Datei eines Pfads, falls vorhanden.
    pub(crate) fn delete_file(&self, name: &str) -> Result<()> {
        let Some(dir) = &self.directory else {
            return Ok(());
        };
        let file = dir.join(codec::path_file_name(name));
        if file.exists() {
            std::fs::remove_file(&file)
                .with_context(|| format!("Datei nicht loeschbar: {}", file.display()))?;
            log::info!("Pfad-Datei geloescht: {}", file.display());
        }
        Ok(())
    }

    fn ensure_name_free(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        if self.contains(name) {
            return Err(PathError::NameCollision(name.to_string()).into());
        }
        Ok(())
    }
}
