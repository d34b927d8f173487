//! Projekt-Einstellungen in `pathweaver.json` im Projektverzeichnis.
//!
//! Die Längeneinheit ist reine Metadaten: Koordinaten werden nie umgerechnet.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Dateiname der Projekt-Einstellungen
pub const PREFERENCES_FILE_NAME: &str = "pathweaver.json";

/// Standard-Spielname neuer Projekte
pub const DEFAULT_GAME_NAME: &str = "Infinite Recharge";

/// Deklarierte Längeneinheit der Koordinaten eines Projekts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LengthUnit {
    #[default]
    Foot,
    Inch,
    Yard,
    Meter,
    Centimeter,
    Millimeter,
}

/// Werte der Projektdatei (JSON, camelCase wie im bestehenden Dateiformat).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPreferences {
    pub length_unit: LengthUnit,
    /// Maximalgeschwindigkeit (Einheit/s)
    pub max_velocity: f64,
    /// Maximalbeschleunigung (Einheit/s²)
    pub max_acceleration: f64,
    /// Spurbreite des Fahrwerks
    pub wheel_base: f64,
    pub game_name: String,
    /// Ausgabeverzeichnis relativ zum Projekt; `None` = neben dem Projekt
    pub output_dir: Option<String>,
}

impl Default for ProjectPreferences {
    fn default() -> Self {
        Self {
            length_unit: LengthUnit::Foot,
            max_velocity: 10.0,
            max_acceleration: 60.0,
            wheel_base: 2.0,
            game_name: DEFAULT_GAME_NAME.to_string(),
            output_dir: None,
        }
    }
}

impl ProjectPreferences {
    /// Pfad der Einstellungsdatei eines Projekts
    pub fn file_path(project_dir: &Path) -> PathBuf {
        project_dir.join(PREFERENCES_FILE_NAME)
    }

    /// Prüft ob im Verzeichnis bereits ein Projekt liegt.
    pub fn project_exists(project_dir: &Path) -> bool {
        Self::file_path(project_dir).is_file()
    }

    /// Lädt die Einstellungen eines Projekts.
    ///
    /// Fehlt die Datei, gelten die Standardwerte. Ist sie beschädigt, werden die
    /// Standardwerte zurückgeschrieben.
    pub fn load(project_dir: &Path) -> Self {
        let file = Self::file_path(project_dir);
        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(_) => {
                log::info!("Keine Projekt-Einstellungen gefunden, verwende Standardwerte");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(prefs) => {
                log::info!("Projekt-Einstellungen geladen aus: {}", file.display());
                prefs
            }
            Err(e) => {
                log::warn!(
                    "Projekt-Einstellungen beschaedigt und zurueckgesetzt ({}): {}",
                    file.display(),
                    e
                );
                let defaults = Self::default();
                if let Err(e) = defaults.save(project_dir) {
                    log::warn!("Projekt-Einstellungen nicht schreibbar: {:#}", e);
                }
                defaults
            }
        }
    }

    /// Schreibt die Einstellungen als formatiertes JSON.
    pub fn save(&self, project_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(project_dir)
            .with_context(|| format!("Verzeichnis nicht anlegbar: {}", project_dir.display()))?;
        let file = Self::file_path(project_dir);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&file, content)
            .with_context(|| format!("Datei nicht schreibbar: {}", file.display()))?;
        log::info!("Projekt-Einstellungen gespeichert nach: {}", file.display());
        Ok(file)
    }

    /// Zielverzeichnis für erzeugte Trajektorien.
    ///
    /// Ohne `output_dir` wird das Elternverzeichnis des Projekts verwendet. Ist
    /// die Basis ein Gradle-Projekt, landet die Ausgabe im Deploy-Ordner,
    /// sonst in `output/`.
    pub fn output_directory(&self, project_dir: &Path) -> PathBuf {
        let base = match &self.output_dir {
            Some(dir) => project_dir.join(dir),
            None => project_dir
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| project_dir.to_path_buf()),
        };
        if base.join("build.gradle").exists() {
            base.join("src").join("main").join("deploy").join("paths")
        } else {
            base.join("output")
        }
    }
}
