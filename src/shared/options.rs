//! Zentrale Konfiguration für Pathweaver.
//!
//! `PlannerOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

use crate::core::TangentScaling;

// ── Geometrie ───────────────────────────────────────────────────────

/// Polylinien-Stücke pro Spline für Längenberechnungen.
pub const LENGTH_SEGMENTS: usize = 64;
/// Stützpunkte pro Spline für Vorschau/Export als Punktliste.
pub const SAMPLES_PER_SPLINE: usize = 20;

// ── Neue Pfade ──────────────────────────────────────────────────────

/// Startpunkt eines neu angelegten Pfads.
pub const DEFAULT_START: [f64; 2] = [0.0, 0.0];
/// Endpunkt eines neu angelegten Pfads.
pub const DEFAULT_END: [f64; 2] = [10.0, 10.0];
/// Starttangente eines neu angelegten Pfads.
pub const DEFAULT_START_TANGENT: [f64; 2] = [10.0, 0.0];
/// Endtangente eines neu angelegten Pfads.
pub const DEFAULT_END_TANGENT: [f64; 2] = [0.0, 10.0];

// ── Bearbeitung ─────────────────────────────────────────────────────

/// Pick-Radius (Welteinheiten) für die Wegpunktauswahl.
pub const PICK_RADIUS: f64 = 0.5;
/// Maximale Anzahl Undo-Schritte.
pub const HISTORY_DEPTH: usize = 200;

/// Laufzeit-Optionen, persistiert als TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    // ── Geometrie ────────────────────────────────────────────────
    /// Polylinien-Stücke pro Spline für `length`
    pub length_segments: usize,
    /// Stützpunkte pro Spline für `sample_polyline`
    pub samples_per_spline: usize,
    /// Betragsregel für berechnete Tangenten neuer Pfade
    pub tangent_scaling: TangentScaling,

    // ── Neue Pfade ───────────────────────────────────────────────
    pub default_start: [f64; 2],
    pub default_start_tangent: [f64; 2],
    pub default_end: [f64; 2],
    pub default_end_tangent: [f64; 2],

    // ── Bearbeitung ──────────────────────────────────────────────
    /// Pick-Radius (Welteinheiten)
    pub pick_radius: f64,
    /// Maximale Undo-Tiefe (0 = kein Undo)
    pub history_depth: usize,
    /// Geänderte Pfade nach jedem Befehl sofort speichern
    pub autosave: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            length_segments: LENGTH_SEGMENTS,
            samples_per_spline: SAMPLES_PER_SPLINE,
            tangent_scaling: TangentScaling::default(),

            default_start: DEFAULT_START,
            default_start_tangent: DEFAULT_START_TANGENT,
            default_end: DEFAULT_END,
            default_end_tangent: DEFAULT_END_TANGENT,

            pick_radius: PICK_RADIUS,
            history_depth: HISTORY_DEPTH,
            autosave: true,
        }
    }
}

impl PlannerOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("pathweaver"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("pathweaver.toml")
    }
}
