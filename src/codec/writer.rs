//! Writer für `.path`-Dateien.

use super::{PATH_FILE_EXTENSION, PATH_HEADER};
use crate::core::vector::is_finite_vec;
use crate::core::Path;
use anyhow::{ensure, Context, Result};
use std::fmt::Write as _;

/// Schreibt einen Pfad als Datensatz-Text (Kopfzeile + eine Zeile pro Wegpunkt).
///
/// Zahlen nutzen die kürzeste Darstellung, die beim Einlesen exakt denselben
/// `f64` ergibt.
pub fn write_path(path: &Path) -> Result<String> {
    let mut output = String::with_capacity(64 + path.len() * 48);
    output.push_str(PATH_HEADER);
    output.push('\n');

    for (index, waypoint) in path.waypoints().iter().enumerate() {
        let position = waypoint.position();
        let tangent = waypoint.tangent();
        ensure!(
            is_finite_vec(position) && is_finite_vec(tangent),
            "Wegpunkt {} von '{}' ist nicht endlich",
            index,
            path.name()
        );
        writeln!(
            output,
            "{},{},{},{},{}",
            position.x,
            position.y,
            tangent.x,
            tangent.y,
            waypoint.is_tangent_locked()
        )?;
    }
    Ok(output)
}

/// Dateiname eines Pfads: `<name>.path`
pub fn path_file_name(name: &str) -> String {
    format!("{}.{}", name, PATH_FILE_EXTENSION)
}

/// Schreibt `<dir>/<name>.path` und gibt den Dateipfad zurück.
pub fn write_path_file(dir: &std::path::Path, path: &Path) -> Result<std::path::PathBuf> {
    let content = write_path(path)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Verzeichnis nicht anlegbar: {}", dir.display()))?;

    let file = dir.join(path_file_name(path.name()));
    std::fs::write(&file, content)
        .with_context(|| format!("Pfad-Datei nicht schreibbar: {}", file.display()))?;
    log::info!("Pfad gespeichert nach: {}", file.display());
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::read_path_file;
    use crate::core::Vector2;
    use crate::shared::PlannerOptions;

    fn temp_dir(tag: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!(
            "pathweaver_writer_{tag}_{}_{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn test_write_two_point_path() {
        let path = Path::new(
            "Gerade",
            Vector2::new(0.0, 0.0),
            Vector2::new(10.0, 0.0),
            Vector2::new(10.0, 10.0),
            Vector2::new(0.0, 10.0),
        )
        .unwrap();

        let text = write_path(&path).unwrap();
        assert_eq!(
            text,
            "X,Y,Tangent X,Tangent Y,Fixed Theta\n0,0,10,0,true\n10,10,0,10,true\n"
        );
    }

    #[test]
    fn test_floats_use_shortest_roundtrip_form() {
        let path = Path::new(
            "Bruch",
            Vector2::new(0.1, -2.5),
            Vector2::new(1.0 / 3.0, 0.0),
            Vector2::new(1e-7, 123456.75),
            Vector2::new(0.0, 1.0),
        )
        .unwrap();

        let text = write_path(&path).unwrap();
        let first = text.lines().nth(1).unwrap();
        assert_eq!(first, format!("0.1,-2.5,{},0,true", 1.0_f64 / 3.0));
        let third: f64 = first.split(',').nth(2).unwrap().parse().unwrap();
        assert_eq!(third.to_bits(), (1.0_f64 / 3.0).to_bits());
    }

    #[test]
    fn test_file_name_uses_extension() {
        assert_eq!(path_file_name("Links raus"), "Links raus.path");
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = temp_dir("file");
        let mut path = Path::with_defaults("Datei", &PlannerOptions::default()).unwrap();
        path.insert_waypoint(0, Vector2::new(4.0, 1.0)).unwrap();

        let file = write_path_file(&dir, &path).expect("Schreiben");
        assert_eq!(file, dir.join("Datei.path"));

        let loaded = read_path_file(&file, &PlannerOptions::default()).expect("Lesen");
        assert_eq!(loaded.name(), "Datei");
        assert_eq!(loaded.waypoints(), path.waypoints());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
