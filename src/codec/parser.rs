//! Parser für `.path`-Dateien.

use super::PATH_HEADER;
use crate::core::vector::{is_finite_vec, is_zero_length};
use crate::core::{Path, Vector2, Waypoint};
use crate::shared::PlannerOptions;
use anyhow::{bail, ensure, Context, Result};

/// Ein gelesener Datensatz vor dem Aufbau des Pfads.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Record {
    position: Vector2,
    tangent: Vector2,
    locked: Option<bool>,
}

/// Parsed einen Pfad aus dem Dateiinhalt.
///
/// Start und Ende werden immer gesperrt. Innere Datensätze mit Flag `true`
/// behalten ihre gespeicherte Tangente, alle anderen werden neu berechnet.
pub fn parse_path(name: &str, content: &str, options: &PlannerOptions) -> Result<Path> {
    let mut records = Vec::new();
    let mut seen_first_line = false;

    for (line_index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let first_line = !seen_first_line;
        seen_first_line = true;
        if first_line && is_header(line) {
            continue;
        }

        let record =
            parse_record(line).with_context(|| format!("Zeile {}: '{}'", line_index + 1, line))?;
        records.push(record);
    }

    ensure!(
        records.len() >= crate::core::MIN_WAYPOINTS,
        "Pfad '{}' braucht mindestens {} Datensaetze, gefunden: {}",
        name,
        crate::core::MIN_WAYPOINTS,
        records.len()
    );

    let waypoints = build_waypoints(&records);
    let mut path = Path::from_waypoints(name, waypoints)
        .with_context(|| format!("Pfad '{}' ist ungueltig", name))?
        .with_tangent_scaling(options.tangent_scaling);
    path.resolve_unlocked_tangents();

    log::debug!(
        "Pfad '{}' geparsed: {} Wegpunkte",
        path.name(),
        path.len()
    );
    Ok(path)
}

/// Liest eine `.path`-Datei; der Pfadname ist der Dateiname ohne Endung.
pub fn read_path_file(file: &std::path::Path, options: &PlannerOptions) -> Result<Path> {
    let name = file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("Kein gueltiger Dateiname: {}", file.display()))?;
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Pfad-Datei nicht lesbar: {}", file.display()))?;

    let path = parse_path(name, &content, options)
        .with_context(|| format!("Fehler beim Parsen von {}", file.display()))?;
    log::info!("Pfad geladen: {} ({} Wegpunkte)", file.display(), path.len());
    Ok(path)
}

/// Kopfzeile erkennen: Spalten wie in [`PATH_HEADER`], ohne Rücksicht auf
/// Groß-/Kleinschreibung und Leerzeichen. Die Flag-Spalte darf fehlen.
fn is_header(line: &str) -> bool {
    let normalize = |field: &str| -> String {
        field
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    };
    let fields: Vec<String> = line.split(',').map(normalize).collect();
    let expected: Vec<String> = PATH_HEADER.split(',').map(normalize).collect();

    (fields.len() == expected.len() || fields.len() == expected.len() - 1)
        && fields.iter().zip(&expected).all(|(a, b)| a == b)
}

fn parse_record(line: &str) -> Result<Record> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 && fields.len() != 5 {
        bail!("4 oder 5 Spalten erwartet, gefunden: {}", fields.len());
    }

    let mut values = [0.0_f64; 4];
    for (column, (value, field)) in values.iter_mut().zip(&fields).enumerate() {
        *value = field
            .parse::<f64>()
            .with_context(|| format!("Spalte {} ist keine Zahl: '{}'", column + 1, field))?;
    }

    let position = Vector2::new(values[0], values[1]);
    let tangent = Vector2::new(values[2], values[3]);
    ensure!(
        is_finite_vec(position) && is_finite_vec(tangent),
        "Werte muessen endlich sein"
    );

    let locked = match fields.get(4) {
        Some(flag) => Some(parse_flag(flag)?),
        None => None,
    };

    Ok(Record {
        position,
        tangent,
        locked,
    })
}

fn parse_flag(field: &str) -> Result<bool> {
    match field.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => bail!("Sperr-Flag muss true/false oder 1/0 sein, gefunden: '{}'", other),
    }
}

fn build_waypoints(records: &[Record]) -> Vec<Waypoint> {
    let last = records.len() - 1;
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let endpoint = index == 0 || index == last;
            let locked = endpoint || record.locked == Some(true);
            let mut tangent = record.tangent;

            // Ungesperrte Tangenten werden ohnehin neu berechnet
            if !locked && is_zero_length(tangent) {
                tangent = records[index + 1].position - records[index - 1].position;
                if is_zero_length(tangent) {
                    tangent = Vector2::X;
                }
            }
            Waypoint::new(record.position, tangent, locked)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tangent;

    fn options() -> PlannerOptions {
        PlannerOptions::default()
    }

    #[test]
    fn test_parse_with_header_and_flags() {
        let content = "X,Y,Tangent X,Tangent Y,Fixed Theta\n\
                       0,0,5,0,true\n\
                       5,3,0,4,true\n\
                       10,0,5,0,true\n";
        let path = parse_path("Kurve", content, &options()).expect("Parsen");

        assert_eq!(path.name(), "Kurve");
        assert_eq!(path.len(), 3);
        let middle = path.waypoints()[1];
        assert!(middle.is_tangent_locked());
        assert_eq!(middle.tangent(), Vector2::new(0.0, 4.0));
        assert_eq!(path.splines().len(), 2);
    }

    #[test]
    fn test_four_column_records_resolve_interior() {
        let content = "0,0,5,0\n5,3,99,99\n10,0,5,0\n";
        let path = parse_path("Ohne Flag", content, &options()).expect("Parsen");

        let expected = tangent::solve(
            Vector2::new(0.0, 0.0),
            Vector2::new(5.0, 3.0),
            Vector2::new(10.0, 0.0),
        )
        .unwrap();
        assert!(!path.waypoints()[1].is_tangent_locked());
        assert_eq!(path.waypoints()[1].tangent(), expected);
    }

    #[test]
    fn test_endpoints_locked_regardless_of_flag() {
        let content = "0,0,5,0,false\n5,3,1,1,0\n10,0,5,0,FALSE\n";
        let path = parse_path("Flags", content, &options()).expect("Parsen");

        assert!(path.start().is_tangent_locked());
        assert!(path.end().is_tangent_locked());
        assert!(!path.waypoints()[1].is_tangent_locked());
    }

    #[test]
    fn test_blank_lines_and_whitespace_are_ignored() {
        let content = "\n  X , Y , Tangent X , Tangent Y , Fixed Theta \n\n 0 , 0 , 1 , 0 , true \n\n10,0,1,0,true\n\n";
        let path = parse_path("Leer", content, &options()).expect("Parsen");
        assert_eq!(path.len(), 2);
        assert_eq!(path.end().position(), Vector2::new(10.0, 0.0));
    }

    #[test]
    fn test_zero_tangent_on_unlocked_interior_is_accepted() {
        let content = "0,0,5,0\n5,3,0,0\n10,0,5,0\n";
        let path = parse_path("Null", content, &options()).expect("Parsen");
        assert!(!is_zero_length(path.waypoints()[1].tangent()));
    }

    #[test]
    fn test_error_reports_line_number() {
        let content = "X,Y,Tangent X,Tangent Y,Fixed Theta\n0,0,1,0\nabc,0,1,0\n";
        let err = parse_path("Kaputt", content, &options()).expect_err("Fehler erwartet");
        let message = format!("{err:#}");
        assert!(message.contains("Zeile 3"), "Meldung: {message}");
        assert!(message.contains("Spalte 1"), "Meldung: {message}");
    }

    #[test]
    fn test_corrupt_first_record_is_not_taken_as_header() {
        let content = "abc,0,1,0
0,0,1,0
10,0,1,0
";
        let err = parse_path("Kaputt", content, &options()).expect_err("Fehler erwartet");
        let message = format!("{err:#}");
        assert!(message.contains("Zeile 1"), "Meldung: {message}");
        assert!(message.contains("Spalte 1"), "Meldung: {message}");
    }

    #[test]
    fn test_header_match_ignores_case_and_spacing() {
        assert!(is_header("X,Y,Tangent X,Tangent Y,Fixed Theta"));
        assert!(is_header("x, y, tangent x, TANGENT Y, fixedtheta"));
        assert!(is_header("X,Y,Tangent X,Tangent Y"));
        assert!(!is_header("X,Y"));
        assert!(!is_header("X,Y,Tangent X,Tangent Y,Fixed Theta,Extra"));
        assert!(!is_header("abc,0,1,0"));

        let path = parse_path("Klein", "x,y,tangent x,tangent y
0,0,1,0
10,0,1,0
", &options())
            .expect("Parsen");
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_invalid_records_are_rejected() {
        let cases = [
            "0,0,1\n1,1,1,0\n",
            "0,0,1,0,true,7\n1,1,1,0\n",
            "0,0,1,0,vielleicht\n1,1,1,0\n",
            "0,0,1,0\nNaN,1,1,0\n",
            "0,0,1,0\n",
            "",
        ];
        for content in cases {
            assert!(
                parse_path("Fall", content, &options()).is_err(),
                "Sollte fehlschlagen: {content:?}"
            );
        }
    }

    #[test]
    fn test_zero_tangent_on_endpoint_is_rejected() {
        let err = parse_path("Ende", "0,0,0,0\n1,1,1,0\n", &options()).expect_err("Fehler");
        assert!(format!("{err:#}").contains("Ende"));
    }

    #[test]
    fn test_scaling_from_options_applies_to_loaded_path() {
        let opts = PlannerOptions {
            tangent_scaling: crate::core::TangentScaling::SqrtMagnitude,
            ..PlannerOptions::default()
        };
        let raw = parse_path("Raw", "0,0,5,0\n5,3,1,0\n10,0,5,0\n", &options()).unwrap();
        let scaled = parse_path("Sqrt", "0,0,5,0\n5,3,1,0\n10,0,5,0\n", &opts).unwrap();

        let raw_len = raw.waypoints()[1].tangent().length();
        let scaled_len = scaled.waypoints()[1].tangent().length();
        assert!((scaled_len - raw_len.sqrt()).abs() < 1e-9);
    }
}
