//! Pathweaver CLI.
//!
//! Kommandozeilen-Zugriff auf die Pfade eines Projektverzeichnisses.

use std::path::PathBuf;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use pathweaver_core::{EditorSession, PathCommand, PathLibrary, PlannerOptions, ProjectPreferences};

#[derive(Parser, Debug)]
#[command(name = "pathweaver", version)]
struct Cli {
    /// Projektverzeichnis mit den `.path`-Dateien.
    #[arg(long, short, global = true, default_value = ".")]
    project: PathBuf,

    /// Optionen-Datei (TOML); Standard: neben der Binary.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Neuen Pfad mit Standard-Endpunkten anlegen.
    New {
        /// Name des Pfads (wird eindeutig gemacht).
        name: String,
    },
    /// Pfade auflisten oder einen Pfad im Detail anzeigen.
    Info {
        /// Pfadname; ohne Angabe werden alle Pfade gelistet.
        name: Option<String>,
    },
    /// Dichte Punktliste eines Pfads als CSV ausgeben.
    Sample {
        name: String,
        /// Stützpunkte pro Spline (Standard aus den Optionen).
        #[arg(long)]
        samples: Option<usize>,
    },
    /// Pfad duplizieren.
    Duplicate {
        source: String,
        /// Neuer Name; Standard: `<source> (n)`.
        new_name: Option<String>,
    },
    /// Ungesperrte Tangenten neu berechnen und speichern.
    Resolve {
        name: String,
        /// Auch gesperrte innere Tangenten entsperren.
        #[arg(long, default_value_t = false)]
        unlock_all: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(PlannerOptions::config_path);
    let options = PlannerOptions::load_from_file(&config_path);

    match cli.cmd {
        Command::New { name } => cmd_new(&cli.project, options, &name),
        Command::Info { name } => cmd_info(&cli.project, options, name.as_deref()),
        Command::Sample { name, samples } => cmd_sample(&cli.project, options, &name, samples),
        Command::Duplicate { source, new_name } => {
            cmd_duplicate(&cli.project, options, &source, new_name)
        }
        Command::Resolve { name, unlock_all } => {
            cmd_resolve(&cli.project, options, &name, unlock_all)
        }
    }
}

fn open_session(project: &std::path::Path, options: PlannerOptions) -> anyhow::Result<EditorSession> {
    std::fs::create_dir_all(project)
        .with_context(|| format!("Projektverzeichnis nicht anlegbar: {}", project.display()))?;
    if !ProjectPreferences::project_exists(project) {
        ProjectPreferences::default().save(project)?;
    }
    let prefs = ProjectPreferences::load(project);
    log::info!(
        "Projekt: {} (Einheit {:?}, Spiel '{}')",
        project.display(),
        prefs.length_unit,
        prefs.game_name
    );

    let library = PathLibrary::open_directory(project, options)?;
    Ok(EditorSession::new(library))
}

fn cmd_new(project: &std::path::Path, options: PlannerOptions, name: &str) -> anyhow::Result<()> {
    let mut session = open_session(project, options)?;
    let name = session.library().suggest_unique_name(name);
    session.apply(PathCommand::CreatePath { name: name.clone() })?;
    session.flush()?;
    println!("{}", name);
    Ok(())
}

fn cmd_info(
    project: &std::path::Path,
    options: PlannerOptions,
    name: Option<&str>,
) -> anyhow::Result<()> {
    let session = open_session(project, options)?;
    let library = session.library();
    let segments = library.options().length_segments;

    let Some(name) = name else {
        for name in library.names() {
            if let Some(path) = library.get(name) {
                println!(
                    "{}\t{} Wegpunkte\tLaenge {:.3}",
                    name,
                    path.len(),
                    path.total_length(segments)
                );
            }
        }
        return Ok(());
    };

    let path = library
        .get(name)
        .with_context(|| format!("Pfad '{}' nicht gefunden", name))?;
    println!("{} ({} Wegpunkte, Laenge {:.3})", name, path.len(), path.total_length(segments));
    for (index, waypoint) in path.waypoints().iter().enumerate() {
        let p = waypoint.position();
        let t = waypoint.tangent();
        println!(
            "{:>3}  pos ({:.4}, {:.4})  tangente ({:.4}, {:.4})  {}",
            index,
            p.x,
            p.y,
            t.x,
            t.y,
            if waypoint.is_tangent_locked() { "gesperrt" } else { "frei" }
        );
    }
    Ok(())
}

fn cmd_sample(
    project: &std::path::Path,
    options: PlannerOptions,
    name: &str,
    samples: Option<usize>,
) -> anyhow::Result<()> {
    let session = open_session(project, options)?;
    let path = session
        .path(name)
        .with_context(|| format!("Pfad '{}' nicht gefunden", name))?;
    let samples = samples.unwrap_or(session.library().options().samples_per_spline);

    println!("x,y");
    for point in path.sample_polyline(samples) {
        println!("{},{}", point.x, point.y);
    }
    Ok(())
}

fn cmd_duplicate(
    project: &std::path::Path,
    options: PlannerOptions,
    source: &str,
    new_name: Option<String>,
) -> anyhow::Result<()> {
    let mut session = open_session(project, options)?;
    let new_name = new_name.unwrap_or_else(|| session.library().suggest_unique_name(source));
    session.apply(PathCommand::DuplicatePath {
        source: source.to_string(),
        new_name: new_name.clone(),
    })?;
    session.flush()?;
    println!("{}", new_name);
    Ok(())
}

fn cmd_resolve(
    project: &std::path::Path,
    options: PlannerOptions,
    name: &str,
    unlock_all: bool,
) -> anyhow::Result<()> {
    let mut session = open_session(project, options)?;
    let Some(path) = session.path(name) else {
        bail!("Pfad '{}' nicht gefunden", name);
    };

    let locked_interior: Vec<usize> = path
        .waypoints()
        .iter()
        .enumerate()
        .filter(|(index, waypoint)| path.is_interior(*index) && waypoint.is_tangent_locked())
        .map(|(index, _)| index)
        .collect();

    if unlock_all {
        for index in locked_interior {
            session.apply(PathCommand::UnlockTangent {
                path: name.to_string(),
                index,
            })?;
        }
    }
    // Laden hat freie Tangenten bereits neu berechnet; Speichern schreibt sie fest
    let written = session.library().save_path(name)?;
    session.flush()?;
    println!("{}", written.display());
    Ok(())
}
