//! Command definitions and dispatch.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the store once.
//! - Map each subcommand onto the core reference service.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use thickness_core::db::open_db;
use thickness_core::{
    core_version, init_logging, load_config, parse_number, AngleUnit, AppConfig, CalculateError,
    ReferenceService, SqliteReferenceRepository, ThicknessForm, ThicknessResult,
};

#[derive(Parser, Debug)]
#[command(name = "thickness")]
#[command(about = "Overlayer thickness from XPS intensity ratios")]
#[command(version)]
pub struct Cli {
    /// TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Reference store file (overrides the settings file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// trace|debug|info|warn|error (overrides the settings file).
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate mean free path, emitter volumes and layer thickness.
    Calculate(CalculateArgs),
    /// Add an orbital cross-section record.
    AddOrbital {
        name: String,
        cross_section: String,
        /// Excitation energy in eV.
        energy: String,
    },
    /// Add a material record.
    AddMaterial {
        name: String,
        /// Density in g/cm³.
        density: String,
        /// Molar mass in g/mol.
        molar_mass: String,
    },
    /// List orbital records.
    Orbitals,
    /// List material records.
    Materials,
    /// Print the core library version.
    Version,
}

#[derive(Args, Debug)]
struct CalculateArgs {
    /// Excitation energy in eV.
    #[arg(long, default_value = thickness_core::model::inputs::DEFAULT_EXCITATION_ENERGY_TEXT)]
    excitation: String,
    /// Binding energy in eV.
    #[arg(long)]
    binding: String,
    #[arg(long)]
    film_material: String,
    #[arg(long)]
    substrate_material: String,
    /// Orbital name or list label such as "Mo3d @ 1486.6 eV".
    #[arg(long)]
    film_orbital: String,
    /// Orbital name or list label such as "Mo3d @ 1486.6 eV".
    #[arg(long)]
    substrate_orbital: String,
    #[arg(long)]
    n_film: String,
    #[arg(long)]
    n_substrate: String,
    #[arg(long)]
    i_film: String,
    #[arg(long)]
    i_substrate: String,
    /// Emission angle from the surface normal.
    #[arg(long, default_value = thickness_core::model::inputs::DEFAULT_MEASUREMENT_ANGLE_TEXT, allow_hyphen_values = true)]
    angle: String,
    /// Read the angle in degrees instead of radians.
    #[arg(long)]
    degrees: bool,
    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

impl CalculateArgs {
    fn to_form(&self) -> ThicknessForm {
        ThicknessForm {
            excitation_energy: self.excitation.clone(),
            binding_energy: self.binding.clone(),
            film_material: self.film_material.clone(),
            substrate_material: self.substrate_material.clone(),
            film_orbital: self.film_orbital.clone(),
            substrate_orbital: self.substrate_orbital.clone(),
            n_film: self.n_film.clone(),
            n_substrate: self.n_substrate.clone(),
            i_film: self.i_film.clone(),
            i_substrate: self.i_substrate.clone(),
            measurement_angle: self.angle.clone(),
            angle_unit: if self.degrees {
                AngleUnit::Degrees
            } else {
                AngleUnit::Radians
            },
        }
    }
}

/// Executes one command, writing user-facing output to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    if let Commands::Version = cli.command {
        writeln!(out, "thickness_core version={}", core_version())?;
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    if let Some(log_dir) = &config.log_dir {
        let log_dir = log_dir.to_string_lossy();
        init_logging(&config.log_level, &log_dir)
            .map_err(anyhow::Error::msg)
            .context("failed to start logging")?;
    }

    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create data directory `{}`", parent.display())
            })?;
        }
    }
    let conn = open_db(&config.database_path).with_context(|| {
        format!(
            "reference store unavailable at `{}`",
            config.database_path.display()
        )
    })?;
    let service = ReferenceService::new(SqliteReferenceRepository::try_new(&conn)?);

    match cli.command {
        Commands::Calculate(args) => {
            let result = service.calculate_form(&args.to_form())?;
            write_result(out, &result, args.json)?;
        }
        Commands::AddOrbital {
            name,
            cross_section,
            energy,
        } => {
            let cross_section = parse_field("cross section", &cross_section)?;
            let energy = parse_field("energy", &energy)?;
            let record = service.add_orbital(&name, cross_section, energy)?;
            writeln!(out, "added orbital {}", record.display_label())?;
        }
        Commands::AddMaterial {
            name,
            density,
            molar_mass,
        } => {
            let density = parse_field("density", &density)?;
            let molar_mass = parse_field("molar mass", &molar_mass)?;
            let record = service.add_material(&name, density, molar_mass)?;
            writeln!(out, "added material {}", record.material_name)?;
        }
        Commands::Orbitals => {
            for record in service.list_orbitals()? {
                writeln!(
                    out,
                    "{}\tcross_section={}",
                    record.display_label(),
                    record.cross_section
                )?;
            }
        }
        Commands::Materials => {
            for record in service.list_materials()? {
                writeln!(
                    out,
                    "{}\tdensity={} g/cm³\tmolar_mass={} g/mol",
                    record.material_name, record.density, record.molar_mass
                )?;
            }
        }
        Commands::Version => {}
    }

    drop(service);
    drop(conn);
    info!("event=app_exit module=cli status=ok");
    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    Ok(config)
}

fn parse_field(field: &'static str, text: &str) -> Result<f64, CalculateError> {
    Ok(parse_number(field, text)?)
}

fn write_result(out: &mut impl Write, result: &ThicknessResult, json: bool) -> anyhow::Result<()> {
    if json {
        let labeled: serde_json::Map<String, serde_json::Value> = result
            .labeled()
            .iter()
            .map(|(label, value)| ((*label).to_string(), serde_json::json!(value)))
            .collect();
        writeln!(out, "{}", serde_json::Value::Object(labeled))?;
        return Ok(());
    }
    for (label, value) in result.labeled() {
        writeln!(out, "{label}: {value}")?;
    }
    Ok(())
}
