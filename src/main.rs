//! honeybee-energy entry point: CLI wiring and config-driven translation.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use honeybee_energy::config::{ConfigError, SimParConfig};
use honeybee_energy::geometry::Model;
use honeybee_energy::io::{export_schedules_csv, write_schedules_csv};
use honeybee_energy::simulation::SimulationParameter;
use honeybee_energy::translate::simulation_idf;

mod cli;

use cli::{Cli, Commands};

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Every validation error of a config, printed one per line.
#[derive(Debug)]
struct ConfigErrors(Vec<ConfigError>);

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}

impl Error for ConfigErrors {}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Loads a TOML config or a preset (`default` when neither is given) and
/// applies the DDY overrides from the command line.
fn load_config(
    config: Option<&Path>,
    preset: Option<&str>,
    ddy: Option<&Path>,
    all_design_days: bool,
) -> CliResult<SimParConfig> {
    let mut cfg = match (config, preset) {
        (Some(path), _) => SimParConfig::from_toml_file(path)?,
        (None, Some(name)) => SimParConfig::from_preset(name)?,
        (None, None) => SimParConfig::default_preset(),
    };
    if let Some(path) = ddy {
        cfg.sizing.ddy_file = Some(path.to_path_buf());
        cfg.sizing.all_design_days = all_design_days;
    }
    let errors = cfg.validate();
    if !errors.is_empty() {
        return Err(Box::new(ConfigErrors(errors)));
    }
    Ok(cfg)
}

fn load_sim_par(
    sim_par: Option<&Path>,
    preset: Option<&str>,
    ddy: Option<&Path>,
    all_design_days: bool,
) -> CliResult<SimulationParameter> {
    if let Some(path) = sim_par.filter(|p| is_json(p)) {
        let mut sp = SimulationParameter::from_json_file(path)?;
        if let Some(ddy) = ddy {
            let text = fs::read_to_string(ddy)?;
            let added = if all_design_days {
                sp.sizing_parameter.add_from_ddy(&text)
            } else {
                sp.sizing_parameter.add_from_ddy_996_004(&text)
            };
            info!(count = added, ddy = %ddy.display(), "loaded design days");
        }
        return Ok(sp);
    }
    let cfg = load_config(sim_par, preset, ddy, all_design_days)?;
    Ok(cfg.to_simulation_parameter()?)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Writes `text` to `output`, or to stdout when no path is given.
fn write_output(text: &str, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            info!(path = %path.display(), "wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn translate(
    model: &Path,
    sim_par: Option<&Path>,
    preset: Option<&str>,
    ddy: Option<&Path>,
    all_design_days: bool,
    output: Option<&Path>,
    schedule_dir: Option<&Path>,
) -> CliResult<()> {
    let model = Model::from_json_file(model)?;
    let sp = load_sim_par(sim_par, preset, ddy, all_design_days)?;
    let schedule_dir: PathBuf = match (schedule_dir, output.and_then(Path::parent)) {
        (Some(dir), _) => dir.to_path_buf(),
        (None, Some(parent)) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&schedule_dir)?;
    info!(model = %model.name, rooms = model.rooms.len(), "translating model");
    let idf = simulation_idf(&model, &sp, &schedule_dir)?;
    write_output(&idf, output)
}

fn sim_par(
    preset: Option<&str>,
    config: Option<&Path>,
    ddy: Option<&Path>,
    all_design_days: bool,
    output: Option<&Path>,
) -> CliResult<()> {
    let cfg = load_config(config, preset, ddy, all_design_days)?;
    let sp = cfg.to_simulation_parameter()?;
    let as_idf = output
        .and_then(Path::extension)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("idf"));
    let text = if as_idf { sp.to_idf() } else { sp.to_json()? };
    write_output(&text, output)
}

fn validate(model: &Path) -> CliResult<()> {
    let model = Model::from_json_file(model)?;
    println!(
        "{}: valid ({} rooms, {:.1} m2 floor area)",
        model.name,
        model.rooms.len(),
        model.floor_area()
    );
    Ok(())
}

fn schedules(model: &Path, timestep: u32, output: Option<&Path>) -> CliResult<()> {
    let model = Model::from_json_file(model)?;
    let schedules = model.schedules();
    match output {
        Some(path) => {
            export_schedules_csv(&schedules, timestep, path)?;
            info!(path = %path.display(), count = schedules.len(), "schedules written");
        }
        None => write_schedules_csv(&schedules, timestep, io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(feature = "api")]
fn serve(model: &Path, port: u16) -> CliResult<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use honeybee_energy::api::{self, AppState};

    let model = Model::from_json_file(model)?;
    let schedule_dir = std::env::temp_dir().join("honeybee-energy");
    fs::create_dir_all(&schedule_dir)?;
    let state = Arc::new(AppState::new(model, &schedule_dir)?);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(api::serve(state, addr))?;
    Ok(())
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Translate {
            model,
            sim_par,
            preset,
            ddy,
            all_design_days,
            output,
            schedule_dir,
        } => translate(
            &model,
            sim_par.as_deref(),
            preset.as_deref(),
            ddy.as_deref(),
            all_design_days,
            output.as_deref(),
            schedule_dir.as_deref(),
        ),
        Commands::SimPar {
            preset,
            config,
            ddy,
            all_design_days,
            output,
        } => sim_par(
            preset.as_deref(),
            config.as_deref(),
            ddy.as_deref(),
            all_design_days,
            output.as_deref(),
        ),
        Commands::Validate { model } => validate(&model),
        Commands::Schedules {
            model,
            timestep,
            output,
        } => schedules(&model, timestep, output.as_deref()),
        #[cfg(feature = "api")]
        Commands::Serve { model, port } => serve(&model, port),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
