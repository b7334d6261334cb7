//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "honeybee-energy")]
#[command(version, about = "Translate honeybee energy models to EnergyPlus IDF")]
pub struct Cli {
    /// Log debug output (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a model JSON file to a runnable IDF.
    Translate {
        /// Path to model JSON.
        model: PathBuf,

        /// Simulation parameters: TOML config, or JSON if the extension is `.json`.
        #[arg(long, conflicts_with = "preset")]
        sim_par: Option<PathBuf>,

        /// Built-in simulation parameter preset.
        #[arg(long)]
        preset: Option<String>,

        /// DDY file to read design days from.
        #[arg(long)]
        ddy: Option<PathBuf>,

        /// Keep every design day in the DDY file.
        #[arg(long, requires = "ddy")]
        all_design_days: bool,

        /// Output IDF path (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for fixed-interval schedule CSV files.
        #[arg(long, env = "HONEYBEE_SCHEDULE_DIR")]
        schedule_dir: Option<PathBuf>,
    },

    /// Write simulation parameters alone, as JSON or as IDF.
    SimPar {
        /// Built-in preset.
        #[arg(long, conflicts_with = "config")]
        preset: Option<String>,

        /// TOML config file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// DDY file to read design days from.
        #[arg(long)]
        ddy: Option<PathBuf>,

        /// Keep every design day in the DDY file.
        #[arg(long, requires = "ddy")]
        all_design_days: bool,

        /// Output path; an `.idf` extension writes IDF (stdout JSON if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a model JSON file for errors.
    Validate {
        /// Path to model JSON.
        model: PathBuf,
    },

    /// Export annual values of every model schedule as CSV.
    Schedules {
        /// Path to model JSON.
        model: PathBuf,

        /// Timesteps per hour.
        #[arg(short, long, default_value_t = 1)]
        timestep: u32,

        /// Output CSV path (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve a model over the REST API.
    #[cfg(feature = "api")]
    Serve {
        /// Path to model JSON.
        model: PathBuf,

        /// Port to listen on.
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_args() {
        let cli = Cli::try_parse_from([
            "honeybee-energy",
            "translate",
            "model.json",
            "--preset",
            "comfort",
            "-o",
            "in.idf",
        ])
        .unwrap();
        match cli.command {
            Commands::Translate {
                model,
                preset,
                output,
                sim_par,
                ..
            } => {
                assert_eq!(model, PathBuf::from("model.json"));
                assert_eq!(preset.as_deref(), Some("comfort"));
                assert_eq!(output, Some(PathBuf::from("in.idf")));
                assert!(sim_par.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn sim_par_conflicts_with_preset() {
        let result = Cli::try_parse_from([
            "honeybee-energy",
            "translate",
            "model.json",
            "--preset",
            "default",
            "--sim-par",
            "sp.toml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn all_design_days_needs_ddy() {
        let result = Cli::try_parse_from(["honeybee-energy", "sim-par", "--all-design-days"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["honeybee-energy", "validate", "m.json", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn schedules_default_timestep() {
        let cli = Cli::try_parse_from(["honeybee-energy", "schedules", "m.json"]).unwrap();
        match cli.command {
            Commands::Schedules { timestep, .. } => assert_eq!(timestep, 1),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
