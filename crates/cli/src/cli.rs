//! Command line definition and config overrides.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use stamps_core::Config;

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "stamps.toml";

#[derive(Debug, Parser)]
#[command(name = "stamps")]
#[command(about = "Build galaxy image datasets from HyperLEDA and SDSS cutouts")]
#[command(version)]
pub struct Cli {
    /// Configuration file. Missing is fine unless given explicitly.
    #[arg(long, global = true, env = "STAMPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the HyperLEDA catalog from VizieR and write it as CSV.
    FetchCatalog(FetchCatalogArgs),
    /// Select galaxies from the catalog and download their cutouts.
    Generate(GenerateArgs),
    /// Rotate cutouts and split them into TRAIN and VAL.
    Preprocess(PreprocessArgs),
}

#[derive(Debug, Args)]
pub struct FetchCatalogArgs {
    /// Output CSV path.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Request at most this many rows.
    #[arg(long)]
    pub row_limit: Option<u64>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Number of concurrent downloads (1 = sequential).
    pub nproc: usize,

    /// Directory to write cutouts to.
    pub out_dir: PathBuf,

    /// Exclusive lower bound on logD25.
    #[arg(allow_negative_numbers = true)]
    pub ld_min: f64,

    /// Exclusive upper bound on logD25.
    #[arg(allow_negative_numbers = true)]
    pub ld_max: f64,

    /// Catalog CSV to read.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Cutout edge length in pixels.
    #[arg(long)]
    pub image_size: Option<u32>,

    /// Border factor around each galaxy.
    #[arg(long)]
    pub pad_factor: Option<f64>,

    /// Log unavailable cutouts at debug level only.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Args)]
pub struct PreprocessArgs {
    /// Directory holding the raw cutouts.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Directory receiving TRAIN and VAL.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Resize to a square of this edge after rotation.
    #[arg(long)]
    pub resize: Option<u32>,

    /// Leave out cutouts without a position angle (angle 0.0).
    #[arg(long)]
    pub exclude_zero_angle: bool,
}

/// Config path to load and whether it must exist.
pub fn config_source(explicit: Option<&Path>) -> (PathBuf, bool) {
    match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    }
}

impl FetchCatalogArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(out) = &self.out {
            config.catalog.path = out.clone();
        }
        if self.row_limit.is_some() {
            config.catalog.row_limit = self.row_limit;
        }
    }
}

impl GenerateArgs {
    pub fn apply(&self, config: &mut Config) {
        config.dispatch.workers = self.nproc;
        config.cutout.out_dir = self.out_dir.clone();
        config.selection.ld_min = self.ld_min;
        config.selection.ld_max = self.ld_max;

        if let Some(catalog) = &self.catalog {
            config.catalog.path = catalog.clone();
        }
        if let Some(size) = self.image_size {
            config.cutout.image_size = size;
        }
        if let Some(pad) = self.pad_factor {
            config.cutout.pad_factor = pad;
        }
        if self.quiet {
            config.cutout.verbose = false;
        }
    }
}

impl PreprocessArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.preprocess.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.preprocess.output_dir = output.clone();
        }
        if self.resize.is_some() {
            config.preprocess.resize = self.resize;
        }
        if self.exclude_zero_angle {
            config.preprocess.exclude_zero_angle = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_positional_arguments() {
        let cli = Cli::try_parse_from([
            "stamps", "generate", "8", "./data/unproc", "0.8", "1.3", "--image-size", "28",
        ])
        .unwrap();

        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.nproc, 8);
        assert_eq!(args.out_dir, PathBuf::from("./data/unproc"));

        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.dispatch.workers, 8);
        assert_eq!(config.selection.ld_min, 0.8);
        assert_eq!(config.selection.ld_max, 1.3);
        assert_eq!(config.cutout.image_size, 28);
        assert_eq!(config.cutout.pad_factor, 1.2);
        assert!(config.cutout.verbose);
    }

    #[test]
    fn test_generate_requires_bounds() {
        assert!(Cli::try_parse_from(["stamps", "generate", "8", "./out", "0.8"]).is_err());
    }

    #[test]
    fn test_generate_negative_bound() {
        let cli = Cli::try_parse_from(["stamps", "generate", "1", "out", "-0.5", "1.0", "--quiet"])
            .unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.ld_min, -0.5);
        assert!(args.quiet);
    }

    #[test]
    fn test_preprocess_overrides() {
        let cli = Cli::try_parse_from([
            "stamps",
            "--config",
            "custom.toml",
            "preprocess",
            "--input",
            "in",
            "--resize",
            "28",
            "--exclude-zero-angle",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));

        let Command::Preprocess(args) = cli.command else {
            panic!("expected preprocess");
        };
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.preprocess.input_dir, PathBuf::from("in"));
        assert_eq!(config.preprocess.resize, Some(28));
        assert!(config.preprocess.exclude_zero_angle);
    }

    #[test]
    fn test_fetch_catalog_defaults_keep_config() {
        let cli = Cli::try_parse_from(["stamps", "fetch-catalog"]).unwrap();
        let Command::FetchCatalog(args) = cli.command else {
            panic!("expected fetch-catalog");
        };
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.catalog.path, PathBuf::from("hyperleda.csv"));
        assert_eq!(config.catalog.row_limit, None);
    }

    #[test]
    fn test_config_source() {
        assert_eq!(
            config_source(None),
            (PathBuf::from(DEFAULT_CONFIG_PATH), false)
        );
        assert_eq!(
            config_source(Some(Path::new("x.toml"))),
            (PathBuf::from("x.toml"), true)
        );
    }
}
