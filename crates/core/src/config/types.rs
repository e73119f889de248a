use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::{CatalogConfig, SelectionCriteria};
use crate::cutout::CutoutConfig;
use crate::dispatch::DispatchConfig;
use crate::preprocess::PreprocessConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub selection: SelectionCriteria,
    #[serde(default)]
    pub cutout: CutoutConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Metrics output configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Prometheus textfile written when a command finishes (disabled when unset).
    #[serde(default)]
    pub textfile: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::InvalidInputPolicy;

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[catalog]
source = "VII/237/pgc"
path = "/data/hyperleda.csv"
row_limit = 5000

[selection]
ld_min = 0.8
ld_max = 1.3

[cutout]
base_url = "http://localhost:9000/ImgCutout"
out_dir = "/data/unproc"
image_size = 28
pad_factor = 1.5
verbose = false

[dispatch]
workers = 8

[preprocess]
input_dir = "/data/unproc"
output_dir = "/data/proc"
on_invalid = "fail"

[metrics]
textfile = "/var/lib/node_exporter/stamps.prom"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.catalog.row_limit, Some(5000));
        assert_eq!(config.catalog.path.to_str().unwrap(), "/data/hyperleda.csv");
        assert_eq!(config.selection.object_type, "G");
        assert_eq!(config.cutout.image_size, 28);
        assert_eq!(config.cutout.pad_factor, 1.5);
        assert!(!config.cutout.verbose);
        assert_eq!(config.dispatch.workers, 8);
        assert_eq!(config.preprocess.on_invalid, InvalidInputPolicy::Fail);
        assert_eq!(
            config.metrics.textfile.unwrap().to_str().unwrap(),
            "/var/lib/node_exporter/stamps.prom"
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.catalog.source, "VII/237/pgc");
        assert_eq!(config.catalog.row_limit, None);
        assert_eq!(config.catalog.path.to_str().unwrap(), "hyperleda.csv");
        assert_eq!(config.selection.ld_min, 0.8);
        assert_eq!(config.selection.ld_max, 1.3);
        assert_eq!(config.cutout.image_size, 64);
        assert_eq!(config.cutout.pad_factor, 1.2);
        assert!(config.cutout.verbose);
        assert_eq!(config.dispatch.workers, 5);
        assert_eq!(config.preprocess.val_fraction, 0.1);
        assert_eq!(config.preprocess.resize, None);
        assert_eq!(config.preprocess.on_invalid, InvalidInputPolicy::Skip);
        assert!(config.metrics.textfile.is_none());
    }

    #[test]
    fn test_default_matches_empty_document() {
        let parsed: Config = toml::from_str("").unwrap();
        let built = Config::default();
        assert_eq!(parsed.cutout.base_url, built.cutout.base_url);
        assert_eq!(parsed.catalog.columns, built.catalog.columns);
        assert_eq!(parsed.dispatch.progress_every, built.dispatch.progress_every);
    }
}
