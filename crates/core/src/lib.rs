pub mod catalog;
pub mod config;
pub mod cutout;
pub mod dispatch;
pub mod metrics;
pub mod preprocess;
pub mod testing;

pub use catalog::{
    fetch_catalog_to_csv, filter_catalog, read_catalog, CatalogConfig, CatalogError,
    CatalogRecord, CatalogSource, CatalogTable, FilterSummary, FilteredCatalog,
    SelectedGalaxy, SelectionCriteria, VizierClient, ABSENT_MARKER, GALAXY_OBJECT_TYPE,
};
pub use config::{
    load_config, load_config_from_str, load_env_config, validate_config, Config, ConfigError,
    MetricsConfig,
};
pub use cutout::{
    plate_scale, CutoutConfig, CutoutError, CutoutJob, CutoutName, CutoutOutcome,
    CutoutRequest, CutoutService, NameError, SkyServerClient,
};
pub use dispatch::{CutoutDispatcher, DispatchConfig, DispatchError, DispatchReport};
pub use preprocess::{
    InvalidInputPolicy, PreprocessConfig, PreprocessError, PreprocessReport, Preprocessor,
};
