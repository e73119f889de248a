use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Dispatch runs with at least one worker
/// - Cutout geometry is positive
/// - Selection bounds form a non-empty open interval
/// - Validation fraction is in [0, 1)
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.dispatch.workers == 0 {
        return Err(ConfigError::ValidationError(
            "dispatch.workers cannot be 0".to_string(),
        ));
    }

    if config.cutout.image_size == 0 {
        return Err(ConfigError::ValidationError(
            "cutout.image_size cannot be 0".to_string(),
        ));
    }

    if !(config.cutout.pad_factor.is_finite() && config.cutout.pad_factor > 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "cutout.pad_factor must be positive, got {}",
            config.cutout.pad_factor
        )));
    }

    let selection = &config.selection;
    if !(selection.ld_min < selection.ld_max) {
        return Err(ConfigError::ValidationError(format!(
            "selection.ld_min ({}) must be less than selection.ld_max ({})",
            selection.ld_min, selection.ld_max
        )));
    }

    let fraction = config.preprocess.val_fraction;
    if !(0.0..1.0).contains(&fraction) {
        return Err(ConfigError::ValidationError(format!(
            "preprocess.val_fraction must be in [0, 1), got {}",
            fraction
        )));
    }

    if config.preprocess.resize == Some(0) {
        return Err(ConfigError::ValidationError(
            "preprocess.resize cannot be 0".to_string(),
        ));
    }

    Ok(())
}
