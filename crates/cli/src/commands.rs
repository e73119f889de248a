//! Subcommand handlers.

use anyhow::{bail, Context, Result};
use tracing::info;

use stamps_core::{
    fetch_catalog_to_csv, filter_catalog, read_catalog, Config, CutoutDispatcher, CutoutJob,
    Preprocessor, SkyServerClient, VizierClient,
};

pub async fn fetch_catalog(config: &Config) -> Result<()> {
    let client =
        VizierClient::new(config.catalog.clone()).context("Failed to create VizieR client")?;

    let rows = fetch_catalog_to_csv(&client, &config.catalog.path)
        .await
        .with_context(|| format!("Failed to download catalog to {:?}", config.catalog.path))?;

    info!("Catalog with {} rows written to {:?}", rows, config.catalog.path);
    Ok(())
}

pub async fn generate(config: &Config) -> Result<()> {
    let path = config.catalog.path.clone();
    let records = tokio::task::spawn_blocking(move || read_catalog(&path))
        .await
        .context("Catalog reader task failed")?
        .with_context(|| format!("Failed to read catalog {:?}", config.catalog.path))?;

    let filtered = filter_catalog(&records, &config.selection);
    drop(records);

    let client =
        SkyServerClient::new(&config.cutout).context("Failed to create SkyServer client")?;
    let dispatcher = CutoutDispatcher::new(config.dispatch.clone(), client);

    let report = dispatcher
        .run(filtered.galaxies, CutoutJob::from(&config.cutout))
        .await
        .context("Cutout retrieval failed")?;

    info!(
        saved = report.saved,
        skipped = report.skipped,
        failed = report.failed,
        "Cutouts written to {:?}",
        config.cutout.out_dir
    );

    if report.has_failures() {
        bail!(
            "{} of {} cutout tasks failed",
            report.failed,
            report.requested
        );
    }
    Ok(())
}

pub async fn preprocess(config: &Config) -> Result<()> {
    let preprocessor = Preprocessor::new(config.preprocess.clone());

    let report = tokio::task::spawn_blocking(move || preprocessor.run())
        .await
        .context("Preprocessing task failed")?
        .context("Preprocessing failed")?;

    info!(
        train = report.train,
        val = report.val,
        skipped = report.skipped,
        excluded = report.excluded,
        "Dataset written to {:?}",
        config.preprocess.output_dir
    );
    Ok(())
}
