//! Binary entry point: resolve the data directory, bring up logging and the
//! store, then hand control to the terminal UI.
use anyhow::Context;
use libros::{init_logging, load_config, open_database, run_app, App, AppPaths};
use tracing::{info, warn};

/// Failing to open the store is fatal and happens before any UI is drawn.
fn main() -> anyhow::Result<()> {
    let paths = AppPaths::discover()?;
    paths.ensure_data_dir()?;

    if let Err(err) = init_logging(&paths.log) {
        eprintln!("logging disabled: {err:#}");
    }
    info!(data_dir = %paths.data_dir.display(), "starting libros");

    let config = match load_config(&paths.config) {
        Ok(config) => config,
        Err(err) => {
            warn!(err = %format!("{err:#}"), "using default config");
            Default::default()
        }
    };

    let conn = open_database(&paths.database)
        .with_context(|| format!("failed to open {}", paths.database.display()))?;

    let app = App::new(conn, paths, config.theme);
    run_app(app)
}
