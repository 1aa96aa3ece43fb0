//! Binary entry point: resolve configuration, open the store, hydrate the
//! roster, and drive the Ratatui event loop until the user exits.
use rand::rngs::StdRng;
use rand::SeedableRng;
use team_builder::{
    init_tracing, load_theme, open_database, run_app, App, AppConfig, RosterStore,
};
use tracing::{error, info};

/// Returning a `Result` bubbles fatal start-up problems (an unwritable data
/// directory, for example) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(&config)?;
    info!(data_dir = %config.data_dir.display(), "starting team builder");

    let conn = open_database(&config.db_path())?;
    let theme = load_theme(&conn);
    let store = RosterStore::load(conn);

    let mut app = App::new(store, theme, config.export_dir.clone(), StdRng::from_entropy());
    let result = run_app(&mut app);
    if let Err(err) = &result {
        error!(error = %err, "terminal session ended with an error");
    }
    result
}
