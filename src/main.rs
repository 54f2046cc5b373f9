//! Binary entry point: read settings, open the log file, point the REST client
//! at the backend and drive the Ratatui event loop until the user exits.
use student_records_admin::{logging, run_app, App, Config, HttpApi};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    logging::init(&config.log_path()?)?;
    info!(api = %config.api_base_url, timeout = ?config.request_timeout(), "starting");

    let api = HttpApi::new(&config.api_base_url, config.request_timeout())?;
    let mut app = App::new(api)?;
    run_app(&mut app)
}
