use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;

/// Parse the command line, install telemetry and resolve the [`Action`].
///
/// # Errors
///
/// Returns an error if telemetry initialization or action dispatch fails
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();
    telemetry::init(commands::logging::level(&matches))?;
    dispatch::handler(&matches)
}
