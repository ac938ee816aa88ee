//! `-v`/`TASKO_LOG_LEVEL`: one flag per step above ERROR, or a level name.

use clap::{Arg, ArgAction, ArgMatches, Command, builder::ValueParser};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

const LEVELS: [Level; 5] = [
    Level::ERROR,
    Level::WARN,
    Level::INFO,
    Level::DEBUG,
    Level::TRACE,
];

fn parse_level() -> ValueParser {
    ValueParser::from(|raw: &str| -> Result<u8, String> {
        LEVELS
            .iter()
            .position(|level| level.as_str().eq_ignore_ascii_case(raw))
            .or_else(|| raw.parse::<usize>().ok().filter(|n| *n < LEVELS.len()))
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| "invalid log level".to_string())
    })
}

/// Resolved filter level; counts past TRACE stay at TRACE.
#[must_use]
pub fn level(matches: &ArgMatches) -> Level {
    let count = matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0);
    LEVELS[usize::from(count).min(LEVELS.len() - 1)]
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("TASKO_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(parse_level()),
    )
}
