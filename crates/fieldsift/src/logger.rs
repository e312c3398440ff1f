//! Logger setup for the binary.

use log::LevelFilter;

/// Initializes `env_logger`. `RUST_LOG` wins when set; otherwise `-v`
/// selects debug and the default is warn.
pub fn init(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    builder.parse_env("RUST_LOG");
    // A second init (tests calling run repeatedly) is not an error.
    let _ = builder.format_timestamp(None).try_init();
}
