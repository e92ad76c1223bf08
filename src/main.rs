use featurectl::cli::{handle_extract, handle_usage_error, CliArgs};
use featurectl::util::logging;
use featurectl::{ExtractorConfig, VERSION};

use clap::Parser;
use tracing::debug;

fn main() {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => std::process::exit(handle_usage_error(&e)),
    };
    let config = args.apply_to(ExtractorConfig::default());
    logging::init_with_level(config.level());

    debug!("featurectl v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    std::process::exit(handle_extract(&args, config));
}
