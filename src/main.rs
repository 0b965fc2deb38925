use playground::logging::init_logging;
use playground::{platform, AppConfig};

fn main() {
    let config = AppConfig::from_env();
    init_logging(config.logging.clone());

    if let Err(err) = platform::run(config) {
        log::error!("sandbox failed: {err:#}");
        std::process::exit(1);
    }
}
