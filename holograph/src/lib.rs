use holograph_config::CONFIG;

pub mod animation;
pub mod engine;
pub mod live;
pub mod manager;
pub mod model;
pub mod particle;
pub mod placeholder;
pub mod refresh;
pub mod render;
pub mod store;
pub mod text_animation;
pub mod world;

pub use engine::{HoloEngine, HoloError};
pub use manager::{HoloManager, SpawnError};

/// Installs a logger from the `logging` section of the engine config.
/// Hosts that already carry their own logger skip this.
pub fn init_logger() {
    if CONFIG.logging.enabled {
        let mut logger = simple_logger::SimpleLogger::new();

        if !CONFIG.logging.timestamp {
            logger = logger.without_timestamps();
        }

        if CONFIG.logging.env {
            logger = logger.env();
        }

        if let Err(err) = logger
            .with_level(convert_logger_filter(CONFIG.logging.level))
            .with_colors(CONFIG.logging.color)
            .with_threads(CONFIG.logging.threads)
            .init()
        {
            eprintln!("Couldn't install the logger: {err}");
        }
    }
}

const fn convert_logger_filter(level: holograph_config::logging::LevelFilter) -> log::LevelFilter {
    match level {
        holograph_config::logging::LevelFilter::Off => log::LevelFilter::Off,
        holograph_config::logging::LevelFilter::Error => log::LevelFilter::Error,
        holograph_config::logging::LevelFilter::Warn => log::LevelFilter::Warn,
        holograph_config::logging::LevelFilter::Info => log::LevelFilter::Info,
        holograph_config::logging::LevelFilter::Debug => log::LevelFilter::Debug,
        holograph_config::logging::LevelFilter::Trace => log::LevelFilter::Trace,
    }
}
