use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};

/// Set up console logging at `level`.
///
/// Create/Update messages and per-file failures all go to stdout so that
/// a cron job's captured output holds the complete record of a run.
pub fn init_logging(level: log::LevelFilter) {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .target(Target::Stdout)
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .expect("Failed to configure logger");

    log4rs::init_config(config).expect("Failed to initialize logger");
}
