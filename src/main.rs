mod app;
mod events;
mod ui;

use anyhow::Result;
use app::App;
use clap::{App as ClapApp, Arg};
use form_state::logger::CaptureLogger;
use form_state::Config;
use log::LevelFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = ClapApp::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive registration form driven by form-state")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding form.yml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Capture debug log entries"),
        )
        .get_matches();

    let level = if matches.is_present("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logs = CaptureLogger::new(level).init()?;

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;

    App::start(config, logs).await
}
