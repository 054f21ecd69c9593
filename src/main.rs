use std::io;

use anyhow::{Context, Result};
use log::info;

use space_weather::play::{self, PlayConfig};

fn main() -> Result<()> {
    // Initialize logging. Control verbosity with RUST_LOG env var:
    //   RUST_LOG=info   space-weather astronaut   # session lifecycle + transitions
    //   RUST_LOG=debug  space-weather astronaut   # + choice history, dictionary loading
    //   RUST_LOG=warn   space-weather astronaut   # rejected choices and unknown ids only
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Without a character id the game opens at the main menu
    // (adventure, fun facts, resources).
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = PlayConfig::from_args(&args).context(
        "Usage: space-weather [character-id] [language] [dictionary.json]\n\
         \n\
         Characters: astronaut, pilot, farmer, engineer, photographer, solar-storm\n\
         Languages:  es (default), en, pt\n\
         \n\
         Example:\n  space-weather pilot en",
    )?;

    info!(
        "Starting: character={:?}, language={}, dictionary={:?}",
        config.character, config.language, config.dictionary_path
    );

    let dictionary = config.dictionary()?;

    let stdin = io::stdin();
    play::run(
        &dictionary,
        config.character.as_deref(),
        stdin.lock(),
        io::stdout(),
        &mut rand::thread_rng(),
    )
}
