use anyhow::{anyhow, Context, Result};
use log::{error, info};
use simple_parking_lot::{
    clock::ManualClock,
    config::Config,
    csv::{replay, OutputRow},
    lot::Lot,
};
use std::env::args;
use std::fs::File;
use std::io::{stdout, BufReader};

fn load_config(path: Option<&String>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Reading config from {:?}", path);
            Ok(Config::from_path(path)?)
        }
        None => Ok(Config::default()),
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = args().collect();
    let input_filepath = args
        .get(1)
        .context(anyhow!("Missing events file as first positional argument."))?;
    let config = load_config(args.get(2))?;

    info!("Reading events from {:?}", input_filepath);
    let input_reader = BufReader::new(
        File::open(input_filepath).with_context(|| format!("opening {input_filepath:?}"))?,
    );

    let mut lot = Lot::with_clock(config, ManualClock::default());
    replay(input_reader, &mut lot)?;

    info!("{} vehicles still parked", lot.active_count());
    for line in lot.query_availability().to_string().lines() {
        info!("{line}");
    }
    let mut csv_writer = csv::Writer::from_writer(stdout());
    for (_, record) in lot.into_history() {
        csv_writer.serialize(OutputRow::from(record.snapshot()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match run() {
        Ok(()) => {}
        Err(error) => {
            error!("{}", error);
            std::process::exit(1)
        }
    }
}
