//! Indicator reference is a tool that generates the documentation pages of
//! the supported indicators:
//! * read the indicator constructor snippets and the helper catalog
//! * resolve each indicator type and find which data its update accepts
//! * write one numbered folder of html, php and json files per indicator
//!
//! The destination tree is deleted and written again on every run, so two
//! runs over the same inputs give the same files.

#[macro_use]
extern crate lazy_static;
extern crate log;
extern crate strum;
extern crate strum_macros;

mod catalog;
mod config;
mod error;
mod indicator;
mod output;
mod pipeline;
mod utils;

use chrono::Local;
use config::GeneratorConfig;
use enum_dispatch::enum_dispatch;
use env_logger::Builder;
use error::Error;
use log::LevelFilter;
use pipeline::Pipeline;
use std::{io::Write, path::PathBuf};
use structopt::StructOpt;

const CONFIG_PATH: &str = "INDICATOR_REFERENCE_CONFIG";
const LOG_LEVEL: &str = "LOG_LEVEL";
const PKG_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Clone, Debug, StructOpt)]
#[structopt(name = "indicator-reference", about = "Indicator reference generator cli.")]
struct MainCommand {
    #[structopt(
        long = "log-level",
        help = "Verbosity of the logs.",
        env = LOG_LEVEL,
        default_value = "info"
    )]
    pub log_level: LevelFilter,
    #[structopt(
        short = "c",
        long = "config",
        env = CONFIG_PATH,
        help = "Configuration path, json or yaml. Defaults are used when missing."
    )]
    pub configuration_path: Option<PathBuf>,
    #[structopt(subcommand)]
    command: Option<Command>,
}

#[enum_dispatch]
trait Execute {
    fn execute(&self, config: GeneratorConfig) -> Result<(), Error>;
}

#[derive(Clone, Debug, StructOpt)]
#[enum_dispatch(Execute)]
enum Command {
    Generate(GenerateCommand),
    Validate(ValidateCommand),
}

impl Default for Command {
    fn default() -> Self {
        Command::Generate(GenerateCommand {})
    }
}

#[derive(Clone, Debug, StructOpt)]
#[structopt(name = "generate", about = "Generate the indicator reference tree.")]
struct GenerateCommand {}

impl Execute for GenerateCommand {
    fn execute(&self, config: GeneratorConfig) -> Result<(), Error> {
        log::info!("Start {}!", PKG_NAME);

        let summary = Pipeline::load(config)?.run()?;

        log::info!(
            "Generated {} indicators and {} candlestick patterns.",
            summary.indicators,
            summary.candlestick_patterns
        );
        Ok(())
    }
}

#[derive(Clone, Debug, StructOpt)]
#[structopt(name = "validate", about = "Build the indicator records without writing them.")]
struct ValidateCommand {
    #[structopt(long = "show", help = "Log every built record.")]
    pub show: bool,
}

impl Execute for ValidateCommand {
    fn execute(&self, config: GeneratorConfig) -> Result<(), Error> {
        let records = Pipeline::load(config)?.prepare()?;

        if self.show {
            for record in records.values() {
                log::info!("{}", serde_json::to_string_pretty(record)?);
            }
        };

        let candlestick_patterns = records
            .values()
            .filter(|record| record.is_candlestick_pattern)
            .count();
        log::info!(
            "{} indicators and {} candlestick patterns are valid.",
            records.len() - candlestick_patterns,
            candlestick_patterns
        );
        Ok(())
    }
}

fn run_app() -> Result<(), Error> {
    let opt = MainCommand::from_args();
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {} - {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.target(),
                record.level(),
                record.args()
            )
        })
        .filter(None, opt.log_level)
        .init();

    let config = GeneratorConfig::load(opt.configuration_path.as_deref())?;
    opt.command.unwrap_or_default().execute(config)
}

fn main() {
    std::process::exit(match run_app() {
        Ok(_) => 0,
        Err(err) => {
            log::error!("error: {:?}", err);
            1
        }
    });
}
