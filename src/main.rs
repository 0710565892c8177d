mod client;
mod config;
mod controller;
mod form;
mod formatting;
mod host;
mod logging;
mod modal;
mod pii;
mod session;
mod terminal;
mod user_info;
mod utils;
mod validators;

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::{
        console::ConsoleAppender,
        rolling_file::{
            RollingFileAppender,
            policy::compound::{
                CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
            },
        },
    },
    config::{Appender, Config as Log4rsConfig, Root},
    encode::pattern::PatternEncoder,
};
use std::{path::PathBuf, sync::Arc};
use url::Url;

use client::{AdminClient, ModActions};
use config::{CONFIG_FILE, Config};
use modal::Modal;
use terminal::TerminalHost;
use user_info::is_supported_page;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Delete a ban evasion account, then annotate and message the main account.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Account-info page of the sock account, e.g. https://stackoverflow.com/users/account-info/111
    page_url: Url,

    /// Path to the JSON file with session credentials
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Log informational messages, not just warnings and errors
    #[arg(short, long)]
    verbose: bool,
}

const LOG_PATTERN: &str = "[{d(%Y-%m-%dT%H:%M:%S%z)}] | {l} | {M} | {m}\n";

// Configure log4rs for file rotation and stdout logging
fn init_logging(level: LevelFilter) -> Result<(), Error> {
    let window_roller = FixedWindowRoller::builder()
        .base(1)
        .build("logs/ban_evasion_audit.{}.log", 10)?;

    let size_trigger = SizeTrigger::new(10 * 1024 * 1024); // 10MB

    let compound_policy = CompoundPolicy::new(Box::new(size_trigger), Box::new(window_roller));

    let file_appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build("logs/ban_evasion_audit.log", Box::new(compound_policy))?;

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let log_config = Log4rsConfig::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .build(
            Root::builder()
                .appender("file")
                .appender("stdout")
                .build(level),
        )?;

    log4rs::init_config(log_config)?;
    Ok(())
}

async fn run(args: Args, config: Config) -> Result<(), Error> {
    if !is_supported_page(&args.page_url) {
        return Err(format!(
            "{} is not an account-info page on a supported site.",
            args.page_url
        )
        .into());
    }

    let site = args.page_url.host_str().ok_or("The page URL has no host.")?;
    let credentials = config
        .credentials_for(site)
        .ok_or_else(|| format!("No credentials configured for {}.", site))?;

    let origin = args.page_url.join("/")?;
    let actions: Arc<dyn ModActions> = Arc::new(AdminClient::new(
        origin,
        credentials,
        config.request_timeout(),
    )?);

    let input = terminal::stdin_lines();
    let host = Arc::new(TerminalHost::new(input.clone(), args.page_url.clone()));
    let mut modal = Modal::default();

    session::run(&args.page_url, &mut modal, actions, host, &input).await;
    Ok(())
}

// --- Main ---

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = init_logging(level) {
        eprintln!("Failed to initialize logging: {}", e);
        return;
    }

    // Load configuration
    let config = match Config::load(&args.config).await {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            return;
        }
    };

    if let Err(e) = run(args, config).await {
        log::error!("{}", e);
    }
}
