pub mod commands;
pub mod logging;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use rentdesk_core::admin::AdminAction;
use rentdesk_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use rentdesk_core::rental::request::ReservationRequest;

#[derive(Debug, Parser)]
#[command(
    name = "rentdesk",
    about = "Rentdesk car reservation desk",
    long_about = "Take car rental bookings, review them as an admin, and maintain the daily rate table.",
    after_help = "Examples:\n  rentdesk seed\n  rentdesk submit --name \"Ada Lovelace\" --category Sedan --date 03-14-2027 --time 10:00 --return-date 03-20-2027\n  rentdesk list\n  rentdesk approve <id>"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Read configuration from this TOML file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override the database URL")]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Provision the default daily rate table (existing rates are kept)")]
    Seed,
    #[command(about = "List the daily rate per car type")]
    Rates,
    #[command(about = "Set the daily rate for one car type")]
    RateSet {
        #[arg(help = "Car type: Sedan, SUV, Pick-up or Van")]
        category: String,
        #[arg(help = "Charge per day, e.g. 54.50")]
        amount: String,
    },
    #[command(about = "Submit a reservation request through the booking rules")]
    Submit {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, help = "Reservation date, MM-DD-YYYY", default_value = "")]
        date: String,
        #[arg(long, help = "Pick-up time, HH:MM", default_value = "")]
        time: String,
        #[arg(long, help = "Return date, MM-DD-YYYY", default_value = "")]
        return_date: String,
    },
    #[command(about = "Admin review listing of every reservation")]
    List {
        #[arg(long, help = "Attach the reservation cards as JSON data")]
        json: bool,
    },
    #[command(about = "Approve a reservation")]
    Approve { id: String },
    #[command(about = "Deny a reservation")]
    Deny { id: String },
    #[command(about = "Move a reservation's return date")]
    Extend {
        id: String,
        #[arg(long, help = "New return date, MM-DD-YYYY")]
        return_date: String,
        #[arg(long, help = "Return time, HH:MM (defaults to the pick-up time)")]
        time: Option<String>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, DB connectivity, migrations and rate coverage")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                database_url: self.database_url.clone(),
                ..ConfigOverrides::default()
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    if let Ok(config) = AppConfig::load(options.clone()) {
        logging::init_logging(&config.logging);
    }

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(&options),
        Command::Seed => commands::seed::run(&options),
        Command::Rates => commands::rates::list(&options),
        Command::RateSet { category, amount } => commands::rates::set(&options, &category, &amount),
        Command::Submit { name, category, date, time, return_date } => commands::submit::run(
            &options,
            ReservationRequest {
                driver_name: name,
                category,
                start_date: date,
                start_time: time,
                return_date,
            },
        ),
        Command::List { json } => commands::list::run(&options, json),
        Command::Approve { id } => commands::status::run(&options, AdminAction::Approve, &id),
        Command::Deny { id } => commands::status::run(&options, AdminAction::Deny, &id),
        Command::Extend { id, return_date, time } => {
            commands::extend::run(&options, &id, &return_date, time.as_deref())
        }
        Command::Config => commands::config::run(&options),
        Command::Doctor { json } => commands::doctor::run(&options, json),
    };

    match emit(&result) {
        Ok(()) => ExitCode::from(result.exit_code),
        Err(error) => {
            eprintln!("rentdesk: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn emit(result: &commands::CommandResult) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", result.output).context("failed to write command output")?;
    stdout.flush().context("failed to flush command output")?;
    Ok(())
}
