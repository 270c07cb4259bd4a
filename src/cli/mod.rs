pub mod confirm;
pub mod dates;
pub mod meals;
pub mod output;
pub mod payments;
pub mod report;
pub mod transfer;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dates::DateStyle;
use meals::{DeleteDayCommand, ShowCommand, ToggleCommand};
use payments::{DeletePaymentCommand, PayCommand};
use report::{RecordsCommand, ReportCommand};
use tracing::{debug, level_filters::LevelFilter};
use transfer::{ExportCommand, ImportCommand};

use crate::{
    storage::JsonFileStore,
    tracker::Tracker,
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::enable_logging,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Messbook", version, long_about = None)]
#[command(about = "Track daily mess meals and the payments made for them", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show which meals were eaten on a day")]
    Show {
        #[command(flatten)]
        command: ShowCommand,
    },
    #[command(about = "Mark or unmark a meal")]
    Toggle {
        #[command(flatten)]
        command: ToggleCommand,
    },
    #[command(about = "Delete the meal record of a day")]
    DeleteDay {
        #[command(flatten)]
        command: DeleteDayCommand,
    },
    #[command(about = "Record a payment")]
    Pay {
        #[command(flatten)]
        command: PayCommand,
    },
    #[command(about = "List all payments, latest first")]
    Payments,
    #[command(about = "Delete the payment of a day")]
    DeletePayment {
        #[command(flatten)]
        command: DeletePaymentCommand,
    },
    #[command(about = "Monthly statistics of meals and payments")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(about = "Browse meal records, 10 per page")]
    Records {
        #[command(flatten)]
        command: RecordsCommand,
    },
    #[command(about = "Export all records as CSV")]
    Export {
        #[command(flatten)]
        command: ExportCommand,
    },
    #[command(about = "Import records from CSV, merging them into existing ones")]
    Import {
        #[command(flatten)]
        command: ImportCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&app_dir, logging_level, args.log)?;
    debug!("Using application directory {app_dir:?}");

    let store = JsonFileStore::new(app_dir.join("records"))?;
    let mut tracker = Tracker::load(store, Box::new(DefaultClock)).await?;
    let date_style = args.date_style;

    match args.commands {
        Commands::Show { command } => meals::process_show_command(command, &tracker, date_style),
        Commands::Toggle { command } => {
            meals::process_toggle_command(command, &mut tracker, date_style).await
        }
        Commands::DeleteDay { command } => {
            meals::process_delete_day_command(command, &mut tracker, date_style).await
        }
        Commands::Pay { command } => {
            payments::process_pay_command(command, &mut tracker, date_style).await
        }
        Commands::Payments => payments::process_payments_command(&tracker),
        Commands::DeletePayment { command } => {
            payments::process_delete_payment_command(command, &mut tracker, date_style).await
        }
        Commands::Report { command } => report::process_report_command(command, &tracker),
        Commands::Records { command } => {
            report::process_records_command(command, &tracker, date_style)
        }
        Commands::Export { command } => transfer::process_export_command(command, &tracker).await,
        Commands::Import { command } => {
            transfer::process_import_command(command, &mut tracker).await
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Args, Commands};

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_negative_amount_reaches_validation() {
        let args = Args::try_parse_from(["messbook", "pay", "-5"]).unwrap();
        assert!(matches!(args.commands, Commands::Pay { .. }));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args =
            Args::try_parse_from(["messbook", "report", "--month", "2024-06", "--log"]).unwrap();
        assert!(args.log);
        assert!(Args::try_parse_from(["messbook", "report", "--month", "2024-13"]).is_err());
    }
}
