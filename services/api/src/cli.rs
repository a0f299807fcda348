use crate::demo::{run_demo, run_payroll_summary, DemoArgs, PayrollSummaryArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use staffdesk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Staffdesk",
    about = "Run batch roster assignments and reconcile payroll ledgers from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Reconcile payroll report ledgers
    Payroll {
        #[command(subcommand)]
        command: PayrollCommand,
    },
    /// Run an end-to-end demo of batch assignment and ledger reconciliation
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum PayrollCommand {
    /// Merge, group and narrate a saved payroll report
    Summary(PayrollSummaryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Payroll {
            command: PayrollCommand::Summary(args),
        } => run_payroll_summary(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
