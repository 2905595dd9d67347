use crate::demo::{run_demo, run_links, DemoArgs, LinkArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use interview_booking::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Interview Booking",
    about = "Schedule interviews and notify participants by SMS",
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
    /// Book, reject, and reschedule sample interviews and print the SMS traffic
    Demo(DemoArgs),
    /// Print freshly generated interview join links
    Link(LinkArgs),
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
        Command::Demo(args) => run_demo(args).await,
        Command::Link(args) => run_links(args),
    }
}
