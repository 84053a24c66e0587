use crate::commands::{run_publication_search, run_score, PublicationSearchArgs, ScoreArgs};
use crate::server;
use appraisal::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Faculty Appraisal Portal",
    about = "Run the faculty appraisal portal or score and search from the command line",
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
    /// Work with an institute publication CSV
    Publications {
        #[command(subcommand)]
        command: PublicationsCommand,
    },
    /// Compute a score breakdown and rating from raw form values
    Score(ScoreArgs),
}

#[derive(Subcommand, Debug)]
enum PublicationsCommand {
    /// Search a publication CSV by title, abstract, keywords, or author
    Search(PublicationSearchArgs),
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
        Command::Publications {
            command: PublicationsCommand::Search(args),
        } => run_publication_search(args),
        Command::Score(args) => run_score(args),
    }
}
