use anyhow::Result;
use clap::Parser;

/// ghreq - GitHub API requests with retries and readable client errors
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
///
/// Examples:
///   ghreq get /repos/owner/repo     # Print repository metadata
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Number of connection attempts per request (also via GHREQ_RETRIES)
    #[arg(long, env = "GHREQ_RETRIES", value_name = "N", global = true)]
    pub retries: Option<usize>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// GET an API path and print the JSON response
    Get(GetArgs),
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// API path such as /repos/owner/repo, or an absolute URL
    #[arg(value_name = "PATH")]
    pub path: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = ghreq::runtime::RealRuntime;

    match cli.command {
        Commands::Get(args) => {
            ghreq::commands::get(runtime, &args.path, cli.api_url, cli.retries).await?
        }
    }
    Ok(())
}
