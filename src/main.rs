use anyhow::Context as _;
use clap::Parser;
use std::{io::IsTerminal as _, path::PathBuf, time::Duration};

#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    /// Path to the service account key document
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    config: PathBuf,
    /// Timeout for each request, in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Base url of the Drive API
    #[arg(long, env = "DRIVEWALK_ENDPOINT", default_value = drivewalk::drive::DEFAULT_ENDPOINT, hide = true)]
    endpoint: String,
    #[clap(subcommand)]
    cmd: drivewalk::ops::Args,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let client = drivewalk::auth::connect(&args.config, args.timeout.map(Duration::from_secs))
        .await
        .context("unable to create drive service")?;
    let drive = drivewalk::drive::DriveClient::with_endpoint(client, &args.endpoint)?;

    let mut stdout = std::io::stdout();
    let printer = drivewalk::output::Printer::new(stdout.is_terminal());

    // Dropping the operation cancels whichever request is in flight
    tokio::select! {
        res = drivewalk::ops::run(args.cmd, &drive, printer, &mut stdout) => {
            res.context("operation failed")?;
        }
        _ = tokio::signal::ctrl_c() => anyhow::bail!("interrupted"),
    }

    Ok(())
}
