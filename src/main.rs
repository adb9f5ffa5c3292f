use anyhow::{Context, anyhow};
use clap::Parser;
use la_correlator::CorrelationProcessor;
use la_correlator::cli::{Args, setup_logging};
use std::process;

fn main() {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown_signal = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {}
                // No handler available; never resolve so the run completes
                Err(_) => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow!("Processing interrupted by user"))
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    setup_logging(&args).context("Failed to initialize logging")?;

    let config = args.to_config().context("Invalid arguments")?;
    let processor =
        CorrelationProcessor::new(config).context("Failed to start correlation run")?;
    processor.process().await.context("Correlation run failed")?;

    Ok(())
}
