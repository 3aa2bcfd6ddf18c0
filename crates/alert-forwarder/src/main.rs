use anyhow::Context;
use clap::Parser;

fn main() -> Result<(), anyhow::Error> {
    let cli = alert_forwarder::Cli::parse();
    alert_forwarder::init_logging(&cli.log_args);

    // Each invocation is a single request, so there's no use for more than one thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let result = runtime.block_on(cli.run());

    // We must call `shutdown_background()` because otherwise an incomplete spawned future
    // could block indefinitely.
    runtime.shutdown_background();

    match result {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(error) => {
            let kind = error.kind();
            let message = format!("{:#}", anyhow::Error::from(error));

            // The host reads the invocation's stdout as its failure reason.
            tracing::error!(?kind, error = %message, "alert-forwarder failed");
            println!("{message}");
            std::process::exit(1);
        }
    }
}
