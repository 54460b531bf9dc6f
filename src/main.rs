use anyhow::Context;
use clap::Parser;
use rustdoc_implementors::cli::Cli;
use rustdoc_implementors::loader::load_fragments;
use rustdoc_implementors::replay::replay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the merged listing
    rustdoc_implementors::tracing::init(cli.verbose, cli.log_json);

    let fragments = load_fragments(&cli.dir).await.inspect_err(|e| {
        tracing::error!("Failed to load fragments: {:?}", e);
    })?;

    let report = replay(fragments, cli.aggregator_after);

    if cli.json {
        let json = serde_json::to_string_pretty(&report.page)
            .context("Failed to serialize merged implementors")?;
        println!("{}", json);
    } else {
        print!("{}", report.page.render());
    }

    Ok(())
}
