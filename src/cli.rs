use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "rustdoc-implementors")]
#[command(
    about = "Replay generated implementor fragments through the page registry",
    long_about = None
)]
pub struct Cli {
    /// Directory containing `.js` or `.json` implementor fragments
    pub dir: PathBuf,

    /// Install the aggregator after this many fragments have been submitted
    #[arg(short = 'a', long, default_value = "0")]
    pub aggregator_after: usize,

    /// Print the merged implementors as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Log every handoff decision
    #[arg(short, long)]
    pub verbose: bool,
}
