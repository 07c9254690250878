use clap::Parser;

/// Scaffold a new project from one of the kars1996 templates.
#[derive(Debug, Parser)]
#[command(name = "create-kapp", version, about)]
pub struct Cli {
    /// Mirror log output to stderr (filter with RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}
