use clap::Parser;
use crate::enums::commands::Commands;

#[derive(Parser)]
#[clap(name = "parfum-review")]
#[clap(about = "Review, edit and moderate perfume catalog change requests", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
