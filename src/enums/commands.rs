use std::path::PathBuf;
use clap::Subcommand;
use crate::config::constants::DEFAULT_PAGE;
use crate::enums::status_filter::StatusFilter;

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample configuration file
    Init,
    /// Check the configuration file
    Validate,
    /// Sign in as an administrator; the password is read from stdin
    Login {
        #[clap(short, long)]
        email: String,
    },
    Logout,
    Whoami,
    /// List change requests
    List {
        #[clap(short, long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        #[clap(short, long, default_value_t = DEFAULT_PAGE)]
        page: u32,
    },
    /// Show the field diff of one change request
    Show {
        id: String,
        #[clap(long)]
        json: bool,
    },
    /// Diff a changes file against an original record file
    Diff {
        original: PathBuf,
        changes: PathBuf,
        #[clap(long)]
        json: bool,
    },
    /// Edit fields of a pending request, e.g. `--set notes.top_notes="citrus, sea"`
    Edit {
        id: String,
        #[clap(short = 's', long = "set", value_name = "PATH=VALUE", required = true)]
        assignments: Vec<String>,
    },
    Approve {
        id: String,
    },
    Reject {
        id: String,
    },
    /// Delete every change request
    Purge {
        #[clap(long)]
        yes: bool,
    },
    /// Review a request in the browser
    Review {
        id: String,
        #[clap(long)]
        no_browser: bool,
    },
}
