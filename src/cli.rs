use clap::Parser;
use std::path::PathBuf;

use crate::config::SourceKind;

#[derive(Parser, Debug)]
#[command(
    name = "snapdiff",
    version,
    about = "Compare monitored resource states between two dates"
)]
pub struct Cli {
    /// Shareable link to open (takes precedence over --from/--to)
    #[arg(long)]
    pub link: Option<String>,

    /// Left-hand date: "today" or an ISO-8601 timestamp
    #[arg(long)]
    pub from: Option<String>,

    /// Right-hand date: "today" or an ISO-8601 timestamp
    #[arg(long)]
    pub to: Option<String>,

    /// Where to read snapshots from
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    /// Local clone of the monitoring repository (implies --source git)
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Run one comparison, print the table and exit
    #[arg(long)]
    pub print: bool,

    /// Ignore the saved session and start from today/today
    #[arg(long)]
    pub fresh: bool,
}
