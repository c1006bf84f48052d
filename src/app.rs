#![deny(missing_docs)]

pub use clap::Parser;

/// Resolves Kattis URLs and checks that the configured account can log in
#[derive(Parser, Debug)]
#[command(author, version)]
pub struct App {
    /// Logs in and reports whether it worked
    #[arg(short, long)]
    pub login: bool,

    /// Sets the level of verbosity
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Reads this config file instead of the default .kattisrc locations
    #[arg(short = 'c', long)]
    pub config: Vec<String>,

    /// Prints the URL of this problem
    #[arg(short = 'p', long)]
    pub problem: Option<String>,

    /// Prints the URL of this contest, and scopes --problem and --submission to it
    #[arg(short = 'o', long)]
    pub contest: Option<String>,

    /// Prints the URL of this user ("me" for the configured one)
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Prints the URL of this submission
    #[arg(short = 's', long)]
    pub submission: Option<String>,
}
