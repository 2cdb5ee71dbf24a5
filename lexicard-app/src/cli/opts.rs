use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    Recent,
    Phase,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "lexicard", version, about = "Lexicard vocabulary trainer CLI/TUI")]
pub struct Cli {
    /// Config file (defaults to config.toml in the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store file (overrides store_path from the config)
    #[arg(long, global = true)]
    pub store_path: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Add a word
    Add(WordAdd),
    /// List words
    List(ListCmd),
    /// Edit a word's text fields (progress is kept)
    Edit(WordEdit),
    /// Delete a word and its progress
    Rm { word: String },
    /// Show the words due now
    Due,
    /// Interactive review loop
    Review,
    /// Review statistics
    Stats,
    /// Export data
    #[command(subcommand)]
    Export(ExportCmd),
    /// Import data (JSON accepts every older file layout)
    #[command(subcommand)]
    Import(ImportCmd),
    /// Reset every word back to phase 0
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Delete every word, its progress and the review log
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Launch Terminal UI
    Tui,
}

#[derive(Debug, Args, Clone)]
pub struct WordAdd {
    #[arg(long)]
    pub word: String,
    #[arg(long)]
    pub definition: String,
    #[arg(long, default_value = "")]
    pub example: String,
}

#[derive(Debug, Args, Clone)]
pub struct ListCmd {
    #[arg(long, value_enum, default_value_t = SortKey::Recent)]
    pub sort: SortKey,
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct WordEdit {
    /// Word id or the word itself
    pub word: String,
    #[arg(long = "text")]
    pub text: Option<String>,
    #[arg(long)]
    pub definition: Option<String>,
    #[arg(long)]
    pub example: Option<String>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum ExportCmd {
    Json { path: PathBuf },
    Csv { path: PathBuf },
}

#[derive(Debug, Subcommand, Clone)]
pub enum ImportCmd {
    Json { path: PathBuf },
    Csv { path: PathBuf },
}
