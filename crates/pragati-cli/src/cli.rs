//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pragati CLI - district scheme-progress knowledge base.
#[derive(Debug, Parser)]
#[command(name = "pragati")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage districts
    District(DistrictArgs),

    /// Ingest a plain-text document for a district and run extraction
    Ingest(IngestArgs),

    /// Re-run extraction for a stored document
    Extract(ExtractArgs),

    /// Show the latest snapshots for a district
    Latest(LatestArgs),

    /// Show the full version history for a district
    History(HistoryArgs),

    /// Show per-sector achievement analytics for a district
    Analytics(AnalyticsArgs),

    /// List sectors and sub-categories that currently have data
    Categories,

    /// Ask a question grounded in a district's stored knowledge
    Chat(ChatArgs),
}

/// Arguments for district management.
#[derive(Debug, Parser)]
pub struct DistrictArgs {
    #[command(subcommand)]
    pub action: DistrictAction,
}

/// District sub-commands.
#[derive(Debug, Subcommand)]
pub enum DistrictAction {
    /// Create a district; documents can only be ingested into existing
    /// districts
    Create {
        /// District name
        name: String,
    },

    /// List districts with their document counts
    List,

    /// Delete a district and everything it owns (documents, extractions)
    Delete {
        /// District name
        name: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// District the document belongs to (must already exist)
    #[arg(short, long)]
    pub district: String,

    /// Path to the plain-text document
    #[arg(short = 'F', long)]
    pub file: PathBuf,

    /// Name recorded as the uploader
    #[arg(long, default_value = "cli")]
    pub uploaded_by: String,

    /// Upload date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Id of the stored document to re-extract
    pub document_id: i64,
}

/// Arguments for the latest command.
#[derive(Debug, Parser)]
pub struct LatestArgs {
    /// District name
    pub district: String,

    /// Filter by sector label
    #[arg(short, long)]
    pub sector: Option<String>,

    /// Filter by sub-category label
    #[arg(long)]
    pub sub_category: Option<String>,
}

/// Arguments for the history command.
#[derive(Debug, Parser)]
pub struct HistoryArgs {
    /// District name
    pub district: String,
}

/// Arguments for the analytics command.
#[derive(Debug, Parser)]
pub struct AnalyticsArgs {
    /// District name
    pub district: String,
}

/// Arguments for the chat command.
#[derive(Debug, Parser)]
pub struct ChatArgs {
    /// District name
    pub district: String,

    /// The question to answer from stored knowledge
    pub question: String,

    /// Narrow the context to one sector
    #[arg(short, long)]
    pub sector: Option<String>,

    /// Narrow the context to one sub-category
    #[arg(long)]
    pub sub_category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_args_parse() {
        let cli = Cli::parse_from([
            "pragati", "ingest", "--district", "Tawang", "-F", "report.txt", "--date",
            "2025-06-01",
        ]);
        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.district, "Tawang");
                assert_eq!(args.file, PathBuf::from("report.txt"));
                assert_eq!(args.date.as_deref(), Some("2025-06-01"));
                assert_eq!(args.uploaded_by, "cli");
            }
            _ => panic!("expected ingest command"),
        }
    }

    #[test]
    fn test_latest_args_with_filters() {
        let cli = Cli::parse_from([
            "pragati",
            "latest",
            "Tawang",
            "--sector",
            "Swasth Arunachal: Health",
        ]);
        match cli.command {
            Command::Latest(args) => {
                assert_eq!(args.district, "Tawang");
                assert_eq!(args.sector.as_deref(), Some("Swasth Arunachal: Health"));
                assert!(args.sub_category.is_none());
            }
            _ => panic!("expected latest command"),
        }
    }

    #[test]
    fn test_district_delete_requires_name() {
        let cli = Cli::parse_from(["pragati", "district", "delete", "Tawang", "--yes"]);
        match cli.command {
            Command::District(DistrictArgs {
                action: DistrictAction::Delete { name, yes },
            }) => {
                assert_eq!(name, "Tawang");
                assert!(yes);
            }
            _ => panic!("expected district delete"),
        }
    }
}
