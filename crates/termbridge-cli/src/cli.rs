use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "termbridge")]
#[command(about = "Search VSAC value sets and map SNOMED CT concepts to ICD-10")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// UMLS API key (also used for VSAC)
    #[arg(long, global = true, env = "UMLS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// VSAC FHIR base URL
    #[arg(long, global = true, env = "TERMBRIDGE_VSAC_URL")]
    pub vsac_url: Option<String>,

    /// UTS REST base URL
    #[arg(long, global = true, env = "TERMBRIDGE_UMLS_URL")]
    pub umls_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// VSAC value set commands
    Vsac(VsacArgs),
    /// SNOMED CT search and ICD-10 mapping
    Snomed(SnomedArgs),
}

#[derive(clap::Args)]
pub struct VsacArgs {
    #[command(subcommand)]
    pub command: VsacCommands,
}

#[derive(Subcommand)]
pub enum VsacCommands {
    /// Search value sets by name
    Search {
        term: String,
    },
    /// Show a value set resource
    View {
        /// Value set OID
        id: String,
    },
    /// Expand one or more value sets
    Expand {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Write the codes to a .xlsx or .csv file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
pub struct SnomedArgs {
    #[command(subcommand)]
    pub command: SnomedCommands,
}

#[derive(Subcommand)]
pub enum SnomedCommands {
    /// Search SNOMED CT concepts
    Search {
        term: String,
    },
    /// Map concepts (CUIs) to ICD-10-CM codes
    Map {
        #[arg(required = true)]
        cuis: Vec<String>,
        /// Search term recorded in exported rows
        #[arg(long, default_value = "")]
        term: String,
        /// Write the mapping to a .xlsx or .csv file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
