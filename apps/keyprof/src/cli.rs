use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file (flags below override it)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Map/reduce partitions (0 = one per worker thread)
    #[arg(long, global = true)]
    pub partitions: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover field names and their frequencies
    Schema {
        /// JSON-lines input file
        input: PathBuf,

        /// Maximum nesting level to descend (-1 = unbounded)
        #[arg(long, allow_hyphen_values = true)]
        level_max: Option<i32>,

        /// Also list nested-record fields, not only their leaves
        #[arg(long)]
        include_container_keys: bool,

        /// Print per-signature groups instead of per-field statistics
        #[arg(long)]
        signatures: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write leaf field names, one per line
    ExportFields {
        /// JSON-lines input file
        input: PathBuf,

        /// Output text file
        output: PathBuf,

        /// Field names to leave out (comma-separated)
        #[arg(long, default_value = "")]
        exclude: String,
    },

    /// Count records per distinct value of a field
    GroupCounts {
        /// JSON-lines input file
        input: PathBuf,

        /// Dotted field path
        field: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Count key presence across two collections
    Orphans {
        /// Collection A (JSON lines)
        a: PathBuf,
        /// Key field in A
        a_key: String,
        /// Collection B (JSON lines)
        b: PathBuf,
        /// Key field in B
        b_key: String,
    },

    /// Join two collections on key fields
    Join {
        /// Collection A (JSON lines)
        a: PathBuf,
        /// Key field in A
        a_key: String,
        /// Collection B (JSON lines)
        b: PathBuf,
        /// Key field in B
        b_key: String,
        /// Output JSON-lines file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Copy a field's value to another field on every record
    CopyField {
        /// JSON-lines input file
        input: PathBuf,
        /// Source dotted path
        from: String,
        /// Target dotted path
        to: String,
        /// Output file (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove records whose key field repeats
    RemoveDupls {
        /// JSON-lines input file
        input: PathBuf,
        /// Dotted key field
        key: String,
        /// Output file (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the elements of an array field into a new file
    ExtractArray {
        /// JSON-lines input file
        input: PathBuf,
        /// Dotted array field
        field: String,
        /// Output JSON-lines file
        output: PathBuf,
    },
}
