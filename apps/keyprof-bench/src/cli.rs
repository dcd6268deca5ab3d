use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Insert fixed-shape documents and report inserts/sec
    Insert {
        /// Documents to insert
        #[arg(short, long, default_value_t = 1_000_000)]
        count: usize,

        /// Fields per document
        #[arg(short, long, default_value_t = 10)]
        fields: usize,

        /// Documents already in the collection before the run
        #[arg(long, default_value_t = 0)]
        prefill: usize,
    },

    /// Fetch random documents by _id and report reads/sec
    Fetch {
        /// Lookups to perform
        #[arg(short, long, default_value_t = 1_000_000)]
        count: usize,

        /// Documents in the collection
        #[arg(short, long, default_value_t = 100_000)]
        record_count: usize,
    },

    /// Profile synthetic documents and report documents/sec
    Profile {
        /// Documents to generate
        #[arg(short, long, default_value_t = 1_000_000)]
        count: usize,

        /// Random string fields per document
        #[arg(short, long, default_value_t = 5)]
        fields: usize,

        /// Partition counts to test (comma-separated, 0 = per thread)
        #[arg(short, long, default_value = "1,0")]
        partitions: String,
    },

    /// Run all benchmarks with default sizes
    All,
}
