//! LinKV CLI
//!
//! Command-line interface for creating and poking at a LinKV table.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use linkv::{Config, LinearHashTable, Result};

/// LinKV CLI
#[derive(Parser, Debug)]
#[command(name = "linkv-cli")]
#[command(about = "CLI for the LinKV disk-resident linear hash table")]
struct Args {
    /// Table data directory
    #[arg(short, long, default_value = "./linkv_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new table (replaces any existing one)
    Init {
        /// Initial anchor bucket count
        #[arg(long, default_value_t = 4)]
        base_size: u32,

        /// Load-factor split threshold (percent)
        #[arg(long, default_value_t = 85)]
        split_threshold: u32,

        /// Record slots per bucket
        #[arg(long, default_value_t = 4)]
        records_per_bucket: u32,

        /// Fixed value payload size (bytes)
        #[arg(long, default_value_t = 16)]
        value_size: u32,
    },

    /// Insert a key-value pair
    Put {
        /// The key to insert
        key: i32,

        /// The value (zero-padded to the table's value size)
        value: String,
    },

    /// Get a value by key
    Get {
        /// The key to look up
        key: i32,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: i32,
    },

    /// List the live records of one logical bucket
    Scan {
        /// Logical bucket index
        bucket: u32,
    },

    /// Show table state
    Stat,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Init {
            base_size,
            split_threshold,
            records_per_bucket,
            value_size,
        } => {
            let config = Config::builder()
                .data_dir(args.data_dir)
                .base_size(base_size)
                .split_threshold(split_threshold)
                .records_per_bucket(records_per_bucket)
                .value_size(value_size)
                .build();

            let table = LinearHashTable::create(config)?;
            println!("initialized table with {} buckets", table.bucket_count());
        }

        Commands::Put { key, value } => {
            let mut table = LinearHashTable::open(&args.data_dir)?;
            let padded = pad_value(&value, table.value_size())?;
            table.put(key, &padded)?;
            println!("OK");
        }

        Commands::Get { key } => {
            let table = LinearHashTable::open(&args.data_dir)?;
            match table.get(key)? {
                Some(value) => println!("{}", render_value(&value)),
                None => println!("(not found)"),
            }
        }

        Commands::Del { key } => {
            let mut table = LinearHashTable::open(&args.data_dir)?;
            let affected = table.delete(key)?;
            println!("{} record(s) deleted", affected);
        }

        Commands::Scan { bucket } => {
            let table = LinearHashTable::open(&args.data_dir)?;
            for record in table.iter_bucket(bucket)? {
                let record = record?;
                println!("{}\t{}", record.key, render_value(&record.value));
            }
        }

        Commands::Stat => {
            let table = LinearHashTable::open(&args.data_dir)?;
            println!("records:        {}", table.record_count());
            println!("buckets:        {}", table.bucket_count());
            println!("base size:      {}", table.base_size());
            println!("split pointer:  {}", table.split_pointer());
            println!("load factor:    {}%", table.load_factor());
        }
    }

    Ok(())
}

/// Zero-pad a value string to the table's fixed payload size.
fn pad_value(value: &str, value_size: u32) -> Result<Vec<u8>> {
    let bytes = value.as_bytes();
    if bytes.len() > value_size as usize {
        return Err(linkv::LinkvError::ValueSize {
            got: bytes.len(),
            expected: value_size,
        });
    }

    let mut padded = vec![0u8; value_size as usize];
    padded[..bytes.len()].copy_from_slice(bytes);
    Ok(padded)
}

fn render_value(value: &[u8]) -> String {
    let trimmed: &[u8] = match value.iter().rposition(|&b| b != 0) {
        Some(last) => &value[..=last],
        None => &[],
    };
    String::from_utf8_lossy(trimmed).into_owned()
}
