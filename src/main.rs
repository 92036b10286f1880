//! Quire CLI - flat-file document store maintenance
//!
//! Reads and writes store records as JSON on stdin/stdout, which makes it
//! easy to pipe into `jq` or seed a store from fixtures.

use anyhow::Context;
use clap::{Parser, Subcommand};
use quire::{Fields, Record, Rule, Search, Store, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "A flat-file YAML document store", long_about = None)]
struct Cli {
    /// Store root directory (defaults to ./store)
    #[arg(short, long, default_value = "store")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every record in a collection
    List {
        /// Collection path, e.g. `posts`
        collection: String,
    },

    /// Print a single record
    Get {
        /// Record path, e.g. `posts/<id>`
        path: String,
    },

    /// Print one field of a record
    Field {
        /// Record path, e.g. `meta/site`
        path: String,
        /// Field name
        key: String,
    },

    /// Create a record from a JSON object, printing the new identifier
    Create {
        /// Collection path
        collection: String,
        /// Field mapping as JSON, e.g. '{"status": "draft"}'
        data: String,
    },

    /// Merge a JSON object into an existing record
    Set {
        /// Record path
        path: String,
        /// Partial field mapping as JSON
        data: String,
    },

    /// Delete a record
    Remove {
        /// Record path
        path: String,
    },

    /// Query a collection with equality rules
    Find {
        /// Collection path
        collection: String,
        /// Rules as `key=value`; the key may be `|`-delimited, e.g. `slug|_id=hello`
        #[arg(short, long = "where")]
        rules: Vec<String>,
        /// Sort ascending by a field
        #[arg(long)]
        order_asc: Option<String>,
        /// Sort descending by a field
        #[arg(long)]
        order_desc: Option<String>,
        /// Print only the first match
        #[arg(long)]
        first: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = Store::open(&cli.store);

    match cli.command {
        Commands::List { collection } => {
            let records = store.list(&collection).await?;
            print_records(&records)?;
        }
        Commands::Get { path } => match store.record(&path).await? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record_json(&record)?)?),
            None => anyhow::bail!("No record at '{}'", path),
        },
        Commands::Field { path, key } => match store.field(&path, &key).await? {
            Some(value) => println!("{}", serde_json::to_string(&value)?),
            None => anyhow::bail!("No field '{}' at '{}'", key, path),
        },
        Commands::Create { collection, data } => {
            let fields = parse_fields(&data)?;
            let id = store.create_in(&collection, fields).await?;
            println!("{}", id);
        }
        Commands::Set { path, data } => {
            let fields = parse_fields(&data)?;
            store.update(&path, fields).await?;
        }
        Commands::Remove { path } => {
            if !store.remove(&path).await? {
                anyhow::bail!("No record at '{}'", path);
            }
        }
        Commands::Find {
            collection,
            rules,
            order_asc,
            order_desc,
            first,
        } => {
            let rules = rules
                .iter()
                .map(|raw| parse_rule(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let mut search = Search::new(store.list(&collection).await?).filter(&rules);
            if let Some(key) = order_asc {
                search = search.order_asc(&key);
            }
            if let Some(key) = order_desc {
                search = search.order_desc(&key);
            }

            if first {
                match search.first() {
                    Some(record) => {
                        println!("{}", serde_json::to_string_pretty(&record_json(&record)?)?)
                    }
                    None => anyhow::bail!("No match in '{}'", collection),
                }
            } else {
                print_records(&search.get())?;
            }
        }
    }

    Ok(())
}

/// Parse a JSON object into a field mapping
fn parse_fields(data: &str) -> anyhow::Result<Fields> {
    serde_json::from_str(data).context("data must be a JSON object of fields")
}

/// Parse a `key=value` rule; the value is tried as JSON first so numbers
/// and booleans keep their type, and falls back to a plain string
fn parse_rule(raw: &str) -> anyhow::Result<Rule> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("rule '{}' must look like key=value", raw))?;

    let value = serde_json::from_str::<Value>(value)
        .unwrap_or_else(|_| Value::String(value.to_string()));

    Ok(Rule::eq(key, value))
}

/// A record as a JSON object, transients included
fn record_json(record: &Record) -> anyhow::Result<serde_json::Value> {
    let mut map = serde_json::Map::new();
    map.insert("_id".into(), record.id.clone().into());
    map.insert("_path".into(), record.path.display().to_string().into());

    for (key, value) in &record.fields {
        map.insert(key.clone(), serde_json::to_value(value)?);
    }

    Ok(serde_json::Value::Object(map))
}

fn print_records(records: &[Record]) -> anyhow::Result<()> {
    let items = records
        .iter()
        .map(record_json)
        .collect::<anyhow::Result<Vec<_>>>()?;
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}
