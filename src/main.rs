//! # Tweetsweep
//!
//! Command-line entry point for the tweet collector. Parses the search
//! flags, loads the API credentials, then drains the backward paginator into
//! the selected sink until the search history is exhausted.
//!
//! # Example Usage
//!
//! ```bash
//! # Stream matching tweets into {unix_timestamp}_output.csv
//! tweetsweep --terms rustlang,rustc
//!
//! # Accumulate and checkpoint JSON snapshots every 10000 records,
//! # with a full CSV export at the end
//! tweetsweep --terms rustlang --snapshots --checkpoint 10000 --export-csv
//!
//! # Run with debug logging
//! RUST_LOG=debug tweetsweep --terms rustlang
//! ```

use clap::Parser;
use log::info;
use std::path::PathBuf;

use tweetsweep::config::{ApiCredentials, DEFAULT_SECRETS_FILE};
use tweetsweep::record::flatten;
use tweetsweep::sink::{unix_timestamp, CsvSink, SnapshotSink, DEFAULT_CHECKPOINT};
use tweetsweep::twitter::{build_search_term, Paginator, SearchClient, SearchQuery};

/// Default lower bound: just an old tweet id. The open search API only
/// returns about a week of history, so any sufficiently old id means
/// "collect everything the API will still return".
const DEFAULT_START_ID: u64 = 1132073789481787392;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Collects tweets matching a search backwards in time",
    long_about = None
)]
struct Args {
    /// Comma-separated list of terms to search: term1,term2,term3
    #[arg(long)]
    terms: String,

    /// Tweet ID that marks the oldest tweet to search for, so once reached it stops
    #[arg(long, default_value_t = DEFAULT_START_ID)]
    start_id: u64,

    /// Search only tweets in this language
    #[arg(long, default_value = "en")]
    lang: String,

    /// Geo filter of the form lat,long,radius
    #[arg(long)]
    geocode: Option<String>,

    /// Raw pre-encoded query string, replacing terms/geocode/lang on the wire
    #[arg(long)]
    raw_query: Option<String>,

    /// Accumulate records and write JSON snapshots instead of streaming CSV
    #[arg(long)]
    snapshots: bool,

    /// Records between snapshot checkpoints
    #[arg(long, default_value_t = DEFAULT_CHECKPOINT)]
    checkpoint: usize,

    /// With --snapshots, also write a full CSV export at the end
    #[arg(long)]
    export_csv: bool,

    /// Path to the credentials file
    #[arg(long, default_value = DEFAULT_SECRETS_FILE)]
    secrets: PathBuf,
}

/// Runs the collector: one pagination walk drained into one sink.
///
/// Credential loading happens before anything touches the network; a missing
/// or incomplete secrets file ends the process here. Any API failure after
/// that propagates out of `main` and terminates the run, leaving whatever
/// the sink already flushed.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize the logging system
    env_logger::init();

    let args = Args::parse();

    let credentials = ApiCredentials::from_file(&args.secrets)?;
    let client = SearchClient::new(credentials);

    let query = SearchQuery {
        term: Some(build_search_term(&args.terms)),
        geocode: args.geocode.clone(),
        raw_query: args.raw_query.clone(),
        lang: Some(args.lang.clone()),
        ..SearchQuery::default()
    };

    info!(
        "Starting collection for terms '{}' down to id {}",
        args.terms, args.start_id
    );

    let stamp = unix_timestamp();
    let csv_path = PathBuf::from(format!("{}_output.csv", stamp));
    let mut paginator = Paginator::new(&client, args.start_id, query)?;

    if args.snapshots {
        let mut sink = SnapshotSink::new(&PathBuf::from("."), args.checkpoint);
        while let Some(status) = paginator.next_status().await? {
            sink.push(flatten(&status)?)?;
        }
        let export = if args.export_csv {
            Some(csv_path.as_path())
        } else {
            None
        };
        let total = sink.finish(export)?;
        info!("Collected {} tweets", total);
    } else {
        let mut sink = CsvSink::create(&csv_path)?;
        let mut total: u64 = 0;
        while let Some(status) = paginator.next_status().await? {
            sink.write(&flatten(&status)?)?;
            total += 1;
        }
        sink.finish()?;
        info!("Collected {} tweets into {}", total, csv_path.display());
    }

    Ok(())
}
