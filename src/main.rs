use abdknn::input::{load, match_file};
use abdknn::{Collection, DegeneratePolicy, Options, Subject, DEFAULT_LIMIT};
use anyhow::Result;
use dotenv::dotenv;
use env_logger::Builder;
use lazy_static::lazy_static;
use log::LevelFilter;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Instant;

#[macro_use]
extern crate log;

lazy_static! {
    static ref VECTORS_PATH: Option<PathBuf> = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VECTORS_PATH").ok())
        .map(PathBuf::from);
    static ref KNN_LIMIT: usize = std::env::var("KNN_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_LIMIT);
    static ref KNN_PRECOMPUTE: bool = std::env::var("KNN_PRECOMPUTE")
        .map(|s| matches!(s.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    static ref KNN_ZERO_SUM: DegeneratePolicy = match std::env::var("KNN_ZERO_SUM").as_deref() {
        Ok("zero") => DegeneratePolicy::Zero,
        _ => DegeneratePolicy::Reject,
    };
    static ref KNN_SUBJECT: Option<String> = std::env::var("KNN_SUBJECT").ok();
}

#[derive(Serialize)]
struct QueryResponse<'a> {
    subject: usize,
    neighbors: Vec<abdknn::Neighbor<'a>>,
}

fn main() -> Result<()> {
    // read .env
    dotenv().ok();

    // init logger
    match std::env::var("RUST_LOG").as_deref() {
        Ok("debug") => {
            Builder::new()
                .filter(None, LevelFilter::Off)
                .filter(Some("abdknn::abundance"), LevelFilter::Debug)
                .filter(Some("abdknn"), LevelFilter::Debug)
                .init();
        }
        Ok("info") => {
            Builder::new()
                .filter(None, LevelFilter::Off)
                .filter(Some("abdknn::abundance"), LevelFilter::Info)
                .filter(Some("abdknn"), LevelFilter::Info)
                .init();
        }
        _ => env_logger::init(),
    }

    let path = VECTORS_PATH
        .clone()
        .ok_or_else(|| anyhow::anyhow!("usage: abdknn <vectors file> (or set VECTORS_PATH)"))?;
    let vectors = load(match_file(path))?;

    let options = Options {
        precompute: *KNN_PRECOMPUTE,
        degenerate: *KNN_ZERO_SUM,
    };
    let start = Instant::now();
    let collection = Collection::build(vectors, options).map_err(|e| {
        error!("build collection failed: {}", e);
        e
    })?;
    info!(
        "collection ready: {} vectors, precompute: {}, spends {}s",
        collection.len(),
        options.precompute,
        start.elapsed().as_secs_f64()
    );

    let subjects = match KNN_SUBJECT.as_deref() {
        Some(raw) => {
            let value: Value = serde_json::from_str(raw)?;
            let subject = Subject::try_from(&value)?;
            vec![collection.resolve(&subject)?]
        }
        None => (0..collection.len()).collect(),
    };

    for subject in subjects {
        let neighbors = collection.query(subject, Some(*KNN_LIMIT))?;
        debug!("subject: {}, {} neighbors", subject, neighbors.len());
        let response = QueryResponse { subject, neighbors };
        println!("{}", serde_json::to_string(&response)?);
    }

    Ok(())
}
