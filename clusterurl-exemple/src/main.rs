use std::io::{self, BufRead, Write};

use clusterurl_core::io::{converted_model_path, FileFormat};
use clusterurl_core::{Clusterer, Config, KnowledgeBase};
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Verbosity is controlled with RUST_LOG (ex. RUST_LOG=debug)
    env_logger::init();

    let mut config = Config::default();
    let mut words_only = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            // JSON configuration, missing fields keep their default value
            "--config" => {
                let path = args.next().ok_or("--config expects a path")?;
                let model_path = config.model_path.take();
                config = Config::from_path(path)?;
                if model_path.is_some() {
                    config.model_path = model_path;
                }
            }
            // Knowledge base to use instead of the bundled one (.json or .bin)
            "--model" => {
                let path = args.next().ok_or("--model expects a path")?;
                config.model_path = Some(path.into());
            }
            // Precompile a JSON model into the binary format next to it
            "--compile" => {
                let path = args.next().ok_or("--compile expects a path")?;
                let output = converted_model_path(&path, FileFormat::Binary)?;
                KnowledgeBase::load(&path)?.save(&output)?;
                println!("Wrote {}", output.display());
                return Ok(());
            }
            // Print the word / gibberish verdict of each line instead of clustering
            "--words" => words_only = true,
            other => return Err(format!("unknown argument: {other}").into()),
        }
    }

    let clusterer = Clusterer::new(config)?;
    info!("reading paths from stdin");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim_end_matches(['\r', '\n']);
        if words_only {
            let verdict = if clusterer.is_word(input.trim()) { "word" } else { "gibberish" };
            writeln!(stdout, "{input}: {verdict}")?;
        } else {
            writeln!(stdout, "{}", clusterer.cluster(input))?;
        }
    }

    let stats = clusterer.cache().stats();
    info!(
        "cache: {} hits, {} misses, {} entries",
        stats.hits(),
        stats.misses(),
        clusterer.cache().len()
    );

    Ok(())
}
