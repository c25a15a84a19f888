// src/main.rs
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::task::JoinSet;

use indent_extractor::config::ParserConfig;
use indent_extractor::extractors::{Diagnostics, ReportExtractor};
use indent_extractor::report::ExtractionResult;
use indent_extractor::source::{self, Document, DocumentSource};
use indent_extractor::storage::{unique_stems, StorageManager};
use indent_extractor::utils::{self, line_debug, AppError};

/// Command Line Interface for the indent report extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Report documents: PDF or text file paths, http(s) URLs, or `-` for stdin
    #[arg(required = true)]
    inputs: Vec<String>,

    /// JSON parser config (keywords, thresholds, labels)
    #[arg(short, long, env = "INDENT_EXTRACTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the JSON result, CSV sheet and metadata of each document
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Debug mode - save an annotated line dump for every document
    #[arg(short, long, requires = "output_dir")]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Build the extraction engine
    let config = match &args.config {
        Some(path) => ParserConfig::from_json_file(path)?,
        None => ParserConfig::default(),
    };
    let extractor = Arc::new(ReportExtractor::new(config)?);
    tracing::debug!("Per-line strategies: {:?}", extractor.strategy_names());

    // 4. Initialize storage
    let storage = match &args.output_dir {
        Some(dir) => Some(Arc::new(StorageManager::new(dir)?)),
        None => None,
    };

    // 5. Process every document concurrently; each task owns its aggregation
    let sources: Vec<DocumentSource> = args.inputs.iter().map(|input| DocumentSource::parse(input)).collect();
    let stems = unique_stems(&sources.iter().map(DocumentSource::stem).collect::<Vec<_>>());

    let mut tasks = JoinSet::new();
    for (index, (source, stem)) in sources.into_iter().zip(stems).enumerate() {
        let extractor = Arc::clone(&extractor);
        let storage = storage.clone();
        let debug = args.debug;
        tasks.spawn(async move { (index, process_document(source, stem, extractor, storage, debug).await) });
    }

    let mut results: Vec<(usize, ExtractionResult)> = Vec::with_capacity(args.inputs.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => results.push(outcome),
            Err(e) => return Err(AppError::Processing(format!("Document task failed: {}", e))),
        }
    }
    results.sort_by_key(|(index, _)| *index);

    // 6. Print results in input order
    let mut success_count = 0;
    let mut failure_count = 0;
    for (_, result) in &results {
        if result.success {
            success_count += 1;
        } else {
            failure_count += 1;
        }
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| AppError::Processing(format!("Failed to serialize result: {}", e)))?;
        println!("{}", json);
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to extract any report from {} documents",
            failure_count
        )));
    }

    Ok(())
}

/// Runs one document end to end. Always yields a result; failures are
/// reported inside it.
async fn process_document(
    source: DocumentSource,
    stem: String,
    extractor: Arc<ReportExtractor>,
    storage: Option<Arc<StorageManager>>,
    debug: bool,
) -> ExtractionResult {
    let label = source.label();
    tracing::info!("Processing document: {}", label);

    let (document, text) = match source::load_text(&source).await {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to read {}: {}", label, e);
            return extractor.extract_document(Err(e));
        }
    };
    tracing::info!("Extracted {} characters of text from {}", text.len(), label);

    let engine = Arc::clone(&extractor);
    let (result, diagnostics, text) = match tokio::task::spawn_blocking(move || {
        let (result, diagnostics) = engine.extract_with_diagnostics(&text);
        (result, diagnostics, text)
    })
    .await
    {
        Ok(extracted) => extracted,
        Err(e) => {
            tracing::error!("Extraction aborted for {}: {}", label, e);
            return ExtractionResult::failure(format!("Error processing report text: {}", e));
        }
    };

    if let Some(storage) = storage {
        if let Err(e) = save_outputs(&storage, &stem, &document, &text, &result, &diagnostics, extractor.config(), debug) {
            tracing::error!("Failed to save outputs for {}: {}", label, e);
        }
    }

    result
}

fn save_outputs(
    storage: &StorageManager,
    stem: &str,
    document: &Document,
    text: &str,
    result: &ExtractionResult,
    diagnostics: &Diagnostics,
    config: &ParserConfig,
    debug: bool,
) -> Result<(), AppError> {
    storage.save_result(stem, result)?;
    storage.save_sheet(stem, result, &config.labels)?;
    storage.save_metadata(stem, &document.name, result, diagnostics)?;

    if debug {
        let path = storage.debug_dir(stem)?.join(format!("{}_lines.txt", stem));
        line_debug::save_line_annotations(text, diagnostics, &path)?;
    }
    Ok(())
}
