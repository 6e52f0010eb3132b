use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::file::loader::FileLoader;
use crate::file::types::{BatchResult, FileContent, ReadDiagnostic};
use crate::registry;

/// Ceiling on simultaneous in-flight reads. Fan-out is bounded so a large
/// input list cannot exhaust file descriptors or memory.
const MAX_CONCURRENT_READS: usize = 32;

/// How many per-file failures are logged individually before the rest are
/// collapsed into a count. The full list is still returned to the caller.
const LOGGED_FAILURES: usize = 5;

/// Attempts every path independently and concurrently. Binary-extension
/// paths are skipped outright (the caller asked for text files); any other
/// failure becomes a diagnostic. Successful results preserve the relative
/// order of their input paths.
pub async fn load_many(loader: &FileLoader, paths: Vec<String>) -> BatchResult {
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_READS));
    let mut tasks = JoinSet::new();

    for (index, path) in paths.into_iter().enumerate() {
        if registry::is_binary_extension(Path::new(&path)) {
            debug!(path, "skipping binary file in batch load");
            continue;
        }
        let loader = loader.clone();
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("read semaphore closed");
            let result = loader.load(&path).await;
            (index, path, result)
        });
    }

    let mut loaded: Vec<(usize, FileContent)> = Vec::new();
    let mut failed: Vec<(usize, ReadDiagnostic)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, _, Ok(file))) => loaded.push((index, file)),
            Ok((index, path, Err(error))) => failed.push((
                index,
                ReadDiagnostic {
                    path,
                    message: error.to_string(),
                },
            )),
            Err(error) => warn!(?error, "batch read task failed to complete"),
        }
    }
    loaded.sort_by_key(|(index, _)| *index);
    failed.sort_by_key(|(index, _)| *index);

    let diagnostics: Vec<ReadDiagnostic> = failed.into_iter().map(|(_, d)| d).collect();
    log_failures(&diagnostics);

    BatchResult {
        files: loaded.into_iter().map(|(_, f)| f).collect(),
        diagnostics,
    }
}

fn log_failures(diagnostics: &[ReadDiagnostic]) {
    for diagnostic in diagnostics.iter().take(LOGGED_FAILURES) {
        warn!(path = %diagnostic.path, "skipped file: {}", diagnostic.message);
    }
    if diagnostics.len() > LOGGED_FAILURES {
        warn!(
            "skipped {} more files during batch load",
            diagnostics.len() - LOGGED_FAILURES
        );
    }
}
