//! Batch conversion
//!
//! Every conversion is independent, so the batch simply fans out over all
//! sources at once. Two failure models are offered:
//!
//! - [`compose_all`]: fail-fast, one bad file fails the whole batch and the
//!   conversions not yet started are skipped
//! - [`compose_each`]: one `Result` per file, the batch itself never fails
//!
//! Both keep the input order. Native builds run the conversions on rayon's
//! pool; `wasm32` builds run them in turn on the page thread.

use crate::{compose, CompositionParams, CompositorError, OutputImage, Result, SourceImage};

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Outcome counts of a per-item batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchReport {
    /// Tally a slice of per-item results
    pub fn from_results(results: &[Result<OutputImage>]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Compose every source, failing the batch on the first error
///
/// On native targets the first error seen stops rayon from starting the
/// remaining conversions, so with several bad files any one of them may be
/// reported.
///
/// # Errors
/// `BatchItem` wrapping the underlying error, naming the failing index and
/// file name.
pub fn compose_all(
    sources: &[SourceImage],
    params: &CompositionParams,
) -> Result<Vec<OutputImage>> {
    params.validate()?;

    let outputs: Result<Vec<_>> = run(sources, |index, source| {
        compose(source, params).map_err(|err| CompositorError::BatchItem {
            index,
            file_name: source.file_name.clone(),
            source: Box::new(err),
        })
    });

    match &outputs {
        Ok(images) => log::info!("composed {} image(s)", images.len()),
        Err(err) => log::warn!("batch of {} aborted: {}", sources.len(), err),
    }

    outputs
}

/// Compose every source, collecting one result per source
pub fn compose_each(
    sources: &[SourceImage],
    params: &CompositionParams,
) -> Vec<Result<OutputImage>> {
    let results: Vec<_> = run(sources, |index, source| {
        let result = compose(source, params);
        if let Err(err) = &result {
            log::warn!("image {} ({:?}) failed: {}", index, source.file_name, err);
        }
        result
    });

    let report = BatchReport::from_results(&results);
    log::info!(
        "composed {}/{} image(s), {} failed",
        report.succeeded,
        report.total(),
        report.failed
    );

    results
}

/// Convert every source, collecting into `C` in input order
#[cfg(not(target_arch = "wasm32"))]
fn run<T, C, F>(sources: &[SourceImage], convert: F) -> C
where
    T: Send,
    C: FromParallelIterator<T>,
    F: Fn(usize, &SourceImage) -> T + Sync,
{
    sources
        .par_iter()
        .enumerate()
        .map(|(index, source)| convert(index, source))
        .collect()
}

#[cfg(target_arch = "wasm32")]
fn run<T, C, F>(sources: &[SourceImage], convert: F) -> C
where
    C: FromIterator<T>,
    F: Fn(usize, &SourceImage) -> T,
{
    sources
        .iter()
        .enumerate()
        .map(|(index, source)| convert(index, source))
        .collect()
}
