//! Folder-level orchestration: parse every stored harvest page, extract
//! records, and fold the per-repository corpora into one.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use oaicorpus_core::{CorpusConfig, FieldMap, NormalizedRecord, TypeTable};

use crate::dialects::parse_page;
use crate::error::Result;
use crate::extract::{Extraction, Extractor};
use crate::language::{EnglishCheck, LanguageDetector};
use crate::merge::merge;

pub type Corpus = BTreeMap<String, NormalizedRecord>;

/// What one processing run produced. Failures are isolated per file:
/// a bad page is reported here but never discards the records already
/// extracted from other files.
#[derive(Debug, Default)]
pub struct ProcessOutcome {
    pub corpus: Corpus,
    /// Raw attribute bags per record, kept for the improvement pass.
    pub raw_fields: BTreeMap<String, FieldMap>,
    pub rejected: usize,
    pub failures: Vec<FileFailure>,
}

#[derive(Debug)]
pub struct FileFailure {
    pub file: String,
    pub error: crate::HarvestError,
}

/// Processes every stored page of one repository. Files are visited in
/// name order so repeated runs over the same pages give identical
/// corpora.
pub fn process_repository(
    repo: &oaicorpus_core::RepositoryConfig,
    data_dir: &Path,
    extractor: &Extractor<'_>,
) -> Result<ProcessOutcome> {
    let dir = repo.pages_dir(data_dir);
    let mut pages: Vec<_> = fs::read_dir(&dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "xml"))
        .collect();
    pages.sort();

    let mut outcome = ProcessOutcome::default();
    for path in pages {
        let file = path.display().to_string();
        if let Err(error) = process_page(&path, repo, extractor, &mut outcome) {
            tracing::error!(file, %error, "page failed, keeping records extracted so far");
            outcome.failures.push(FileFailure { file, error });
        }
    }
    tracing::info!(
        repository = repo.name,
        records = outcome.corpus.len(),
        rejected = outcome.rejected,
        failures = outcome.failures.len(),
        "repository processed"
    );
    Ok(outcome)
}

fn process_page(
    path: &Path,
    repo: &oaicorpus_core::RepositoryConfig,
    extractor: &Extractor<'_>,
    outcome: &mut ProcessOutcome,
) -> Result<()> {
    let xml = fs::read_to_string(path)?;
    let page = parse_page(repo.dialect, &xml, &path.display().to_string())?;
    for (header, fields) in page.records {
        match extractor.extract(&header, &fields, repo.dialect)? {
            Extraction::Record(record) => {
                outcome.raw_fields.insert(record.id.clone(), fields);
                outcome.corpus.insert(record.id.clone(), record);
            }
            Extraction::Rejected { id, reason } => {
                tracing::debug!(id, reason, "record rejected");
                outcome.rejected += 1;
            }
        }
    }
    Ok(())
}

/// Builds the full cross-repository corpus. Repositories are processed
/// in configuration order, which fixes the winner on any identifier
/// collision during the merge.
pub fn build_corpus(
    config: &CorpusConfig,
    table: &TypeTable,
    check: EnglishCheck,
    detector: &dyn LanguageDetector,
) -> Result<ProcessOutcome> {
    let extractor = Extractor::new(table, check, detector);
    let mut corpora = Vec::new();
    let mut combined = ProcessOutcome::default();
    for repo in &config.repositories {
        let outcome = process_repository(repo, &config.data_dir, &extractor)?;
        corpora.push(outcome.corpus);
        combined.raw_fields.extend(outcome.raw_fields);
        combined.rejected += outcome.rejected;
        combined.failures.extend(outcome.failures);
    }
    combined.corpus = merge(corpora);
    Ok(combined)
}

/// Serializes any dump or corpus as pretty JSON.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

pub fn read_corpus(path: &Path) -> Result<Corpus> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}
