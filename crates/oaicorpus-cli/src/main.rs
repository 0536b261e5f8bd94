use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use oaicorpus_core::{CorpusConfig, TypeTable};
use oaicorpus_harvest::client::OaiClient;
use oaicorpus_harvest::dumps;
use oaicorpus_harvest::improve::{BetterCandidates, append_audit_log, improve};
use oaicorpus_harvest::language::{EnglishCheck, WhatlangDetector};
use oaicorpus_harvest::pipeline::{build_corpus, read_corpus, write_json};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "oaicorpus",
    about = "Harvest OAI-PMH repositories into one normalized corpus",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML).
    #[arg(long, global = true, default_value = "corpus.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch ListRecords pages from the configured repositories.
    Harvest {
        /// Only harvest this repository (default: all).
        #[arg(long)]
        repository: Option<String>,

        /// Minimum delay between requests, in milliseconds.
        #[arg(long, default_value = "1000")]
        interval_ms: u64,

        /// Retry budget per request.
        #[arg(long, default_value = "3")]
        retries: u32,
    },

    /// Build the normalized corpus from the stored pages.
    Process {
        /// Output file (default: <data_dir>/corpus.json).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Re-run language detection over the corpus and correct titles and
    /// abstracts in place, appending to the audit log.
    Improve {
        /// Corpus file to correct (default: <data_dir>/corpus.json).
        #[arg(long)]
        corpus: Option<PathBuf>,
    },

    /// Write one per-field inspection dump of the corpus.
    Dump {
        #[arg(value_enum)]
        view: DumpView,

        /// Corpus file to read (default: <data_dir>/corpus.json).
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DumpView {
    /// Contributor names with the records they appear on.
    Authors,
    /// Contributor names per record.
    AuthorsByRecord,
    /// Subject values per record.
    Subjects,
    /// Each subject value with the records it occurs on.
    SubjectsByValue,
    /// Records whose title or abstract is confidently not English.
    Foreign,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = CorpusConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Harvest {
            repository,
            interval_ms,
            retries,
        } => {
            let client = OaiClient::new(Duration::from_millis(interval_ms), retries);
            let mut harvested = 0usize;
            for repo in &config.repositories {
                if repository.as_deref().is_some_and(|name| name != repo.name) {
                    continue;
                }
                let pages = client
                    .harvest(repo, &config.data_dir)
                    .await
                    .with_context(|| format!("harvesting {}", repo.name))?;
                println!("{}: {pages} pages", repo.name);
                harvested += 1;
            }
            if harvested == 0 {
                bail!("no repository matched");
            }
        }

        Commands::Process { out } => {
            let table = TypeTable::load(&config.type_table)?;
            let check = EnglishCheck::new(&config.detector);
            let outcome = build_corpus(&config, &table, check, &WhatlangDetector)?;

            let out = out.unwrap_or_else(|| config.data_dir.join("corpus.json"));
            write_json(&out, &outcome.corpus)?;
            println!(
                "{} records written to {} ({} rejected)",
                outcome.corpus.len(),
                out.display(),
                outcome.rejected
            );
            if !outcome.failures.is_empty() {
                for failure in &outcome.failures {
                    eprintln!("failed: {}: {}", failure.file, failure.error);
                }
                bail!("{} file(s) failed", outcome.failures.len());
            }
        }

        Commands::Improve { corpus } => {
            let table = TypeTable::load(&config.type_table)?;
            let check = EnglishCheck::new(&config.detector);
            let detector = WhatlangDetector;
            let outcome = build_corpus(&config, &table, check, &detector)?;

            let path = corpus.unwrap_or_else(|| config.data_dir.join("corpus.json"));
            let mut corpus = read_corpus(&path)
                .with_context(|| format!("reading {}", path.display()))?;

            let better = BetterCandidates::compute(&outcome.raw_fields, &check, &detector);
            let corrections = improve(&mut corpus, &better);
            write_json(&path, &corpus)?;
            append_audit_log(&config.data_dir.join("corrections.log"), &corrections)?;
            println!("{} correction(s) applied", corrections.len());
        }

        Commands::Dump { view, corpus } => {
            let path = corpus.unwrap_or_else(|| config.data_dir.join("corpus.json"));
            let corpus = read_corpus(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let (name, entries) = match view {
                DumpView::Authors => {
                    let dump = dumps::authors_by_name(&corpus);
                    write_json(&config.data_dir.join("authors.json"), &dump)?;
                    ("authors.json", dump.len())
                }
                DumpView::AuthorsByRecord => {
                    let dump = dumps::authors_by_record(&corpus);
                    write_json(&config.data_dir.join("authors_by_record.json"), &dump)?;
                    ("authors_by_record.json", dump.len())
                }
                DumpView::Subjects => {
                    let dump = dumps::subjects_by_record(&corpus);
                    write_json(&config.data_dir.join("subjects.json"), &dump)?;
                    ("subjects.json", dump.len())
                }
                DumpView::SubjectsByValue => {
                    let dump = dumps::subjects_by_value(&corpus);
                    write_json(&config.data_dir.join("subjects_by_value.json"), &dump)?;
                    ("subjects_by_value.json", dump.len())
                }
                DumpView::Foreign => {
                    let check = EnglishCheck::new(&config.detector);
                    let dump =
                        dumps::foreign_language_records(&corpus, &check, &WhatlangDetector);
                    write_json(&config.data_dir.join("foreign_languages.json"), &dump)?;
                    ("foreign_languages.json", dump.len())
                }
            };
            println!(
                "{entries} entries written to {}",
                config.data_dir.join(name).display()
            );
        }
    }

    Ok(())
}
