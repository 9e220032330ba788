//! Quran Pager
//!
//! Reads a surah from a JSON corpus and pages through it in the terminal.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::Rng;

use quran_pager::app::{self, Config};
use quran_pager::compose::DisplayMode;
use quran_pager::corpus::{Corpus, CorpusError, Document};
use quran_pager::session;

/// Read a surah in the terminal (j/k or arrows to move, g/G top/bottom, q/Esc to quit)
#[derive(Debug, Parser)]
#[command(name = "quran-pager", version)]
struct Args {
    /// JSON corpus file (defaults to the config's corpus_path)
    #[arg(short = 'p', long = "corpus", value_name = "PATH")]
    corpus: Option<PathBuf>,

    /// Reading mode: arabic (ar), translation (tr) or both (bo)
    #[arg(short, long)]
    mode: Option<DisplayMode>,

    /// Read the surah whose transliterated name contains NAME
    #[arg(short, long, value_name = "NAME")]
    surah: Option<String>,

    /// Match --surah exactly (case insensitive)
    #[arg(short, long, requires = "surah")]
    exact: bool,

    /// Read surah number N
    #[arg(short, long, value_name = "N", default_value_t = 1)]
    number: u32,

    /// Read a random surah (overrides --surah and --number)
    #[arg(short, long)]
    random: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'g', long, default_value = "warn")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no corpus given; pass --corpus or set corpus_path in the config")]
    NoCorpus,

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Session(#[from] session::SessionError),
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = Config::load_or_default();

    let log_file = args.log_file.clone().or_else(|| config.log_file.clone());
    if let Err(e) = app::init_logging(&args.log_level, log_file.as_deref()) {
        eprintln!("Failed to open log file: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args, config: &Config) -> Result<(), CliError> {
    let path = args
        .corpus
        .clone()
        .or_else(|| config.corpus_path.clone())
        .ok_or(CliError::NoCorpus)?;

    let corpus = Corpus::load(&path)?;
    tracing::info!("loaded corpus from {}", path.display());

    let document = select(&corpus, args, &mut rand::rng())?;
    let mode = args.mode.unwrap_or(config.mode);

    tracing::info!(
        surah = document.chapter().id,
        %mode,
        "opening surah {}",
        document.chapter().transliteration
    );
    session::run(document, mode, config)?;
    Ok(())
}

fn select<'a, R: Rng + ?Sized>(
    corpus: &'a Corpus,
    args: &Args,
    rng: &mut R,
) -> Result<&'a Document, CorpusError> {
    if args.random {
        return corpus
            .random(rng)
            .ok_or_else(|| CorpusError::NotFound("random surah in an empty corpus".to_string()));
    }

    let found = match &args.surah {
        Some(name) if args.exact => corpus.by_name(name),
        Some(name) => corpus.by_name_like(name),
        None => corpus.by_id(args.number),
    };

    found.ok_or_else(|| match &args.surah {
        Some(name) => CorpusError::NotFound(format!("{:?}", name)),
        None => CorpusError::NotFound(format!("#{}", args.number)),
    })
}
