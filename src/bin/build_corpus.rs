//! Build the labeled earnings corpus from a directory of 8-K filings.
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to see every
//! skipped filing and dropped noise block.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use earnings_corpus::{discovery, ClassScheme, Corpus, CsvPriceSource, Options, Pipeline, RunSummary};

/// Builds a return-labeled corpus of earnings releases from SEC 8-K filings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory searched for `<SYMBOL>-<date>-8-K.txt` filings [default: ~/sec_edgar/data]
    #[arg(long)]
    form_dir: Option<PathBuf>,

    /// Base directory; the corpus goes to `<dir>/corpra/<window-days>` [default: ~/sec_edgar]
    #[arg(long)]
    corpus_dir: Option<PathBuf>,

    /// Directory of `<SYMBOL>.csv` daily price files [default: ~/sec_edgar/prices]
    #[arg(long)]
    prices_dir: Option<PathBuf>,

    /// Return window length in business days
    #[arg(long, default_value_t = 10)]
    window_days: usize,

    /// Return boundary between classes
    #[arg(long, default_value_t = 0.05)]
    limit: f64,

    /// Number of classes (2 or 3)
    #[arg(long, default_value_t = 3)]
    classes: u8,

    /// Business days added to the filing date before the window starts
    #[arg(long, default_value_t = -4, allow_negative_numbers = true)]
    delay_days: i64,

    /// Minimum fraction of text the noise filter must keep
    #[arg(long, default_value_t = 0.05)]
    trim_limit: f64,

    /// Worker threads
    #[arg(long, default_value_t = 10)]
    workers: usize,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn sec_edgar_dir(override_dir: Option<PathBuf>, sub: &[&str]) -> PathBuf {
    override_dir.unwrap_or_else(|| {
        let mut dir = dirs::home_dir().unwrap_or_default().join("sec_edgar");
        for part in sub {
            dir.push(part);
        }
        dir
    })
}

fn run(args: Args) -> earnings_corpus::Result<RunSummary> {
    let options = Options {
        window_days: args.window_days,
        limit: args.limit,
        classes: ClassScheme::try_from(args.classes)?,
        delay_days: args.delay_days,
        trim_limit: args.trim_limit,
        workers: args.workers,
    };

    let form_dir = sec_edgar_dir(args.form_dir, &["data"]);
    let base = sec_edgar_dir(args.corpus_dir, &[]);
    let prices_dir = sec_edgar_dir(args.prices_dir, &["prices"]);

    let corpus = Corpus::new(Corpus::root_for(&base, options.window_days), options.classes);
    log::info!("writing corpus to {}", corpus.root().display());

    let pipeline = Pipeline::new(options, corpus, CsvPriceSource::new(prices_dir))?;
    let groups = discovery::discover(&form_dir)?;
    pipeline.run(&groups)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let json = args.json;

    match run(args) {
        Ok(summary) => {
            if json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(out) => println!("{out}"),
                    Err(e) => {
                        log::error!("could not serialize summary: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
