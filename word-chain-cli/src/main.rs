use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use env_logger::Env;
use log::{LevelFilter, info, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use word_chain_core::io::read_corpus;
use word_chain_core::model::chain::Chain;
use word_chain_core::sentence::generate_sentence;

/// Generates random text from a Markov chain built over a corpus.
#[derive(Parser, Debug)]
#[command(name = "word-chain", version, about, long_about = None)]
struct Cli {
	/// Corpus file, one training sequence per line
	#[arg(long, default_value = "corpus.txt")]
	corpus: PathBuf,

	/// Maximum number of words to print
	#[arg(long, default_value_t = 30)]
	words: usize,

	/// Prefix length in words
	#[arg(long, default_value_t = 2)]
	prefix: usize,

	/// Number of texts to generate
	#[arg(long, default_value_t = 1)]
	count: usize,

	/// Keep only complete sentences, regenerating empty results
	#[arg(long)]
	sentence: bool,

	/// Attempts per text when --sentence is set
	#[arg(long, default_value_t = 100)]
	tries: usize,

	/// Seed for the random generator (drawn from OS entropy if absent)
	#[arg(long)]
	seed: Option<u64>,

	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, action = ArgAction::Count)]
	verbose: u8,
}

fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		_ => LevelFilter::Debug,
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
	builder.format_timestamp_millis();
	if verbose > 0 {
		builder.filter_level(level);
	}
	let _ = builder.try_init();
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	let seed = cli.seed.unwrap_or_else(|| rand::rng().next_u64());
	info!("seed value: {seed}");
	let mut rng = StdRng::seed_from_u64(seed);

	let mut chain = Chain::new(cli.prefix).context("invalid --prefix")?;
	let lines = read_corpus(&cli.corpus)
		.with_context(|| format!("failed to read corpus {}", cli.corpus.display()))?;
	let read = chain.build_parallel(&lines)?;
	info!("{read} words, {} distinct, {} prefixes", chain.words().len(), chain.len());

	if chain.is_empty() {
		bail!("corpus {} holds no words", cli.corpus.display());
	}

	for _ in 0..cli.count {
		let text = if cli.sentence {
			match generate_sentence(&chain, cli.words, cli.tries, &mut rng) {
				Some(text) => text,
				None => {
					warn!("no complete sentence within {} words after {} tries", cli.words, cli.tries);
					continue;
				}
			}
		} else {
			chain.generate(cli.words, &mut rng)
		};
		println!("{text}");
	}

	Ok(())
}
