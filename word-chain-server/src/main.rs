use std::path::{Path, PathBuf};
use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use serde::Deserialize;

use word_chain_core::error::ChainError;
use word_chain_core::io::{corpus_name, data_dir, list_files, read_corpus};
use word_chain_core::model::chain::Chain;
use word_chain_core::sentence::generate_sentence;

/// Corpus files served by this process end with this extension.
const CORPUS_EXTENSION: &str = "txt";

/// Upper bound on `words` and `count` query parameters.
const MAX_WORDS: usize = 10_000;

#[derive(Parser, Debug)]
#[command(name = "word-chain-server", about = "Serves Markov chain text over HTTP")]
struct Cli {
	/// Directory holding the `.txt` corpora
	#[arg(long, default_value = "./data")]
	data: String,

	/// Comma-separated corpus names to load at startup (default: all)
	#[arg(long)]
	corpus: Option<String>,

	/// Prefix length in words
	#[arg(long, default_value_t = 2)]
	prefix: usize,

	/// Default maximum number of words per generated text
	#[arg(long, default_value_t = 30)]
	words: usize,

	/// Default attempts when a complete sentence is requested
	#[arg(long, default_value_t = 100)]
	tries: usize,

	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to listen on
	#[arg(long, env = "PORT", default_value_t = 8080)]
	port: u16,
}

/// Query parameters of `/v1/generate`.
#[derive(Deserialize)]
struct GenerateParams {
	words: Option<usize>,
	sentence: Option<bool>,
	tries: Option<usize>,
}

#[derive(Deserialize)]
struct WordsQuery {
	count: Option<usize>,
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
}

/// Fixed settings, shared read-only by every worker.
struct Settings {
	data_dir: PathBuf,
	prefix_len: usize,
	words: usize,
	tries: usize,
}

/// The trained chain and the corpora it was built from.
struct SharedData {
	chain: Chain,
	corpora: Vec<String>,
}

/// Builds one chain from the named corpora of `data_dir`.
///
/// Every line of every corpus is built as its own sequence.
fn load_chain(data_dir: &Path, names: &[String], prefix_len: usize) -> Result<Chain, ChainError> {
	let mut chain = Chain::new(prefix_len)?;
	for name in names {
		let path = data_dir.join(format!("{name}.{CORPUS_EXTENSION}"));
		let lines = read_corpus(&path)?;
		let read = chain.build_parallel(&lines)?;
		info!("loaded corpus {name}: {read} words");
	}
	Ok(chain)
}

/// Splits a comma-separated list of corpus names.
///
/// Names must be bare file stems: anything that could walk out of the
/// data directory is rejected.
fn parse_names(names: &str) -> Result<Vec<String>, String> {
	let names: Vec<String> = names
		.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect();

	if names.is_empty() {
		return Err("Missing or empty corpus name".to_owned());
	}
	if let Some(bad) = names.iter().find(|n| n.contains(['/', '\\']) || n.starts_with('.')) {
		return Err(format!("Invalid corpus name: {bad}"));
	}
	Ok(names)
}

/// HTTP GET endpoint `/v1/generate`
///
/// Returns at most `words` generated words as the response body, trimmed
/// to complete sentences when `sentence=true`. Answers 404 when the
/// chain produced nothing.
#[get("/v1/generate")]
async fn get_generated(
	data: web::Data<RwLock<SharedData>>,
	settings: web::Data<Settings>,
	query: web::Query<GenerateParams>,
) -> impl Responder {
	let words = query.words.unwrap_or(settings.words);
	if words > MAX_WORDS {
		return HttpResponse::BadRequest().body(format!("words must be <= {MAX_WORDS}"));
	}

	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let mut rng = rand::rng();
	let text = if query.sentence.unwrap_or(false) {
		let tries = query.tries.unwrap_or(settings.tries);
		generate_sentence(&shared_data.chain, words, tries, &mut rng).unwrap_or_default()
	} else {
		shared_data.chain.generate(words, &mut rng)
	};

	if text.is_empty() {
		return HttpResponse::NotFound().body("Nothing generated");
	}
	HttpResponse::Ok().body(text)
}

/// HTTP GET endpoint `/v1/words`
///
/// Returns `count` words drawn at random from the training vocabulary,
/// one per line.
#[get("/v1/words")]
async fn get_words(data: web::Data<RwLock<SharedData>>, query: web::Query<WordsQuery>) -> impl Responder {
	let count = query.count.unwrap_or(1);
	if count > MAX_WORDS {
		return HttpResponse::BadRequest().body(format!("count must be <= {MAX_WORDS}"));
	}

	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let mut rng = rand::rng();
	let words: Vec<&str> = (0..count)
		.filter_map(|_| shared_data.chain.random_word(&mut rng))
		.collect();
	HttpResponse::Ok().body(words.join("\n"))
}

#[get("/v1/corpora")]
async fn get_corpora(settings: web::Data<Settings>) -> impl Responder {
	match list_files(&settings.data_dir, CORPUS_EXTENSION) {
		Ok(files) => {
			let names: Vec<String> = files.iter().filter_map(corpus_name).collect();
			HttpResponse::Ok().body(names.join("\n"))
		}
		Err(e) => {
			error!("listing {}: {e}", settings.data_dir.display());
			HttpResponse::InternalServerError().body("Failed to list corpora")
		}
	}
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	HttpResponse::Ok().body(shared_data.corpora.join("\n"))
}

/// HTTP PUT endpoint `/v1/load_corpora`
///
/// Rebuilds the chain from the comma-separated `names` and swaps it in.
/// The build runs on the blocking thread pool; the current chain keeps
/// serving until it is done.
#[put("/v1/load_corpora")]
async fn put_corpora(
	data: web::Data<RwLock<SharedData>>,
	settings: web::Data<Settings>,
	query: web::Query<CorpusQuery>,
) -> impl Responder {
	let names = match parse_names(query.names.as_deref().unwrap_or_default()) {
		Ok(names) => names,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let data_dir = settings.data_dir.clone();
	let prefix_len = settings.prefix_len;
	let requested = names.clone();
	let chain = match web::block(move || load_chain(&data_dir, &requested, prefix_len)).await {
		Ok(Ok(chain)) => chain,
		Ok(Err(e)) => return HttpResponse::InternalServerError().body(format!("Failed to load corpora: {e}")),
		Err(e) => {
			error!("corpus reload worker failed: {e}");
			return HttpResponse::InternalServerError().body("Failed to load corpora");
		}
	};

	let mut shared_data = match data.write() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	shared_data.chain = chain;
	shared_data.corpora = names;

	HttpResponse::Ok().body("Corpora loaded successfully")
}

/// Main entry point for the server.
///
/// Builds the chain from the startup corpora, wraps it in a `RwLock`
/// and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();
	let data_dir = data_dir(&cli.data);

	let names = match &cli.corpus {
		Some(names) => parse_names(names).map_err(anyhow::Error::msg)?,
		None => list_files(&data_dir, CORPUS_EXTENSION)
			.with_context(|| format!("failed to list {}", data_dir.display()))?
			.into_iter()
			.filter_map(corpus_name)
			.collect(),
	};
	if names.is_empty() {
		warn!("no corpus in {}, serving an empty chain", data_dir.display());
	}

	let chain = load_chain(&data_dir, &names, cli.prefix).context("failed to build chain")?;
	info!("chain ready: {} prefixes, {} words", chain.len(), chain.words().len());

	let shared_data = web::Data::new(RwLock::new(SharedData { chain, corpora: names }));
	let settings = web::Data::new(Settings {
		data_dir,
		prefix_len: cli.prefix,
		words: cli.words,
		tries: cli.tries,
	});

	info!("starting server on {}:{}", cli.host, cli.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.app_data(settings.clone())
			.service(get_generated)
			.service(get_words)
			.service(get_corpora)
			.service(get_loaded_corpora)
			.service(put_corpora)
	})
		.bind((cli.host.as_str(), cli.port))?
		.run()
		.await?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::test;
	use tempfile::{tempdir, TempDir};

	fn corpus_dir() -> TempDir {
		let dir = tempdir().unwrap();
		std::fs::write(dir.path().join("cats.txt"), "the cat sat.\nthe cat ran.\n").unwrap();
		std::fs::write(dir.path().join("dogs.txt"), "a dog barks!\n").unwrap();
		std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();
		dir
	}

	fn state(dir: &Path, names: &[&str]) -> (web::Data<RwLock<SharedData>>, web::Data<Settings>) {
		let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
		let chain = load_chain(dir, &names, 1).unwrap();
		let shared = web::Data::new(RwLock::new(SharedData { chain, corpora: names }));
		let settings = web::Data::new(Settings {
			data_dir: dir.to_path_buf(),
			prefix_len: 1,
			words: 30,
			tries: 10,
		});
		(shared, settings)
	}

	macro_rules! app {
		($shared:expr, $settings:expr) => {
			test::init_service(
				App::new()
					.app_data($shared.clone())
					.app_data($settings.clone())
					.service(get_generated)
					.service(get_words)
					.service(get_corpora)
					.service(get_loaded_corpora)
					.service(put_corpora),
			)
			.await
		};
	}

	#[actix_web::test]
	async fn names_are_split_and_checked() {
		assert_eq!(parse_names(" cats, dogs ,").unwrap(), ["cats", "dogs"]);
		assert!(parse_names(" , ").is_err());
		assert!(parse_names("../etc/passwd").is_err());
		assert!(parse_names("cats,sub/dir").is_err());
	}

	#[actix_web::test]
	async fn generate_returns_words_from_corpus() {
		let dir = corpus_dir();
		let (shared, settings) = state(dir.path(), &["cats"]);
		let app = app!(shared, settings);

		let req = test::TestRequest::get().uri("/v1/generate?words=2").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "the cat");
	}

	#[actix_web::test]
	async fn generate_sentence_ends_with_terminator() {
		let dir = corpus_dir();
		let (shared, settings) = state(dir.path(), &["cats"]);
		let app = app!(shared, settings);

		let req = test::TestRequest::get().uri("/v1/generate?words=3&sentence=true").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert!(body == "the cat sat." || body == "the cat ran.", "{body:?}");
	}

	#[actix_web::test]
	async fn empty_chain_answers_not_found() {
		let dir = corpus_dir();
		let (shared, settings) = state(dir.path(), &[]);
		let app = app!(shared, settings);

		let req = test::TestRequest::get().uri("/v1/generate").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	}

	#[actix_web::test]
	async fn oversized_request_is_rejected() {
		let dir = corpus_dir();
		let (shared, settings) = state(dir.path(), &["cats"]);
		let app = app!(shared, settings);

		let req = test::TestRequest::get().uri("/v1/generate?words=10001").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn words_come_from_vocabulary() {
		let dir = corpus_dir();
		let (shared, settings) = state(dir.path(), &["dogs"]);
		let app = app!(shared, settings);

		let req = test::TestRequest::get().uri("/v1/words?count=5").to_request();
		let body = test::call_and_read_body(&app, req).await;
		let body = std::str::from_utf8(&body).unwrap();
		assert_eq!(body.lines().count(), 5);
		assert!(body.lines().all(|w| ["a", "dog", "barks!"].contains(&w)));
	}

	#[actix_web::test]
	async fn corpora_are_listed_and_reloaded() {
		let dir = corpus_dir();
		let (shared, settings) = state(dir.path(), &["cats"]);
		let app = app!(shared, settings);

		let req = test::TestRequest::get().uri("/v1/corpora").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "cats\ndogs");

		let req = test::TestRequest::put().uri("/v1/load_corpora?names=dogs").to_request();
		let resp = test::call_service(&app, req).await;
		assert!(resp.status().is_success());

		let req = test::TestRequest::get().uri("/v1/loaded_corpora").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "dogs");

		let req = test::TestRequest::get().uri("/v1/generate?words=1").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "a");
	}

	#[actix_web::test]
	async fn unknown_corpus_fails_to_load() {
		let dir = corpus_dir();
		let (shared, settings) = state(dir.path(), &["cats"]);
		let app = app!(shared, settings);

		let req = test::TestRequest::put().uri("/v1/load_corpora?names=birds").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let req = test::TestRequest::get().uri("/v1/loaded_corpora").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "cats");
	}
}
