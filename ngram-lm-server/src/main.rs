use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware, put, web};
use clap::Parser;
use log::info;
use serde::{Deserialize, Serialize};

use ngram_lm_core::corpus::{CorpusProvider, FileCorpus};
use ngram_lm_core::model::{MAX_ORDER, NGramModel};

/// Upper bound on `max_len` for `/v1/generate`, the model stays locked while generating.
const MAX_GENERATE_LEN: usize = 1000;

/// Command-line configuration of the server.
#[derive(Parser, Debug)]
#[command(name = "ngram-lm-server")]
#[command(about = "Serve an n-gram language model over HTTP")]
struct Args {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to bind
	#[arg(short, long, default_value_t = 5000)]
	port: u16,

	/// Order of the initial model
	#[arg(short, long, default_value_t = 3)]
	order: usize,

	/// Text file to train the initial model on
	#[arg(short, long)]
	corpus: Option<PathBuf>,
}

/// JSON body of the `/v1/train` endpoint
#[derive(Deserialize, Serialize)]
struct TrainRequest {
	order: usize,
	tokens: Vec<String>,
}

#[derive(Deserialize)]
struct ProbParams {
	ngram: Option<String> // whitespace separated tokens
}

#[derive(Deserialize)]
struct GenerateParams {
	max_len: Option<usize>
}

#[derive(Deserialize)]
struct SentenceParams {
	sentence: Option<String>
}

struct SharedData {
	model: NGramModel
}

/// HTTP PUT endpoint `/v1/train`
///
/// Replaces the shared model by one of the requested order trained on `tokens`.
/// Orders outside `1..=MAX_ORDER` are answered with 400.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, body: web::Json<TrainRequest>) -> impl Responder {
	let mut model = match NGramModel::new(body.order) {
		Ok(m) => m,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string())
	};
	model.train(&body.tokens);

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.model = model;

	HttpResponse::Ok().body("Model trained successfully")
}

/// HTTP GET endpoint `/v1/prob`
///
/// Returns the smoothed probability of the n-gram given in `ngram`.
#[get("/v1/prob")]
async fn get_prob(data: web::Data<Mutex<SharedData>>, query: web::Query<ProbParams>) -> impl Responder {
	let ngram: Vec<&str> = match &query.ngram {
		Some(s) if !s.trim().is_empty() => s.split_whitespace().collect(),
		_ => return HttpResponse::BadRequest().body("Missing or empty n-gram"),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.model.prob(&ngram) {
		Ok(p) => HttpResponse::Ok().body(p.to_string()),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Returns a greedily generated sequence of at most `max_len` words
/// (default 20, capped at `MAX_GENERATE_LEN`).
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let max_len = query.max_len.unwrap_or(20).min(MAX_GENERATE_LEN);

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.model.generate_text(max_len))
}

/// HTTP GET endpoint `/v1/sentence_prob`
#[get("/v1/sentence_prob")]
async fn get_sentence_prob(data: web::Data<Mutex<SharedData>>, query: web::Query<SentenceParams>) -> impl Responder {
	let sentence = match &query.sentence {
		Some(s) => s,
		None => return HttpResponse::BadRequest().body("Missing sentence"),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.model.sentence_prob(sentence).to_string())
}

#[get("/v1/model")]
async fn get_model(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(shared_data.model.summary())
}

/// Builds the initial model, trained on `--corpus` when given.
fn initial_model(args: &Args) -> io::Result<NGramModel> {
	let mut model = NGramModel::new(args.order)
		.map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

	if let Some(path) = &args.corpus {
		let tokens = FileCorpus::new(path)
			.tokens()
			.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
		model.train(&tokens);
		info!("trained initial model on {} tokens from {}", tokens.len(), path.display());
	}

	Ok(model)
}

/// Main entry point for the server.
///
/// Builds the model, wraps it in a `Mutex` for thread safety,
/// and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::init();
	let args = Args::parse();

	let shared_data = SharedData {
		model: initial_model(&args)?,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	info!("listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(put_train)
			.service(get_prob)
			.service(get_generated)
			.service(get_sentence_prob)
			.service(get_model)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
