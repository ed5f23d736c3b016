use std::path::Path;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use rs_markov_core::model::chain_model::ChainModel;
use rs_markov_core::model::generation_input::{GenerationInput, DEFAULT_MAX_WORDS};
use rs_markov_core::source::FileSource;

/// Folder holding the `.txt` corpus files.
const DATA_FOLDER: &str = "./data";

/// Struct representing query parameters for the `/v1/sentence` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	count: Option<usize>,
	max_words: Option<usize>
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>
}

struct SharedData {
	model: ChainModel
}

/// Path of a corpus file from its bare name.
fn corpus_path(name: &str) -> String {
	format!("{DATA_FOLDER}/{name}.txt")
}

/// Lists the corpus names available in the data folder (no extension).
fn list_corpora() -> std::io::Result<Vec<String>> {
	let mut names = Vec::new();
	for entry in std::fs::read_dir(DATA_FOLDER)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new("txt")) {
			if let Some(stem) = path.file_stem() {
				names.push(stem.to_string_lossy().to_string());
			}
		}
	}
	names.sort();
	Ok(names)
}

/// HTTP GET endpoint `/v1/sentence`
///
/// Generates one or more sentences from the shared chain model.
/// Returns the sentences newline-joined as the response body.
#[get("/v1/sentence")]
async fn get_sentence(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let count = query.count.unwrap_or(1);
	let input = GenerationInput {
		max_words: query.max_words.unwrap_or(DEFAULT_MAX_WORDS),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let sentences: Vec<String> = (0..count)
		.map(|_| shared_data.model.generate_sentence(&input))
		.collect();
	HttpResponse::Ok().body(sentences.join("\n"))
}

/// HTTP GET endpoint `/v1/transitions`
///
/// Read-only inspection of the full transition mapping, as JSON.
#[get("/v1/transitions")]
async fn get_transitions(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(&shared_data.model)
}

#[get("/v1/corpora")]
async fn get_corpora() -> impl Responder {
	match list_corpora() {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

#[put("/v1/load_corpora")]
async fn put_corpora(data: web::Data<Mutex<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let corpus_names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	// Reject unknown names up front; read faults during ingestion itself
	// follow the core's log-and-continue contract
	for name in &corpus_names {
		if !Path::new(&corpus_path(name)).is_file() {
			return HttpResponse::BadRequest().body(format!("No such corpus: {name}"));
		}
	}

	let mut model = ChainModel::new();
	for name in corpus_names {
		model.ingest_source(&mut FileSource::new(corpus_path(name)));
	}
	shared_data.model = model;

	HttpResponse::Ok().body("Corpora loaded successfully")
}

/// Main entry point for the server.
///
/// Starts with an empty chain model, wraps it in a `Mutex` (the model
/// itself is not thread-safe) and serves the generation, inspection and
/// corpus-loading endpoints.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Currently, the data folder path is hardcoded and should be made configurable.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let shared_data = SharedData {
		model: ChainModel::new(),
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_sentence)
			.service(get_transitions)
			.service(get_corpora)
			.service(put_corpora)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
