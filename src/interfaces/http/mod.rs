use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use futures_util::TryStreamExt;
use tracing::{error, info};

use crate::application::use_cases::preview::UploadPreview;
use crate::application::UploadPreviewUseCase;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::ServerConfig;
use crate::infrastructure::excel::ExcelParser;

const INDEX_HTML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/index.html"));
const MAIN_JS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/js/main.js"));

pub struct HttpState {
    pub parser: ExcelParser,
    pub preview: UploadPreviewUseCase,
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[get("/static/js/main.js")]
async fn main_js() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(MAIN_JS)
}

#[post("/upload")]
async fn upload(data: web::Data<HttpState>, payload: Multipart) -> impl Responder {
    match process_upload(&data, payload).await {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(err) => {
            error!(error = %err, "Upload rejected");
            HttpResponse::BadRequest().json(serde_json::json!({ "error": err.to_string() }))
        }
    }
}

async fn process_upload(state: &HttpState, payload: Multipart) -> Result<UploadPreview> {
    let (filename, bytes) = read_file_field(payload).await?;
    info!(
        filename = %filename,
        size = bytes.len(),
        "Processing spreadsheet upload"
    );
    let table = state.parser.parse(&filename, &bytes)?;
    Ok(state.preview.execute(&table))
}

/// Pull the `file` field out of the multipart form. A request without
/// that field (or without a multipart body at all) reads as "no file
/// uploaded", matching the browser form contract.
async fn read_file_field(mut payload: Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|_| AppError::MissingFile)?
    {
        if field.name() != "file" {
            while let Some(_chunk) = field
                .try_next()
                .await
                .map_err(|err| AppError::Internal(format!("Failed to read form field: {}", err)))?
            {}
            continue;
        }

        let filename = field
            .content_disposition()
            .get_filename()
            .map(|name| name.to_string())
            .unwrap_or_default();
        if filename.trim().is_empty() {
            return Err(AppError::EmptySelection);
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|err| AppError::Internal(format!("Failed to read upload: {}", err)))?
        {
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return Err(AppError::EmptySelection);
        }

        return Ok((filename, bytes));
    }

    Err(AppError::MissingFile)
}

pub fn start_server(config: &ServerConfig) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState {
        parser: ExcelParser::new(),
        preview: UploadPreviewUseCase::new(),
    });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(index)
            .service(main_js)
            .service(web::scope("/api").service(upload))
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}
