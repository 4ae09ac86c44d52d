//! HTTP route handlers
//!
//! Binds the storage, navigation and transfer operations to routes. Every
//! handler passes the raw client path straight to the storage root for
//! resolution; filesystem calls run on the blocking pool.

use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, post, web};
use log::info;
use serde::Deserialize;
use serde_json::json;
use tokio_util::io::ReaderStream;

use crate::error::StorageError;
use crate::navigate::list_directory;
use crate::protocol::parser::{
    FormBody, collect_text_field, drain_field, field_filename, field_name, form_fields,
    next_field,
};
use crate::protocol::responses::OpResponse;
use crate::server::AppState;
use crate::storage;
use crate::transfer::{StagedUpload, open_download, stage_upload};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const APP_JS: &str = include_str!("../../static/app.js");

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(script)
        .service(health)
        .service(
            web::scope("/api")
                .service(list)
                .service(create_folder)
                .service(upload)
                .service(delete),
        )
        .service(open_file);
}

/// Run a storage call on the blocking pool.
async fn run_blocking<F, T>(f: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|err| StorageError::Operational(err.to_string()))?
}

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

#[get("/static/app.js")]
async fn script() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(APP_JS)
}

#[get("/healthz")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "rax-file-manager",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    path: String,
}

#[get("/list")]
async fn list(
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, StorageError> {
    let client_path = query.into_inner().path;
    let listing = run_blocking(move || {
        let dir = state.root.resolve(&client_path)?;
        list_directory(&dir)
    })
    .await?;

    Ok(HttpResponse::Ok().json(listing))
}

#[post("/create-folder")]
async fn create_folder(
    body: FormBody,
    state: web::Data<AppState>,
) -> Result<HttpResponse, StorageError> {
    let mut fields = form_fields(body).await?;
    let path = fields.remove("path").unwrap_or_default();
    let folder = fields.remove("folder").unwrap_or_default();

    run_blocking(move || storage::create_folder(&state.root, &path, &folder)).await?;

    Ok(HttpResponse::Ok().json(OpResponse::success()))
}

#[post("/upload")]
async fn upload(
    mut payload: Multipart,
    state: web::Data<AppState>,
) -> Result<HttpResponse, StorageError> {
    let mut path = String::new();
    let mut saw_file_part = false;
    let mut staged: Option<StagedUpload> = None;

    while let Some(mut field) = next_field(&mut payload).await? {
        match field_name(&field).as_deref() {
            Some("path") => {
                path = collect_text_field(&mut field).await?;
            }
            Some("file") if !saw_file_part => match field_filename(&field) {
                Some(filename) => {
                    saw_file_part = true;
                    if filename.is_empty() {
                        drain_field(&mut field).await?;
                    } else {
                        staged = Some(
                            stage_upload(
                                &mut field,
                                &filename,
                                &state.staging_dir,
                                state.max_upload_bytes,
                            )
                            .await?,
                        );
                    }
                }
                None => drain_field(&mut field).await?,
            },
            _ => drain_field(&mut field).await?,
        }
    }

    if !saw_file_part {
        return Err(StorageError::Validation("No file part".into()));
    }
    let staged =
        staged.ok_or_else(|| StorageError::Validation("No selected file".into()))?;

    let stored = run_blocking(move || {
        storage::save_upload(&state.root, &path, &staged.filename, staged.file)
    })
    .await?;
    info!("Upload stored at {}", stored.client_path);

    Ok(HttpResponse::Ok().json(OpResponse::success()))
}

#[post("/delete")]
async fn delete(body: FormBody, state: web::Data<AppState>) -> Result<HttpResponse, StorageError> {
    let mut fields = form_fields(body).await?;
    let path = fields.remove("path").unwrap_or_default();

    run_blocking(move || storage::delete_entry(&state.root, &path)).await?;

    Ok(HttpResponse::Ok().json(OpResponse::success()))
}

#[get("/open/{path:.*}")]
async fn open_file(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, StorageError> {
    let client_path = path.into_inner();
    let chunk_size = state.chunk_size;
    let located = run_blocking(move || storage::locate_download(&state.root, &client_path)).await?;
    let download = open_download(&located).await?;

    Ok(HttpResponse::Ok()
        .content_type(download.content_type.to_string())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![DispositionParam::Filename(download.filename)],
        })
        .streaming(ReaderStream::with_capacity(download.file, chunk_size)))
}
