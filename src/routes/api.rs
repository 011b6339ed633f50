use rocket::http::{ContentType, Header, Status};
use rocket::response::content::RawText;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::{Request, State};
use serde_json::{json, Value};

use crate::ai::{self, GenerationError};
use crate::credentials;
use crate::db::DbPool;
use crate::export;
use crate::models::content::GeneratedContent;
use crate::models::input::GenerateInput;
use crate::models::settings::Setting;
use crate::render;
use crate::seo;
use crate::state::{AppState, GenerationResult};

/// Delay before the client leaves for the setup page after an auth failure.
pub const AUTH_REDIRECT_MS: u64 = 1500;

const MISSING_KEY: &str = "API Key is missing. Please configure the API Key.";

/// Everything the generator page needs to show one result.
pub fn result_json(result: &GenerationResult) -> Value {
    let content = &result.content;
    let mut body = json!({
        "ok": true,
        "kind": content.content_type().name(),
        "content": content,
        "generated_at": result.generated_at.to_rfc3339(),
        "filename": export::export_filename(content),
        "plain": export::plain_dump(content),
    });

    let copy: serde_json::Map<String, Value> = export::COPY_FIELDS
        .iter()
        .filter_map(|field| export::copy_field(content, field).map(|t| (field.to_string(), json!(t))))
        .collect();
    body["copy"] = Value::Object(copy);

    if let GeneratedContent::Seo(doc) = content {
        let s = seo::score(doc);
        body["fragments"] = json!(render::render_fragments(&doc.sections));
        body["html"] = json!(render::to_html(&doc.sections));
        body["score"] = json!(s.score);
        body["label"] = json!(s.label);
    }

    body
}

fn failure(status: Status, message: impl Into<String>) -> (Status, Json<Value>) {
    (status, Json(json!({"ok": false, "error": message.into()})))
}

fn auth_failure(message: impl Into<String>) -> (Status, Json<Value>) {
    (
        Status::Unauthorized,
        Json(json!({
            "ok": false,
            "kind": "auth_error",
            "error": message.into(),
            "redirect": "/setup",
            "redirect_after_ms": AUTH_REDIRECT_MS,
        })),
    )
}

// ── Generate ──────────────────────────────────────────

#[post("/generate", format = "json", data = "<body>")]
pub async fn generate(
    pool: &State<DbPool>,
    state: &State<AppState>,
    body: Json<GenerateInput>,
) -> (Status, Json<Value>) {
    let input = body.into_inner();

    let api_key = match credentials::load(pool) {
        Some(k) => k,
        None => return auth_failure(MISSING_KEY),
    };

    if let Err(e) = input.validate() {
        return failure(Status::BadRequest, e.to_string());
    }

    let guard = match state.try_begin() {
        Some(g) => g,
        None => {
            return failure(
                Status::Conflict,
                "A generation is already in progress. Please wait for it to finish.",
            )
        }
    };

    let settings = Setting::all(pool);
    let outcome = rocket::tokio::task::spawn_blocking(move || {
        ai::generate(&api_key, &settings, &input)
    })
    .await
    .unwrap_or_else(|e| Err(GenerationError::transport(format!("generation task failed: {}", e))));

    match outcome {
        Ok(content) => match guard.finish(Ok(content)) {
            Some(result) => (Status::Ok, Json(result_json(&result))),
            None => failure(Status::InternalServerError, "Result was not stored."),
        },
        Err(e) => {
            log::warn!("Generation failed ({:?}): {}", e.kind, e.message);
            let message = e.user_message();
            guard.finish(Err(message.clone()));

            if e.is_auth() {
                if let Err(err) = credentials::clear(pool) {
                    log::error!("Failed to clear rejected API key: {}", err);
                }
                return auth_failure(message);
            }

            (
                Status::BadGateway,
                Json(json!({"ok": false, "kind": e.kind, "error": message})),
            )
        }
    }
}

// ── Current result ────────────────────────────────────

#[get("/result")]
pub fn result(state: &State<AppState>) -> (Status, Json<Value>) {
    let session = state.snapshot();
    match session.result {
        Some(ref r) => (Status::Ok, Json(result_json(r))),
        None => (
            Status::NotFound,
            Json(json!({"ok": false, "error": session.error})),
        ),
    }
}

// ── Download ──────────────────────────────────────────

/// Plain-text attachment.
pub struct TextDownload {
    pub filename: String,
    pub body: String,
}

impl<'r> Responder<'r, 'static> for TextDownload {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let mut resp = (ContentType::Plain, self.body).respond_to(req)?;
        resp.set_header(Header::new(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", self.filename),
        ));
        Ok(resp)
    }
}

#[get("/export")]
pub fn export_result(state: &State<AppState>) -> Option<TextDownload> {
    let result = state.snapshot().result?;
    Some(TextDownload {
        filename: export::export_filename(&result.content),
        body: export::plain_dump(&result.content),
    })
}

// ── Copy ──────────────────────────────────────────────

#[get("/copy/<field>")]
pub fn copy(state: &State<AppState>, field: &str) -> Option<RawText<String>> {
    let result = state.snapshot().result?;
    export::copy_field(&result.content, field).map(RawText)
}

// ── Status ────────────────────────────────────────────

#[get("/status")]
pub fn status(pool: &State<DbPool>, state: &State<AppState>) -> Json<Value> {
    let session = state.snapshot();
    Json(json!({
        "busy": session.busy,
        "has_key": credentials::load(pool).is_some(),
        "has_result": session.result.is_some(),
        "error": session.error,
    }))
}

// ── Errors ────────────────────────────────────────────

/// JSON body for any failure under `/api` that never reached a handler,
/// e.g. an unreadable request body or one over the configured limit.
#[catch(default)]
pub fn api_error(status: Status, _req: &Request<'_>) -> (Status, Json<Value>) {
    let message = match status.code {
        400 | 422 => "The request could not be read. Check the selected content type and inputs.".to_string(),
        413 => "The request is too large. Please use a smaller product image.".to_string(),
        404 => "Not found.".to_string(),
        _ => format!("Request failed: {}", status),
    };
    failure(status, message)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![generate, result, export_result, copy, status]
}

pub fn catchers() -> Vec<rocket::Catcher> {
    catchers![api_error]
}
