//! In-memory stand-in for the subset of the ZapSign API the client's
//! integration tests exercise.
//!
//! Every route requires `Authorization: Bearer {API_TOKEN}`. Error bodies
//! follow the vendor's shapes (`{"detail"}`, `{"error"}`, `{"code"}`).

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

pub const API_TOKEN: &str = "mock-api-token";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Signer {
    pub token: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub auth_mode: String,
    pub status: String,
    pub sign_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub token: String,
    pub name: String,
    pub status: String,
    pub signers: Vec<Signer>,
    #[serde(default)]
    pub rejected_reason: Option<String>,
}

#[derive(Deserialize)]
pub struct SignerInput {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub auth_mode: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateDocument {
    pub name: Option<String>,
    #[serde(default)]
    pub signers: Vec<SignerInput>,
    pub base64_pdf: Option<String>,
    pub url_pdf: Option<String>,
    pub markdown_text: Option<String>,
}

#[derive(Deserialize)]
pub struct RefuseDocument {
    pub doc_token: String,
    pub rejected_reason: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Webhook {
    pub id: u64,
    pub url: String,
    #[serde(rename = "type")]
    pub event: String,
}

#[derive(Deserialize)]
pub struct CreateWebhook {
    pub url: String,
    #[serde(rename = "type", default)]
    pub event: String,
}

#[derive(Deserialize)]
pub struct DeleteWebhook {
    pub id: Value,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Default)]
pub struct Store {
    documents: HashMap<String, Document>,
    webhooks: HashMap<u64, Webhook>,
    next_webhook: u64,
}

impl Store {
    fn signer(&self, token: &str) -> Option<&Signer> {
        self.documents
            .values()
            .flat_map(|doc| doc.signers.iter())
            .find(|signer| signer.token == token)
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult = Result<Response, Response>;

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn not_found() -> Response {
    reply(StatusCode::NOT_FOUND, json!({ "detail": "Not found." }))
}

fn bad_request(message: &str) -> Response {
    reply(StatusCode::BAD_REQUEST, json!({ "error": message }))
}

fn new_signer(input: SignerInput) -> Signer {
    let token = Uuid::new_v4().to_string();
    Signer {
        sign_url: format!("https://sandbox.app.zapsign.com.br/verificar/{token}"),
        token,
        name: input.name,
        email: input.email.unwrap_or_default(),
        auth_mode: input.auth_mode.unwrap_or_else(|| "assinaturaTela".to_string()),
        status: "new".to_string(),
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/v1/docs/", get(list_documents).post(create_document))
        .route("/api/v1/docs/{token}/", get(get_document).delete(delete_document))
        .route("/api/v1/docs/{token}/add-signer/", post(add_signer))
        .route("/api/v1/refuse/", post(refuse_document))
        .route("/api/v1/signers/{token}/", get(get_signer))
        .route("/api/v1/reset-auth-attempts/{token}", put(reset_attempts))
        .route("/api/v1/user/company/webhook/", post(create_webhook))
        .route("/api/v1/user/company/webhook/delete/", delete(delete_webhook))
        .route("/api/v1/validate-pdf-signature", post(validate_signature))
        .route("/mock/docs/{token}/sign", post(sign_document))
        .layer(middleware::from_fn(require_token))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_token(request: Request, next: Next) -> Response {
    let expected = format!("Bearer {API_TOKEN}");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if !authorized {
        warn!(path = %request.uri().path(), "rejected request without a valid token");
        return reply(StatusCode::UNAUTHORIZED, json!({ "detail": "Invalid token." }));
    }
    next.run(request).await
}

async fn create_document(State(db): State<Db>, Json(input): Json<CreateDocument>) -> ApiResult {
    let name = input
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| bad_request("name is required"))?;
    if input.signers.is_empty() {
        return Err(bad_request("signers is required"));
    }
    if input.base64_pdf.is_none() && input.url_pdf.is_none() && input.markdown_text.is_none() {
        return Err(bad_request("a document source is required"));
    }
    let doc = Document {
        token: Uuid::new_v4().to_string(),
        name,
        status: "pending".to_string(),
        signers: input.signers.into_iter().map(new_signer).collect(),
        rejected_reason: None,
    };
    info!(token = %doc.token, signers = doc.signers.len(), "document created");
    db.write().await.documents.insert(doc.token.clone(), doc.clone());
    Ok(reply(StatusCode::OK, json!(doc)))
}

async fn list_documents(State(db): State<Db>, Query(query): Query<ListQuery>) -> Json<Value> {
    let store = db.read().await;
    let mut docs: Vec<&Document> = store.documents.values().collect();
    docs.sort_by(|a, b| a.name.cmp(&b.name));
    Json(json!({
        "count": docs.len(),
        "page": query.page,
        "results": docs,
    }))
}

async fn get_document(State(db): State<Db>, Path(token): Path<String>) -> ApiResult {
    let store = db.read().await;
    let doc = store.documents.get(&token).ok_or_else(not_found)?;
    Ok(reply(StatusCode::OK, json!(doc)))
}

async fn delete_document(State(db): State<Db>, Path(token): Path<String>) -> ApiResult {
    db.write()
        .await
        .documents
        .remove(&token)
        .ok_or_else(not_found)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn add_signer(
    State(db): State<Db>,
    Path(token): Path<String>,
    Json(input): Json<SignerInput>,
) -> ApiResult {
    let mut store = db.write().await;
    let doc = store.documents.get_mut(&token).ok_or_else(not_found)?;
    let signer = new_signer(input);
    doc.signers.push(signer.clone());
    Ok(reply(StatusCode::OK, json!(signer)))
}

async fn refuse_document(State(db): State<Db>, Json(input): Json<RefuseDocument>) -> ApiResult {
    let mut store = db.write().await;
    let doc = store
        .documents
        .get_mut(&input.doc_token)
        .ok_or_else(not_found)?;
    match doc.status.as_str() {
        "signed" => {
            return Err(reply(
                StatusCode::FORBIDDEN,
                json!({ "code": "document_already_signed" }),
            ))
        }
        "refused" => {
            return Err(reply(
                StatusCode::FORBIDDEN,
                json!({ "code": "document_already_refused" }),
            ))
        }
        _ => {}
    }
    doc.status = "refused".to_string();
    doc.rejected_reason = Some(input.rejected_reason);
    Ok(reply(StatusCode::OK, json!(doc)))
}

async fn get_signer(State(db): State<Db>, Path(token): Path<String>) -> ApiResult {
    let store = db.read().await;
    let signer = store.signer(&token).ok_or_else(not_found)?;
    Ok(reply(StatusCode::OK, json!(signer)))
}

/// Mock signers never run out of validation attempts.
async fn reset_attempts(State(db): State<Db>, Path(token): Path<String>) -> ApiResult {
    let store = db.read().await;
    store.signer(&token).ok_or_else(not_found)?;
    Err(bad_request("Signatário tem tentativas restantes"))
}

async fn create_webhook(State(db): State<Db>, Json(input): Json<CreateWebhook>) -> Json<Webhook> {
    let mut store = db.write().await;
    store.next_webhook += 1;
    let webhook = Webhook {
        id: store.next_webhook,
        url: input.url,
        event: input.event,
    };
    store.webhooks.insert(webhook.id, webhook.clone());
    Json(webhook)
}

async fn delete_webhook(State(db): State<Db>, Json(input): Json<DeleteWebhook>) -> ApiResult {
    let id = match &input.id {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| bad_request("id must be numeric"))?;
    db.write()
        .await
        .webhooks
        .remove(&id)
        .ok_or_else(not_found)?;
    Ok(reply(StatusCode::OK, json!({ "message": "Webhook deleted" })))
}

async fn validate_signature(headers: HeaderMap, body: Bytes) -> ApiResult {
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));
    let has_file = String::from_utf8_lossy(&body).contains("name=\"file\"");
    if !is_multipart || !has_file {
        return Err(bad_request("file is required"));
    }
    Ok(reply(
        StatusCode::OK,
        json!({ "valid": true, "signatures": [] }),
    ))
}

/// Test hook: mark a document and all its signers as signed.
async fn sign_document(State(db): State<Db>, Path(token): Path<String>) -> ApiResult {
    let mut store = db.write().await;
    let doc = store.documents.get_mut(&token).ok_or_else(not_found)?;
    doc.status = "signed".to_string();
    for signer in &mut doc.signers {
        signer.status = "signed".to_string();
    }
    Ok(reply(StatusCode::OK, json!(doc)))
}
