use serde_json::{json, Value};

use super::{path_token, segment, Api, PreparedCall};
use crate::error::ZapSignError;
use crate::http::{HttpMethod, HttpRequest};
use crate::operation::OperationRequest;

const CHECKS: &str = "/api/v1/checks/";

/// Fields shared by person and company checks.
fn base_body(request: &OperationRequest, kind: &str) -> serde_json::Map<String, Value> {
    let params = &request.parameters;
    let mut body = serde_json::Map::new();
    body.insert("user_authorized".to_string(), Value::Bool(true));
    body.insert(
        "force_creation".to_string(),
        Value::Bool(params.bool_or("forceCreation", true)),
    );
    body.insert("type".to_string(), json!(kind));
    body.insert("country".to_string(), json!("BR"));
    if let Some(external_id) = params.non_empty("bcExternalId") {
        body.insert("custom_input".to_string(), Value::String(external_id));
    }
    body
}

fn post(
    api: &Api,
    request: &OperationRequest,
    body: serde_json::Map<String, Value>,
) -> PreparedCall {
    PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, api.url(CHECKS)).with_json(Value::Object(body)),
    )
}

pub(super) fn create_person(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let cpf = params.required("personCpf", "CPF is required for a person background check.")?;
    let mut body = base_body(request, "person");
    body.insert("national_id".to_string(), Value::String(cpf.clone()));
    if let Some(name) = params.non_empty("personName") {
        let mut parts = name.split_whitespace();
        if let Some(first) = parts.next() {
            body.insert("first_name".to_string(), json!(first));
        }
        let rest: Vec<&str> = parts.collect();
        if !rest.is_empty() {
            body.insert("last_name".to_string(), json!(rest.join(" ")));
        }
    }
    Ok(post(api, request, body).with_detail("CPF", cpf))
}

pub(super) fn create_company(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let cnpj = params.required("companyCnpj", "CNPJ is required for a company background check.")?;
    let mut body = base_body(request, "company");
    body.insert("tax_id".to_string(), Value::String(cnpj.clone()));
    if let Some(name) = params.non_empty("companyName") {
        body.insert("company_name".to_string(), Value::String(name));
    }
    Ok(post(api, request, body).with_detail("CNPJ", cnpj))
}

fn by_token(
    api: &Api,
    request: &OperationRequest,
    suffix: &str,
) -> Result<PreparedCall, ZapSignError> {
    let token = path_token(&request.parameters, "checkToken", "Check Token")?;
    let url = api.url(&format!("{CHECKS}{}/{suffix}", segment(&token)));
    Ok(PreparedCall::new(request.kind, HttpRequest::new(HttpMethod::Get, url))
        .with_detail("Check Token", token))
}

pub(super) fn get(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    by_token(api, request, "")
}

pub(super) fn details(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    by_token(api, request, "details/")
}
