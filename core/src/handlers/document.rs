use serde_json::{json, Map, Value};
use tracing::debug;

use super::{merge_fields, path_token, segment, Api, PreparedCall};
use crate::descriptor::{check_option, RUBRIC_TYPES};
use crate::error::ZapSignError;
use crate::file_input::{
    binary_property, decode_base64, DocumentSource, FileInputType, PDF_MIME,
};
use crate::http::{FormPart, HttpMethod, HttpRequest};
use crate::mappers::{map_one_click_signers, map_rubrics, map_signers, map_template_variables};
use crate::operation::OperationRequest;
use crate::params::Parameters;

const DOCS: &str = "/api/v1/docs/";
const REFUSE: &str = "/api/v1/refuse/";
const VALIDATE_SIGNATURE: &str = "/api/v1/validate-pdf-signature";

const NO_SIGNERS: &str = "At least one signer is required. Add one or more signers.";
const BAD_METADATA: &str =
    "Invalid JSON in Metadata field. Please provide a valid JSON object string.";

fn doc_url(api: &Api, token: &str, suffix: &str) -> String {
    api.url(&format!("{DOCS}{}/{suffix}", segment(token)))
}

fn document_token(params: &Parameters) -> Result<String, ZapSignError> {
    path_token(params, "documentToken", "Document Token")
}

/// Every signer needs a name, and an email unless it opted out with
/// `blank_email` or can be reached by phone.
fn validate_signers(signers: &[Value]) -> Result<(), ZapSignError> {
    for (index, signer) in signers.iter().enumerate() {
        let position = index + 1;
        let has = |key: &str| {
            signer
                .get(key)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty())
        };
        if !has("name") {
            return Err(ZapSignError::invalid(format!(
                "Signer {position} is missing a name."
            )));
        }
        let blank_email = signer.get("blank_email").and_then(Value::as_bool) == Some(true);
        if !has("email") && !blank_email && !has("phone_number") {
            return Err(ZapSignError::invalid(format!(
                "Signer {position} needs an email address unless blank_email is enabled or a phone number is given."
            )));
        }
    }
    Ok(())
}

/// `{name, ...additionalFields}` with a JSON-string `metadata` parsed.
fn base_body(params: &Parameters, name: &str) -> Result<Map<String, Value>, ZapSignError> {
    let mut body = Map::new();
    body.insert("name".to_string(), Value::String(name.to_string()));
    let Some(fields) = params.object("additionalFields") else {
        return Ok(body);
    };
    merge_fields(&mut body, Some(fields));
    if fields.contains_key("metadata") {
        match Parameters::new(fields.clone()).json_object("metadata", BAD_METADATA)? {
            Some(metadata) => {
                body.insert("metadata".to_string(), metadata);
            }
            None => {
                body.remove("metadata");
            }
        }
    }
    Ok(body)
}

fn signer_entries(params: &Parameters) -> Result<Vec<Map<String, Value>>, ZapSignError> {
    let entries = params.collection("signers", "signer");
    if entries.is_empty() {
        return Err(ZapSignError::invalid(NO_SIGNERS));
    }
    Ok(entries)
}

fn upload(
    api: &Api,
    request: &OperationRequest,
    mut body: Map<String, Value>,
    source: &DocumentSource,
    signers: Vec<Value>,
) -> PreparedCall {
    let params = &request.parameters;
    source.apply(&mut body);
    body.insert("signers".to_string(), Value::Array(signers));
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, api.url(DOCS)).with_json(Value::Object(body)),
    )
    .with_probe(source.probe())
    .with_detail("Document Name", name)
    .with_detail("File Type", params.string_or("fileInputType", "file"))
}

pub(super) fn create(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let signers = map_signers(&signer_entries(params)?);
    validate_signers(&signers)?;
    let name = params.required("name", "Document name is required.")?;
    let source = DocumentSource::resolve(params, &request.binary)?;
    let body = base_body(params, &name)?;
    Ok(upload(api, request, body, &source, signers))
}

pub(super) fn create_one_click(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let signers = map_one_click_signers(&signer_entries(params)?);
    validate_signers(&signers)?;
    let input_type: FileInputType = params.string_or("fileInputType", "file").parse()?;
    if input_type == FileInputType::Markdown {
        return Err(ZapSignError::invalid(
            "Markdown input is not supported for OneClick. Use file, base64 or url.",
        ));
    }
    let name = params.required("name", "Document name is required.")?;
    let source = DocumentSource::resolve(params, &request.binary)?;
    let mut body = base_body(params, &name)?;
    body.insert("one_click_active".to_string(), Value::Bool(true));
    if params.bool_or("requireSignature", false) {
        body.insert("require_signature".to_string(), Value::Bool(true));
    }
    Ok(upload(api, request, body, &source, signers))
}

pub(super) fn get(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let token = document_token(&request.parameters)?;
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Get, doc_url(api, &token, "")),
    ))
}

const LIST_FILTERS: &[(&str, &str)] = &[
    ("folderPath", "folder_path"),
    ("deleted", "deleted"),
    ("status", "status"),
    ("createdFrom", "created_from"),
    ("createdTo", "created_to"),
    ("sortOrder", "sort_order"),
];

pub(super) fn get_all(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let page = params.number("page").map(|p| p as i64).unwrap_or(1).max(1);
    let mut http =
        HttpRequest::new(HttpMethod::Get, api.url(DOCS)).with_query("page", page.to_string());
    for (param, key) in LIST_FILTERS {
        if let Some(value) = params.non_empty(param) {
            http = http.with_query(key, value);
        }
    }
    Ok(PreparedCall::new(request.kind, http))
}

/// Rename pairs from `extraDocsToRename`, given either flat or as a
/// repeatable group.
fn extra_doc_renames(params: &Parameters) -> Vec<Value> {
    let entries = match params.object("extraDocsToRename") {
        Some(flat) if flat.contains_key("extraDocToken") => vec![flat.clone()],
        _ => params.collection("extraDocsToRename", "extraDoc"),
    };
    entries
        .into_iter()
        .filter_map(|entry| {
            let entry = Parameters::new(entry);
            let token = entry.non_empty("extraDocToken")?;
            let name = entry.non_empty("newExtraDocName")?;
            Some(json!({ "token": token, "name": name }))
        })
        .collect()
}

pub(super) fn update(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let token = document_token(params)?;
    let mut body = Map::new();
    for (param, key) in [
        ("newDocumentName", "name"),
        ("newDateLimitToSign", "date_limit_to_sign"),
        ("newFolderPath", "folder_path"),
        ("newFolderToken", "folder_token"),
    ] {
        if let Some(value) = params.non_empty(param) {
            body.insert(key.to_string(), Value::String(value));
        }
    }
    let renames = extra_doc_renames(params);
    if !renames.is_empty() {
        body.insert("extra_docs".to_string(), Value::Array(renames));
    }
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Put, doc_url(api, &token, "")).with_json(Value::Object(body)),
    ))
}

pub(super) fn delete(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let token = document_token(&request.parameters)?;
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Delete, doc_url(api, &token, "")),
    ))
}

/// Cancel and refuse hit the same endpoint; only refuse carries remediation.
pub(super) fn refuse(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let token = document_token(params)?;
    let reason = params.required("rejectedReason", "Rejected Reason is required.")?;
    let body = json!({ "doc_token": token, "rejected_reason": reason });
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, api.url(REFUSE)).with_json(body),
    )
    .with_detail("Document Token", token))
}

pub(super) fn activity_history(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let token = params.required(
        "documentToken",
        "Document Token is required for getting activity history.",
    )?;
    let download_pdf = params.bool_or("downloadPdf", false);
    let url = api.url(&format!("{DOCS}signer-log/{}", segment(&token)));
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Get, url).with_query("download_pdf", download_pdf.to_string()),
    ))
}

pub(super) fn place_signatures(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let token = params.required(
        "documentToken",
        "Document Token is required for placing signatures.",
    )?;
    let rubricas = map_rubrics(&params.collection("rubrics", "rubric"));
    for rubric in &rubricas {
        if let Some(kind) = rubric.get("type").and_then(Value::as_str) {
            check_option("rubric type", kind, RUBRIC_TYPES)?;
        }
    }
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, doc_url(api, &token, "place-signatures/"))
            .with_json(json!({ "rubricas": rubricas })),
    ))
}

pub(super) fn validate_signatures(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let property = request
        .parameters
        .string_or("validateBinaryPropertyName", crate::file_input::DEFAULT_BINARY_PROPERTY);
    let file = binary_property(&request.binary, &property)?;
    let data = decode_base64(&file.data, &property)?;
    debug!(property = %property, bytes = data.len(), "validating pdf signatures");
    let part = FormPart {
        name: "file".to_string(),
        file_name: Some(file.file_name.clone().unwrap_or_else(|| "document.pdf".to_string())),
        content_type: Some(file.mime_type.clone().unwrap_or_else(|| PDF_MIME.to_string())),
        data,
    };
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, api.url(VALIDATE_SIGNATURE)).with_multipart(vec![part]),
    ))
}

pub(super) fn add_extra_document(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let token = document_token(params)?;
    let name = params.required("extraDocumentName", "Extra Document Name is required.")?;
    let mut body = Map::new();
    body.insert("name".to_string(), Value::String(name));
    match params.string_or("extraDocumentFileInputType", "url").as_str() {
        "url" => {
            let url = params.required(
                "extraDocumentUrl",
                "Extra Document URL is required when the input type is URL.",
            )?;
            body.insert("url_pdf".to_string(), Value::String(url));
        }
        "base64" => {
            let content = params.required(
                "extraDocumentBase64",
                "Extra Document Base64 is required when the input type is Base64.",
            )?;
            body.insert("base64_pdf".to_string(), Value::String(content));
        }
        _ => return Err(ZapSignError::invalid("Invalid file input type selected.")),
    }
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, doc_url(api, &token, "upload-extra-doc/"))
            .with_json(Value::Object(body)),
    ))
}

pub(super) fn add_extra_document_from_template(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let token = document_token(params)?;
    let template = params.required(
        "extraDocumentTemplateToken",
        "Missing required fields for extra document creation: template_id. \
         Please ensure you have provided a template token.",
    )?;
    let mut body = Map::new();
    body.insert("template_id".to_string(), Value::String(template.clone()));
    let data = map_template_variables(&params.collection("extraDocumentTemplateData", "variable"));
    if !data.is_empty() {
        body.insert("data".to_string(), Value::Array(data));
    }
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, doc_url(api, &token, "extra-docs/"))
            .with_json(Value::Object(body)),
    )
    .with_detail("Document Token", token)
    .with_detail("Template Token", template))
}

pub(super) fn reorder_envelope(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let token = document_token(params)?;
    let order: Vec<String> = params
        .collection("documentDisplayOrder", "documentToken")
        .into_iter()
        .filter_map(|entry| Parameters::new(entry).non_empty("token"))
        .collect();
    if order.is_empty() {
        return Err(ZapSignError::invalid(
            "At least one document token is required for reordering. \
             Please add document tokens to the Document Display Order field.",
        ));
    }
    let fallback = json!({
        "success": true,
        "message": "Documents reordered successfully",
        "documentToken": token,
        "documentDisplayOrder": order,
    });
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Put, doc_url(api, &token, "document-display-order/"))
            .with_json(json!({ "document_display_order": order })),
    )
    .with_fallback(fallback))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::http::HttpMethod;
    use crate::operation::InputItem;
    use crate::params::BinaryData;
    use serde_json::json;

    fn signer(name: &str, email: &str) -> serde_json::Value {
        json!({"name": name, "email": email})
    }

    #[test]
    fn create_with_blank_email_signer_omits_email() {
        let prepared = call(
            "document",
            "create",
            json!({
                "name": "Contract",
                "fileInputType": "base64",
                "base64Content": "JVBERi0x",
                "signers": {"signer": [{"name": "Ana", "blank_email": true}]},
            }),
        );
        assert_route(&prepared, HttpMethod::Post, "/api/v1/docs/");
        let signers = body(&prepared)["signers"].as_array().unwrap();
        assert_eq!(signers.len(), 1);
        assert!(signers[0].get("email").is_none());
        assert_eq!(signers[0]["blank_email"], true);
        assert_eq!(body(&prepared)["base64_pdf"], "JVBERi0x");
    }

    #[test]
    fn create_without_signers_fails_locally() {
        let msg = fail(
            "document",
            "create",
            json!({"name": "Contract", "fileInputType": "base64", "base64Content": "JVBERi0x"}),
        );
        assert!(msg.starts_with("At least one signer is required"));

        let msg = fail(
            "document",
            "create",
            json!({"name": "Contract", "signers": {"signer": []}}),
        );
        assert!(msg.starts_with("At least one signer is required"));
    }

    #[test]
    fn signer_without_email_or_phone_is_rejected() {
        let msg = fail(
            "document",
            "create",
            json!({
                "name": "Contract",
                "fileInputType": "base64",
                "base64Content": "JVBERi0x",
                "signers": {"signer": [signer("Ana", "ana@example.com"), {"name": "Bia"}]},
            }),
        );
        assert!(msg.starts_with("Signer 2 needs an email address"));
    }

    #[test]
    fn signer_with_phone_only_is_accepted() {
        let prepared = call(
            "document",
            "create",
            json!({
                "name": "Contract",
                "fileInputType": "base64",
                "base64Content": "JVBERi0x",
                "signers": [{"name": "Bia", "phone_number": "11999998888"}],
            }),
        );
        assert_eq!(body(&prepared)["signers"][0]["phone_country"], "55");
    }

    #[test]
    fn additional_fields_merge_and_metadata_string_is_parsed() {
        let prepared = call(
            "document",
            "create",
            json!({
                "name": "Contract",
                "fileInputType": "base64",
                "base64Content": "JVBERi0x",
                "signers": [signer("Ana", "ana@example.com")],
                "additionalFields": {"lang": "en", "metadata": "{\"crm_id\":\"42\"}"},
            }),
        );
        assert_eq!(body(&prepared)["lang"], "en");
        assert_eq!(body(&prepared)["metadata"], json!({"crm_id": "42"}));
    }

    #[test]
    fn invalid_metadata_json_is_a_local_error() {
        let msg = fail(
            "document",
            "create",
            json!({
                "name": "Contract",
                "fileInputType": "base64",
                "base64Content": "JVBERi0x",
                "signers": [signer("Ana", "ana@example.com")],
                "additionalFields": {"metadata": "{broken"},
            }),
        );
        assert!(msg.starts_with("Invalid JSON in Metadata field"));
    }

    #[test]
    fn url_source_adds_probe_and_docx_key() {
        let prepared = call(
            "document",
            "create",
            json!({
                "name": "Contract",
                "fileInputType": "url",
                "fileUrl": "https://files.test/contract.docx",
                "signers": [signer("Ana", "ana@example.com")],
            }),
        );
        assert_eq!(body(&prepared)["url_docx"], "https://files.test/contract.docx");
        let probe = prepared.probe.as_ref().unwrap();
        assert_eq!(probe.method, HttpMethod::Get);
        assert_eq!(probe.url, "https://files.test/contract.docx");
    }

    #[test]
    fn binary_upload_uses_declared_mime() {
        let item = InputItem::new(
            "document",
            "create",
            json!({"name": "Contract", "signers": [signer("Ana", "ana@example.com")]}),
        )
        .with_binary(
            "data",
            BinaryData {
                data: "UEsDBA==".to_string(),
                file_name: Some("c.docx".to_string()),
                mime_type: Some(
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
                ),
            },
        );
        let prepared = prepare_item(&item).unwrap();
        assert_eq!(body(&prepared)["base64_docx"], "UEsDBA==");
        assert!(prepared.probe.is_none());
    }

    #[test]
    fn one_click_rejects_markdown_and_flags_body() {
        let msg = fail(
            "document",
            "createOneClick",
            json!({
                "name": "Consent",
                "fileInputType": "markdown",
                "markdownText": "# hi",
                "signers": [signer("Ana", "ana@example.com")],
            }),
        );
        assert!(msg.starts_with("Markdown input is not supported for OneClick"));

        let prepared = call(
            "document",
            "createOneClick",
            json!({
                "name": "Consent",
                "fileInputType": "base64",
                "base64Content": "JVBERi0x",
                "requireSignature": true,
                "signers": [{"name": "Ana", "email": "ana@example.com", "auth_mode": "tokenSms"}],
            }),
        );
        assert_eq!(body(&prepared)["one_click_active"], true);
        assert_eq!(body(&prepared)["require_signature"], true);
        assert_eq!(body(&prepared)["signers"][0]["lock_name"], false);
        assert!(body(&prepared)["signers"][0].get("auth_mode").is_none());
    }

    #[test]
    fn get_all_defaults_page_and_passes_filters() {
        let prepared = call("document", "getAll", json!({"status": "pending", "folderPath": ""}));
        assert_route(&prepared, HttpMethod::Get, "/api/v1/docs/");
        assert_eq!(
            prepared.request.query,
            vec![
                ("page".to_string(), "1".to_string()),
                ("status".to_string(), "pending".to_string()),
            ]
        );
    }

    #[test]
    fn update_sends_only_given_fields_and_rename_pair() {
        let prepared = call(
            "document",
            "update",
            json!({
                "documentToken": "d1",
                "newDocumentName": "Renamed",
                "extraDocsToRename": {"extraDocToken": "x1", "newExtraDocName": "Annex"},
            }),
        );
        assert_route(&prepared, HttpMethod::Put, "/api/v1/docs/d1/");
        assert_eq!(
            body(&prepared),
            &json!({"name": "Renamed", "extra_docs": [{"token": "x1", "name": "Annex"}]})
        );
    }

    #[test]
    fn refuse_and_cancel_share_the_endpoint() {
        for operation in ["refuse", "cancel"] {
            let prepared = call(
                "document",
                operation,
                json!({"documentToken": "d1", "rejectedReason": "wrong data"}),
            );
            assert_route(&prepared, HttpMethod::Post, "/api/v1/refuse/");
            assert_eq!(
                body(&prepared),
                &json!({"doc_token": "d1", "rejected_reason": "wrong data"})
            );
        }
    }

    #[test]
    fn blank_token_fails_before_any_request() {
        let msg = fail("document", "get", json!({"documentToken": "   "}));
        assert_eq!(msg, "Document Token is required.");
    }

    #[test]
    fn activity_history_sets_download_flag() {
        let prepared = call(
            "document",
            "getActivityHistory",
            json!({"documentToken": "d 1", "downloadPdf": true}),
        );
        assert_route(&prepared, HttpMethod::Get, "/api/v1/docs/signer-log/d%201");
        assert_eq!(
            prepared.request.full_url(),
            "https://api.test/api/v1/docs/signer-log/d%201?download_pdf=true"
        );
    }

    #[test]
    fn place_signatures_maps_rubrics() {
        let prepared = call(
            "document",
            "placeSignatures",
            json!({
                "documentToken": "d1",
                "rubrics": {"rubric": [{"signer_token": "s1", "type": "visto"}]},
            }),
        );
        assert_route(&prepared, HttpMethod::Post, "/api/v1/docs/d1/place-signatures/");
        assert_eq!(body(&prepared)["rubricas"][0]["type"], "visto");

        let msg = fail(
            "document",
            "placeSignatures",
            json!({"documentToken": "d1", "rubrics": [{"signer_token": "s1", "type": "stamp"}]}),
        );
        assert!(msg.starts_with("Invalid rubric type 'stamp'"));
    }

    #[test]
    fn validate_signatures_uploads_multipart_file() {
        let item = InputItem::new("document", "validateSignatures", json!({}))
            .with_binary(
                "data",
                BinaryData { data: "JVBERi0x".to_string(), file_name: None, mime_type: None },
            );
        let prepared = prepare_item(&item).unwrap();
        assert_route(&prepared, HttpMethod::Post, "/api/v1/validate-pdf-signature");
        assert!(is_multipart(&prepared));
        match &prepared.request.body {
            Some(crate::http::RequestBody::Multipart(parts)) => {
                assert_eq!(parts[0].name, "file");
                assert_eq!(parts[0].file_name.as_deref(), Some("document.pdf"));
                assert_eq!(parts[0].content_type.as_deref(), Some("application/pdf"));
                assert_eq!(parts[0].data, b"%PDF-1".to_vec());
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn extra_document_by_url_or_base64() {
        let prepared = call(
            "document",
            "addExtraDocument",
            json!({
                "documentToken": "d1",
                "extraDocumentName": "Annex",
                "extraDocumentUrl": "https://f.test/a.pdf",
            }),
        );
        assert_route(&prepared, HttpMethod::Post, "/api/v1/docs/d1/upload-extra-doc/");
        assert_eq!(body(&prepared), &json!({"name": "Annex", "url_pdf": "https://f.test/a.pdf"}));

        let prepared = call(
            "document",
            "addExtraDocument",
            json!({
                "documentToken": "d1",
                "extraDocumentName": "Annex",
                "extraDocumentFileInputType": "base64",
                "extraDocumentBase64": "JVBERi0x",
            }),
        );
        assert_eq!(body(&prepared)["base64_pdf"], "JVBERi0x");
    }

    #[test]
    fn extra_document_from_template_keeps_complete_variables() {
        let prepared = call(
            "document",
            "addExtraDocumentFromTemplate",
            json!({
                "documentToken": "d1",
                "extraDocumentTemplateToken": "t1",
                "extraDocumentTemplateData": {"variable": [
                    {"variableName": "NOME", "variableValue": "Ana"},
                    {"variableName": "CPF", "variableValue": ""},
                ]},
            }),
        );
        assert_route(&prepared, HttpMethod::Post, "/api/v1/docs/d1/extra-docs/");
        assert_eq!(
            body(&prepared),
            &json!({"template_id": "t1", "data": [{"de": "NOME", "para": "Ana"}]})
        );
    }

    #[test]
    fn reorder_requires_tokens_and_has_fallback() {
        let msg = fail(
            "document",
            "reorderEnvelope",
            json!({
                "documentToken": "d1",
                "documentDisplayOrder": {"documentToken": [{"token": " "}]},
            }),
        );
        assert!(msg.starts_with("At least one document token is required for reordering"));

        let prepared = call(
            "document",
            "reorderEnvelope",
            json!({
                "documentToken": "d1",
                "documentDisplayOrder": {"documentToken": [{"token": "a"}, {"token": "b"}]},
            }),
        );
        assert_route(&prepared, HttpMethod::Put, "/api/v1/docs/d1/document-display-order/");
        assert_eq!(body(&prepared), &json!({"document_display_order": ["a", "b"]}));
        assert_eq!(prepared.fallback.as_ref().unwrap()["success"], true);
    }
}
