//! End-to-end runs against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port and drives the client over real
//! HTTP through `UreqTransport`, so request shapes, bearer auth and error
//! classification are checked against an actual server rather than
//! hand-written responses.

use serde_json::{json, Value};
use zapsign_core::{
    execute_batch, BinaryData, ClientConfig, Credentials, Environment, ExecutionOptions, InputItem,
    UreqTransport, ZapSignClient, ZapSignError,
};

/// Start the mock server on a random port and return its base URL.
fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
    });

    format!("http://{addr}")
}

fn setup(token: &str) -> (ZapSignClient, UreqTransport) {
    let base_url = start_mock_server();
    let config = ClientConfig::new(Environment::Sandbox)
        .with_base_url(&base_url)
        .unwrap();
    let transport = UreqTransport::new(&config, Credentials::new(token, Environment::Sandbox));
    (ZapSignClient::new(config), transport)
}

fn create_item(name: &str) -> InputItem {
    InputItem::new(
        "document",
        "create",
        json!({
            "name": name,
            "fileInputType": "base64",
            "base64Content": "JVBERi0xLjQ=",
            "signers": {"signer": [{"name": "Ana", "email": "ana@example.com"}]},
        }),
    )
}

fn token_of(record: &Value) -> String {
    record["token"].as_str().unwrap().to_string()
}

#[test]
fn document_lifecycle() {
    let (client, transport) = setup(mock_server::API_TOKEN);

    let created = client.execute(&transport, &create_item("Contract")).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["name"], "Contract");
    assert_eq!(created[0]["status"], "pending");
    let doc = token_of(&created[0]);
    let first_signer = token_of(&created[0]["signers"][0]);

    let fetched = client
        .execute(&transport, &InputItem::new("document", "get", json!({"documentToken": doc})))
        .unwrap();
    assert_eq!(fetched[0]["token"], doc.as_str());

    let added = client
        .execute(
            &transport,
            &InputItem::new(
                "signer",
                "add",
                json!({
                    "signerDocumentToken": doc,
                    "signerName": "Bia",
                    "signerEmail": "bia@example.com",
                }),
            ),
        )
        .unwrap();
    let signer = token_of(&added[0]);
    let fetched = client
        .execute(&transport, &InputItem::new("signer", "get", json!({"signerToken": signer})))
        .unwrap();
    assert_eq!(fetched[0]["name"], "Bia");

    let err = client
        .execute(
            &transport,
            &InputItem::new("signer", "resetAttempts", json!({"signerToken": first_signer})),
        )
        .unwrap_err();
    assert!(err.to_string().contains("exhausted all validation attempts"));

    let listed = client
        .execute(&transport, &InputItem::new("document", "getAll", json!({})))
        .unwrap();
    assert_eq!(listed[0]["count"], 1);

    let deleted = client
        .execute(&transport, &InputItem::new("document", "delete", json!({"documentToken": doc})))
        .unwrap();
    assert_eq!(deleted, vec![json!({"raw": ""})]);

    let err = client
        .execute(&transport, &InputItem::new("document", "get", json!({"documentToken": doc})))
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Not Found: Not found.");
}

#[test]
fn refusing_a_signed_document_is_forbidden() {
    let (client, transport) = setup(mock_server::API_TOKEN);
    let created = client.execute(&transport, &create_item("Signed")).unwrap();
    let doc = token_of(&created[0]);

    // The mock's test hook is not a client operation; send it directly.
    let hook = zapsign_core::HttpRequest::new(
        zapsign_core::HttpMethod::Post,
        format!("{}/mock/docs/{doc}/sign", client.base_url()),
    );
    let response = zapsign_core::Transport::send(&transport, &hook).unwrap();
    assert_eq!(response.status, 200);

    let err = client
        .execute(
            &transport,
            &InputItem::new(
                "document",
                "refuse",
                json!({"documentToken": doc, "rejectedReason": "late"}),
            ),
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Forbidden: this document has already been signed and can no longer be changed or refused."
    );
}

#[test]
fn batch_continues_past_failures() {
    let (client, transport) = setup(mock_server::API_TOKEN);
    let items = vec![
        create_item("First"),
        InputItem::new("document", "create", json!({"name": "No signers", "signers": []})),
        InputItem::new("document", "get", json!({"documentToken": "missing"})),
        InputItem::new(
            "webhook",
            "create",
            json!({"webhookUrl": "https://hooks.test/z", "events": "doc_signed"}),
        ),
        InputItem::new("document", "validateSignatures", json!({})).with_binary(
            "data",
            BinaryData {
                data: "JVBERi0xLjQ=".to_string(),
                file_name: Some("signed.pdf".to_string()),
                mime_type: None,
            },
        ),
    ];

    let records = execute_batch(&client, &transport, &items, ExecutionOptions::continue_on_fail())
        .unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(records[0]["name"], "First");
    assert_eq!(
        records[1],
        json!({"error": "At least one signer is required. Add one or more signers.", "json": {}})
    );
    assert_eq!(records[2]["error"], "Not Found: Not found.");
    assert_eq!(records[3], json!({"id": 1, "url": "https://hooks.test/z", "type": "doc_signed"}));
    assert_eq!(records[4]["valid"], true);

    let deleted = client
        .execute(&transport, &InputItem::new("webhook", "delete", json!({"webhookId": 1})))
        .unwrap();
    assert_eq!(deleted[0]["message"], "Webhook deleted");
}

#[test]
fn batch_aborts_on_first_failure() {
    let (client, transport) = setup(mock_server::API_TOKEN);
    let items = vec![
        InputItem::new("document", "get", json!({"documentToken": "missing"})),
        create_item("Never sent"),
    ];
    let err = execute_batch(&client, &transport, &items, ExecutionOptions::default()).unwrap_err();
    assert_eq!(err.item_index, 0);
    assert!(matches!(err.source, ZapSignError::Api { .. }));
}

#[test]
fn wrong_token_is_unauthorized() {
    let (client, transport) = setup("not-the-token");
    let err = client
        .execute(&transport, &InputItem::new("document", "getAll", json!({})))
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Unauthorized: Invalid token.");
}
