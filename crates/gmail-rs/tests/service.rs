use std::collections::{BTreeMap, HashMap};

use axum::Router;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use gmail_rs::{AttachmentFilter, Email, Error, GmailClient, GmailService};
use net_utils::test_utils::{MockServer, emulator_credential};
use serde_json::{Value, json};

const CSV: &str = "name,age\nada,36\nbob,\n";

/// Agile encrypted workbook, sheet "People" with 100 rows under `name,age`.
const ENCRYPTED_XLSX: &[u8] = include_bytes!("fixtures/people-encrypted.xlsx");
const ENCRYPTED_PASSWORD: &str = "hunter2";

fn xlsx_bytes() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("People").unwrap();
    sheet.write_string(0, 0, "name").unwrap();
    sheet.write_string(0, 1, "count").unwrap();
    sheet.write_string(1, 0, "ada").unwrap();
    sheet.write_number(1, 1, 3.0).unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Other").unwrap();
    sheet.write_string(0, 0, "x").unwrap();
    sheet.write_string(1, 0, "y").unwrap();

    workbook.save_to_buffer().unwrap()
}

fn part(part_id: &str, filename: &str, attachment_id: &str) -> Value {
    json!({
        "partId": part_id,
        "mimeType": "application/octet-stream",
        "filename": filename,
        "headers": [],
        "body": { "size": 10, "attachmentId": attachment_id },
    })
}

fn message(id: &str) -> Value {
    match id {
        "m1" => json!({
            "id": "m1",
            "threadId": "t1",
            "internalDate": "1700000000000",
            "payload": {
                "partId": "",
                "mimeType": "multipart/mixed",
                "filename": "",
                "headers": [{ "name": "Subject", "value": "Monthly numbers" }],
                "body": { "size": 0 },
                "parts": [
                    part("0", "report.csv", "csv"),
                    part("1", "data.xlsx", "xlsx"),
                    part("2", "empty.txt", "empty"),
                ],
            },
        }),
        "m2" => json!({ "id": "m2", "threadId": "t2", "snippet": "no payload" }),
        "m3" => json!({
            "id": "m3",
            "threadId": "t3",
            "payload": {
                "partId": "",
                "mimeType": "multipart/mixed",
                "filename": "",
                "headers": [],
                "body": { "size": 0 },
                "parts": [part("0", "locked.xlsx", "locked")],
            },
        }),
        // missing threadId
        _ => json!({ "id": id }),
    }
}

async fn list_messages(Query(query): Query<BTreeMap<String, String>>) -> Response {
    if query.get("q").map(String::as_str) != Some("from:boss") {
        return axum::Json(json!({ "resultSizeEstimate": 0 })).into_response();
    }

    let body = match query.get("pageToken").map(String::as_str) {
        None => json!({
            "messages": [{ "id": "m1", "threadId": "t1" }, { "id": "broken", "threadId": "t9" }],
            "nextPageToken": "p2",
        }),
        Some("p2") => json!({ "messages": [{ "id": "m2", "threadId": "t2" }] }),
        Some(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    axum::Json(body).into_response()
}

async fn get_message(Path(id): Path<String>) -> Response {
    axum::Json(message(&id)).into_response()
}

async fn get_thread(Path(id): Path<String>) -> Response {
    let body = match id.as_str() {
        "t1" => json!({ "id": "t1", "historyId": "9", "messages": [message("m1")] }),
        _ => json!({ "id": id }),
    };
    axum::Json(body).into_response()
}

async fn get_attachment(Path((_message_id, attachment_id)): Path<(String, String)>) -> Response {
    let data = match attachment_id.as_str() {
        "csv" => URL_SAFE.encode(CSV),
        "xlsx" => URL_SAFE.encode(xlsx_bytes()),
        "locked" => URL_SAFE.encode(ENCRYPTED_XLSX),
        "empty" => String::new(),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    axum::Json(json!({ "size": data.len(), "data": data })).into_response()
}

async fn send(axum::Json(body): axum::Json<Value>) -> Response {
    let raw = body["raw"].as_str().unwrap_or_default();
    let Ok(decoded) = URL_SAFE.decode(raw) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let decoded = String::from_utf8(decoded).unwrap();
    if !decoded.contains("To: a@x.com\r\n") || !decoded.contains("Subject: Hello\r\n") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let thread_id = body["threadId"].as_str().unwrap_or("new-thread");
    axum::Json(json!({ "id": "sent-1", "threadId": thread_id, "labelIds": ["SENT"] }))
        .into_response()
}

async fn start() -> MockServer {
    let router = Router::new()
        .route("/gmail/v1/users/me/messages", get(list_messages))
        .route("/gmail/v1/users/me/messages/send", post(send))
        .route("/gmail/v1/users/me/messages/{id}", get(get_message))
        .route(
            "/gmail/v1/users/me/messages/{id}/attachments/{attachment_id}",
            get(get_attachment),
        )
        .route("/gmail/v1/users/me/threads/{id}", get(get_thread));

    MockServer::start(router).await
}

fn client(server: &MockServer) -> GmailClient {
    GmailClient::new(emulator_credential())
        .unwrap()
        .with_endpoint(server.root())
}

#[tokio::test]
async fn test_search_follows_pages_and_skips_unparseable() {
    let server = start().await;
    let client = client(&server);
    let service = GmailService::new(&client).await.unwrap();

    let messages = service.search_messages("from:boss").await.unwrap();
    let ids = messages.iter().map(|m| m.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, ["m1", "m2"]);
    assert_eq!(messages[0].subject(), Some("Monthly numbers"));

    assert!(service.search_messages("nothing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_message_and_thread() {
    let server = start().await;
    let client = client(&server);
    let service = GmailService::new(&client).await.unwrap();

    assert!(service.get_message("m2").await.unwrap().is_some());
    assert!(service.get_message("broken").await.unwrap().is_none());

    let thread = service.get_thread("t1").await.unwrap();
    assert_eq!(thread.messages.len(), 1);
    assert_eq!(thread.messages[0].id, "m1");

    let err = service.get_thread("missing").await.unwrap_err();
    assert!(matches!(err, Error::ThreadNotFound(ref id) if id == "missing"));
}

#[tokio::test]
async fn test_download_attachments() {
    let server = start().await;
    let client = client(&server);
    let service = GmailService::new(&client).await.unwrap();

    let message = service.get_message("m1").await.unwrap().unwrap();
    let refs = GmailService::query_attachments(&message, &AttachmentFilter::default());
    assert_eq!(refs.len(), 3);

    let dir = tempfile::tempdir().unwrap();
    let rename = HashMap::from([("report.csv".to_owned(), "renamed.csv".to_owned())]);

    let written = service
        .download_attachments(&refs, dir.path(), Some(&rename))
        .await
        .unwrap();

    let root = dir.path().canonicalize().unwrap();
    // the empty attachment is skipped
    assert_eq!(written, [root.join("renamed.csv"), root.join("data.xlsx")]);
    assert_eq!(std::fs::read_to_string(&written[0]).unwrap(), CSV);
    assert!(!root.join("empty.txt").exists());
}

#[tokio::test]
async fn test_read_csv_attachment() {
    let server = start().await;
    let client = client(&server);
    let service = GmailService::new(&client).await.unwrap();

    let message = service.get_message("m1").await.unwrap().unwrap();
    let refs = GmailService::query_attachments(&message, &AttachmentFilter::extension("csv"));

    let frame = service.read_csv_attachment(&refs[0]).await.unwrap();
    assert_eq!(frame.columns(), ["name", "age"]);
    assert_eq!(frame.get(0, "age"), Some("36"));
    assert_eq!(frame.get(1, "age"), None);

    let xlsx = GmailService::query_attachments(&message, &AttachmentFilter::extension("xlsx"));
    let err = service.read_csv_attachment(&xlsx[0]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidAttachment { expected: "csv", .. }));
}

#[tokio::test]
async fn test_read_excel_attachment() {
    let server = start().await;
    let client = client(&server);
    let service = GmailService::new(&client).await.unwrap();

    let message = service.get_message("m1").await.unwrap().unwrap();
    let refs = GmailService::query_attachments(&message, &AttachmentFilter::names(&["data.xlsx"]));
    assert_eq!(refs.len(), 1);

    let frame = service
        .read_excel_attachment(&refs[0], None, None)
        .await
        .unwrap();
    assert_eq!(frame.columns(), ["name", "count"]);
    assert_eq!(frame.get(0, "name"), Some("ada"));
    assert_eq!(frame.get(0, "count"), Some("3"));

    let other = service
        .read_excel_attachment(&refs[0], None, Some("Other"))
        .await
        .unwrap();
    assert_eq!(other.get(0, "x"), Some("y"));

    let sheets = service
        .read_excel_attachment_sheets(&refs[0], None)
        .await
        .unwrap();
    assert_eq!(sheets.keys().collect::<Vec<_>>(), ["People", "Other"]);

    let err = service
        .read_excel_attachment(&refs[0], None, Some("Nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SheetNotFound(_)));
}

#[tokio::test]
async fn test_read_encrypted_excel_attachment() {
    let server = start().await;
    let client = client(&server);
    let service = GmailService::new(&client).await.unwrap();

    let message = service.get_message("m3").await.unwrap().unwrap();
    let locked = GmailService::query_attachments(&message, &AttachmentFilter::extension("xlsx"));
    assert_eq!(locked.len(), 1);

    let frame = service
        .read_excel_attachment(&locked[0], Some(ENCRYPTED_PASSWORD), None)
        .await
        .unwrap();
    assert_eq!(frame.columns(), ["name", "age"]);
    assert_eq!(frame.num_rows(), 100);
    assert_eq!(frame.get(0, "name"), Some("ada"));
    assert_eq!(frame.get(0, "age"), Some("36"));

    let sheets = service
        .read_excel_attachment_sheets(&locked[0], Some(ENCRYPTED_PASSWORD))
        .await
        .unwrap();
    assert_eq!(sheets.keys().collect::<Vec<_>>(), ["People"]);

    let err = service
        .read_excel_attachment(&locked[0], Some("not it"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decrypt(_) | Error::WrongPassword));

    // still encrypted, so not a zip
    let err = service
        .read_excel_attachment(&locked[0], None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Excel(_)));

    let plain = service.get_message("m1").await.unwrap().unwrap();
    let refs = GmailService::query_attachments(&plain, &AttachmentFilter::extension("xlsx"));
    let err = service
        .read_excel_attachment(&refs[0], Some(ENCRYPTED_PASSWORD), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decrypt(_)));
}

#[tokio::test]
async fn test_send_message() {
    let server = start().await;
    let client = client(&server);
    let service = GmailService::new(&client).await.unwrap();

    let email = Email::new("me@x.com", ["a@x.com"], "Hello", "hi");
    let sent = service.send_message(&email).await.unwrap();
    assert_eq!(sent.id, "sent-1");
    assert_eq!(sent.thread_id, "new-thread");

    let reply = email.thread_id("t1");
    let sent = service.send_message(&reply).await.unwrap();
    assert_eq!(sent.thread_id, "t1");
    assert_eq!(sent.label_ids, ["SENT"]);
}
