use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use drive_rs::{DriveClient, DriveService, FOLDER_MIME};
use net_utils::test_utils::{MockServer, emulator_credential};
use serde_json::{Value, json};

const PAGE_SIZE: usize = 2;

#[derive(Debug, Clone)]
struct StoredFile {
    name: String,
    mime_type: String,
    parent: Option<String>,
    data: Bytes,
}

#[derive(Debug, Default)]
struct Drive {
    next_id: usize,
    files: BTreeMap<String, StoredFile>,
}

impl Drive {
    fn insert(&mut self, file: StoredFile) -> String {
        self.next_id += 1;
        let id = format!("id-{:03}", self.next_id);
        self.files.insert(id.clone(), file);
        id
    }

    fn children(&self, parent: &str) -> Vec<(&String, &StoredFile)> {
        self.files
            .iter()
            .filter(|(_, file)| file.parent.as_deref() == Some(parent))
            .collect()
    }
}

type Shared = Arc<Mutex<Drive>>;

fn file_json(id: &str, file: &StoredFile) -> Value {
    json!({
        "id": id,
        "name": file.name,
        "mimeType": file.mime_type,
        "parents": file.parent.iter().collect::<Vec<_>>(),
    })
}

fn metadata_file(metadata: &Value, mime_type: &str, data: Bytes) -> StoredFile {
    StoredFile {
        name: metadata["name"].as_str().unwrap().to_owned(),
        mime_type: metadata["mimeType"]
            .as_str()
            .unwrap_or(mime_type)
            .to_owned(),
        parent: metadata["parents"][0].as_str().map(String::from),
        data,
    }
}

/// Splits a two part `multipart/related` body into its metadata and media.
fn parse_multipart(headers: &HeaderMap, body: &[u8]) -> (Value, String, Bytes) {
    let content_type = headers["content-type"].to_str().unwrap();
    let boundary = content_type.split("boundary=").nth(1).unwrap();
    let delimiter = format!("--{boundary}\r\n");

    let body = String::from_utf8(body.to_vec()).unwrap();
    let parts = body
        .split(&delimiter)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    assert_eq!(parts.len(), 2);

    let (_, json) = parts[0].split_once("\r\n\r\n").unwrap();
    let metadata: Value = serde_json::from_str(json.trim_end()).unwrap();

    let (media_headers, media) = parts[1].split_once("\r\n\r\n").unwrap();
    let media_type = media_headers.trim_start_matches("Content-Type: ").to_owned();
    let media = media
        .strip_suffix(&format!("\r\n--{boundary}--\r\n"))
        .unwrap();

    (metadata, media_type, Bytes::from(media.to_owned()))
}

async fn upload(
    State(drive): State<Shared>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    assert_eq!(query["uploadType"], "multipart");
    let (metadata, media_type, data) = parse_multipart(&headers, &body);

    let id = drive
        .lock()
        .unwrap()
        .insert(metadata_file(&metadata, &media_type, data));
    axum::Json(json!({ "id": id })).into_response()
}

async fn create(State(drive): State<Shared>, axum::Json(metadata): axum::Json<Value>) -> Response {
    let file = metadata_file(&metadata, "application/octet-stream", Bytes::new());
    let id = drive.lock().unwrap().insert(file);
    axum::Json(json!({ "id": id })).into_response()
}

async fn list(
    State(drive): State<Shared>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let q = &query["q"];
    let parent = q
        .strip_prefix('\'')
        .and_then(|rest| rest.split_once("' in parents and trashed=false"))
        .map(|(parent, _)| parent)
        .unwrap();
    let name = q
        .split_once(" and name='")
        .map(|(_, name)| name.trim_end_matches('\''));

    let start: usize = query
        .get("pageToken")
        .map(|token| token.parse().unwrap())
        .unwrap_or(0);

    let drive = drive.lock().unwrap();
    let matching = drive
        .children(parent)
        .into_iter()
        .filter(|(_, file)| name.is_none_or(|name| file.name == name))
        .collect::<Vec<_>>();

    let files = matching
        .iter()
        .skip(start)
        .take(PAGE_SIZE)
        .map(|(id, file)| file_json(id, file))
        .collect::<Vec<_>>();

    let mut body = json!({ "files": files });
    if start + PAGE_SIZE < matching.len() {
        body["nextPageToken"] = json!((start + PAGE_SIZE).to_string());
    }
    axum::Json(body).into_response()
}

async fn get_file(
    State(drive): State<Shared>,
    Path(id): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let drive = drive.lock().unwrap();
    let Some(file) = drive.files.get(&id) else {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": { "code": 404, "message": "File not found" } })),
        )
            .into_response();
    };

    if query.get("alt").map(String::as_str) == Some("media") {
        file.data.clone().into_response()
    } else {
        axum::Json(file_json(&id, file)).into_response()
    }
}

async fn start() -> (MockServer, Shared) {
    let drive = Shared::default();

    let router = Router::new()
        .route("/upload/drive/v3/files", post(upload))
        .route("/drive/v3/files", get(list).post(create))
        .route("/drive/v3/files/{id}", get(get_file))
        .with_state(drive.clone());

    (MockServer::start(router).await, drive)
}

fn client(server: &MockServer) -> DriveClient {
    DriveClient::new(emulator_credential())
        .unwrap()
        .with_endpoint(server.root())
}

fn local_tree(root: &std::path::Path) -> std::path::PathBuf {
    let top = root.join("project");
    std::fs::create_dir_all(top.join("data/raw")).unwrap();
    std::fs::write(top.join("README.md"), "# readme").unwrap();
    std::fs::write(top.join("data/a.csv"), "a\n1\n").unwrap();
    std::fs::write(top.join("data/b.csv"), "b\n2\n").unwrap();
    std::fs::write(top.join("data/raw/c.json"), "{}").unwrap();
    top
}

#[tokio::test]
async fn test_upload_file() {
    let (server, drive) = start().await;
    let client = client(&server);
    let service = DriveService::new(&client).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello drive").unwrap();

    let id = service.upload_file(&path, Some("parent"), None).await.unwrap();
    let renamed = service
        .upload_file(&path, None, Some("other.txt"))
        .await
        .unwrap();

    let drive = drive.lock().unwrap();
    let file = &drive.files[&id];
    assert_eq!(file.name, "notes.txt");
    assert_eq!(file.mime_type, "text/plain");
    assert_eq!(file.parent.as_deref(), Some("parent"));
    assert_eq!(&file.data[..], b"hello drive");

    let file = &drive.files[&renamed];
    assert_eq!(file.name, "other.txt");
    assert_eq!(file.parent, None);
}

#[tokio::test]
async fn test_upload_folder_and_list() {
    let (server, _drive) = start().await;
    let client = client(&server);
    let service = DriveService::new(&client).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let top = local_tree(dir.path());

    let root_id = service.upload_folder(&top, Some("root")).await.unwrap();

    let root = service.get_object(&root_id).await.unwrap();
    assert_eq!(root.name, "project");
    assert!(root.is_folder());
    assert_eq!(root.parents, ["root"]);

    assert_eq!(
        service.list_file_names(&root_id).await.unwrap(),
        ["README.md"]
    );
    assert_eq!(service.list_folder_names(&root_id).await.unwrap(), ["data"]);

    let data = service
        .list_objects(Some(&root_id), Some("data"))
        .await
        .unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].mime_type, FOLDER_MIME);

    // three children, so two pages
    let mut names = service.list_objects(Some(&data[0].id), None).await.unwrap()
        .into_iter()
        .map(|file| file.name)
        .collect::<Vec<_>>();
    names.sort();
    assert_eq!(names, ["a.csv", "b.csv", "raw"]);
}

#[tokio::test]
async fn test_download_file_disambiguates_once() {
    let (server, _drive) = start().await;
    let client = client(&server);
    let service = DriveService::new(&client).await.unwrap();

    let src = tempfile::tempdir().unwrap();
    let path = src.path().join("report.csv");
    std::fs::write(&path, "x,y\n").unwrap();
    let id = service.upload_file(&path, None, None).await.unwrap();

    let out = tempfile::tempdir().unwrap();
    let first = service.download_file(&id, out.path()).await.unwrap();
    let second = service.download_file(&id, out.path()).await.unwrap();
    let third = service.download_file(&id, out.path()).await.unwrap();

    assert_eq!(first, out.path().join("report.csv"));
    assert_eq!(second, out.path().join("report (1).csv"));
    assert_eq!(third, second);
    assert_eq!(std::fs::read_to_string(&second).unwrap(), "x,y\n");
}

#[tokio::test]
async fn test_download_folder_round_trip() {
    let (server, _drive) = start().await;
    let client = client(&server);
    let service = DriveService::new(&client).await.unwrap();

    let src = tempfile::tempdir().unwrap();
    let top = local_tree(src.path());
    let root_id = service.upload_folder(&top, None).await.unwrap();

    let out = tempfile::tempdir().unwrap();
    std::fs::create_dir(out.path().join("project")).unwrap();

    let local = service.download_folder(&root_id, out.path()).await.unwrap();
    assert_eq!(local, out.path().join("project (1)"));

    let read = |rel: &str| std::fs::read_to_string(local.join(rel)).unwrap();
    assert_eq!(read("README.md"), "# readme");
    assert_eq!(read("data/a.csv"), "a\n1\n");
    assert_eq!(read("data/b.csv"), "b\n2\n");
    assert_eq!(read("data/raw/c.json"), "{}");
}

#[tokio::test]
async fn test_missing_object() {
    let (server, _drive) = start().await;
    let client = client(&server);
    let service = DriveService::new(&client).await.unwrap();

    let err = service.get_object("nope").await.unwrap_err();
    assert!(err.is_not_found());
}
