use drivewalk::{
    drive::{DriveClient, Fields, ListFiles, ListQuery, FOLDER_MIME_TYPE},
    error::{Error, RemoteError},
    ops,
    output::Printer,
    walk::{Summary, Walker},
};
use mockito::Matcher;

fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn children_of(parent: &str, fields: Fields) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("q".into(), format!("'{parent}' in parents")),
        Matcher::UrlEncoded("fields".into(), fields.as_str().into()),
    ])
}

fn client(server: &mockito::Server) -> DriveClient {
    DriveClient::with_endpoint(reqwest::Client::new(), &server.url()).unwrap()
}

#[tokio::test]
async fn list_page() {
    init();
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/drive/v3/files")
        .match_query(children_of("root", Fields::Basic))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
    "nextPageToken": "page-2",
    "files": [
        { "id": "f1", "name": "notes.txt", "parents": ["root"], "mimeType": "text/plain" },
        { "id": "d1", "name": "photos", "parents": ["root"], "mimeType": "application/vnd.google-apps.folder" }
    ]
}"#,
        )
        .create_async()
        .await;

    let page = client(&server)
        .list(&ListQuery::children("root"))
        .await
        .unwrap();

    assert_eq!(page.next_page_token.as_deref(), Some("page-2"));
    assert_eq!(page.files.len(), 2);
    assert_eq!(page.files[0].parents, ["root"]);
    assert!(page.files[1].is_folder());
    m.assert_async().await;
}

#[tokio::test]
async fn list_follows_page_token() {
    init();
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/drive/v3/files")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "'root' in parents".into()),
            Matcher::UrlEncoded("pageToken".into(), "page-2".into()),
        ]))
        .with_status(200)
        .with_body(r#"{ "files": [] }"#)
        .create_async()
        .await;

    let page = client(&server)
        .list(&ListQuery::children("root").with_page_token(Some("page-2")))
        .await
        .unwrap();

    assert!(page.files.is_empty());
    assert!(page.next_page_token.is_none());
    m.assert_async().await;
}

#[tokio::test]
async fn list_error_status() {
    init();
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/drive/v3/files")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{ "error": { "code": 404, "message": "File not found: nope." } }"#)
        .create_async()
        .await;

    let err = client(&server)
        .list(&ListQuery::children("nope"))
        .await
        .unwrap_err();

    match err {
        RemoteError::Status { status, body } => {
            assert_eq!(status, http::StatusCode::NOT_FOUND);
            assert!(body.contains("File not found"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    m.assert_async().await;
}

#[tokio::test]
async fn list_malformed_body() {
    init();
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/drive/v3/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let err = client(&server)
        .list(&ListQuery::children("root"))
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Decode(_)));
}

#[tokio::test]
async fn walk_tree() {
    init();
    let mut server = mockito::Server::new_async().await;
    let root = server
        .mock("GET", "/drive/v3/files")
        .match_query(children_of("root", Fields::Basic))
        .with_status(200)
        .with_body(format!(
            r#"{{ "files": [
                {{ "id": "x", "name": "X", "parents": ["root"], "mimeType": "{FOLDER_MIME_TYPE}" }},
                {{ "id": "z", "name": "z.txt", "parents": ["root"], "mimeType": "text/plain" }}
            ] }}"#
        ))
        .create_async()
        .await;
    let x = server
        .mock("GET", "/drive/v3/files")
        .match_query(children_of("x", Fields::Basic))
        .with_status(200)
        .with_body(r#"{ "files": [ { "id": "y", "name": "y.txt", "parents": ["x"], "mimeType": "text/plain" } ] }"#)
        .create_async()
        .await;

    let mut out = Vec::new();
    let summary = Walker::default()
        .walk(&client(&server), "root", &mut out)
        .await
        .unwrap();

    assert_eq!(summary, Summary { files: 2, folders: 1 });
    let names: Vec<_> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| l.split_whitespace().next().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["X", "y.txt", "z.txt"]);

    root.assert_async().await;
    x.assert_async().await;
}

#[tokio::test]
async fn walk_propagates_nested_failure() {
    init();
    let mut server = mockito::Server::new_async().await;
    let _root = server
        .mock("GET", "/drive/v3/files")
        .match_query(children_of("root", Fields::Basic))
        .with_status(200)
        .with_body(format!(
            r#"{{ "files": [
                {{ "id": "x", "name": "X", "mimeType": "{FOLDER_MIME_TYPE}" }},
                {{ "id": "z", "name": "z.txt", "mimeType": "text/plain" }}
            ] }}"#
        ))
        .create_async()
        .await;
    let _x = server
        .mock("GET", "/drive/v3/files")
        .match_query(children_of("x", Fields::Basic))
        .with_status(403)
        .with_body("forbidden")
        .create_async()
        .await;

    let mut out = Vec::new();
    let err = Walker::default()
        .walk(&client(&server), "root", &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Remote(RemoteError::Status { .. })));
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
}

#[tokio::test]
async fn update_matching_file() {
    init();
    let mut server = mockito::Server::new_async().await;
    let list = server
        .mock("GET", "/drive/v3/files")
        .match_query(children_of("root", Fields::All))
        .with_status(200)
        .with_body(
            r#"{ "files": [
                { "id": "a", "name": "readme.md", "mimeType": "text/markdown", "size": "10" },
                { "id": "b", "name": "daily-stamp.txt", "mimeType": "text/plain", "size": "14" }
            ] }"#,
        )
        .create_async()
        .await;
    let upload = server
        .mock("PATCH", "/upload/drive/v3/files/b")
        .match_query(Matcher::UrlEncoded("uploadType".into(), "media".into()))
        .match_header("content-type", "text/plain")
        .match_body("2026-October-7")
        .with_status(200)
        .with_body(r#"{ "kind": "drive#file", "id": "b", "name": "daily-stamp.txt", "mimeType": "text/plain" }"#)
        .create_async()
        .await;

    let today = time::Date::from_calendar_date(2026, time::Month::October, 7).unwrap();
    let mut out = Vec::new();
    let updated = ops::update(
        &client(&server),
        "root",
        "stamp",
        today,
        &Printer::default(),
        &mut out,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "daily-stamp.txt");
    assert_eq!(updated.metadata["kind"], "drive#file");
    assert_eq!(String::from_utf8(out).unwrap(), "updated file daily-stamp.txt\n");

    list.assert_async().await;
    upload.assert_async().await;
}

#[tokio::test]
async fn update_without_match_skips_upload() {
    init();
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/drive/v3/files")
        .match_query(children_of("root", Fields::All))
        .with_status(200)
        .with_body(r#"{ "files": [ { "id": "a", "name": "readme.md", "mimeType": "text/markdown" } ] }"#)
        .create_async()
        .await;
    let upload = server
        .mock("PATCH", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let today = time::Date::from_calendar_date(2026, time::Month::October, 7).unwrap();
    let mut out = Vec::new();
    let updated = ops::update(
        &client(&server),
        "root",
        "stamp",
        today,
        &Printer::default(),
        &mut out,
    )
    .await
    .unwrap();

    assert!(updated.is_none());
    upload.assert_async().await;
}
