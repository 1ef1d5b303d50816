use mockito::Matcher;
use remote_upload::{AppError, LocalFile, StagedUpload, UploadClient, UploadConfig, UploadTarget};

/// Integration tests for the HTTP upload path
/// These run the real transport against a local mock of the upload service

const PUBLIC_KEY: &str = "demopublickey";

fn client_for(server: &mockito::ServerGuard) -> UploadClient {
    let mut config = UploadConfig::new(PUBLIC_KEY).with_base_url(server.url());
    config.poll_interval_ms = 10;
    UploadClient::new(config).unwrap()
}

fn write_file(dir: &std::path::Path, name: &str, contents: &[u8]) -> LocalFile {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    LocalFile::open(path).unwrap()
}

#[tokio::test]
async fn test_single_file_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/base/")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("name=\"UPLOADCARE_PUB_KEY\"".to_string()),
            Matcher::Regex(PUBLIC_KEY.to_string()),
            Matcher::Regex("name=\"file\"; filename=\"hello.txt\"".to_string()),
            Matcher::Regex("hello world".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"file": "8f3c1a3e-0000-4000-8000-000000000001"}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "hello.txt", b"hello world");
    let client = client_for(&server);

    let uploaded = client.upload(file.into()).await.unwrap();
    assert_eq!(uploaded.ids(), vec!["8f3c1a3e-0000-4000-8000-000000000001"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_filename_is_sent_as_named() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/base/")
        .match_body(Matcher::Regex(
            "filename=\"it's_draft\\(1\\)\\.txt\"".to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"file": "uuid-draft"}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "it's_draft(1).txt", b"draft");
    let client = client_for(&server);

    let handle = client.upload_file(&file).await.unwrap();
    assert_eq!(handle.id(), "uuid-draft");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_batch_upload_one_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/base/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("file\\[0\\]".to_string()),
            Matcher::Regex("file\\[1\\]".to_string()),
            Matcher::Regex("filename=\"one.png\"".to_string()),
            Matcher::Regex("filename=\"two.png\"".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"file[1]": "uuid-two", "file[0]": "uuid-one"}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let files = vec![
        write_file(dir.path(), "one.png", b"1"),
        write_file(dir.path(), "two.png", b"2"),
    ];
    let client = client_for(&server);

    let uploaded = client.upload(files.into()).await.unwrap();
    assert_eq!(uploaded.ids(), vec!["uuid-one", "uuid-two"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_url_upload_submits_then_polls() {
    let mut server = mockito::Server::new_async().await;
    let submit = server
        .mock("POST", "/from_url/")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "source_url".to_string(),
                "https://example.com/cat.png".to_string(),
            ),
            Matcher::UrlEncoded("pub_key".to_string(), PUBLIC_KEY.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token": "tok-42"}"#)
        .expect(1)
        .create_async()
        .await;
    let status = server
        .mock("POST", "/from_url/status/")
        .match_body(Matcher::UrlEncoded("token".to_string(), "tok-42".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "success", "file_id": "uuid-cat"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let handle = client.upload_url("https://example.com/cat.png").await.unwrap();

    assert_eq!(handle.id(), "uuid-cat");
    submit.assert_async().await;
    status.assert_async().await;
}

#[tokio::test]
async fn test_url_upload_remote_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/from_url/")
        .with_status(200)
        .with_body(r#"{"token": "tok-err"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/from_url/status/")
        .with_status(200)
        .with_body(r#"{"status": "error", "error": "bad format"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    match client.upload_url("https://example.com/not-an-image").await {
        Err(AppError::RemoteJobFailed { message }) => assert_eq!(message, "bad format"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_inputs_never_reach_the_server() {
    let mut server = mockito::Server::new_async().await;
    let any_request = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&server);

    let result = client.upload("not a url".into()).await;
    assert!(matches!(result, Err(AppError::InvalidArgument(_))));

    let dir_arg = dir.path().to_string_lossy().to_string();
    let result = client.upload(UploadTarget::from_arg(&dir_arg)).await;
    assert!(matches!(result, Err(AppError::InvalidArgument(_))));

    let mixed = UploadTarget::Sequence(vec![
        UploadTarget::File(write_file(dir.path(), "a.txt", b"a")),
        UploadTarget::Text("https://example.com/b.png".to_string()),
    ]);
    let result = client.upload(mixed).await;
    assert!(matches!(result, Err(AppError::InvalidArgument(_))));

    any_request.assert_async().await;
}

#[tokio::test]
async fn test_http_error_status_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/base/")
        .with_status(503)
        .with_body("service unavailable")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let temp = write_file(dir.path(), "upload.tmp", b"data");
    let staged = StagedUpload::new(temp.path(), Some("text/plain".to_string()));
    let client = client_for(&server);

    match client.upload(staged.into()).await {
        Err(e @ AppError::Http { .. }) => {
            assert!(e.is_retryable());
            if let AppError::Http { status, body } = e {
                assert_eq!(status, 503);
                assert_eq!(body, "service unavailable");
            }
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_response_is_protocol_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/base/")
        .with_status(200)
        .with_body("<html>oops</html>")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "hello.txt", b"hello");
    let client = client_for(&server);

    let result = client.upload_file(&file).await;
    assert!(matches!(result, Err(AppError::Protocol { .. })));
}

#[test]
fn test_client_rejects_missing_public_key() {
    let result = UploadClient::new(UploadConfig::default());
    assert!(matches!(result, Err(AppError::Validation { .. })));
}
