extern crate tempdir;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use mockito::Matcher;
use tempdir::TempDir;
use test_utils::login_response_body;
use test_utils::rag_list_body;

use super::ApiClient;
use super::DELETE_FAILURE;
use super::LIST_FAILURE;
use crate::domain::models::ClientError;
use crate::domain::models::Credentials;
use crate::domain::models::NewRag;
use crate::domain::models::RagListItem;
use crate::domain::services::Session;
use crate::infrastructure::storage::MemoryTokenStore;

fn logged_in(url: &str) -> ApiClient {
    let session = Session::init(Arc::new(MemoryTokenStore::with_token("tok123")));
    return ApiClient::new(url, session);
}

fn logged_out(url: &str) -> ApiClient {
    let session = Session::init(Arc::new(MemoryTokenStore::default()));
    return ApiClient::new(url, session);
}

fn write_doc(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf> {
    let file_path = dir.path().join(name);
    std::fs::write(&file_path, contents)?;
    return Ok(file_path);
}

#[tokio::test]
async fn it_logs_in() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/login")
        .match_header("content-type", "application/json")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(serde_json::json!({
            "username": "alice",
            "password": "secret"
        })))
        .with_status(200)
        .with_body(login_response_body("tok123"))
        .create_async()
        .await;

    let client = logged_out(&server.url());
    let res = client.login(&Credentials::new("alice", "secret")).await?;

    assert_eq!(res.access_token, "tok123");
    assert_eq!(res.token_type, "bearer");
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_passes_through_login_rejections() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body(r#"{"detail": "invalid credentials"}"#)
        .create_async()
        .await;

    let client = logged_out(&server.url());
    let res = client.login(&Credentials::new("alice", "wrong")).await;

    assert_eq!(
        res.unwrap_err(),
        ClientError::request(Some(401), "invalid credentials")
    );
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_creates_users() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/create_user")
        .with_status(200)
        .with_body(r#"{"Action": "User created", "user_id": "u-1"}"#)
        .create_async()
        .await;

    let client = logged_out(&server.url());
    let res = client.create_user(&Credentials::new("bob", "pw1")).await?;

    assert_eq!(res.action, "User created");
    assert_eq!(res.user_id, "u-1");
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_attaches_bearer_token() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rag/list")
        .match_header("authorization", "Bearer tok123")
        .with_status(200)
        .with_body(rag_list_body())
        .create_async()
        .await;

    let client = logged_in(&server.url());
    let res = client.list_rags().await?;

    assert_eq!(
        res[0],
        RagListItem {
            rag_id: "r-1".to_string(),
            rag_name: "papers".to_string(),
            model: "claude".to_string(),
        }
    );
    assert_eq!(res.len(), 2);
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_omits_header_without_token() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rag/list")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = logged_out(&server.url());
    let res = client.list_rags().await?;

    assert!(res.is_empty());
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_trims_trailing_slash_from_url() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rag/list")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = logged_in(&format!("{}/", server.url()));
    client.list_rags().await?;

    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_reports_expired_authorization_on_every_endpoint() -> Result<()> {
    let tmp_dir = TempDir::new("ragdesk")?;
    let doc = write_doc(&tmp_dir, "notes.txt", "hello")?;

    let body = r#"{"detail": "Invalid or expired token. Check server logs for details."}"#;
    let mut server = mockito::Server::new_async().await;
    let post_mock = server
        .mock("POST", Matcher::Any)
        .with_status(401)
        .with_body(body)
        .expect(4)
        .create_async()
        .await;
    let get_mock = server
        .mock("GET", "/rag/list")
        .with_status(401)
        .with_body(body)
        .create_async()
        .await;
    let delete_mock = server
        .mock("DELETE", "/rag/delete/r-1")
        .with_status(401)
        .with_body(body)
        .create_async()
        .await;

    let client = logged_in(&server.url());
    let rag = NewRag {
        name: "papers".to_string(),
        model: "claude".to_string(),
        key: "sk-1".to_string(),
        documents: vec![doc.clone()],
    };

    let errors = vec![
        client.create_rag(&rag).await.unwrap_err(),
        client.list_rags().await.unwrap_err(),
        client.query("r-1", "hi").await.unwrap_err(),
        client
            .file_query("r-1", "hi", Some(doc.as_path()))
            .await
            .unwrap_err(),
        client.add_docs("r-1", &[doc.clone()]).await.unwrap_err(),
        client.delete_rag("r-1").await.unwrap_err(),
    ];

    for err in errors {
        assert_eq!(err, ClientError::AuthorizationExpired);
    }
    post_mock.assert_async().await;
    get_mock.assert_async().await;
    delete_mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_uses_backend_detail_on_errors() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/rag/delete/r-9")
        .with_status(404)
        .with_body(r#"{"detail": "RAG not found or does not belong to user"}"#)
        .create_async()
        .await;

    let client = logged_in(&server.url());
    let res = client.delete_rag("r-9").await;

    assert_eq!(
        res.unwrap_err(),
        ClientError::request(Some(404), "RAG not found or does not belong to user")
    );
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_falls_back_without_detail() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let list_mock = server
        .mock("GET", "/rag/list")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;
    let delete_mock = server
        .mock("DELETE", "/rag/delete/r-1")
        .with_status(500)
        .create_async()
        .await;

    let client = logged_in(&server.url());

    let err = client.list_rags().await.unwrap_err();
    assert_eq!(err, ClientError::request(Some(500), LIST_FAILURE));

    let err = client.delete_rag("r-1").await.unwrap_err();
    assert_eq!(err, ClientError::request(Some(500), DELETE_FAILURE));

    list_mock.assert_async().await;
    delete_mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_reports_unreachable_backend() {
    let client = logged_in("http://127.0.0.1:1");
    let err = client.list_rags().await.unwrap_err();

    assert_eq!(err.status(), None);
    assert!(err.to_string().starts_with(LIST_FAILURE));
}

#[tokio::test]
async fn it_creates_rag_with_multipart_form() -> Result<()> {
    let tmp_dir = TempDir::new("ragdesk")?;
    let first = write_doc(&tmp_dir, "first.txt", "alpha")?;
    let second = write_doc(&tmp_dir, "second.txt", "beta")?;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rag/create")
        .match_header("authorization", "Bearer tok123")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="RAG_name"\r\n\r\npapers"#.to_string()),
            Matcher::Regex(r#"name="Model"\r\n\r\nclaude"#.to_string()),
            Matcher::Regex(r#"name="key"\r\n\r\nsk-1"#.to_string()),
            Matcher::Regex(r#"name="documents"; filename="first.txt""#.to_string()),
            Matcher::Regex(r#"name="documents"; filename="second.txt""#.to_string()),
            Matcher::Regex("alpha".to_string()),
            Matcher::Regex("beta".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"RAG_id": "r-3"}"#)
        .create_async()
        .await;

    let client = logged_in(&server.url());
    let res = client
        .create_rag(&NewRag {
            name: "papers".to_string(),
            model: "claude".to_string(),
            key: "sk-1".to_string(),
            documents: vec![first, second],
        })
        .await?;

    assert_eq!(res.rag_id, "r-3");
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_does_not_send_create_when_a_document_is_unreadable() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rag/create")
        .expect(0)
        .create_async()
        .await;

    let client = logged_in(&server.url());
    let res = client
        .create_rag(&NewRag {
            name: "papers".to_string(),
            model: "claude".to_string(),
            key: "sk-1".to_string(),
            documents: vec![PathBuf::from("/definitely/not/here.pdf")],
        })
        .await;

    assert!(res.is_err());
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_queries() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rag/r-1/query")
        .match_header("authorization", "Bearer tok123")
        .match_body(Matcher::Json(serde_json::json!({"query": "What is RAG?"})))
        .with_status(200)
        .with_body(r#"{"response": "Retrieval augmented generation.", "model_used": "claude", "documents_retrieved": 2}"#)
        .create_async()
        .await;

    let client = logged_in(&server.url());
    let res = client.query("r-1", "What is RAG?").await?;

    assert_eq!(res.response, "Retrieval augmented generation.");
    assert_eq!(res.model_used, Some("claude".to_string()));
    assert_eq!(res.documents_retrieved, Some(2));
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_queries_with_file() -> Result<()> {
    let tmp_dir = TempDir::new("ragdesk")?;
    let doc = write_doc(&tmp_dir, "extra.txt", "ad-hoc context")?;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rag/r-1/file_query")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="query"\r\n\r\nsummarize"#.to_string()),
            Matcher::Regex(r#"name="file"; filename="extra.txt""#.to_string()),
            Matcher::Regex("Content-Type: text/plain".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"response": "Summary", "uploaded_doc_included": true}"#)
        .create_async()
        .await;

    let client = logged_in(&server.url());
    let res = client
        .file_query("r-1", "summarize", Some(doc.as_path()))
        .await?;

    assert_eq!(res.response, "Summary");
    assert_eq!(res.uploaded_doc_included, Some(true));
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_queries_file_endpoint_without_file() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rag/r-1/file_query")
        .match_body(Matcher::Regex(r#"name="query"\r\n\r\nsummarize"#.to_string()))
        .with_status(200)
        .with_body(r#"{"response": "Summary"}"#)
        .create_async()
        .await;

    let client = logged_in(&server.url());
    let res = client.file_query("r-1", "summarize", None).await?;

    assert_eq!(res.response, "Summary");
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_adds_documents() -> Result<()> {
    let tmp_dir = TempDir::new("ragdesk")?;
    let doc = write_doc(&tmp_dir, "more.txt", "more")?;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rag/r-1/add_docs")
        .match_header("authorization", "Bearer tok123")
        .match_body(Matcher::Regex(
            r#"name="new_documents"; filename="more.txt""#.to_string(),
        ))
        .with_status(200)
        .create_async()
        .await;

    let client = logged_in(&server.url());
    client.add_docs("r-1", &[doc]).await?;

    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_deletes_rag() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/rag/delete/r-1")
        .match_header("authorization", "Bearer tok123")
        .with_status(204)
        .create_async()
        .await;

    let client = logged_in(&server.url());
    client.delete_rag("r-1").await?;

    mock.assert_async().await;
    return Ok(());
}
