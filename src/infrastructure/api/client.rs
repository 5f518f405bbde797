#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use std::path::Path;
use std::path::PathBuf;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::file_part;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::parse_detail;
use crate::domain::models::ClientError;
use crate::domain::models::CreateRagResponse;
use crate::domain::models::CreateUserResponse;
use crate::domain::models::Credentials;
use crate::domain::models::LoginResponse;
use crate::domain::models::NewRag;
use crate::domain::models::RagListItem;
use crate::domain::models::RagQueryRequest;
use crate::domain::models::RagQueryResponse;
use crate::domain::models::GENERIC_AUTH_FAILURE;
use crate::domain::services::Session;

pub const LIST_FAILURE: &str = "Failed to load RAG instances";
pub const CREATE_FAILURE: &str = "Failed to create RAG instance";
pub const DELETE_FAILURE: &str = "Failed to delete RAG instance";
pub const ADD_DOCS_FAILURE: &str = "Failed to add documents";
pub const QUERY_FAILURE: &str = "Failed to get response.";

/// Whether a 401 means the session is gone. The auth endpoints answer 401
/// for wrong credentials, which says nothing about the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Unauthorized {
    Expired,
    PassThrough,
}

/// Client for the RAG backend. Every request carries the session's bearer
/// token when one is held, and every 401 from an authenticated endpoint comes
/// back as `ClientError::AuthorizationExpired`. Reacting to that (dropping the
/// session, going back to login) is left to the application shell.
#[derive(Clone)]
pub struct ApiClient {
    url: String,
    session: Session,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(url: &str, session: Session) -> ApiClient {
        return ApiClient {
            url: url.trim_end_matches('/').to_string(),
            session,
            http: reqwest::Client::new(),
        };
    }

    pub fn from_config(session: Session) -> ApiClient {
        return ApiClient::new(&Config::get(ConfigKey::ApiURL), session);
    }

    pub fn session(&self) -> &Session {
        return &self.session;
    }

    fn endpoint(&self, path: &str) -> String {
        return format!("{url}{path}", url = self.url);
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.session.token() {
            if !token.is_empty() {
                return req.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        return req;
    }

    async fn dispatch(
        &self,
        req: RequestBuilder,
        fallback: &str,
        unauthorized: Unauthorized,
    ) -> Result<Response, ClientError> {
        let res = self.authorize(req).send().await.map_err(|err| {
            tracing::error!(err = ?err, "Backend is not reachable");
            return ClientError::request(None, &format!("{fallback}: {err}"));
        })?;

        let status = res.status();
        tracing::debug!(
            url = res.url().path(),
            status = status.as_u16(),
            "Backend response"
        );

        if status.is_success() {
            return Ok(res);
        }

        if status == StatusCode::UNAUTHORIZED && unauthorized == Unauthorized::Expired {
            tracing::warn!(url = res.url().path(), "Backend rejected the session token");
            return Err(ClientError::AuthorizationExpired);
        }

        let body = res.text().await.unwrap_or_default();
        let message = parse_detail(&body).unwrap_or_else(|| return fallback.to_string());
        tracing::error!(
            status = status.as_u16(),
            detail = %message,
            "Backend request failed"
        );

        return Err(ClientError::request(Some(status.as_u16()), &message));
    }

    async fn decode<T: DeserializeOwned>(res: Response, fallback: &str) -> Result<T, ClientError> {
        let status = res.status().as_u16();
        return res.json::<T>().await.map_err(|err| {
            tracing::error!(err = ?err, "Failed to decode backend response");
            return ClientError::request(Some(status), &format!("{fallback}: {err}"));
        });
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let req = self.http.post(self.endpoint("/auth/login")).json(credentials);
        let res = self
            .dispatch(req, GENERIC_AUTH_FAILURE, Unauthorized::PassThrough)
            .await?;

        return ApiClient::decode(res, GENERIC_AUTH_FAILURE).await;
    }

    pub async fn create_user(
        &self,
        credentials: &Credentials,
    ) -> Result<CreateUserResponse, ClientError> {
        let req = self
            .http
            .post(self.endpoint("/auth/create_user"))
            .json(credentials);
        let res = self
            .dispatch(req, GENERIC_AUTH_FAILURE, Unauthorized::PassThrough)
            .await?;

        return ApiClient::decode(res, GENERIC_AUTH_FAILURE).await;
    }

    pub async fn create_rag(&self, rag: &NewRag) -> Result<CreateRagResponse, ClientError> {
        let mut form = Form::new()
            .text("RAG_name", rag.name.to_string())
            .text("Model", rag.model.to_string())
            .text("key", rag.key.to_string());
        for document in rag.documents.iter() {
            form = form.part("documents", file_part(document).await?);
        }

        tracing::debug!(
            name = %rag.name,
            model = %rag.model,
            documents = rag.documents.len(),
            "Creating RAG instance"
        );

        let req = self.http.post(self.endpoint("/rag/create")).multipart(form);
        let res = self
            .dispatch(req, CREATE_FAILURE, Unauthorized::Expired)
            .await?;

        return ApiClient::decode(res, CREATE_FAILURE).await;
    }

    pub async fn list_rags(&self) -> Result<Vec<RagListItem>, ClientError> {
        let req = self.http.get(self.endpoint("/rag/list"));
        let res = self
            .dispatch(req, LIST_FAILURE, Unauthorized::Expired)
            .await?;

        return ApiClient::decode(res, LIST_FAILURE).await;
    }

    pub async fn query(&self, rag_id: &str, query: &str) -> Result<RagQueryResponse, ClientError> {
        let body = RagQueryRequest {
            query: query.to_string(),
        };
        let req = self
            .http
            .post(self.endpoint(&format!("/rag/{rag_id}/query")))
            .json(&body);
        let res = self
            .dispatch(req, QUERY_FAILURE, Unauthorized::Expired)
            .await?;

        return ApiClient::decode(res, QUERY_FAILURE).await;
    }

    pub async fn file_query(
        &self,
        rag_id: &str,
        query: &str,
        file: Option<&Path>,
    ) -> Result<RagQueryResponse, ClientError> {
        let mut form = Form::new().text("query", query.to_string());
        if let Some(path) = file {
            form = form.part("file", file_part(path).await?);
        }

        let req = self
            .http
            .post(self.endpoint(&format!("/rag/{rag_id}/file_query")))
            .multipart(form);
        let res = self
            .dispatch(req, QUERY_FAILURE, Unauthorized::Expired)
            .await?;

        return ApiClient::decode(res, QUERY_FAILURE).await;
    }

    pub async fn add_docs(&self, rag_id: &str, documents: &[PathBuf]) -> Result<(), ClientError> {
        let mut form = Form::new();
        for document in documents.iter() {
            form = form.part("new_documents", file_part(document).await?);
        }

        let req = self
            .http
            .post(self.endpoint(&format!("/rag/{rag_id}/add_docs")))
            .multipart(form);
        self.dispatch(req, ADD_DOCS_FAILURE, Unauthorized::Expired)
            .await?;

        return Ok(());
    }

    pub async fn delete_rag(&self, rag_id: &str) -> Result<(), ClientError> {
        let req = self
            .http
            .delete(self.endpoint(&format!("/rag/delete/{rag_id}")));
        self.dispatch(req, DELETE_FAILURE, Unauthorized::Expired)
            .await?;

        return Ok(());
    }
}
