#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;

use crate::domain::models::ClientError;
use crate::domain::models::RagListItem;
use crate::infrastructure::api::ApiClient;

/// The list of RAG instances on screen. The list is only ever replaced
/// wholesale from `/rag/list`, never patched locally.
#[derive(Default)]
pub struct Dashboard {
    pub rags: Vec<RagListItem>,
    pub error: Option<String>,
}

impl Dashboard {
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        match api.list_rags().await {
            Ok(rags) => {
                tracing::debug!(count = rags.len(), "Loaded RAG instances");
                self.rags = rags;
                self.error = None;
                return Ok(());
            }
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        }
    }

    /// Deletes an instance, then refetches. A failed delete leaves the list
    /// untouched. Once the delete went through, a failed refetch only lands in
    /// `error`; an expired session still comes back as an error.
    pub async fn delete(&mut self, api: &ApiClient, rag_id: &str) -> Result<(), ClientError> {
        api.delete_rag(rag_id).await?;
        tracing::info!(rag_id = rag_id, "Deleted RAG instance");

        return match self.refresh(api).await {
            Err(ClientError::AuthorizationExpired) => Err(ClientError::AuthorizationExpired),
            Err(err) => {
                tracing::warn!(err = ?err, "Refetch after delete failed");
                Ok(())
            }
            Ok(()) => Ok(()),
        };
    }

    pub fn is_empty(&self) -> bool {
        return self.rags.is_empty();
    }

    pub fn find(&self, rag_id: &str) -> Option<&RagListItem> {
        return self.rags.iter().find(|rag| return rag.rag_id == rag_id);
    }
}
