#[cfg(test)]
#[path = "rag_test.rs"]
mod tests;

use std::path;

use serde::Deserialize;
use serde::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagListItem {
    pub rag_id: String,
    pub rag_name: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRagResponse {
    #[serde(rename = "RAG_id")]
    pub rag_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagQueryRequest {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
    pub retrieval_time: String,
    pub llm_time: String,
    pub total_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagQueryResponse {
    #[serde(default)]
    pub response: String,
    pub model_used: Option<String>,
    #[serde(rename = "RAG_name")]
    pub rag_name: Option<String>,
    pub documents_retrieved: Option<u32>,
    pub performance: Option<Performance>,
    pub uploaded_doc_included: Option<bool>,
}

/// Models the backend knows how to drive.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ModelName {
    Claude,
    OpenAI,
}

impl ModelName {
    pub fn parse(text: &str) -> Option<ModelName> {
        return ModelName::iter().find(|e| return e.to_string() == text);
    }

    pub fn label(&self) -> &'static str {
        return match self {
            ModelName::Claude => "Claude (AWS Bedrock)",
            ModelName::OpenAI => "GPT-4 (OpenAI)",
        };
    }
}

/// Form values for a new RAG instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRag {
    pub name: String,
    pub model: String,
    pub key: String,
    pub documents: Vec<path::PathBuf>,
}

impl NewRag {
    pub fn is_complete(&self) -> bool {
        return !self.name.trim().is_empty()
            && !self.model.trim().is_empty()
            && !self.key.trim().is_empty()
            && !self.documents.is_empty();
    }
}
