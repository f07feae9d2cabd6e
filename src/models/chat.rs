// src/models/chat.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    #[schema(example = "user")]
    pub role: String,
    #[schema(example = "What is the total valuation of the portfolio?")]
    pub content: String,
}

// Página de onde o chat foi aberto: decide o contexto do prompt
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    #[schema(example = "dashboard")]
    pub page: Option<String>,
    pub asset_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub context: Option<ChatContext>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatReply {
    #[schema(example = "assistant")]
    pub role: &'static str,
    pub content: String,
}
