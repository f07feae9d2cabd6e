// src/handlers/chat.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    models::chat::{ChatReply, ChatRequest},
};

// POST /api/chat
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "Assistant",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Resposta do assistente", body = ChatReply),
        (status = 500, description = "Falha ao consultar o modelo"),
        (status = 503, description = "Assistente não configurado")
    )
)]
pub async fn chat(
    State(app_state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let content = app_state
        .chat_service
        .reply(request.messages, request.context.as_ref())
        .await?;

    Ok(Json(ChatReply {
        role: "assistant",
        content,
    }))
}
