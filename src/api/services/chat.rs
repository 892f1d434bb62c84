//! 营销站"AI 助手"端点
//!
//! 关键词匹配的固定话术，没有真实模型。

use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::trace;
use uuid::Uuid;

use crate::api::helpers::success_response;
use crate::api::types::{ChatQuery, ChatResponse, PostChatMessage};
use crate::services::ChatService;

/// 会话开场白
pub async fn get_chat(
    _req: HttpRequest,
    query: web::Query<ChatQuery>,
    chat_service: web::Data<Arc<ChatService>>,
) -> ActixResult<impl Responder> {
    let session_id = query
        .session_id
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    trace!("Chat API: open session {}", session_id);

    Ok(success_response(ChatResponse {
        session_id,
        reply: chat_service.reply("hello").to_string(),
    }))
}

/// 发送消息，返回关键词匹配的应答
pub async fn post_message(
    _req: HttpRequest,
    body: web::Json<PostChatMessage>,
    chat_service: web::Data<Arc<ChatService>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    let session_id = body
        .session_id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    trace!("Chat API: message in session {}", session_id);

    Ok(success_response(ChatResponse {
        session_id,
        reply: chat_service.reply(&body.message).to_string(),
    }))
}
