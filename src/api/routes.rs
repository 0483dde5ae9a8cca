use actix_web::{delete, get, post, web, HttpResponse};
use chrono::Utc;

use crate::api::error::ApiError;
use crate::api::models::{
    ClientIdResponse, CompletionResponse, ConversationResponse, DeleteResponse, HealthResponse,
    MessageResponse, SuccessResponse,
};
use crate::config::AppConfig;
use crate::services::{CompletionRequest, CompletionService, ConversationService, UserService};
use crate::validation::{ConversationDraft, UserDraft};

type ApiResult = Result<HttpResponse, ApiError>;

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        message: "Convokeep API is running",
        timestamp: Utc::now(),
    })
}

// --- Config ---

#[get("/config/google-client-id")]
pub async fn google_client_id(config: web::Data<AppConfig>) -> ApiResult {
    let client_id = config.google.client_id.trim();
    if client_id.is_empty() {
        return Err(ApiError::NotConfigured("Google client ID"));
    }

    Ok(HttpResponse::Ok().json(ClientIdResponse {
        success: true,
        client_id: client_id.to_string(),
    }))
}

// --- Completions ---

#[post("/groq/chat")]
pub async fn groq_chat(
    completions: web::Data<CompletionService>,
    req: web::Json<CompletionRequest>,
) -> ApiResult {
    let content = completions.complete(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CompletionResponse {
        success: true,
        content,
    }))
}

// --- Conversations ---

#[post("/conversations")]
pub async fn save_conversation(
    conversations: web::Data<ConversationService>,
    req: web::Json<ConversationDraft>,
) -> ApiResult {
    conversations.save(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Conversation saved",
    }))
}

#[get("/conversations/{session_id}")]
pub async fn load_conversation(
    conversations: web::Data<ConversationService>,
    session_id: web::Path<String>,
) -> ApiResult {
    let messages = conversations.load(&session_id).await?;
    Ok(HttpResponse::Ok().json(ConversationResponse {
        success: true,
        messages,
    }))
}

#[delete("/conversations/{session_id}")]
pub async fn delete_conversation(
    conversations: web::Data<ConversationService>,
    session_id: web::Path<String>,
) -> ApiResult {
    let deleted = conversations.remove(&session_id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        message: "Conversation deleted",
        deleted,
    }))
}

// --- Users ---

#[post("/users")]
pub async fn save_user(users: web::Data<UserService>, req: web::Json<UserDraft>) -> ApiResult {
    users.save(req.user.as_ref()).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

pub async fn not_found() -> ApiResult {
    Err(ApiError::NotFound)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(
        web::scope("/api")
            .service(google_client_id)
            .service(groq_chat)
            .service(save_conversation)
            .service(load_conversation)
            .service(delete_conversation)
            .service(save_user),
    );
}
