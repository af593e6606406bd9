//! Chat endpoint

use axum::{body::Bytes, extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::chat::{question_from_body, ChatResponse};

/// POST /chat - Answer a question from the indexed documents
///
/// The body is taken raw so that malformed or incomplete JSON yields the
/// chat error envelope instead of axum's extractor rejection.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatResponse>> {
    let question = question_from_body(&body)?;

    tracing::info!("Question: \"{}\"", question);

    let answer = state.chain().invoke(&question).await?;

    Ok(Json(ChatResponse::new(question, answer)))
}
