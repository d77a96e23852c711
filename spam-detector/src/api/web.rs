//! Web handlers - HTML form for checking emails

use askama_axum::Template;
use axum::{extract::State, response::IntoResponse, Form};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::handlers::AppState;
use crate::error::SpamError;

const SPAM_MESSAGE: &str = "Spam Detected!";
const HAM_MESSAGE: &str = "This email is NOT spam.";
const EMPTY_MESSAGE: &str = "Please enter email subject and/or body.";

#[derive(Template, Default)]
#[template(path = "index.html")]
struct IndexTemplate {
    subject: String,
    body: String,
    result: String,
    is_spam: bool,
    spam_score: String,
    indicators: Vec<String>,
    error: String,
}

#[derive(Deserialize)]
pub struct CheckForm {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    body: String,
}

// Form page (GET)
pub async fn index() -> impl IntoResponse {
    IndexTemplate::default()
}

// Form submission (POST)
pub async fn check_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CheckForm>,
) -> impl IntoResponse {
    let mut page = IndexTemplate {
        subject: form.subject.trim().to_string(),
        body: form.body.trim().to_string(),
        ..Default::default()
    };

    match state.service.check(&form.subject, &form.body) {
        Ok(verdict) => {
            info!("Form spam check: spam={} score={}", verdict.is_spam, verdict.score);
            page.result = if verdict.is_spam { SPAM_MESSAGE } else { HAM_MESSAGE }.to_string();
            page.is_spam = verdict.is_spam;
            page.spam_score = verdict.score.to_string();
            page.indicators = verdict.indicators;
        }
        Err(SpamError::InvalidInput(_)) => {
            page.result = EMPTY_MESSAGE.to_string();
        }
        Err(e) => {
            error!("Form spam check failed: {}", e);
            page.error = format!("Failed to check email: {}", e);
        }
    }

    page
}
