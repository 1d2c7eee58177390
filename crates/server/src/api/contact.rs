//! Contact and feedback form submissions.

use axum::{extract::State, response::Response, Form};
use fetchflicks_core::{MessageKind, Submission};
use serde::Deserialize;
use std::sync::Arc;

use super::flash::{redirect_with_error, redirect_with_success};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub feedback: String,
}

pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ContactForm>,
) -> Response {
    let submission = Submission::new(form.name, form.email, form.message);
    submit(&state, MessageKind::Contact, "/contact", &submission).await
}

pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Form(form): Form<FeedbackForm>,
) -> Response {
    let submission = Submission::new(form.name, form.email, form.feedback);
    submit(&state, MessageKind::Feedback, "/feedback", &submission).await
}

async fn submit(
    state: &AppState,
    kind: MessageKind,
    page: &str,
    submission: &Submission,
) -> Response {
    match state.intake().submit(kind, submission).await {
        Ok(_) => redirect_with_success(page),
        Err(e) => redirect_with_error(page, &e.user_message()),
    }
}
