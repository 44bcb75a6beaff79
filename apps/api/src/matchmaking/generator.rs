//! Profile generation — builds the matchmaker prompt and runs the single
//! chat-completion call.
//!
//! The prompt restates the user's fields, pins the partner to the opposite
//! binary gender, and — once the session has history — appends a verbatim
//! avoid-list of every prior profile so the model does not repeat itself.
//! Failure handling is the caller's job: this module returns an explicit
//! `Result` and never substitutes the fallback text itself.

use serde::Deserialize;
use tracing::debug;

use crate::llm_client::{LlmClient, LlmError};
use crate::matchmaking::prompts::{
    AVOID_SECTION_FOOTER, AVOID_SECTION_HEADER, MATCH_PROMPT_TEMPLATE,
};

/// Body of `POST /api/v1/match` — one form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub whatsapp_number: String,
    pub preferences: String,
    /// Omitted on a session's first submission; the server mints one and
    /// echoes it back for the page to reuse.
    pub session_id: Option<String>,
}

/// The partner profile is the opposite binary gender of the user.
/// Anything that does not read as "male" maps to a male partner, matching
/// the female branch.
fn opposite_gender(user_gender: &str) -> &'static str {
    if user_gender.trim().eq_ignore_ascii_case("male") {
        "Female"
    } else {
        "Male"
    }
}

/// Renders the avoid-list block: every prior profile, numbered and
/// verbatim, separated by `---`. Empty when the session has no history.
fn build_avoid_section(history: &[String]) -> String {
    if history.is_empty() {
        return String::new();
    }

    let mut section = String::from(AVOID_SECTION_HEADER);
    for (i, profile) in history.iter().enumerate() {
        section.push_str(&format!("Profile {}:\n{}\n---\n", i + 1, profile));
    }
    section.push_str(AVOID_SECTION_FOOTER);
    section
}

/// Constructs the full prompt for one generation call.
pub fn build_prompt(request: &MatchRequest, history: &[String]) -> String {
    MATCH_PROMPT_TEMPLATE
        .replace("{name}", request.name.trim())
        .replace("{age}", request.age.trim())
        .replace("{gender}", request.gender.trim())
        .replace("{partner_gender}", opposite_gender(&request.gender))
        .replace("{preferences}", request.preferences.trim())
        .replace("{avoid_section}", &build_avoid_section(history))
}

/// Runs one generation call against the LLM and returns the profile text.
pub async fn generate_profile(
    llm: &LlmClient,
    request: &MatchRequest,
    history: &[String],
) -> Result<String, LlmError> {
    let prompt = build_prompt(request, history);
    debug!(
        "Generating profile for {} with {} prior profiles in the avoid-list",
        request.name,
        history.len()
    );
    llm.complete(&prompt).await
}
