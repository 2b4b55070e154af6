// Shared prompt constants.
// Each service that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt sent with every gateway call.
pub const INTERVIEWER_SYSTEM: &str = "You are a professional technical interviewer. \
    Follow the requested output format exactly. \
    Do NOT add greetings, apologies, or commentary outside the requested content.";
