// Meeting notes: text extraction from uploads, LLM extraction of summaries
// and action items, follow-up suggestions, and the rolling history.

pub mod documents;
pub mod handlers;
pub mod history;
pub mod prompts;
pub mod webhook;
