// Coaching generation: prompt dispatch, per-kind normalization, the
// assessment / mentor / plan handlers, and the journey state machine.
// All LLM calls go through llm_client via the TextCompletion trait.

pub mod dispatcher;
pub mod handlers;
pub mod kinds;
pub mod prompts;
pub mod wizard;
