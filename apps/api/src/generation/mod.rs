// Message generation: validation → language routing → prompt lookup → LLM.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod handlers;
pub mod pipeline;
pub mod validation;
