// Tweet Generation Engine
// Implements: request validation, cache lookup, prompt construction,
// parallel fan-out against the completion provider, cache write + sweep.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod cache;
pub mod handlers;
pub mod hashtags;
pub mod length;
pub mod prompts;
