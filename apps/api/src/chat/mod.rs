//! Conversational job search — orchestrates filter extraction, the filter
//! expression, and the single conversational search call.

pub mod handlers;
pub mod orchestrator;
