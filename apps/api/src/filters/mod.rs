//! Filter engine — vocabulary tables, the natural-language extractor, and the
//! filter expression builder for the search backend.

pub mod expression;
pub mod extractor;
pub mod handlers;
pub mod vocabulary;
