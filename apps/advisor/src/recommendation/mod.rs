// Recommendation: the per-submission pipeline and its presentation.
// All model calls go through llm_client::TextGenerator.

pub mod grounding;
pub mod handlers;
pub mod html;
pub mod pipeline;
