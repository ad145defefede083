// Prompt module
// Fixed template merging retrieved context with the user's question


use crate::corpus::Document;

/// Instructional preamble of every composed prompt
pub const PROMPT_PREAMBLE: &str = "You are a helpful travel planning expert.\n\
Use only the provided context to give accurate, personalized answers.\n\
Include group type, season, budget, days where relevant.\n\
If no relevant info, say so.";

/// Concatenate retrieved documents into a context block
///
/// Documents appear in retrieval order, separated by blank lines.
#[inline]
pub fn build_context(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fill the fixed prompt template
///
/// Context and question are inserted verbatim; no escaping or truncation.
/// If the combined prompt exceeds the model's input limit, the inference
/// service decides what happens.
#[inline]
pub fn compose(context: &str, question: &str) -> String {
    format!(
        "{}\n\nContext: {}\n\nQuestion: {}\n\nAnswer:",
        PROMPT_PREAMBLE, context, question
    )
}
