//! Prompt assembly for the answer-generation step.
//!
//! The generating model itself lives outside this crate; callers pass the
//! returned string to whichever LLM client they use.

use crate::vector_db::RetrievalResult;

pub const NO_CONTEXT_MESSAGE: &str =
    "No relevant information was found in the available documents.";

/// Renders retrieved chunks as labelled context blocks.
pub fn format_context(results: &[RetrievalResult]) -> String {
    if results.is_empty() {
        return NO_CONTEXT_MESSAGE.to_string();
    }
    results
        .iter()
        .map(|r| format!("Document: {}\nContent: {}", r.source, r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Builds the full generation prompt for `query`.
pub fn build_prompt(query: &str, results: &[RetrievalResult]) -> String {
    let context = format_context(results);
    format!(
        "You are a helpful AI assistant that answers questions based on the provided context.\n\
         Here is some context information to help you answer the user's question:\n\
         \n\
         {context}\n\
         \n\
         User Question: {query}\n\
         \n\
         Please provide a concise and accurate answer based on the information in the context.\n\
         If the context doesn't contain relevant information to answer the question, \
         acknowledge that and provide a general response without making up information.\n\
         Keep your response conversational and suitable for voice output:\n\
         1. Keep sentences short and clear\n\
         2. Avoid long lists or tables\n\
         3. Use simple language\n\
         4. Don't include URLs, code blocks, or special formatting\n",
        query = query.trim(),
    )
}
