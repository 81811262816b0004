//! Final-answer extraction for ReAct-style LLM responses.

/// The text prefix for a final answer.
pub const FINAL_ANSWER_ACTION: &str = "Final Answer:";

/// Extract the answer from an LLM response.
///
/// When the response follows the `Thought: ... Final Answer: ...` format the
/// text after the last `Final Answer:` marker is returned, otherwise the
/// whole response. The result is trimmed; surrounding code fences around the
/// answer are kept as the model wrote them.
pub fn extract_final_answer(text: &str) -> String {
    match text.rfind(FINAL_ANSWER_ACTION) {
        Some(idx) => text[idx + FINAL_ANSWER_ACTION.len()..].trim().to_string(),
        None => text.trim().to_string(),
    }
}
