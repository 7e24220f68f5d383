//! Prompt assembly for chat answers and patient summaries.

use crate::context::NO_CONTEXT_SENTINEL;
use crate::intent::FormatHint;
use crate::message::ChatMessage;

/// Greeting returned by [`crate::engine::RagEngine::intro_message`].
pub(crate) const INTRO_MESSAGE: &str = "Hello, Doctor. What would you like to know today?";

const SYSTEM_PROMPT: &str = "\
You are a clinical assistant answering questions for a treating physician.
Ground every statement in the patient data supplied in this conversation.
If the data does not contain the answer, say so plainly instead of guessing.
Do not offer diagnoses or treatment recommendations.
Attach dates to clinical values whenever the source data provides them.";

const SUMMARY_INSTRUCTIONS: &str = "\
Write a concise status summary of this patient from the supplied context.
Lead with the single most clinically significant finding, then cover recent \
results, active problems, and any notable changes over time. Only use facts \
present in the context.

Respond in exactly this format:
HEADLINE: Overall Status: <one short line>
BULLETS:
- <finding with date>
- <finding with date>";

/// Answer-formatting instructions keyed on the presentation hint.
fn format_instructions(hint: FormatHint) -> &'static str {
    match hint {
        FormatHint::Table => {
            "Present the results as a markdown table with one row per dated \
             value and columns for date, measurement, and value."
        }
        FormatHint::Bullets => {
            "Present the answer as short bullet points, one fact per bullet, \
             each with its date."
        }
        FormatHint::Sentence => {
            "Answer in one or two plain sentences without any list formatting."
        }
        FormatHint::Unspecified => {
            "Answer directly and concisely. Use a short list only when the \
             question asks for multiple values."
        }
    }
}

/// Instruction message for a chat answer: format guidance plus the temporal
/// anchor the model should resolve relative expressions against.
pub(crate) fn chat_instructions(hint: FormatHint, reference_time: &str) -> String {
    format!(
        "{}\n\nTreat the current time as {reference_time} when interpreting \
         relative expressions such as \"latest\" or \"last month\".",
        format_instructions(hint)
    )
}

/// Instruction message for a patient summary.
pub(crate) fn summary_instructions(reference_time: &str) -> String {
    format!(
        "{SUMMARY_INSTRUCTIONS}\n\nTreat the current time as {reference_time} \
         when interpreting relative expressions."
    )
}

/// Assemble the message sequence for a chat answer.
///
/// Order is fixed: system prompt, patient context (skipped when retrieval
/// produced the no-context sentinel), instructions, prior conversation
/// turns, then the question as the final user message.
pub(crate) fn build_chat_messages(
    context: &str,
    question: &str,
    history: &[ChatMessage],
    reference_time: &str,
    hint: FormatHint,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
    if context != NO_CONTEXT_SENTINEL && !context.is_empty() {
        messages.push(ChatMessage::system(format!(
            "Patient Context:\n{context}\n[reference_time={reference_time}]"
        )));
    }
    messages.push(ChatMessage::system(chat_instructions(hint, reference_time)));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(question));
    messages
}

/// Assemble the message sequence for a patient summary. No history and no
/// user question; the summary task lives entirely in the instructions.
pub(crate) fn build_summary_messages(context: &str, reference_time: &str) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
    if context != NO_CONTEXT_SENTINEL && !context.is_empty() {
        messages.push(ChatMessage::system(format!(
            "Patient Context:\n{context}\n[reference_time={reference_time}]"
        )));
    }
    messages.push(ChatMessage::system(summary_instructions(reference_time)));
    messages
}
