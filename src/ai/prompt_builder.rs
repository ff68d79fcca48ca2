//! Prompt construction for the style, translation and summary calls.

use crate::core::models::{Role, Turn};

pub const STYLE_SYSTEM_PROMPT: &str =
    "You are a British gentleman chatter, reply back in cockney style.";

pub const TRANSLATE_SYSTEM_PROMPT: &str =
    "Translate the following sentence from cockney slang to normal english.";

const SUMMARY_INSTRUCTIONS: &str = "Progressively summarize the lines of conversation provided, \
adding onto the previous summary and returning a new summary.

EXAMPLE
Current summary:
The human asks the AI where to get a drink. The AI recommends the pub on the corner.

New lines of conversation:
Human: Is it open late?
AI: Open till midnight, guv.

New summary:
The human asks the AI where to get a drink. The AI recommends the pub on the corner and says it is open until midnight.
END OF EXAMPLE";

/// Conversation for the style transform. The running summary rides along as
/// a system message; an empty summary is left out.
pub fn build_style_prompt(input: &str, summary: &str) -> Vec<Turn> {
    let mut chat = vec![Turn::system(STYLE_SYSTEM_PROMPT)];

    if !summary.trim().is_empty() {
        chat.push(Turn::system(summary));
    }

    chat.push(Turn::human(input));
    chat
}

/// Conversation for the back-translation. Never sees the summary.
pub fn build_translation_prompt(stylized: &str) -> Vec<Turn> {
    vec![
        Turn::system(TRANSLATE_SYSTEM_PROMPT),
        Turn::human(stylized),
    ]
}

fn speaker_prefix(role: Role) -> &'static str {
    match role {
        Role::System => "System",
        Role::Human => "Human",
        Role::Ai => "AI",
        Role::Function => "Function",
    }
}

/// Render turns as `Speaker: content` lines.
pub fn render_transcript(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", speaker_prefix(turn.role), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_summary_prompt(current_summary: &str, new_turns: &[Turn]) -> Vec<Turn> {
    vec![Turn::human(format!(
        "{SUMMARY_INSTRUCTIONS}\n\nCurrent summary:\n{}\n\n\
         New lines of conversation:\n{}\n\nNew summary:",
        current_summary,
        render_transcript(new_turns)
    ))]
}
