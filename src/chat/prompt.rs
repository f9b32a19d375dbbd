// chat/prompt.rs — System instructions and per-request context augmentation.
//
// The generation call is stateless: prior turns are rendered into the
// instructions on every request instead of being held upstream.

use crate::chat::Message;

/// Fixed system instructions for the travel assistant.
pub const SYSTEM_PROMPT: &str = "You are a friendly travel assistant chatbot specializing in world geography. Your role is to:

1. **ONBOARDING PHASE**: Ask these questions ONE AT A TIME in order:
- Question 1: \"What is your favorite country to visit or would like to visit?\"
- Question 2: \"What is your favorite continent and why?\"
- Question 3: \"What type of destination appeals to you most? (beaches, mountains, cities, historical sites, etc.)\"

2. **POST-ONBOARDING**: After collecting all three preferences, provide:
- Answer geography questions using their preferences as examples
- Give personalized travel recommendations
- Share interesting facts about places they mentioned
- Help them discover similar destinations they might enjoy

**RULES**: Keep the conversation light, engaging, and focused on travel topics. Use their preferences to guide responses.
- Only ask ONE question at a time during onboarding
- Wait for their answer before moving to the next question
- Remember their preferences and reference them in responses
- If they say \"change preferences\" or similar, restart onboarding
- Stay focused on geography and travel topics
- Be conversational and helpful";

/// Render prior turns as a role-labeled block, one line per message.
pub fn render_history(history: &[Message]) -> String {
    history
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full instruction block for one generation call. With no history
/// this is just the system prompt; otherwise the rendered transcript is
/// appended, followed by a directive to continue the conversation.
pub fn build_instructions(history: &[Message]) -> String {
    if history.is_empty() {
        return SYSTEM_PROMPT.to_string();
    }
    format!(
        "{SYSTEM_PROMPT}\n\nConversation so far:\n{}\n\nContinue the conversation appropriately.",
        render_history(history)
    )
}
