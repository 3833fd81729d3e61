/// Conversation template wrapping raw editor text into the turn format the
/// model was tuned on.
///
/// The user turn carries a fixed instruction and the editor text becomes the
/// open model turn, so the next-token distribution continues the user's own
/// writing rather than a chat reply.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    instruction: String,
}

impl PromptTemplate {
    /// Template with a custom instruction line for the user turn.
    pub fn with_instruction(instruction: impl Into<String>) -> Self {
        PromptTemplate {
            instruction: instruction.into(),
        }
    }

    /// Wrap editor text into the full formatted prompt.
    pub fn format(&self, text: &str) -> String {
        format!(
            "<start_of_turn>user\n{}<end_of_turn><start_of_turn>model\n{}",
            self.instruction, text
        )
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        PromptTemplate::with_instruction("Write a poem.")
    }
}
