//! Prompt construction for remote answers.

use crate::category::Category;

/// Build the disaster-focused prompt sent to the remote model.
pub fn build_prompt(question: &str, category: Category) -> String {
    format!(
        "You are a disaster response expert assistant providing emergency guidance.\n\
         \n\
         Emergency Context: {}\n\
         Question: {}\n\
         \n\
         Provide clear, actionable safety advice with:\n\
         - Clear do's and don'ts\n\
         - Prioritize life safety\n\
         - Be concise but comprehensive (max 300 words)\n\
         - Use bullet points or numbered lists\n\
         - Include emergency contact reminders when relevant\n\
         \n\
         Response:",
        category.display_name(),
        question.trim()
    )
}
