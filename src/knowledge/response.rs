//! Knowledge-base response rendering.

use crate::category::Category;
use crate::classifier::contains_any;

use super::store::KnowledgeEntry;

/// Dos and don'ts shown in the combined help layout.
pub const HELP_ITEMS: usize = 5;

/// Items shown in the single-list layouts.
pub const LIST_ITEMS: usize = 7;

const HELP_PHRASES: &[&str] = &["help", "what do", "what should", "need advice"];
const AVOID_PHRASES: &[&str] = &["avoid", "don't", "not do", "should not"];
const DOS_PHRASES: &[&str] = &["safety", "tip", "advice", "guide"];

/// Presentation mode for a knowledge-base answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Numbered dos and don'ts, up to five each.
    Help,
    /// Don'ts only, up to seven.
    Avoid,
    /// Dos only, up to seven.
    Dos,
}

impl ResponseMode {
    /// Pick a mode from intent phrases in the message.
    ///
    /// Messages with no intent phrase get the combined help layout.
    pub fn detect(message: &str) -> Self {
        let lower = message.to_lowercase();
        if contains_any(&lower, HELP_PHRASES) {
            Self::Help
        } else if contains_any(&lower, AVOID_PHRASES) {
            Self::Avoid
        } else if contains_any(&lower, DOS_PHRASES) {
            Self::Dos
        } else {
            Self::Help
        }
    }
}

/// Render a titled, numbered response for `category`.
pub fn render(category: Category, entry: &KnowledgeEntry, mode: ResponseMode) -> String {
    let name = category.display_name();
    match mode {
        ResponseMode::Help => {
            let mut response = format!("🆘 **{} Safety Guidelines**\n\n", name);
            response.push_str("✅ **DO:**\n");
            push_numbered(&mut response, &entry.dos, HELP_ITEMS);
            response.push_str("\n❌ **DON'T:**\n");
            push_numbered(&mut response, &entry.donts, HELP_ITEMS);
            response.push_str("\n💡 Stay calm and follow these guidelines. Help is available.");
            response
        }
        ResponseMode::Avoid => {
            let mut response = format!("❌ **What to AVOID during {}:**\n\n", name);
            push_numbered(&mut response, &entry.donts, LIST_ITEMS);
            response
        }
        ResponseMode::Dos => {
            let mut response = format!("✅ **What to DO during {}:**\n\n", name);
            push_numbered(&mut response, &entry.dos, LIST_ITEMS);
            response
        }
    }
}

fn push_numbered(out: &mut String, items: &[String], limit: usize) {
    for (i, item) in items.iter().take(limit).enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> KnowledgeEntry {
        KnowledgeEntry {
            dos: (1..=n).map(|i| format!("do {}", i)).collect(),
            donts: (1..=n).map(|i| format!("dont {}", i)).collect(),
        }
    }

    #[test]
    fn test_detect_modes() {
        assert_eq!(ResponseMode::detect("What should I do?"), ResponseMode::Help);
        assert_eq!(ResponseMode::detect("I need advice"), ResponseMode::Help);
        assert_eq!(ResponseMode::detect("What to avoid"), ResponseMode::Avoid);
        assert_eq!(ResponseMode::detect("flood safety"), ResponseMode::Dos);
        assert_eq!(ResponseMode::detect("fire tips"), ResponseMode::Dos);
        assert_eq!(ResponseMode::detect("Why do tornadoes form?"), ResponseMode::Help);
    }

    #[test]
    fn test_help_precedes_avoid() {
        assert_eq!(
            ResponseMode::detect("help, what should I not do"),
            ResponseMode::Help
        );
    }

    #[test]
    fn test_render_help_limits_to_five_each() {
        let text = render(Category::Earthquake, &entry(9), ResponseMode::Help);
        assert!(text.starts_with("🆘 **Earthquake Safety Guidelines**"));
        assert!(text.contains("5. do 5"));
        assert!(!text.contains("do 6"));
        assert!(text.contains("5. dont 5"));
        assert!(!text.contains("dont 6"));
        assert!(text.ends_with("Help is available."));
    }

    #[test]
    fn test_render_avoid_limits_to_seven() {
        let text = render(Category::WinterStorm, &entry(9), ResponseMode::Avoid);
        assert!(text.starts_with("❌ **What to AVOID during Winter Storm:**"));
        assert!(text.contains("7. dont 7"));
        assert!(!text.contains("dont 8"));
        assert!(!text.contains("do 1\n"));
    }

    #[test]
    fn test_render_dos_short_list() {
        let text = render(Category::Flood, &entry(2), ResponseMode::Dos);
        assert!(text.contains("1. do 1\n2. do 2\n"));
        assert!(!text.contains("dont"));
    }
}
