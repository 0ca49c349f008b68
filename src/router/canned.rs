//! Canned conversational replies and attribution footers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classifier::contains_any;

/// Greeting phrases, matched as substrings of the lower-cased message.
pub const GREETING_PHRASES: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
    "hi there",
    "hello there",
];

/// A greeting phrase anywhere in a message this short still counts.
pub const SHORT_GREETING_TOKENS: usize = 6;

pub const THANKS_PHRASES: &[&str] = &["thank", "thanks", "appreciate", "grateful"];

/// Thanks only count in messages shorter than this.
pub const SHORT_THANKS_TOKENS: usize = 5;

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━";

static SELF_INTRODUCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bi(?:\s+am|['’]m)\s+([^.!?,]+)").unwrap());

/// Greeting rule: a phrase opens the message, or appears in a short message.
pub fn is_greeting(lower: &str, token_count: usize) -> bool {
    let lower = lower.trim();
    GREETING_PHRASES.iter().any(|g| lower.starts_with(g))
        || (contains_any(lower, GREETING_PHRASES) && token_count <= SHORT_GREETING_TOKENS)
}

pub fn is_gratitude(lower: &str, token_count: usize) -> bool {
    contains_any(lower, THANKS_PHRASES) && token_count < SHORT_THANKS_TOKENS
}

/// Name following "I am" / "I'm", up to the first sentence punctuation.
pub fn extract_name(message: &str) -> Option<String> {
    let caps = SELF_INTRODUCTION.captures(message)?;
    let name = caps.get(1)?.as_str().trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Introduction reply, personalized when a name is known.
pub fn greeting(name: Option<&str>) -> String {
    let welcome = match name {
        Some(name) => format!("Nice to meet you, {}!\n\n", name),
        None => String::new(),
    };
    format!(
        "👋 {}I'm your LifeLink Disaster Response Assistant.

I'm here to help you during emergencies. I can provide:

🆘 Safety guidelines for various disasters
✅ Do's and Don'ts for emergency situations
📞 Emergency contact information
💡 Immediate action steps

You can ask me things like:
• \"What should I do during an earthquake?\"
• \"Flood safety tips\"
• \"Fire emergency help\"
• \"Hurricane preparation\"

Type your question or click a quick action button above! 🚨",
        welcome
    )
}

pub fn gratitude() -> String {
    "You're welcome! 😊 Stay safe and remember:

🚨 **In life-threatening emergencies, always call 911 first!**

I'm here if you need more safety information or have other questions about disaster preparedness.

Take care! 🙏"
        .to_string()
}

/// Learned answer with its attribution footer.
pub fn learned_reply(answer: &str) -> String {
    format!(
        "{}\n\n{}\n📚 *Response from learned knowledge base*\n⚠️ For emergencies, call 911 first!",
        answer, SEPARATOR
    )
}

/// Fresh remote answer with its attribution footer.
pub fn remote_reply(answer: &str, source_label: &str) -> String {
    format!(
        "{}\n\n{}\n🤖 *Powered by {}*\n💾 *This response has been saved for future learning*\n⚠️ For emergencies, call 911 first!",
        answer, SEPARATOR, source_label
    )
}

pub fn emergency_contacts() -> &'static str {
    "🚨 **EMERGENCY CONTACTS**

**Universal Emergency Number:**
- Call 911 (USA)
- Call 112 (Europe/International)

**Disaster-Specific:**
- Red Cross: 1-800-RED-CROSS (1-800-733-2767)
- FEMA: 1-800-621-3362
- Poison Control: 1-800-222-1222
- Suicide Prevention: 988

**Important:**
- Only call if you're in immediate danger
- Text to 911 if calling isn't possible
- Give your location first
- Stay on the line with dispatcher

Remember: Your safety is the priority! 🙏"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> usize {
        s.split_whitespace().count()
    }

    #[test]
    fn test_greeting_rules() {
        for msg in ["hi", "hello there", "good morning everyone"] {
            assert!(is_greeting(msg, tokens(msg)), "{}", msg);
        }
        // Opening phrase, long message.
        let long = "hello the river behind our house is rising really fast";
        assert!(is_greeting(long, tokens(long)));
        // Phrase in the middle of a long message.
        let buried = "my neighbor said hello but the river is flooding now";
        assert!(!is_greeting(buried, tokens(buried)));
        // Phrase in the middle of a short message.
        assert!(is_greeting("oh hey you", 3));
        assert!(!is_greeting("flood warning", 2));
    }

    #[test]
    fn test_gratitude_rules() {
        assert!(is_gratitude("thanks!", 1));
        assert!(is_gratitude("i really appreciate it", 4));
        assert!(!is_gratitude("thank you so much for everything today", 7));
        assert!(!is_gratitude("ok bye", 2));
    }

    #[test]
    fn test_extract_name() {
        assert_eq!(extract_name("Hi, I'm Maria!"), Some("Maria".to_string()));
        assert_eq!(extract_name("hello i am Sam."), Some("Sam".to_string()));
        assert_eq!(
            extract_name("Hey I am Jo Anne, any tips?"),
            Some("Jo Anne".to_string())
        );
        assert_eq!(extract_name("Hello there"), None);
        assert_eq!(extract_name("Hi I'm !"), None);
    }

    #[test]
    fn test_greeting_personalization() {
        assert!(greeting(Some("Maria")).starts_with("👋 Nice to meet you, Maria!\n\nI'm your LifeLink"));
        assert!(greeting(None).starts_with("👋 I'm your LifeLink"));
    }

    #[test]
    fn test_footers() {
        let learned = learned_reply("Boil water.");
        assert!(learned.starts_with("Boil water.\n\n"));
        assert!(learned.contains("Response from learned knowledge base"));

        let remote = remote_reply("Boil water.", "Google Gemini (test)");
        assert!(remote.contains("Powered by Google Gemini (test)"));
        assert!(remote.contains("saved for future learning"));
        assert!(remote.ends_with("call 911 first!"));
    }
}
