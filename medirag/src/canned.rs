pub const POLITE_PHRASES: &[&str] = &[
    "thanks",
    "thank you",
    "thank you!",
    "ok",
    "okay",
    "cool",
    "got it",
];

pub const GREETING_PHRASES: &[&str] = &["hello", "hi", "hey", "hello medibot", "hi medibot"];

pub const POLITE_REPLY: &str =
    "You're welcome! Let me know if you have any other questions. 😊";

pub const GREETING_REPLY: &str = "Hi there! 👋 I'm MediBot — here to help you with symptoms, \
medications, and wellness tips. Ask me anything!";

/// Fixed reply for trivial inputs. Matching is literal set membership after trimming and
/// lowercasing, so "thank you!!" does not match.
pub fn canned_reply(input: &str) -> Option<&'static str> {
    let normalized = input.trim().to_lowercase();
    if POLITE_PHRASES.contains(&normalized.as_str()) {
        return Some(POLITE_REPLY);
    }
    if GREETING_PHRASES.contains(&normalized.as_str()) {
        return Some(GREETING_REPLY);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_greeting_gets_the_greeting_reply() {
        for phrase in GREETING_PHRASES {
            assert_eq!(canned_reply(phrase), Some(GREETING_REPLY), "{}", phrase);
        }
        assert_eq!(canned_reply("  Hello MediBot \n"), Some(GREETING_REPLY));
        assert!(GREETING_REPLY.starts_with("Hi there! 👋 I'm MediBot — here to help you"));
    }

    #[test]
    fn every_polite_phrase_gets_the_acknowledgement() {
        for phrase in POLITE_PHRASES {
            assert_eq!(canned_reply(phrase), Some(POLITE_REPLY), "{}", phrase);
        }
        assert_eq!(canned_reply("OK"), Some(POLITE_REPLY));
    }

    #[test]
    fn near_misses_and_questions_fall_through() {
        assert_eq!(canned_reply("thank you!!"), None);
        assert_eq!(canned_reply("hi there"), None);
        assert_eq!(canned_reply("hi, what helps a headache?"), None);
        assert_eq!(canned_reply(""), None);
    }
}
