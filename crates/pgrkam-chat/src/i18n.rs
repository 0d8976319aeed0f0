//! Display strings for the supported UI languages

use serde::{Deserialize, Serialize};

/// Supported UI languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pa,
}

impl Language {
    /// All supported languages, in toggle order
    pub const ALL: [Language; 2] = [Language::En, Language::Pa];

    /// Wire/storage code
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pa => "pa",
        }
    }

    /// Parse a wire/storage code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(Language::En),
            "pa" => Some(Language::Pa),
            _ => None,
        }
    }

    /// The other supported language
    pub fn toggle(&self) -> Self {
        match self {
            Language::En => Language::Pa,
            Language::Pa => Language::En,
        }
    }

    /// BCP-47 tag handed to the speech recognizer
    pub fn speech_tag(&self) -> &'static str {
        match self {
            Language::En => "en-IN",
            Language::Pa => "pa-IN",
        }
    }

    /// Name of the language written in itself
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Pa => "ਪੰਜਾਬੀ",
        }
    }

    /// Display strings for this language
    pub fn strings(&self) -> &'static Translations {
        match self {
            Language::En => &EN,
            Language::Pa => &PA,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Every user-facing string for one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translations {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub reset: &'static str,
    pub speak: &'static str,
    pub stop: &'static str,
    pub send: &'static str,
    pub thinking: &'static str,
    pub placeholder: &'static str,
    pub tip: &'static str,
    pub example1: &'static str,
    pub example2: &'static str,
    pub example3: &'static str,
    pub voice_error: &'static str,
    pub mic_error: &'static str,
    pub greeting: &'static str,
}

impl Translations {
    /// The three illustrative examples shown in the tip line
    pub fn examples(&self) -> [&'static str; 3] {
        [self.example1, self.example2, self.example3]
    }
}

static EN: Translations = Translations {
    title: "PGRKAM Assistant",
    subtitle: "Employment & Skill Development",
    reset: "Reset",
    speak: "Speak",
    stop: "Stop",
    send: "Send",
    thinking: "Searching...",
    placeholder: "Ask about jobs, training, or schemes...",
    tip: "💡 Examples:",
    example1: "Government jobs in Punjab",
    example2: "Skill development courses",
    example3: "Self-employment schemes",
    voice_error: "🎤 Voice input requires Chrome browser",
    mic_error: "⚠️ Microphone error:",
    greeting: "Welcome to PGRKAM! 🙏\n\nI can help you with:\n• Government & Private Job Listings\n• Skill Development Programs\n• Self-Employment Schemes\n• Job Fair Information\n• Career Counseling\n\nHow can I assist you today?",
};

static PA: Translations = Translations {
    title: "PGRKAM ਸਹਾਇਕ",
    subtitle: "ਰੋਜ਼ਗਾਰ ਅਤੇ ਹੁਨਰ ਵਿਕਾਸ",
    reset: "ਰੀਸੈੱਟ",
    speak: "ਬੋਲੋ",
    stop: "ਰੁਕੋ",
    send: "ਭੇਜੋ",
    thinking: "ਖੋਜ ਰਿਹਾ ਹੈ...",
    placeholder: "ਨੌਕਰੀਆਂ, ਸਿਖਲਾਈ ਜਾਂ ਯੋਜਨਾਵਾਂ ਬਾਰੇ ਪੁੱਛੋ...",
    tip: "💡 ਉਦਾਹਰਣਾਂ:",
    example1: "ਪੰਜਾਬ ਵਿੱਚ ਸਰਕਾਰੀ ਨੌਕਰੀਆਂ",
    example2: "ਹੁਨਰ ਵਿਕਾਸ ਕੋਰਸ",
    example3: "ਸਵੈ-ਰੁਜ਼ਗਾਰ ਯੋਜਨਾਵਾਂ",
    voice_error: "🎤 ਵੌਇਸ ਇਨਪੁਟ ਲਈ ਕ੍ਰੋਮ ਬ੍ਰਾਊਜ਼ਰ ਦੀ ਲੋੜ ਹੈ",
    mic_error: "⚠️ ਮਾਈਕ੍ਰੋਫੋਨ ਗਲਤੀ:",
    greeting: "ਪੀ.ਜੀ.ਆਰ.ਕੇ.ਏ.ਐਮ ਵਿੱਚ ਤੁਹਾਡਾ ਸੁਆਗਤ ਹੈ! 🙏\n\nਮੈਂ ਤੁਹਾਡੀ ਮਦਦ ਕਰ ਸਕਦਾ ਹਾਂ:\n• ਸਰਕਾਰੀ ਅਤੇ ਪ੍ਰਾਈਵੇਟ ਨੌਕਰੀਆਂ\n• ਹੁਨਰ ਵਿਕਾਸ ਪ੍ਰੋਗਰਾਮ\n• ਸਵੈ-ਰੁਜ਼ਗਾਰ ਯੋਜਨਾਵਾਂ\n• ਰੋਜ਼ਗਾਰ ਮੇਲੇ ਦੀ ਜਾਣਕਾਰੀ\n• ਕੈਰੀਅਰ ਸਲਾਹ\n\nਮੈਂ ਅੱਜ ਤੁਹਾਡੀ ਕਿਵੇਂ ਸਹਾਇਤਾ ਕਰ ਸਕਦਾ ਹਾਂ?",
};

/// Strings for a language code, English when the code is unknown
pub fn translations(code: &str) -> &'static Translations {
    Language::from_code(code).unwrap_or_default().strings()
}

/// Apology shown in the conversation when a turn fails, keyed by language code
const APOLOGIES: &[(&str, &str)] = &[
    (
        "en",
        "I'm sorry, I'm having trouble connecting right now. Please try again in a moment.",
    ),
    (
        "pa",
        "ਮਾਫ਼ ਕਰਨਾ, ਮੈਨੂੰ ਹੁਣ ਜੁੜਨ ਵਿੱਚ ਸਮੱਸਿਆ ਹੋ ਰਹੀ ਹੈ। ਕਿਰਪਾ ਕਰਕੇ ਥੋੜ੍ਹੀ ਦੇਰ ਬਾਅਦ ਕੋਸ਼ਿਸ਼ ਕਰੋ।",
    ),
    (
        "hi",
        "क्षमा करें, मुझे अभी कनेक्ट करने में समस्या हो रही है। कृपया थोड़ी देर बाद प्रयास करें।",
    ),
];

/// Failure apology for a language code, English when the code has no entry
pub fn apology(code: &str) -> &'static str {
    APOLOGIES
        .iter()
        .find(|(c, _)| *c == code)
        .or_else(|| APOLOGIES.first())
        .map(|(_, text)| *text)
        .unwrap_or_default()
}

/// Canned queries offered as one-click chips
pub const EXAMPLE_QUERIES: [&str; 4] = [
    "I have B.Tech, show government jobs in Chhattisgarh",
    "Find private jobs for 12th pass in Punjab",
    "I have MBA, looking for management jobs",
    "Show engineering jobs in Raipur",
];

/// Maximum characters of a chip label before it is elided
pub const CHIP_LABEL_MAX: usize = 30;

/// Label for an example chip: the query, cut to 30 characters plus "..." when longer
pub fn chip_label(query: &str) -> String {
    let mut chars = query.chars();
    let head: String = chars.by_ref().take(CHIP_LABEL_MAX).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(t: &Translations) -> [&'static str; 15] {
        [
            t.title,
            t.subtitle,
            t.reset,
            t.speak,
            t.stop,
            t.send,
            t.thinking,
            t.placeholder,
            t.tip,
            t.example1,
            t.example2,
            t.example3,
            t.voice_error,
            t.mic_error,
            t.greeting,
        ]
    }

    #[test]
    fn test_every_language_has_every_string() {
        for lang in Language::ALL {
            for (i, s) in fields(lang.strings()).iter().enumerate() {
                assert!(!s.is_empty(), "{} field {} is empty", lang, i);
            }
        }
    }

    #[test]
    fn test_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code(" PA "), Some(Language::Pa));
        assert_eq!(Language::from_code("hi"), None);
    }

    #[test]
    fn test_toggle_flips_between_two_languages() {
        assert_eq!(Language::En.toggle(), Language::Pa);
        assert_eq!(Language::Pa.toggle(), Language::En);
    }

    #[test]
    fn test_speech_tags() {
        assert_eq!(Language::En.speech_tag(), "en-IN");
        assert_eq!(Language::Pa.speech_tag(), "pa-IN");
    }

    #[test]
    fn test_unknown_code_gets_english_strings() {
        assert_eq!(translations("fr").title, "PGRKAM Assistant");
        assert_eq!(translations("pa").title, "PGRKAM ਸਹਾਇਕ");
    }

    #[test]
    fn test_apology_table() {
        assert!(apology("en").starts_with("I'm sorry"));
        assert!(apology("pa").starts_with("ਮਾਫ਼ ਕਰਨਾ"));
        assert!(apology("hi").starts_with("क्षमा करें"));
        assert_eq!(apology("fr"), apology("en"));
    }

    #[test]
    fn test_chip_labels() {
        assert_eq!(
            chip_label("Show engineering jobs in Raipur"),
            "Show engineering jobs in Raipu..."
        );
        assert_eq!(chip_label("Short query"), "Short query");
        let exactly_thirty = "a".repeat(30);
        assert_eq!(chip_label(&exactly_thirty), exactly_thirty);
    }

    #[test]
    fn test_serde_codes() {
        assert_eq!(serde_json::to_string(&Language::Pa).unwrap(), "\"pa\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::En);
    }
}
