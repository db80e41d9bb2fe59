//! Fallback Responder Implementation

use crate::rules::{Rule, DEFAULT_ANSWER, RULES};
use tracing::debug;

/// Deterministic, offline answer selection over an ordered rule table
#[derive(Debug, Clone, Copy)]
pub struct FallbackResponder {
    rules: &'static [Rule],
}

impl FallbackResponder {
    /// Create a responder over the built-in rule table
    pub fn new() -> Self {
        Self::with_rules(RULES)
    }

    /// Create a responder over a custom rule table
    pub fn with_rules(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    /// Find the first rule whose triggers appear in the question
    pub fn matched_rule(&self, question: &str) -> Option<&'static Rule> {
        let normalized = question.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&normalized))
    }

    /// Select an answer for the question. Never fails.
    pub fn respond(&self, question: &str) -> &'static str {
        match self.matched_rule(question) {
            Some(rule) => {
                debug!("Fallback rule matched: {}", rule.name);
                rule.answer
            }
            None => {
                debug!("No fallback rule matched, using default answer");
                DEFAULT_ANSWER
            }
        }
    }

    /// Rules in priority order
    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Topic;
    use proptest::prelude::*;

    fn answer_of(name: &str) -> &'static str {
        RULES.iter().find(|r| r.name == name).unwrap().answer
    }

    #[test]
    fn test_case_insensitive() {
        let responder = FallbackResponder::new();
        let expected = answer_of("multiplication");

        assert_eq!(responder.respond("MULTIPLY"), expected);
        assert_eq!(responder.respond("multiply"), expected);
        assert_eq!(responder.respond("Multiply"), expected);
    }

    #[test]
    fn test_substring_match() {
        let responder = FallbackResponder::new();
        assert_eq!(
            responder.respond("I need help multiplying big numbers"),
            answer_of("multiplication")
        );
    }

    #[test]
    fn test_first_rule_wins_over_earlier_trigger_in_text() {
        let responder = FallbackResponder::new();

        // "fraction" comes first in the text, but multiplication is higher in the table
        let question = "What fraction do I get when I multiply?";
        assert_eq!(responder.respond(question), answer_of("multiplication"));

        // Science trigger first in text, math rule first in table
        let question = "Does gravity change the area of a circle?";
        assert_eq!(responder.matched_rule(question).unwrap().name, "geometry");

        // Subject rules come before greetings
        let question = "Hello! How do I multiply?";
        assert_eq!(responder.matched_rule(question).unwrap().name, "multiplication");
        assert_eq!(responder.matched_rule("Hello!").unwrap().name, "greeting");
    }

    #[test]
    fn test_default_answer() {
        let responder = FallbackResponder::new();
        assert_eq!(responder.respond("xyz123 qqq"), DEFAULT_ANSWER);
        assert!(responder.matched_rule("xyz123 qqq").is_none());
    }

    #[test]
    fn test_empty_question_gets_default() {
        let responder = FallbackResponder::new();
        assert_eq!(responder.respond(""), DEFAULT_ANSWER);
    }

    #[test]
    fn test_topic_examples() {
        let responder = FallbackResponder::new();

        let cases = [
            ("What is photosynthesis?", "photosynthesis", Topic::Science),
            ("Explain the water cycle", "water_cycle", Topic::Science),
            ("what is a noun", "parts_of_speech", Topic::LanguageArts),
            ("Tell me about ancient Egypt", "history", Topic::SocialStudies),
            ("How many continents are there?", "geography", Topic::SocialStudies),
            ("Thanks so much!", "thanks", Topic::Meta),
            ("Can you help me?", "help", Topic::Meta),
        ];

        for (question, name, topic) in cases {
            let rule = responder.matched_rule(question).unwrap();
            assert_eq!(rule.name, name, "question: {}", question);
            assert_eq!(rule.topic, topic);
        }
    }

    #[test]
    fn test_unicode_question() {
        let responder = FallbackResponder::new();
        assert!(!responder.respond("¿Qué es la fotosíntesis? 光合作用").is_empty());
        assert_eq!(
            responder.matched_rule("ÉTUDE DE LA PHOTOSYNTHESIS").unwrap().name,
            "photosynthesis"
        );
    }

    #[test]
    fn test_custom_table() {
        static CUSTOM: &[Rule] = &[
            Rule {
                name: "first",
                topic: Topic::Meta,
                triggers: &["apple"],
                answer: "first answer",
            },
            Rule {
                name: "second",
                topic: Topic::Meta,
                triggers: &["apple", "pear"],
                answer: "second answer",
            },
        ];

        let responder = FallbackResponder::with_rules(CUSTOM);
        assert_eq!(responder.respond("pear and APPLE"), "first answer");
        assert_eq!(responder.respond("a pear"), "second answer");
        assert_eq!(responder.respond("plum"), DEFAULT_ANSWER);
        assert_eq!(responder.rules().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_always_non_empty(question in ".*") {
            let responder = FallbackResponder::new();
            prop_assert!(!responder.respond(&question).is_empty());
        }

        #[test]
        fn prop_ascii_case_insensitive(question in "[a-zA-Z0-9 ?]{0,60}") {
            let responder = FallbackResponder::new();
            prop_assert_eq!(
                responder.respond(&question.to_uppercase()),
                responder.respond(&question.to_lowercase())
            );
        }

        #[test]
        fn prop_trigger_selects_rule_at_or_before(
            index in 0..RULES.len(),
            prefix in "[0-9 ]{0,10}",
            suffix in "[0-9 ]{0,10}",
        ) {
            let responder = FallbackResponder::new();
            let rule = &RULES[index];
            for trigger in rule.triggers {
                let question = format!("{}{}{}", prefix, trigger, suffix);
                let matched = responder.matched_rule(&question).unwrap();
                let position = RULES.iter().position(|r| r.name == matched.name).unwrap();
                prop_assert!(position <= index);
            }
        }
    }
}
