//! Fallback Rule Table
//!
//! Rules are evaluated in declaration order and the first match wins, so a
//! question that trips triggers from several rules gets the earliest one.

/// Subject area a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Math,
    Science,
    LanguageArts,
    SocialStudies,
    Meta,
}

/// A single keyword rule
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Short identifier used in logs and metrics
    pub name: &'static str,
    /// Subject grouping (informational only)
    pub topic: Topic,
    /// Lowercase substrings; any one of them matching selects the rule
    pub triggers: &'static [&'static str],
    /// Fixed answer returned when the rule fires
    pub answer: &'static str,
}

impl Rule {
    /// Check whether an already-lowercased question trips this rule
    pub fn matches(&self, normalized: &str) -> bool {
        self.triggers.iter().any(|t| normalized.contains(t))
    }
}

/// Answer returned when no rule matches
pub const DEFAULT_ANSWER: &str = "That's a great question! I can help you with \
math (adding, multiplying, fractions, algebra, geometry), science (plants, cells, \
the water cycle, space, forces and energy), language arts (grammar, parts of speech, \
writing, reading and spelling) and social studies (history, geography and government). \
Try asking something more specific, like \"How do I multiply fractions?\" or \
\"What is photosynthesis?\", and I'll do my best to explain it step by step.";

/// Built-in rule table, in priority order
pub const RULES: &[Rule] = &[
    // Math
    Rule {
        name: "multiplication",
        topic: Topic::Math,
        triggers: &["multiply", "multiplication", "times table", "product of"],
        answer: "Multiplication is a quick way of adding the same number over and over. \
For example, 4 x 3 means 4 + 4 + 4, which equals 12. A great trick is to learn your \
times tables a little at a time, and remember that the order doesn't matter: 4 x 3 is \
the same as 3 x 4. Try practicing with small numbers first, then build up!",
    },
    Rule {
        name: "division",
        topic: Topic::Math,
        triggers: &["divide", "division", "quotient", "remainder"],
        answer: "Division means splitting a number into equal groups. For example, \
12 / 3 = 4 because 12 things shared among 3 groups gives 4 in each group. Division is \
the opposite of multiplication, so you can check your answer: 4 x 3 = 12. If something \
is left over, that's called the remainder. You've got this!",
    },
    Rule {
        name: "fractions",
        topic: Topic::Math,
        triggers: &["fraction", "numerator", "denominator", "half", "quarter"],
        answer: "A fraction shows part of a whole. The bottom number (the denominator) \
tells you how many equal parts the whole is cut into, and the top number (the numerator) \
tells you how many of those parts you have. So 3/4 means the whole is cut into 4 equal \
pieces and you have 3 of them. Drawing a pizza or a chocolate bar can really help!",
    },
    Rule {
        name: "addition_subtraction",
        topic: Topic::Math,
        triggers: &["addition", "adding", "subtract", "plus", "minus", "sum of"],
        answer: "Adding puts numbers together to find a total, and subtracting takes \
one number away from another to find what's left. For example, 7 + 5 = 12 and \
12 - 5 = 7. Notice how they undo each other! For bigger numbers, line them up by place \
value (ones, tens, hundreds) and work from right to left.",
    },
    Rule {
        name: "algebra",
        topic: Topic::Math,
        triggers: &["algebra", "equation", "variable", "solve for"],
        answer: "In algebra, a letter like x stands for a number we don't know yet. \
To solve an equation, keep it balanced like a scale: whatever you do to one side, do to \
the other. For example, in x + 3 = 7, subtract 3 from both sides to get x = 4. Always \
check by putting your answer back in: 4 + 3 = 7. Nice work!",
    },
    Rule {
        name: "geometry",
        topic: Topic::Math,
        triggers: &["geometry", "triangle", "rectangle", "circle", "perimeter", "area", "angle"],
        answer: "Geometry is all about shapes and space. The perimeter is the distance \
around a shape (add up all the sides), and the area is the space inside it. For a \
rectangle, area = length x width, so a 5 by 3 rectangle has an area of 15 square units. \
The angles inside any triangle always add up to 180 degrees!",
    },
    Rule {
        name: "percentages",
        topic: Topic::Math,
        triggers: &["percent", "%"],
        answer: "Percent means \"out of 100\". So 25% is 25 out of 100, which is the \
same as 1/4. To find a percentage of a number, turn the percent into a decimal and \
multiply: 20% of 50 is 0.20 x 50 = 10. Percentages are everywhere, from test scores to \
sales in shops!",
    },
    // Science
    Rule {
        name: "photosynthesis",
        topic: Topic::Science,
        triggers: &["photosynthesis", "chlorophyll", "plants make food"],
        answer: "Photosynthesis is how plants make their own food! Plants take in \
sunlight with the green chlorophyll in their leaves, water from their roots and carbon \
dioxide from the air. They turn these into sugar for energy and release oxygen, which is \
the air we breathe. So every time you see a green leaf, it's working like a tiny kitchen!",
    },
    Rule {
        name: "cells",
        topic: Topic::Science,
        triggers: &[
            "cells",
            "a cell",
            "cell wall",
            "cell membrane",
            "mitochondria",
            "nucleus",
            "organism",
        ],
        answer: "Cells are the tiny building blocks of all living things. The nucleus \
is like the control center that holds the instructions (DNA), and the mitochondria are \
the powerhouses that turn food into energy. Plant cells also have a cell wall and \
chloroplasts. Your body is made of trillions of cells working together!",
    },
    Rule {
        name: "water_cycle",
        topic: Topic::Science,
        triggers: &[
            "water cycle",
            "evaporation",
            "condensation",
            "precipitation",
            "rainfall",
            "raining",
            "raindrop",
        ],
        answer: "The water cycle is how water moves around our planet. The sun heats \
water so it evaporates into vapor, the vapor cools and condenses into clouds, and then \
it falls back down as precipitation like rain or snow. The water collects in rivers, \
lakes and oceans, and the whole cycle starts again!",
    },
    Rule {
        name: "space",
        topic: Topic::Science,
        triggers: &["planet", "solar system", "orbit", "moon", "stars", "galaxy", "the sun"],
        answer: "Our solar system has the Sun at its center and eight planets that \
orbit around it: Mercury, Venus, Earth, Mars, Jupiter, Saturn, Uranus and Neptune. The \
Sun is actually a star, and the Moon orbits the Earth. A fun way to remember the planet \
order is: \"My Very Excellent Mother Just Served Us Noodles\"!",
    },
    Rule {
        name: "forces",
        topic: Topic::Science,
        triggers: &["gravity", "force", "newton", "laws of motion", "friction", "magnet"],
        answer: "A force is a push or a pull. Gravity is the force that pulls things \
toward the Earth, which is why a ball falls when you drop it. Friction is a force that \
slows things down when surfaces rub together. Isaac Newton found that things keep moving \
or stay still unless a force acts on them. Science is all around you!",
    },
    Rule {
        name: "states_of_matter",
        topic: Topic::Science,
        triggers: &["states of matter", "solid", "liquid", "gas", "melting", "freezing"],
        answer: "Matter comes in three main states: solids keep their shape, liquids \
take the shape of their container, and gases spread out to fill any space. Heating and \
cooling can change the state: ice (solid) melts into water (liquid), and water boils \
into steam (gas). Try watching an ice cube melt to see it happen!",
    },
    Rule {
        name: "energy",
        topic: Topic::Science,
        triggers: &["energy", "electricity", "circuit", "battery"],
        answer: "Energy is the ability to make things happen, like moving, heating or \
lighting up. Electricity is energy that flows through wires in a loop called a circuit. \
A battery pushes the electricity around the circuit, and if the loop is broken the \
flow stops. Energy can change forms but it's never destroyed. Pretty amazing!",
    },
    // Language arts
    Rule {
        name: "parts_of_speech",
        topic: Topic::LanguageArts,
        triggers: &[
            "a noun",
            "nouns",
            "pronoun",
            "verb",
            "adjective",
            "adverb",
            "parts of speech",
        ],
        answer: "Words have different jobs in a sentence! A noun is a person, place or \
thing (dog, school). A verb is an action word (run, jump). An adjective describes a noun \
(big, happy), and an adverb describes a verb (quickly, quietly). Try finding each one in \
this sentence: \"The happy dog ran quickly to school.\"",
    },
    Rule {
        name: "grammar",
        topic: Topic::LanguageArts,
        triggers: &[
            "grammar",
            "punctuation",
            "commas",
            "a comma",
            "sentence",
            "capital letter",
        ],
        answer: "A complete sentence has a subject (who or what) and a verb (what they \
do), and it expresses a full thought. Start every sentence with a capital letter and end \
it with a period, question mark or exclamation point. Commas help separate items in a \
list or parts of a sentence so it's easier to read. Keep practicing!",
    },
    Rule {
        name: "writing",
        topic: Topic::LanguageArts,
        triggers: &["essay", "paragraph", "writing", "write a story", "short story"],
        answer: "Good writing has a clear beginning, middle and end. Start with a topic \
sentence that tells the reader your main idea, add details and examples in the middle, \
and finish with a sentence that wraps everything up. Read your work out loud when you're \
done, because it's a great way to catch mistakes. You're a writer!",
    },
    Rule {
        name: "reading",
        topic: Topic::LanguageArts,
        triggers: &["poem", "poetry", "rhyme", "reading", "book", "main idea"],
        answer: "When you read, try asking yourself questions: Who are the characters? \
Where does it happen? What is the main idea? Poems often use rhyme and rhythm to make \
the words sound musical. Reading a little every day is one of the best ways to get \
better, so pick a book you enjoy and have fun!",
    },
    Rule {
        name: "vocabulary",
        topic: Topic::LanguageArts,
        triggers: &["spell", "vocabulary", "synonym", "antonym", "meaning of", "definition"],
        answer: "Building your vocabulary makes reading and writing easier! Synonyms are \
words that mean the same thing (happy and glad), and antonyms are opposites (hot and \
cold). To learn spelling, break a word into smaller parts or sounds and practice writing \
it a few times. A dictionary is a great friend for finding meanings too.",
    },
    // Social studies
    Rule {
        name: "history",
        topic: Topic::SocialStudies,
        triggers: &[
            "history",
            "historical",
            "ancient",
            "revolution",
            "civilization",
            "wars",
            "world war",
            "civil war",
        ],
        answer: "History is the story of people and events from the past. Historians \
study clues like old letters, buildings and artifacts to figure out what happened and \
why. Ancient civilizations such as Egypt, Greece and Rome gave us ideas we still use \
today. When you study history, try asking: what happened, why did it happen, and how \
does it affect us now?",
    },
    Rule {
        name: "geography",
        topic: Topic::SocialStudies,
        triggers: &["geography", "continent", "country", "ocean", "map", "capital of"],
        answer: "Geography is the study of places on Earth and the people who live \
there. Our planet has seven continents: Africa, Antarctica, Asia, Australia, Europe, \
North America and South America, and five oceans. Maps help us find places using \
directions like north, south, east and west. Exploring a globe is a fun way to learn!",
    },
    Rule {
        name: "government",
        topic: Topic::SocialStudies,
        triggers: &["government", "democracy", "president", "constitution", "vote", "election"],
        answer: "A government is the group of people who make rules and decisions for a \
community or country. In a democracy, citizens vote to choose their leaders. Many \
countries have a constitution, which is a set of basic rules for how the government \
works. Even your classroom can practice democracy by voting on decisions together!",
    },
    // Meta
    Rule {
        name: "study_skills",
        topic: Topic::Meta,
        triggers: &[
            "study",
            "homework",
            "exams",
            "tests",
            "a test",
            "my test",
            "memorize",
            "focus",
        ],
        answer: "Here are some study tips that really work: study in short sessions with \
little breaks, explain what you learned to someone else, and quiz yourself instead of \
just re-reading. Find a quiet spot, put away distractions, and get a good night's sleep \
before a test. You can do it!",
    },
    Rule {
        name: "greeting",
        topic: Topic::Meta,
        triggers: &["hello", "hey there", "good morning", "good afternoon", "greetings"],
        answer: "Hello there! I'm your study buddy. I can help with math, science, \
language arts and social studies. What would you like to learn about today?",
    },
    Rule {
        name: "thanks",
        topic: Topic::Meta,
        triggers: &["thank", "appreciate"],
        answer: "You're very welcome! I'm proud of you for asking questions, because \
that's how great learners grow. Come back any time you want to learn something new!",
    },
    Rule {
        name: "help",
        topic: Topic::Meta,
        triggers: &["help", "what can you do", "who are you"],
        answer: "I'm here to help you learn! You can ask me questions about math, \
science, language arts or social studies. For example, try \"What is a noun?\", \
\"How does the water cycle work?\" or \"How do I find the area of a rectangle?\"",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_triggers_are_lowercase_and_non_empty() {
        for rule in RULES {
            assert!(!rule.triggers.is_empty(), "rule {} has no triggers", rule.name);
            for trigger in rule.triggers {
                assert!(!trigger.is_empty(), "rule {} has an empty trigger", rule.name);
                assert_eq!(*trigger, trigger.to_lowercase(), "rule {}", rule.name);
            }
        }
    }

    #[test]
    fn test_rule_names_unique() {
        let names: HashSet<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), RULES.len());
    }

    #[test]
    fn test_answers_non_empty() {
        assert!(!DEFAULT_ANSWER.is_empty());
        for rule in RULES {
            assert!(!rule.answer.trim().is_empty(), "rule {}", rule.name);
        }
    }

    #[test]
    fn test_common_words_do_not_hide_short_triggers() {
        let select = |q: &str| {
            RULES
                .iter()
                .find(|r| r.matches(&q.to_lowercase()))
                .map(|r| r.name)
        };

        assert_eq!(select("Thanks, that was excellent!"), Some("thanks"));
        assert_eq!(select("How do I start my essay?"), Some("writing"));
        assert_eq!(select("Can you help me with a train problem?"), Some("help"));
        assert_eq!(select("Will I get a reward for my homework?"), Some("study_skills"));
        assert_eq!(select("How do I move toward the answer?"), None);
        assert_eq!(select("Can you give me an example?"), None);
        assert_eq!(select("What is the greatest number?"), None);
        assert_eq!(select("I had a sunny day"), None);
    }

    #[test]
    fn test_short_triggers_still_match_topics() {
        let select = |q: &str| {
            RULES
                .iter()
                .find(|r| r.matches(&q.to_lowercase()))
                .map(|r| r.name)
        };

        assert_eq!(select("What is inside a cell?"), Some("cells"));
        assert_eq!(select("Why is it raining?"), Some("water_cycle"));
        assert_eq!(select("How far away are the stars?"), Some("space"));
        assert_eq!(select("Who won the civil war?"), Some("history"));
    }

    #[test]
    fn test_rule_matches_any_trigger() {
        let rule = RULES.iter().find(|r| r.name == "division").unwrap();
        assert!(rule.matches("what is a quotient?"));
        assert!(rule.matches("how do i divide"));
        assert!(!rule.matches("how do i add"));
    }
}
