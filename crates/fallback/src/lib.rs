//! Rule-Based Fallback Responder
//!
//! Provides canned tutoring answers selected by keyword rules when the
//! AI gateway is unavailable.

mod responder;
mod rules;

pub use responder::FallbackResponder;
pub use rules::{Rule, Topic, DEFAULT_ANSWER, RULES};
