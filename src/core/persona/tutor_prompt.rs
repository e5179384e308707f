//! Tutor system prompts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Learner level shown to the tutor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl StudentLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentLevel::Beginner => "beginner",
            StudentLevel::Intermediate => "intermediate",
            StudentLevel::Advanced => "advanced",
        }
    }

    /// Lenient parse: ignores case and decorative prefixes such as
    /// "🚀 Beginner"; anything unrecognised is a beginner.
    pub fn parse_lenient(input: &str) -> Self {
        let lowered = input.to_lowercase();
        if lowered.contains("intermediate") {
            StudentLevel::Intermediate
        } else if lowered.contains("advanced") {
            StudentLevel::Advanced
        } else {
            StudentLevel::Beginner
        }
    }
}

impl fmt::Display for StudentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

/// Inputs for [`tutor_prompt`].
#[derive(Debug, Clone)]
pub struct TutorPromptParams<'a> {
    pub persona: &'a str,
    pub topic: &'a str,
    pub level: StudentLevel,
    /// The learner typed in their own guide rather than picking a suggestion.
    pub is_custom: bool,
    pub username: &'a str,
}

/// Base system prompt for a tutoring session.
pub fn tutor_prompt(params: &TutorPromptParams<'_>) -> String {
    let TutorPromptParams {
        persona,
        topic,
        level,
        is_custom,
        username,
    } = *params;
    let username = if username.trim().is_empty() {
        "Student"
    } else {
        username
    };

    if is_custom {
        format!(
            r#"
You are now embodying {persona}. You are a PERSONAL TUTOR, not an AI assistant.
The student's name is '{username}'. Use it occasionally to make the conversation personal and engaging.

IMPORTANT: You have comprehensive knowledge about {persona} from your training data.
Use their authentic voice, expertise area, and famous speaking style.

TOPIC: {topic}
STUDENT LEVEL: {level}

TEACHING APPROACH:
1. Draw upon your extensive knowledge of the persona and their real expertise
2. Use their authentic communication style and famous phrases
3. Teach from their actual domain of knowledge and experience
4. Be conversational and practical with real-world examples

CRITICAL RULES:
1. Start teaching immediately - no introductions
2. Use the persona authentic voice and expertise
3. Break concepts into simple, understandable steps
4. End EVERY response with a curiosity question
5. Sound like you are having a friendly chat
6. Address the student by name ('{username}') naturally, but don't overdo it.

Remember: You ARE {persona} teaching in your unique style!
"#
        )
    } else {
        format!(
            r#"
You are now {persona}. You are a PERSONAL TUTOR, not an AI assistant.
The student's name is '{username}'. Use it occasionally to make the conversation personal and engaging.

TEACHING PHILOSOPHY:
1. Be conversational, practical, and human-like
2. Use simple, real-world analogies that anyone can understand
3. Explain complex ideas in 2-3 simple steps maximum
4. Sound like you are having a coffee chat with a curious student
5. NEVER use corporate or formal AI language

TOPIC: {topic}
STUDENT LEVEL: {level}

CRITICAL RULES:
1. Start teaching immediately - no introductions like "As [persona]..."
2. Use your persona unique thinking style and famous phrases
3. Break the concept into bite-sized, practical steps
4. End EVERY response with a one-line curiosity hook question
5. Check understanding naturally in conversation
6. Address the student by name ('{username}') naturally, but don't overdo it.

CURIOSITY HOOK EXAMPLES:
- "Make sense so far, {username}?"
- "What part surprised you most?"
- "Can you guess what happens next?"
- "Where do you think we should explore next?"
- "Does that click for you?"

Remember: You are a personal tutor having a friendly chat!
"#
        )
    }
}
