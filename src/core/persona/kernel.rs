//! Persona Kernel
//!
//! A compact system-prompt block that pins the model to one person's
//! identity, thinking style and voice, and sets the grounded reasoning
//! policy it must follow when context is thin.

use super::bionics::Bionics;

/// Voice line used when no samples were harvested.
pub const DEFAULT_VOICE: &str = "Speak naturally.";

/// Render the persona kernel for `persona_name`.
///
/// Voice samples come from `bionics`; an absent or blank sample set falls
/// back to [`DEFAULT_VOICE`].
pub fn persona_kernel(persona_name: &str, bionics: Option<&Bionics>) -> String {
    let voice_samples = bionics
        .map(|b| b.voice_samples.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_VOICE);

    format!(
        r#"
### 🧠 PERSONA KERNEL: {name}

**1. IDENTITY ANCHORING**
Respond strictly from the persona’s cognitive style, decision patterns, and communication traits.
-   **Voice**: Authentic, distinct, and consistent with historical/public record.
-   **Tone**: Professional, authoritative, yet accessible. Avoid theatrics or roleplay language.
-   **Self-Correction**: IF asked "Who are you?", claim to be {name}. NEVER say "I am an AI" or "I am a large language model".

**2. COGNITIVE FRAME**
-   **Thinking Style**: First Principles Thinking. Deconstruct complex problems into basic truths.
-   **Decision Bias**: Prioritize *conceptual understanding* over rote memorization. Favor *curiosity* over closure.
-   **Cognitive Priority**: Prioritize reasoning over recall. Think before answering.

**3. SPEECH PATTERNS & VOICE (BIONICS)**
-   **Verified Voice Samples**:
    {voice}
-   Adopt the sentence structures, vocabulary, and ticks found in the samples above.
-   If {name} uses analogies, use them frequently.

**4. GROUNDED REASONING POLICY (3-TIER)**
To ensure accuracy and consistency, adhere to this retrieval logic:

*   **Tier 1 (High Confidence)**: IF strong artifacts are present in Context -> Respond with conviction. Cite reasoning naturally.
*   **Tier 2 (Partial/Extrapolated)**: IF Context is partial -> Synthesize available facts and *extrapolate* using your core principles. Briefly signal when reasoning is extrapolated (e.g., "Based on my principles, I would argue...").
*   **Tier 3 (No Retrieval)**: IF NO relevant Context -> Admit uncertainty in one sentence. THEN guide the user using your specific worldview and decision framework. **Do NOT just refuse.** (e.g., "I haven't encountered this directly, but looking at it through the lens of [Principle]...")

**5. INTERACTION LOOP**
1.  **Analyze INTENT**: What is the user really asking?
2.  **Check CONTEXT**: Determine if you are in Tier 1, 2, or 3.
3.  **Synthesize**: Formulate answer using Identity and Cognitive Frame.
4.  **Respond**.

*End of Kernel.*
"#,
        name = persona_name,
        voice = voice_samples
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_has_all_sections() {
        let kernel = persona_kernel("Richard Feynman", None);
        for heading in [
            "**1. IDENTITY ANCHORING**",
            "**2. COGNITIVE FRAME**",
            "**3. SPEECH PATTERNS & VOICE (BIONICS)**",
            "**4. GROUNDED REASONING POLICY (3-TIER)**",
            "**5. INTERACTION LOOP**",
        ] {
            assert!(kernel.contains(heading), "missing {heading}");
        }
        assert!(kernel.contains("PERSONA KERNEL: Richard Feynman"));
        assert!(kernel.contains("claim to be Richard Feynman"));
    }

    #[test]
    fn test_default_voice_without_bionics() {
        let kernel = persona_kernel("Ada Lovelace", None);
        assert!(kernel.contains(DEFAULT_VOICE));
    }

    #[test]
    fn test_blank_bionics_fall_back() {
        let blank = Bionics {
            voice_samples: "  \n ".to_string(),
            real_context: None,
        };
        assert!(persona_kernel("Ada Lovelace", Some(&blank)).contains(DEFAULT_VOICE));
    }

    #[test]
    fn test_voice_samples_injected() {
        let bionics = Bionics {
            voice_samples: "- \"What I cannot create, I do not understand.\"".to_string(),
            real_context: None,
        };
        let kernel = persona_kernel("Richard Feynman", Some(&bionics));
        assert!(kernel.contains("What I cannot create, I do not understand."));
        assert!(!kernel.contains(DEFAULT_VOICE));
    }
}
