//! Persona prompting: kernel, voice samples and tutor prompts.

mod bionics;
mod kernel;
mod tutor_prompt;

pub use bionics::{Bionics, BionicsHarvester};
pub use kernel::{persona_kernel, DEFAULT_VOICE};
pub use tutor_prompt::{tutor_prompt, StudentLevel, TutorPromptParams};
