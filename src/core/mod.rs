pub mod discovery;
pub mod intent;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod persona;
pub mod query_rewriter;
pub mod tutor;
pub mod wiki;
