pub mod parser;

pub use parser::{decode_text, parse_prompt_text, parse_prompts};
