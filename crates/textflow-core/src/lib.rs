pub mod config;
pub mod hyphenator;
pub mod language;
pub mod markup;
pub mod pattern;
pub mod settings;
pub mod tokenizer;
pub mod unicode;
