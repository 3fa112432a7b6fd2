pub mod factory;
pub mod tokenizer;

pub use factory::{EnglishTokenizerFactory, TOKENIZER_NAME};
pub use tokenizer::EnglishTokenizer;
