use conmap_core::language::{Tokenizer, TokenizerConfig, TokenizerFactory, TokenizerInitError};

use crate::tokenizer::EnglishTokenizer;

pub const TOKENIZER_NAME: &str = "english";

/// Builds [`EnglishTokenizer`]s from a config named `english`.
///
/// Options: `split_hyphens` and `keep_punctuation`, both `true`/`false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishTokenizerFactory;

fn parse_flag(name: &str, value: &str) -> Result<bool, TokenizerInitError> {
    value.parse().map_err(|_| TokenizerInitError::InvalidOption {
        name: name.to_string(),
        value: value.to_string(),
        reason: "expected true or false".to_string(),
    })
}

impl TokenizerFactory for EnglishTokenizerFactory {
    fn build(&self, config: &TokenizerConfig) -> Result<Box<dyn Tokenizer>, TokenizerInitError> {
        if !config.name.eq_ignore_ascii_case(TOKENIZER_NAME) {
            return Err(TokenizerInitError::UnknownTokenizer(config.name.clone()));
        }

        let mut tokenizer = EnglishTokenizer::new();
        for (name, value) in &config.options {
            tokenizer = match name.as_str() {
                "split_hyphens" => tokenizer.split_hyphens(parse_flag(name, value)?),
                "keep_punctuation" => tokenizer.keep_punctuation(parse_flag(name, value)?),
                _ => {
                    return Err(TokenizerInitError::InvalidOption {
                        name: name.clone(),
                        value: value.clone(),
                        reason: "unknown option".to_string(),
                    });
                }
            };
        }

        tracing::info!("built english tokenizer ({})", config);
        Ok(Box::new(tokenizer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_options() {
        let config = TokenizerConfig::new("English").with_option("split_hyphens", "true");
        let mut tokenizer = EnglishTokenizerFactory.build(&config).unwrap();
        assert_eq!(tokenizer.tokenize("x-ray", "en").len(), 3);
    }

    #[test]
    fn test_rejects_unknown_name() {
        let err = EnglishTokenizerFactory.build(&TokenizerConfig::new("opennlp")).err().unwrap();
        assert!(matches!(err, TokenizerInitError::UnknownTokenizer(name) if name == "opennlp"));
    }

    #[test]
    fn test_rejects_bad_options() {
        let config = TokenizerConfig::new("english").with_option("keep_punctuation", "maybe");
        assert!(matches!(
            EnglishTokenizerFactory.build(&config).err().unwrap(),
            TokenizerInitError::InvalidOption { .. }
        ));

        let config = TokenizerConfig::new("english").with_option("stemming", "true");
        assert!(matches!(
            EnglishTokenizerFactory.build(&config).err().unwrap(),
            TokenizerInitError::InvalidOption { reason, .. } if reason == "unknown option"
        ));
    }
}
