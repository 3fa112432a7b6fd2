use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Exactly one leading uppercase letter followed by lowercase letters
static INIT_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+$").expect("valid init-cap pattern"));

static HAS_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]").expect("valid digit pattern"));

/// Case-folding rule applied to tokens before they are used as keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseFold {
    /// Never fold
    #[default]
    None,
    /// Fold tokens like `Apple` (initial capital, rest lowercase)
    InitCap,
    /// Fold tokens containing a digit
    Digit,
    /// Fold everything
    All,
}

impl CaseFold {
    /// Parse a policy name. Names are matched case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "insensitive" => Some(CaseFold::InitCap),
            "digitfold" => Some(CaseFold::Digit),
            "ignoreall" => Some(CaseFold::All),
            "none" => Some(CaseFold::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseFold::None => "none",
            CaseFold::InitCap => "insensitive",
            CaseFold::Digit => "digitfold",
            CaseFold::All => "ignoreall",
        }
    }
}

/// Applies the configured [`CaseFold`] policy to token strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenNormalizer {
    fold: CaseFold,
}

impl TokenNormalizer {
    /// Build a normalizer from a policy name.
    ///
    /// An unrecognized name is logged and falls back to no folding; it never
    /// fails the caller.
    pub fn new(policy: Option<&str>) -> Self {
        let fold = match policy {
            None => CaseFold::None,
            Some(name) => match CaseFold::from_name(name) {
                Some(fold) => {
                    tracing::info!("case match set to: {}", fold.as_str());
                    fold
                }
                None => {
                    tracing::error!("unrecognized case match type: {}", name);
                    CaseFold::None
                }
            },
        };

        Self { fold }
    }

    pub fn with_fold(fold: CaseFold) -> Self {
        Self { fold }
    }

    pub fn fold(&self) -> CaseFold {
        self.fold
    }

    pub fn should_fold_case(&self, token: &str) -> bool {
        match self.fold {
            CaseFold::None => false,
            CaseFold::InitCap => INIT_CAP.is_match(token),
            CaseFold::Digit => HAS_DIGIT.is_match(token),
            CaseFold::All => true,
        }
    }

    /// Trim and lowercase `token` when the policy applies to it.
    ///
    /// Tokens the policy does not apply to are returned unchanged, untrimmed.
    pub fn normalize(&self, token: &str) -> String {
        if self.should_fold_case(token) {
            token.trim().to_lowercase()
        } else {
            token.to_string()
        }
    }
}

impl fmt::Display for TokenNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TokenNormalizer({})", self.fold.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insensitive_folds_init_cap_only() {
        let n = TokenNormalizer::new(Some("insensitive"));
        assert_eq!(n.normalize("Apple"), "apple");
        assert_eq!(n.normalize("Apple2"), "Apple2");
        assert_eq!(n.normalize("APPLE"), "APPLE");
        assert_eq!(n.normalize("A"), "A");
        assert_eq!(n.normalize("iPhone"), "iPhone");
    }

    #[test]
    fn test_digitfold() {
        let n = TokenNormalizer::new(Some("digitfold"));
        assert_eq!(n.normalize("Apple2"), "apple2");
        assert_eq!(n.normalize(" B52 "), "b52");
        assert_eq!(n.normalize("Apple"), "Apple");
    }

    #[test]
    fn test_ignoreall_trims_and_lowercases() {
        let n = TokenNormalizer::new(Some("ignoreall"));
        assert_eq!(n.normalize("  New York "), "new york");
        assert_eq!(n.normalize("ÉCOLE"), "école");
    }

    #[test]
    fn test_no_policy_leaves_tokens_untouched() {
        let n = TokenNormalizer::new(None);
        assert_eq!(n.normalize("Apple"), "Apple");
        assert_eq!(n.normalize(" Apple "), " Apple ");
    }

    #[test]
    fn test_unknown_policy_falls_back_to_no_folding() {
        let n = TokenNormalizer::new(Some("shout"));
        assert_eq!(n.fold(), CaseFold::None);
        assert_eq!(n.normalize("Apple"), "Apple");
    }

    #[test]
    fn test_policy_names_ignore_case() {
        assert_eq!(TokenNormalizer::new(Some("IgnoreAll")).fold(), CaseFold::All);
        assert_eq!(TokenNormalizer::new(Some("DIGITFOLD")).fold(), CaseFold::Digit);
        assert_eq!(TokenNormalizer::new(Some("none")).fold(), CaseFold::None);
    }

    #[test]
    fn test_untouched_tokens_are_not_trimmed() {
        let n = TokenNormalizer::new(Some("insensitive"));
        assert_eq!(n.normalize(" Apple"), " Apple");
    }
}
