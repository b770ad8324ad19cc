pub mod rules;
pub mod truncate;

use std::borrow::Cow;

use crate::config::MaskingConfig;
use crate::error::Result;

pub use rules::{CompiledRule, KeywordRules, RuleShape};
pub use truncate::{truncate_code_points, Truncation};

/// Literal written in place of a sensitive value.
pub const MASK_MARKER: &str = "[MASKED]";

/// Appended to payloads cut at the configured length.
pub const TRUNCATION_SUFFIX: &str = "...[TRUNCATED]";

/// A single masking layer.
pub trait Sanitizer: Send + Sync {
    /// Transform the input. Implementations borrow when nothing changed.
    fn sanitize<'a>(&self, input: &'a str) -> Cow<'a, str>;

    /// Name of this layer (for logging/debugging).
    fn name(&self) -> &str;
}

/// Keyword masking followed by truncation.
///
/// Compiled once from a [`MaskingConfig`] and then shared read-only, usually
/// behind an `Arc`. `mask` is pure and never fails, so it can be called inline
/// from sync or async request handlers.
pub struct MaskingEngine {
    rules: KeywordRules,
    truncation: Truncation,
}

impl MaskingEngine {
    /// Compile the rule set. Keywords are normalized first (trimmed, blanks
    /// dropped, order and duplicates kept).
    pub fn compile(config: &MaskingConfig) -> Result<Self> {
        let keywords = config.normalized_keywords();
        let rules = KeywordRules::compile(&keywords)?;
        let truncation = Truncation::from_limit(config.max_payload_length);

        tracing::debug!(
            keywords = keywords.len(),
            rules = rules.len(),
            max_payload_length = config.max_payload_length,
            "masking engine compiled"
        );

        Ok(Self { rules, truncation })
    }

    pub fn rules(&self) -> &[CompiledRule] {
        self.rules.rules()
    }

    pub fn max_payload_length(&self) -> Option<usize> {
        self.truncation.max_len()
    }

    /// Mask sensitive values, then truncate. Blank input is returned as is.
    pub fn mask<'a>(&self, input: &'a str) -> Cow<'a, str> {
        if input.trim().is_empty() {
            return Cow::Borrowed(input);
        }
        match self.rules.sanitize(input) {
            Cow::Borrowed(text) => self.truncation.sanitize(text),
            Cow::Owned(text) => Cow::Owned(self.truncation.sanitize(&text).into_owned()),
        }
    }

    /// `None` stays `None`.
    pub fn mask_optional<'a>(&self, input: Option<&'a str>) -> Option<Cow<'a, str>> {
        input.map(|text| self.mask(text))
    }

    /// Layers in application order.
    pub fn layers(&self) -> [&dyn Sanitizer; 2] {
        [&self.rules, &self.truncation]
    }
}

impl Sanitizer for MaskingEngine {
    fn sanitize<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self.mask(input)
    }

    fn name(&self) -> &str {
        "masking_engine"
    }
}
