use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};
use std::borrow::Cow;

use crate::error::{LogwardenError, Result};

use super::{Sanitizer, MASK_MARKER};

const PREFILTER_SIZE_LIMIT: usize = 32 * (1 << 20);

/// Textual shape in which a sensitive keyword can appear as a key.
///
/// Rules for one keyword are always emitted in [`RuleShape::ORDERED`] order.
/// The JSON shapes must run before the generic ones: the generic `key: value`
/// rule would otherwise capture a quoted JSON value and break the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleShape {
    /// `"key": "value"`
    QuotedJson,
    /// `"key": 12345`
    UnquotedJson,
    /// `key=value` in query strings and form bodies
    QueryParam,
    /// `key: value` in free text
    GenericText,
}

impl RuleShape {
    pub const ORDERED: [RuleShape; 4] = [
        RuleShape::QuotedJson,
        RuleShape::UnquotedJson,
        RuleShape::QueryParam,
        RuleShape::GenericText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleShape::QuotedJson => "quoted_json",
            RuleShape::UnquotedJson => "unquoted_json",
            RuleShape::QueryParam => "query_param",
            RuleShape::GenericText => "generic_text",
        }
    }

    /// Pattern source for an already escaped keyword. Group 1 is always the
    /// key prefix to keep.
    fn pattern(&self, escaped: &str) -> String {
        match self {
            RuleShape::QuotedJson => format!(r#"("\s*{escaped}\s*"\s*:\s*")([^"]*)(")"#),
            RuleShape::UnquotedJson => format!(r#"("\s*{escaped}\s*"\s*:\s*)([^,}}\s]+)"#),
            RuleShape::QueryParam => format!(r"(\b{escaped}\b\s*=\s*)([^&\s]+)"),
            RuleShape::GenericText => format!(r"(\b{escaped}\b\s*:\s*)(\S+)"),
        }
    }

    fn replacement(&self) -> String {
        match self {
            RuleShape::QuotedJson => format!("${{1}}{MASK_MARKER}${{3}}"),
            RuleShape::UnquotedJson => format!("${{1}}\"{MASK_MARKER}\""),
            RuleShape::QueryParam | RuleShape::GenericText => format!("${{1}}{MASK_MARKER}"),
        }
    }
}

/// One compiled (keyword, shape) rewrite rule. Immutable once built.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    keyword: String,
    shape: RuleShape,
    matcher: Regex,
    replacement: String,
}

impl CompiledRule {
    /// Compile the rule for `keyword` in the given shape. The keyword is
    /// escaped before embedding and matched case-insensitively.
    pub fn compile(keyword: &str, shape: RuleShape) -> Result<Self> {
        let source = shape.pattern(&regex::escape(keyword));
        let matcher = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| LogwardenError::RuleCompile {
                keyword: keyword.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            keyword: keyword.to_string(),
            shape,
            matcher,
            replacement: shape.replacement(),
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn shape(&self) -> RuleShape {
        self.shape
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Global substitution. Borrows the input when nothing matched.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.matcher.replace_all(text, self.replacement.as_str())
    }
}

/// Ordered keyword rule list: four rules per keyword, keyword order preserved.
pub struct KeywordRules {
    prefilter: Option<RegexSet>,
    rules: Vec<CompiledRule>,
}

impl KeywordRules {
    /// Compile rules for already normalized keywords.
    ///
    /// Only a keyword whose own pattern fails to compile is an error. The
    /// combined prefilter is optional and is left out when the set is too
    /// large for the regex size limits.
    pub fn compile(keywords: &[String]) -> Result<Self> {
        let mut rules = Vec::with_capacity(keywords.len() * RuleShape::ORDERED.len());
        for keyword in keywords {
            for shape in RuleShape::ORDERED {
                rules.push(CompiledRule::compile(keyword, shape)?);
            }
        }

        Ok(Self {
            prefilter: build_prefilter(&rules),
            rules,
        })
    }

    /// Whether a whole-input prefilter is in use.
    pub fn has_prefilter(&self) -> bool {
        self.prefilter.is_some()
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order, each over the output of the previous one.
    pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        if let Some(prefilter) = &self.prefilter {
            if !prefilter.is_match(input) {
                return Cow::Borrowed(input);
            }
        }

        let mut result: Cow<'a, str> = Cow::Borrowed(input);
        for rule in &self.rules {
            let replaced = match rule.apply(&result) {
                Cow::Owned(replaced) => replaced,
                Cow::Borrowed(_) => continue,
            };
            result = Cow::Owned(replaced);
        }
        result
    }
}

// If no rule matches the original text, no substitution can happen, so none
// can match later either.
fn build_prefilter(rules: &[CompiledRule]) -> Option<RegexSet> {
    if rules.is_empty() {
        return Some(RegexSet::empty());
    }
    let patterns = rules.iter().map(|r| r.matcher.as_str());
    match RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .size_limit(PREFILTER_SIZE_LIMIT)
        .build()
    {
        Ok(set) => Some(set),
        Err(e) => {
            tracing::debug!(
                rules = rules.len(),
                "masking prefilter disabled, applying rules directly: {}",
                e
            );
            None
        }
    }
}

impl Sanitizer for KeywordRules {
    fn sanitize<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self.apply(input)
    }

    fn name(&self) -> &str {
        "keyword_rules"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules_for(keywords: &[&str]) -> KeywordRules {
        let owned: Vec<String> = keywords.iter().map(|k| k.to_string()).collect();
        KeywordRules::compile(&owned).unwrap()
    }

    #[test]
    fn test_four_rules_per_keyword_in_fixed_order() {
        let rules = rules_for(&["password", "token"]);
        assert_eq!(rules.len(), 8);

        let order: Vec<(&str, RuleShape)> = rules
            .rules()
            .iter()
            .map(|r| (r.keyword(), r.shape()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("password", RuleShape::QuotedJson),
                ("password", RuleShape::UnquotedJson),
                ("password", RuleShape::QueryParam),
                ("password", RuleShape::GenericText),
                ("token", RuleShape::QuotedJson),
                ("token", RuleShape::UnquotedJson),
                ("token", RuleShape::QueryParam),
                ("token", RuleShape::GenericText),
            ]
        );
    }

    #[test]
    fn test_duplicates_produce_redundant_rules() {
        let rules = rules_for(&["token", "token"]);
        assert_eq!(rules.len(), 8);
        assert_eq!(rules.apply("token=abc"), "token=[MASKED]");
    }

    #[test]
    fn test_quoted_json_rule() {
        let rule = CompiledRule::compile("password", RuleShape::QuotedJson).unwrap();
        assert_eq!(
            rule.apply(r#"{"Password" : "hunter2"}"#),
            r#"{"Password" : "[MASKED]"}"#
        );
    }

    #[test]
    fn test_unquoted_json_rule() {
        let rule = CompiledRule::compile("pin", RuleShape::UnquotedJson).unwrap();
        assert_eq!(rule.apply(r#"{"pin": 1234, "a": 1}"#), r#"{"pin": "[MASKED]", "a": 1}"#);
        assert_eq!(rule.apply(r#"{"pin":true}"#), r#"{"pin":"[MASKED]"}"#);
    }

    #[test]
    fn test_query_param_rule() {
        let rule = CompiledRule::compile("token", RuleShape::QueryParam).unwrap();
        assert_eq!(rule.apply("a=1&token=xyz&b=2"), "a=1&token=[MASKED]&b=2");
        assert_eq!(rule.apply("mytoken=xyz"), "mytoken=xyz");
    }

    #[test]
    fn test_generic_text_rule() {
        let rule = CompiledRule::compile("secret", RuleShape::GenericText).unwrap();
        assert_eq!(rule.apply("SECRET: shh rest"), "SECRET: [MASKED] rest");
    }

    #[test]
    fn test_metacharacters_are_escaped() {
        let rules = rules_for(&["a.b", "x(y"]);
        assert_eq!(rules.apply("a.b=1 axb=2"), "a.b=[MASKED] axb=2");
        assert_eq!(rules.apply(r#"{"x(y":"v"}"#), r#"{"x(y":"[MASKED]"}"#);
    }

    #[test]
    fn test_no_match_borrows() {
        let rules = rules_for(&["password"]);
        assert!(matches!(rules.apply("nothing here"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_empty_rule_set() {
        let rules = KeywordRules::compile(&[]).unwrap();
        assert!(rules.is_empty());
        assert_eq!(rules.apply("password=abc"), "password=abc");
    }

    #[test]
    fn test_large_keyword_list_compiles_and_masks() {
        let keywords: Vec<String> = (0..600)
            .map(|i| format!("x_api_credential_{i}"))
            .collect();
        let rules = KeywordRules::compile(&keywords).unwrap();
        assert_eq!(rules.len(), 2400);

        assert_eq!(
            rules.apply("x_api_credential_599=abc&page=1"),
            "x_api_credential_599=[MASKED]&page=1"
        );
        assert_eq!(
            rules.apply(r#"{"X_API_CREDENTIAL_0":"v"}"#),
            r#"{"X_API_CREDENTIAL_0":"[MASKED]"}"#
        );
        assert!(matches!(rules.apply("nothing here"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_small_keyword_list_uses_prefilter() {
        assert!(rules_for(&["password", "token"]).has_prefilter());
    }
}
