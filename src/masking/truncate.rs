use std::borrow::Cow;

use super::{Sanitizer, TRUNCATION_SUFFIX};

/// Cut `text` after `max_len` code points and append [`TRUNCATION_SUFFIX`].
/// Text within the limit is returned borrowed.
pub fn truncate_code_points(text: &str, max_len: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + TRUNCATION_SUFFIX.len());
            out.push_str(&text[..cut]);
            out.push_str(TRUNCATION_SUFFIX);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(text),
    }
}

/// Final pipeline layer: caps payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    max_len: Option<usize>,
}

impl Truncation {
    /// A limit `<= 0` disables truncation.
    pub fn from_limit(limit: i64) -> Self {
        let max_len = if limit <= 0 {
            None
        } else {
            Some(usize::try_from(limit).unwrap_or(usize::MAX))
        };
        Self { max_len }
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }
}

impl Sanitizer for Truncation {
    fn sanitize<'a>(&self, input: &'a str) -> Cow<'a, str> {
        match self.max_len {
            Some(max_len) => truncate_code_points(input, max_len),
            None => Cow::Borrowed(input),
        }
    }

    fn name(&self) -> &str {
        "truncation"
    }
}
