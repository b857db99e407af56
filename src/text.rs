//! Free-text normalization for requirement and condition fields.
//!
//! Keyword matching sits behind [`NormalizedText`] so the heuristics built
//! on it can move to structured units without touching their callers.

/// Lower-cased, trimmed free text with matching helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText(String);

/// Normalizes a possibly absent field. Absent is the empty string.
pub fn normalize(text: Option<&str>) -> NormalizedText {
    NormalizedText(text.unwrap_or_default().trim().to_lowercase())
}

/// Normalizes several fields joined by a space.
pub fn normalize_joined(parts: &[&str]) -> NormalizedText {
    normalize(Some(&parts.join(" ")))
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substring match. `keyword` is expected in lower case.
    pub fn contains(&self, keyword: &str) -> bool {
        self.0.contains(keyword)
    }

    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.contains(k))
    }

    /// The first contiguous run of ASCII digits as a base-10 integer.
    ///
    /// Signs and decimal points are not interpreted: `"-5"` yields 5 and
    /// `"18.5"` yields 18. Runs too long for `i64` yield `None`.
    pub fn first_integer(&self) -> Option<i64> {
        let start = self.0.find(|c: char| c.is_ascii_digit())?;
        let digits: &str = &self.0[start..];
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        digits[..end].parse().ok()
    }
}
