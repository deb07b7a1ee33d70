/// Value of a FITS header card.
#[derive(Clone, Debug, PartialEq)]
pub enum HeaderValue {
    Logical(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl HeaderValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Logical(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logical(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for HeaderValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for HeaderValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for HeaderValue {
    fn from(v: bool) -> Self {
        Self::Logical(v)
    }
}

impl From<&str> for HeaderValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// One 80-character header record.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub keyword: String,
    pub value: Option<HeaderValue>,
    pub comment: Option<String>,
}

impl Card {
    pub fn is_commentary(&self) -> bool {
        is_commentary(&self.keyword)
    }
}

/// Ordered list of FITS header cards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|c| !c.is_commentary() && c.keyword.eq_ignore_ascii_case(keyword))
            .and_then(|c| c.value.as_ref())
    }

    pub fn get_f64(&self, keyword: &str) -> Option<f64> {
        self.get(keyword).and_then(HeaderValue::as_f64)
    }

    pub fn get_i64(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(HeaderValue::as_i64)
    }

    pub fn get_str(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).and_then(HeaderValue::as_str)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    /// Set a keyword, replacing the first existing card with that keyword.
    pub fn set(&mut self, keyword: &str, value: impl Into<HeaderValue>) {
        let keyword = keyword.to_ascii_uppercase();
        let value = Some(value.into());
        match self
            .cards
            .iter_mut()
            .find(|c| !c.is_commentary() && c.keyword == keyword)
        {
            Some(card) => card.value = value,
            None => self.cards.push(Card {
                keyword,
                value,
                comment: None,
            }),
        }
    }

    pub fn remove(&mut self, keyword: &str) {
        self.cards
            .retain(|c| c.is_commentary() || !c.keyword.eq_ignore_ascii_case(keyword));
    }

    pub fn add_history(&mut self, text: &str) {
        self.cards.push(Card {
            keyword: "HISTORY".into(),
            value: None,
            comment: Some(text.to_string()),
        });
    }

    pub fn history(&self) -> Vec<&str> {
        self.cards
            .iter()
            .filter(|c| c.keyword == "HISTORY")
            .filter_map(|c| c.comment.as_deref())
            .collect()
    }

    pub(crate) fn push(&mut self, card: Card) {
        self.cards.push(card);
    }
}

/// Keywords that describe the data layout; cfitsio writes these itself.
pub(crate) fn is_structural(keyword: &str) -> bool {
    matches!(
        keyword,
        "SIMPLE" | "BITPIX" | "NAXIS" | "EXTEND" | "BSCALE" | "BZERO" | "END" | "PCOUNT" | "GCOUNT"
    ) || keyword
        .strip_prefix("NAXIS")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

pub(crate) fn is_commentary(keyword: &str) -> bool {
    matches!(keyword, "HISTORY" | "COMMENT" | "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_existing() {
        let mut h = Header::new();
        h.set("EXPTIME", 10.0);
        h.set("exptime", 20.0);
        assert_eq!(h.len(), 1);
        assert_eq!(h.get_f64("EXPTIME"), Some(20.0));
    }

    #[test]
    fn test_history_is_not_a_value() {
        let mut h = Header::new();
        h.set("FILTER", "V");
        h.add_history("Bias subtracted");
        h.add_history("Flat fielded");
        assert_eq!(h.history(), vec!["Bias subtracted", "Flat fielded"]);
        assert!(!h.contains("HISTORY"));
        h.remove("FILTER");
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(HeaderValue::Integer(5).as_f64(), Some(5.0));
        assert_eq!(HeaderValue::Float(512.0).as_i64(), Some(512));
        assert_eq!(HeaderValue::Float(1.5).as_i64(), None);
        assert_eq!(HeaderValue::from(" 1.25 ").as_f64(), Some(1.25));
        assert_eq!(HeaderValue::Logical(true).as_f64(), None);
    }

    #[test]
    fn test_structural_keywords() {
        assert!(is_structural("NAXIS"));
        assert!(is_structural("NAXIS2"));
        assert!(is_structural("BZERO"));
        assert!(!is_structural("NAXISX"));
        assert!(!is_structural("OBJECT"));
    }
}
