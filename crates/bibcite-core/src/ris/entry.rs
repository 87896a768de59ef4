//! Tagged records between `TY  -` and `ER  -`

/// The `TY` code of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RisType {
    Jour,
    Ejour,
    Mgzn,
    News,
    Book,
    Ebook,
    Edbook,
    Chap,
    Conf,
    Cpaper,
    Thes,
    Rprt,
    Elec,
    Blog,
    Unpb,
    Gen,
    /// Uppercased and written back unchanged
    Other(String),
}

use RisType as T;

const CODES: &[(&str, RisType)] = &[
    ("JOUR", T::Jour),
    ("EJOUR", T::Ejour),
    ("MGZN", T::Mgzn),
    ("NEWS", T::News),
    ("BOOK", T::Book),
    ("EBOOK", T::Ebook),
    ("EDBOOK", T::Edbook),
    ("CHAP", T::Chap),
    ("CONF", T::Conf),
    ("CPAPER", T::Cpaper),
    ("THES", T::Thes),
    ("RPRT", T::Rprt),
    ("ELEC", T::Elec),
    ("BLOG", T::Blog),
    ("UNPB", T::Unpb),
    ("GEN", T::Gen),
];

impl RisType {
    /// An empty code means `GEN`
    pub fn from_code(raw: &str) -> Self {
        let code = raw.trim();
        if code.is_empty() {
            return T::Gen;
        }
        CODES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|(_, kind)| kind.clone())
            .unwrap_or_else(|| T::Other(code.to_ascii_uppercase()))
    }

    pub fn code(&self) -> &str {
        match self {
            T::Other(code) => code,
            known => CODES
                .iter()
                .find(|(_, kind)| kind == known)
                .map_or("GEN", |(code, _)| *code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RisTag {
    pub tag: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RisEntry {
    pub entry_type: RisType,
    /// Input order; `TY` and `ER` are not stored here
    pub tags: Vec<RisTag>,
    /// Line of the `TY` tag (1-based)
    pub line: u32,
}

impl RisEntry {
    pub fn new(entry_type: RisType) -> Self {
        Self {
            entry_type,
            tags: Vec::new(),
            line: 0,
        }
    }

    pub fn add_tag(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let (tag, value) = (tag.into(), value.into());
        self.tags.push(RisTag { tag, value });
    }

    pub fn get_tag(&self, tag: &str) -> Option<&str> {
        self.tags
            .iter()
            .find_map(|t| t.tag.eq_ignore_ascii_case(tag).then_some(t.value.as_str()))
    }

    /// Every value of a repeatable tag such as `AU` or `KW`
    pub fn tag_values<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |t| t.tag.eq_ignore_ascii_case(tag))
            .map(|t| t.value.as_str())
    }

    /// The `ID` tag, ignoring a blank one
    pub fn id(&self) -> Option<&str> {
        self.get_tag("ID").map(str::trim).filter(|id| !id.is_empty())
    }
}

/// Two characters: an uppercase letter, then an uppercase letter or digit
pub fn is_ris_tag(tag: &str) -> bool {
    matches!(
        tag.as_bytes(),
        [first, second] if first.is_ascii_uppercase()
            && (second.is_ascii_uppercase() || second.is_ascii_digit())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_ignore_case_and_padding() {
        assert_eq!(RisType::from_code("jour"), RisType::Jour);
        assert_eq!(RisType::from_code(" BOOK "), RisType::Book);
        assert_eq!(RisType::from_code(""), RisType::Gen);
        assert_eq!(RisType::Thes.code(), "THES");
    }

    #[test]
    fn test_unknown_code_is_kept_uppercased() {
        let kind = RisType::from_code("pat");
        assert_eq!(kind, RisType::Other("PAT".into()));
        assert_eq!(kind.code(), "PAT");
    }

    #[test]
    fn test_repeated_tags() {
        let mut entry = RisEntry::new(RisType::Jour);
        entry.add_tag("TI", "Deep learning");
        entry.add_tag("AU", "LeCun, Yann");
        entry.add_tag("AU", "Bengio, Yoshua");
        entry.add_tag("ID", " ");

        assert_eq!(entry.get_tag("ti"), Some("Deep learning"));
        let authors: Vec<_> = entry.tag_values("AU").collect();
        assert_eq!(authors, vec!["LeCun, Yann", "Bengio, Yoshua"]);
        assert_eq!(entry.id(), None);
    }

    #[test]
    fn test_tag_shape() {
        for good in ["T2", "KW", "A1"] {
            assert!(is_ris_tag(good), "{good}");
        }
        for bad in ["2T", "kw", "TAG", "T"] {
            assert!(!is_ris_tag(bad), "{bad}");
        }
    }
}
