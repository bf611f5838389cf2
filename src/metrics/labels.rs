use std::fmt::Write as _;

/// An ordered set of label name/value pairs identifying one time series.
///
/// Pairs are kept sorted by name, so two sets built from the same pairs in
/// any order compare equal, hash identically, and render identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelSet {
    pairs: Vec<(String, String)>,
}

impl LabelSet {
    /// An empty label set (a metric with a single unlabeled series).
    pub fn empty() -> Self {
        LabelSet { pairs: Vec::new() }
    }

    /// Builds a label set from name/value pairs. Pairs are sorted by name;
    /// if a name repeats, the last value wins.
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        let mut out: Vec<(String, String)> = Vec::new();
        for (name, value) in pairs {
            let name = name.into();
            let value = value.into();
            match out.iter_mut().find(|(n, _)| *n == name) {
                Some(existing) => existing.1 = value,
                None => out.push((name, value)),
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        LabelSet { pairs: out }
    }

    /// Convenience constructor for a single-label set.
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        LabelSet {
            pairs: vec![(name.into(), value.into())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Renders the pairs as `name="value",...` without surrounding braces,
    /// escaping values per the exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{}=\"{}\"", name, escape_label_value(value));
        }
        out
    }
}

/// Escapes a label value for the exposition format: backslash, double
/// quote, and line feed.
pub fn escape_label_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
