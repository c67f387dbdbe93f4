//! Labelled, unit-annotated calculator output.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered mapping from metric label to formatted value
///
/// Insertion order is preserved, both when iterating and when serialized
/// as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: Vec<(&'static str, String)>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a metric, builder style
    pub fn with(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.push(label, value);
        self
    }

    pub fn push(&mut self, label: &'static str, value: impl Into<String>) {
        self.entries.push((label, value.into()));
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(l, v)| (*l, v.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(l, _)| *l)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Format with a fixed number of decimals and comma thousands separators
///
/// `format_grouped(1234567.891, 2)` gives `"1,234,567.89"`.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let plain = format!("{:.*}", decimals, value);
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    // Non-finite values ("inf", "NaN") have no digits to group
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return plain;
    }

    let mut grouped = String::with_capacity(plain.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
