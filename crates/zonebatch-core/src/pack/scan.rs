//! Scan format expansion.
//!
//! A format such as `theLL.com` with key `L` over `a..z` names every
//! `the??.com`. Keys are substituted in the order given; text already
//! replaced by one key is never searched for a later one.

use super::error::PackError;

/// A placeholder and the ordered values it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanKey {
    key: String,
    values: Vec<String>,
}

impl ScanKey {
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Result<Self, PackError> {
        let key = key.into();
        if key.is_empty() {
            return Err(PackError::EmptyKey);
        }
        if values.is_empty() {
            return Err(PackError::MissingValues(key));
        }
        Ok(Self { key, values })
    }

    /// `KEY VALUE...` as given on the command line.
    pub fn from_words(words: &[String]) -> Result<Self, PackError> {
        match words.split_first() {
            Some((key, values)) => Self::new(key.clone(), values.to_vec()),
            None => Err(PackError::EmptyKey),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

enum Part {
    Literal(String),
    Choice(Vec<String>),
}

/// Positions of `format`, each with its candidate strings in order.
///
/// Literal text is a position with a single candidate. Empty text between
/// adjacent keys does not produce a position.
pub fn expand_format(format: &str, keys: &[ScanKey]) -> Vec<Vec<String>> {
    let mut parts = vec![Part::Literal(format.to_string())];
    for scan_key in keys {
        let mut next = Vec::with_capacity(parts.len());
        for part in parts {
            let text = match part {
                Part::Literal(text) => text,
                choice => {
                    next.push(choice);
                    continue;
                }
            };
            let mut pieces = text.split(scan_key.key.as_str()).peekable();
            while let Some(piece) = pieces.next() {
                if !piece.is_empty() {
                    next.push(Part::Literal(piece.to_string()));
                }
                if pieces.peek().is_some() {
                    next.push(Part::Choice(scan_key.values.clone()));
                }
            }
        }
        parts = next;
    }
    parts
        .into_iter()
        .map(|part| match part {
            Part::Literal(text) => vec![text],
            Part::Choice(values) => values,
        })
        .collect()
}

/// Every name of a list of formats, one format after the other.
///
/// Within a format the last position varies fastest.
pub struct ScanNames {
    formats: std::vec::IntoIter<Vec<Vec<String>>>,
    current: Option<Odometer>,
}

impl ScanNames {
    pub fn new<S: AsRef<str>>(formats: &[S], keys: &[ScanKey]) -> Self {
        let expanded: Vec<_> = formats
            .iter()
            .map(|format| expand_format(format.as_ref(), keys))
            .collect();
        Self {
            formats: expanded.into_iter(),
            current: None,
        }
    }
}

impl Iterator for ScanNames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(name) = self.current.as_mut().and_then(Odometer::next) {
                return Some(name);
            }
            self.current = Some(Odometer::new(self.formats.next()?));
        }
    }
}

struct Odometer {
    positions: Vec<Vec<String>>,
    index: Vec<usize>,
    exhausted: bool,
}

impl Odometer {
    fn new(positions: Vec<Vec<String>>) -> Self {
        let exhausted = positions.iter().any(Vec::is_empty);
        Self {
            index: vec![0; positions.len()],
            positions,
            exhausted,
        }
    }

    fn next(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        let name = self
            .positions
            .iter()
            .zip(&self.index)
            .map(|(candidates, &i)| candidates[i].as_str())
            .collect();

        self.exhausted = true;
        for pos in (0..self.index.len()).rev() {
            self.index[pos] += 1;
            if self.index[pos] < self.positions[pos].len() {
                self.exhausted = false;
                break;
            }
            self.index[pos] = 0;
        }
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(words: &str) -> ScanKey {
        let words: Vec<String> = words.split_whitespace().map(String::from).collect();
        ScanKey::from_words(&words).unwrap()
    }

    #[test]
    fn key_needs_values() {
        assert!(matches!(
            ScanKey::from_words(&["N".to_string()]),
            Err(PackError::MissingValues(k)) if k == "N"
        ));
        assert!(matches!(ScanKey::from_words(&[]), Err(PackError::EmptyKey)));
        assert!(matches!(
            ScanKey::new("", vec!["a".to_string()]),
            Err(PackError::EmptyKey)
        ));
    }

    #[test]
    fn format_splits_into_literals_and_choices() {
        let positions = expand_format("aNbN.com", &[key("N 0 1")]);
        assert_eq!(
            positions,
            vec![
                vec!["a".to_string()],
                vec!["0".to_string(), "1".to_string()],
                vec!["b".to_string()],
                vec!["0".to_string(), "1".to_string()],
                vec![".com".to_string()],
            ]
        );
    }

    #[test]
    fn adjacent_keys_leave_no_empty_literal() {
        let positions = expand_format("LL", &[key("L x y")]);
        assert_eq!(positions.len(), 2);
    }

    #[test]
    fn later_keys_do_not_search_substituted_values() {
        // `N` expands to "L"; the later `L` key must not touch it.
        let names: Vec<String> =
            ScanNames::new(&["Nq.com"], &[key("N L"), key("L z")]).collect();
        assert_eq!(names, ["Lq.com"]);
    }

    #[test]
    fn names_vary_last_position_fastest_across_formats() {
        let names: Vec<String> =
            ScanNames::new(&["NL.com", "xN.net"], &[key("N 1 2"), key("L a b")]).collect();
        assert_eq!(
            names,
            ["1a.com", "1b.com", "2a.com", "2b.com", "x1.net", "x2.net"]
        );
    }

    #[test]
    fn format_without_keys_is_one_name() {
        let names: Vec<String> = ScanNames::new(&["plain.org"], &[key("N 1 2")]).collect();
        assert_eq!(names, ["plain.org"]);
    }
}
