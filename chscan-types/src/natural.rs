//! Natural ordering for channel strings.
//!
//! Digit runs compare by numeric value, everything else compares as text,
//! so `"9"` sorts before `"10"` and `"BS3_0"` before `"BS15_0"`.

use std::cmp::Ordering;

/// One run of a split channel string.
#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Text(&'a str),
    Digits(&'a str),
}

impl PartialEq for Segment<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Segment<'_> {}

impl Ord for Segment<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Digits(a), Segment::Digits(b)) => cmp_digits(a, b),
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            (Segment::Digits(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Digits(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Segment<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two ASCII digit runs by value without parsing them.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Sort key splitting a string into alternating text and digit runs.
///
/// The key always starts with a text run (empty when the string starts with
/// a digit), so runs at the same position are always of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey<'a>(Vec<Segment<'a>>);

impl<'a> NaturalKey<'a> {
    pub fn new(s: &'a str) -> Self {
        let mut segments = Vec::new();
        let mut rest = s;
        loop {
            let text_end = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
            segments.push(Segment::Text(&rest[..text_end]));
            rest = &rest[text_end..];
            if rest.is_empty() {
                break;
            }
            let digit_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            segments.push(Segment::Digits(&rest[..digit_end]));
            rest = &rest[digit_end..];
        }
        Self(segments)
    }
}

/// Natural-order comparison of two strings.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}
