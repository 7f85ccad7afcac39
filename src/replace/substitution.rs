//! Single-shot regex substitution over text.
//!
//! Replacement templates support exactly these references:
//!
//! - `$1`..`$99`: numbered group. Two digits are taken only when that group
//!   exists, so `$110.9.8` against a pattern with one group expands to group 1
//!   followed by `10.9.8`.
//! - `$&`: the whole match.
//! - `` $` `` / `$'`: the text before / after the match.
//! - `$<name>` and `${name}`: named group; `${N}` is also numbered group N.
//! - `$$`: a literal dollar sign.
//!
//! Any other `$` is kept as literal text. Groups that did not participate, or
//! names the pattern does not define, expand to nothing.

use crate::error::Result;
use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Group(usize),
    Named(String),
    Before,
    After,
}

/// Parsed replacement template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `template` for a pattern with `group_count` capture groups
    pub fn parse(template: &str, group_count: usize) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < template.len() {
            let rest = &template[i..];
            if !rest.starts_with('$') {
                let next = rest.find('$').unwrap_or(rest.len());
                literal.push_str(&rest[..next]);
                i += next;
                continue;
            }

            let after = &rest[1..];
            let reference = match after.as_bytes().first() {
                Some(b'$') => {
                    literal.push('$');
                    i += 2;
                    continue;
                }
                Some(b'&') => Some((Segment::Group(0), 2)),
                Some(b'`') => Some((Segment::Before, 2)),
                Some(b'\'') => Some((Segment::After, 2)),
                Some(b'<') => after.find('>').and_then(|end| {
                    let name = &after[1..end];
                    is_group_name(name).then(|| (Segment::Named(name.to_string()), end + 2))
                }),
                Some(b'{') => after.find('}').and_then(|end| {
                    let name = &after[1..end];
                    if !is_group_name(name) {
                        return None;
                    }
                    let segment = match name.parse::<usize>() {
                        Ok(n) => Segment::Group(n),
                        Err(_) => Segment::Named(name.to_string()),
                    };
                    Some((segment, end + 2))
                }),
                Some(d) if d.is_ascii_digit() => numbered_reference(after, group_count),
                _ => None,
            };

            match reference {
                Some((segment, consumed)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                    i += consumed;
                }
                None => {
                    literal.push('$');
                    i += 1;
                }
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Template { segments }
    }

    /// Expand the template against one match found in `haystack`
    pub fn render(&self, haystack: &str, captures: &Captures<'_>, out: &mut String) {
        let whole = captures.get(0).map_or(0..0, |m| m.range());
        for segment in &self.segments {
            let text = match segment {
                Segment::Literal(s) => s.as_str(),
                Segment::Group(n) => captures.get(*n).map_or("", |m| m.as_str()),
                Segment::Named(name) => captures.name(name).map_or("", |m| m.as_str()),
                Segment::Before => &haystack[..whole.start],
                Segment::After => &haystack[whole.end..],
            };
            out.push_str(text);
        }
    }
}

fn is_group_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `$N` or `$NN` right after the dollar sign; returns the segment and the
/// number of bytes consumed including the `$`.
fn numbered_reference(after: &str, group_count: usize) -> Option<(Segment, usize)> {
    let digits: Vec<usize> = after
        .bytes()
        .take(2)
        .take_while(u8::is_ascii_digit)
        .map(|b| usize::from(b - b'0'))
        .collect();

    if let [first, second] = digits[..] {
        let two = first * 10 + second;
        if (1..=group_count).contains(&two) {
            return Some((Segment::Group(two), 3));
        }
    }

    let first = *digits.first()?;
    (1..=group_count)
        .contains(&first)
        .then_some((Segment::Group(first), 2))
}

/// Result of applying a substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    pub text: String,
    pub matched: bool,
}

/// A compiled pattern plus replacement template.
///
/// Only the first match is replaced.
#[derive(Debug, Clone)]
pub struct Substitution {
    regex: Regex,
    template: Template,
}

impl Substitution {
    pub fn new(expression: &str, template: &str) -> Result<Self> {
        let regex = Regex::new(expression)?;
        let template = Template::parse(template, regex.captures_len() - 1);
        Ok(Substitution { regex, template })
    }

    pub fn expression(&self) -> &str {
        self.regex.as_str()
    }

    pub fn apply(&self, text: &str) -> Substituted {
        let Some(captures) = self.regex.captures(text) else {
            return Substituted {
                text: text.to_string(),
                matched: false,
            };
        };

        // group 0 always participates
        let whole = captures.get(0).map_or(0..0, |m| m.range());
        let mut out = String::with_capacity(text.len());
        out.push_str(&text[..whole.start]);
        self.template.render(text, &captures, &mut out);
        out.push_str(&text[whole.end..]);

        Substituted {
            text: out,
            matched: true,
        }
    }
}
