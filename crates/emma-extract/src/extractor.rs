//! Regex field extraction with match locations

use crate::rules::RuleSet;
use crate::{Error, Result};
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, trace, warn};

/// One occurrence of a field in a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatch {
    /// Matched text
    #[serde(rename = "match")]
    pub value: String,

    /// Character offset of the first matched character
    pub start: usize,

    /// Character offset just past the match
    pub end: usize,

    /// Byte range of the match, for slicing the block
    #[serde(skip)]
    pub bytes: Range<usize>,
}

/// Matches of one block, keyed by field name in rule order.
///
/// Fields that did not match are absent.
pub type BlockMatches = IndexMap<String, Vec<FieldMatch>>;

/// A rule left out of extraction, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRule {
    pub field: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    field: String,
    regex: Regex,
    /// Report group 1 instead of the whole match
    use_group: bool,
}

/// Applies a rule set to segment text.
///
/// Each rule is compiled in multi-line, dot-matches-newline mode. A rule
/// that does not compile is skipped; the remaining rules still run.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    rules: Vec<CompiledRule>,
    skipped: Vec<SkippedRule>,
}

impl FieldExtractor {
    pub fn new(rules: &RuleSet) -> Self {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut skipped = Vec::new();

        for (field, pattern) in rules.iter() {
            match compile(field, pattern) {
                Ok(rule) => compiled.push(rule),
                Err(e) => {
                    warn!(field, error = %e, "Skipping extraction rule");
                    skipped.push(SkippedRule {
                        field: field.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(rules = compiled.len(), skipped = skipped.len(), "Compiled extraction rules");
        Self {
            rules: compiled,
            skipped,
        }
    }

    /// Rules that failed to compile
    pub fn skipped(&self) -> &[SkippedRule] {
        &self.skipped
    }

    /// Names of the rules that will run, in order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.field.as_str())
    }

    /// Extract every field from one block
    pub fn extract(&self, text: &str) -> BlockMatches {
        let offsets = CharOffsets::new(text);
        let mut results = BlockMatches::new();

        for rule in &self.rules {
            let matches: Vec<FieldMatch> = rule
                .regex
                .captures_iter(text)
                .filter_map(|caps| {
                    if rule.use_group {
                        caps.get(1)
                    } else {
                        caps.get(0)
                    }
                })
                .map(|m| {
                    trace!(field = %rule.field, start = m.start(), end = m.end(), "Field match");
                    FieldMatch {
                        value: m.as_str().to_string(),
                        start: offsets.char_index(m.start()),
                        end: offsets.char_index(m.end()),
                        bytes: m.range(),
                    }
                })
                .collect();

            if !matches.is_empty() {
                results.insert(rule.field.clone(), matches);
            }
        }

        results
    }

    /// Extract every field from each block, in block order
    pub fn extract_all<S: AsRef<str>>(&self, blocks: &[S]) -> Vec<BlockMatches> {
        blocks.iter().map(|block| self.extract(block.as_ref())).collect()
    }
}

fn compile(field: &str, pattern: &str) -> Result<CompiledRule> {
    let regex = RegexBuilder::new(pattern)
        .multi_line(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| Error::InvalidRule {
            field: field.to_string(),
            message: match unsupported_syntax(pattern) {
                Some(feature) => format!(
                    "{feature} is not supported; rules use Rust regex syntax, \
                     which has no look-around or backreferences"
                ),
                None => e.to_string(),
            },
        })?;

    Ok(CompiledRule {
        field: field.to_string(),
        use_group: regex.captures_len() > 1,
        regex,
    })
}

/// First construct of `pattern` that Rust regex syntax lacks
fn unsupported_syntax(pattern: &str) -> Option<&'static str> {
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next_if(|next| ('1'..='9').contains(next)).is_some() {
                    return Some("Backreference");
                }
                chars.next();
            }
            '(' if chars.next_if_eq(&'?').is_some() => {
                let rest: String = chars.clone().take(2).collect();
                if rest.starts_with('=') || rest.starts_with('!') {
                    return Some("Look-ahead");
                }
                if rest == "<=" || rest == "<!" {
                    return Some("Look-behind");
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte to character offset conversion for one text
struct CharOffsets<'a> {
    text: &'a str,
    ascii: bool,
}

impl<'a> CharOffsets<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            ascii: text.is_ascii(),
        }
    }

    fn char_index(&self, byte: usize) -> usize {
        if self.ascii {
            byte
        } else {
            self.text[..byte].chars().count()
        }
    }
}
