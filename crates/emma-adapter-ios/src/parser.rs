//! Segment parser for line-oriented configurations

use crate::registry::{CompiledMatcher, CompiledPattern, PatternRegistry};
use emma_ir::{ParsedConfig, UNCAPTURED};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;
use tracing::{debug, trace};

/// How lines left outside every segment are determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncapturedMode {
    /// A line is captured when its own byte range overlaps a match
    #[default]
    Offset,

    /// A line is captured when any match contains a line with the same
    /// text, wherever that match is
    LineText,
}

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IosParserConfig {
    pub uncaptured_mode: UncapturedMode,

    /// Keep segments that matched nothing, with no blocks
    pub include_empty_segments: bool,
}

impl Default for IosParserConfig {
    fn default() -> Self {
        Self {
            uncaptured_mode: UncapturedMode::Offset,
            include_empty_segments: true,
        }
    }
}

impl IosParserConfig {
    #[must_use]
    pub fn with_uncaptured_mode(mut self, mode: UncapturedMode) -> Self {
        self.uncaptured_mode = mode;
        self
    }

    #[must_use]
    pub fn with_empty_segments(mut self, include: bool) -> Self {
        self.include_empty_segments = include;
        self
    }
}

/// Location of one segment instance in the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentSpan {
    pub segment: String,
    /// Byte range of the instance
    pub range: Range<usize>,
}

/// One line of the source, without its terminator
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    start: usize,
    text: &'a str,
}

impl Line<'_> {
    fn end(&self) -> usize {
        self.start + self.text.len()
    }

    fn is_stop(&self, sibling: &Regex) -> bool {
        self.text.is_empty() || self.text.starts_with('!') || sibling.is_match(self.text)
    }
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for raw in text.split_inclusive('\n') {
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        lines.push(Line {
            start,
            text: content,
        });
        start += raw.len();
    }
    lines
}

/// Splits line-oriented configurations into named segments
#[derive(Debug, Clone)]
pub struct IosParser {
    registry: PatternRegistry,
    config: IosParserConfig,
}

impl Default for IosParser {
    fn default() -> Self {
        Self::new()
    }
}

impl IosParser {
    /// Parser over the built-in patterns
    pub fn new() -> Self {
        Self::with_registry(PatternRegistry::builtin())
    }

    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            registry,
            config: IosParserConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: IosParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn config(&self) -> &IosParserConfig {
        &self.config
    }

    /// Locate every segment instance, in registry order then source order
    pub fn spans(&self, text: &str) -> Vec<SegmentSpan> {
        let lines = split_lines(text);
        self.registry
            .patterns()
            .iter()
            .flat_map(|pattern| {
                find_instances(pattern, text, &lines)
                    .into_iter()
                    .map(|range| SegmentSpan {
                        segment: pattern.name().to_string(),
                        range,
                    })
            })
            .collect()
    }

    /// Split `text` into segments.
    ///
    /// Segments follow registry order and [`UNCAPTURED`] comes last. Every
    /// instance is the exact source text of its match.
    pub fn parse(&self, text: &str) -> ParsedConfig {
        let lines = split_lines(text);
        let mut parsed = ParsedConfig::new();
        let mut captured: Vec<Range<usize>> = Vec::new();

        for pattern in self.registry.patterns() {
            let ranges = find_instances(pattern, text, &lines);
            debug!(segment = %pattern.name(), instances = ranges.len(), "Matched segment pattern");

            if ranges.is_empty() && !self.config.include_empty_segments {
                continue;
            }
            let blocks = ranges
                .iter()
                .map(|range| {
                    trace!(segment = %pattern.name(), start = range.start, end = range.end, "Segment instance");
                    text[range.clone()].to_string()
                })
                .collect();
            parsed.insert(pattern.name(), blocks);
            captured.extend(ranges);
        }

        let uncaptured = match self.config.uncaptured_mode {
            UncapturedMode::Offset => uncaptured_by_offset(&lines, captured),
            UncapturedMode::LineText => uncaptured_by_text(text, &captured),
        };
        debug!(lines = uncaptured.len(), "Collected uncaptured lines");
        parsed.insert(UNCAPTURED, uncaptured);
        parsed
    }
}

fn find_instances(pattern: &CompiledPattern, text: &str, lines: &[Line<'_>]) -> Vec<Range<usize>> {
    match &pattern.matcher {
        CompiledMatcher::Line(regex) => regex
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .map(|m| m.range())
            .collect(),
        CompiledMatcher::Block { start, sibling } => {
            find_blocks(start, sibling, text, lines)
        }
    }
}

/// Blocks run from a start line up to the next stop line.
///
/// A block still open at the end of the text only counts when the text ends
/// with a line terminator.
fn find_blocks(start: &Regex, sibling: &Regex, text: &str, lines: &[Line<'_>]) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !start.is_match(lines[i].text) {
            i += 1;
            continue;
        }

        match (i + 1..lines.len()).find(|&j| lines[j].is_stop(sibling)) {
            Some(stop) => {
                blocks.push(lines[i].start..lines[stop].start);
                i = stop;
            }
            None => {
                if text.ends_with('\n') {
                    blocks.push(lines[i].start..text.len());
                }
                break;
            }
        }
    }

    blocks
}

fn uncaptured_by_offset(lines: &[Line<'_>], mut captured: Vec<Range<usize>>) -> Vec<String> {
    captured.sort_by_key(|r| r.start);
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(captured.len());
    for range in captured {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }

    lines
        .iter()
        .filter(|line| !line.text.trim().is_empty())
        .filter(|line| {
            let first = merged.partition_point(|r| r.end <= line.start);
            merged
                .get(first)
                .is_none_or(|r| r.start >= line.end())
        })
        .map(|line| line.text.to_string())
        .collect()
}

fn uncaptured_by_text(text: &str, captured: &[Range<usize>]) -> Vec<String> {
    let captured_lines: HashSet<&str> = captured
        .iter()
        .flat_map(|range| text[range.clone()].lines())
        .collect();

    text.lines()
        .filter(|line| !line.trim().is_empty() && !captured_lines.contains(line))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SegmentPattern;

    const CONFIG: &str = "\
hostname r1
!
vlan 10
 name users
vlan 20
 name voice
!
interface Gi0/1
 description uplink
 switchport access vlan 10
interface Gi0/2
 shutdown
!
router ospf 1
 network 10.0.0.0 0.0.0.255 area 0
router bgp 65000
 neighbor 10.0.0.2 remote-as 65001
!
snmp-server community public RO
snmp-server location dc1
ip domain-name example.net
ntp server 10.0.0.1
ntp server 10.0.0.2
end
";

    #[test]
    fn test_block_segments() {
        let parsed = IosParser::new().parse(CONFIG);

        assert_eq!(
            parsed.get("vlan").unwrap(),
            ["vlan 10\n name users\n", "vlan 20\n name voice\n"]
        );
        assert_eq!(
            parsed.get("interface").unwrap(),
            [
                "interface Gi0/1\n description uplink\n switchport access vlan 10\n",
                "interface Gi0/2\n shutdown\n"
            ]
        );
        assert_eq!(
            parsed.get("ospf").unwrap(),
            ["router ospf 1\n network 10.0.0.0 0.0.0.255 area 0\n"]
        );
        assert_eq!(
            parsed.get("bgp").unwrap(),
            ["router bgp 65000\n neighbor 10.0.0.2 remote-as 65001\n"]
        );
    }

    #[test]
    fn test_single_line_segments() {
        let parsed = IosParser::new().parse(CONFIG);

        assert_eq!(
            parsed.get("snmp").unwrap(),
            ["snmp-server community public RO", "snmp-server location dc1"]
        );
        assert_eq!(parsed.get("dns_settings").unwrap(), ["ip domain-name example.net"]);
    }

    #[test]
    fn test_last_block_needs_terminator() {
        let parser = IosParser::new();

        let unterminated = parser.parse("ntp server 10.0.0.1\nntp server 10.0.0.2");
        assert_eq!(unterminated.get("ntp").unwrap(), ["ntp server 10.0.0.1\n"]);
        assert_eq!(unterminated.uncaptured(), ["ntp server 10.0.0.2"]);

        let terminated = parser.parse(CONFIG);
        assert_eq!(
            terminated.get("ntp").unwrap(),
            ["ntp server 10.0.0.1\n", "ntp server 10.0.0.2\nend\n"]
        );
    }

    #[test]
    fn test_uncaptured_and_order() {
        let parsed = IosParser::new().parse(CONFIG);

        assert_eq!(parsed.uncaptured(), ["hostname r1", "!", "!", "!", "!"]);
        assert_eq!(parsed.names().last(), Some(UNCAPTURED));
        assert_eq!(parsed.names().next(), Some("vlan"));
        assert!(parsed.get("eigrp").unwrap().is_empty());
    }

    #[test]
    fn test_line_text_mode_hides_duplicate_lines() {
        let config = "interface Gi0/1\n shutdown\n!\nrouter rip\n shutdown\n!\n";
        let offset = IosParser::new().parse(config);
        let line_text = IosParser::new()
            .with_config(IosParserConfig::default().with_uncaptured_mode(UncapturedMode::LineText))
            .parse(config);

        assert_eq!(offset.uncaptured(), ["!", "router rip", " shutdown", "!"]);
        assert_eq!(line_text.uncaptured(), ["!", "router rip", "!"]);
    }

    #[test]
    fn test_empty_segments_can_be_dropped() {
        let parser = IosParser::new()
            .with_config(IosParserConfig::default().with_empty_segments(false));
        let parsed = parser.parse(CONFIG);

        assert!(parsed.get("eigrp").is_none());
        assert!(parsed.get("vlan").is_some());
    }

    #[test]
    fn test_custom_registry() {
        let registry = PatternRegistry::from_patterns(vec![
            SegmentPattern::line("hostname", r"hostname\s+\S+"),
            SegmentPattern::repeating("broken", "vlan(("),
        ]);
        let parsed = IosParser::with_registry(registry).parse(CONFIG);

        assert_eq!(parsed.get("hostname").unwrap(), ["hostname r1"]);
        assert!(parsed.get("broken").is_none());
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_spans_point_into_source() {
        let parser = IosParser::new();
        for span in parser.spans(CONFIG) {
            let block = &CONFIG[span.range.clone()];
            assert!(parser.parse(CONFIG).get(&span.segment).unwrap().iter().any(|b| b == block));
        }
    }

    #[test]
    fn test_crlf_lines() {
        let parsed = IosParser::new().parse("vlan 10\r\n name users\r\n!\r\nhostname r1\r\n");

        assert_eq!(parsed.get("vlan").unwrap(), ["vlan 10\r\n name users\r\n"]);
        assert_eq!(parsed.uncaptured(), ["!", "hostname r1"]);
    }
}
