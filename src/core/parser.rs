//! JaCoCo XML report parsing
//!
//! This module provides the ReportSource trait (where report bytes come from)
//! and the counter walk that turns a report document into CounterRecords.

use crate::core::error::{GateError, Result};
use crate::core::models::{CounterKind, CounterRecord};
use encoding_rs::{Encoding, UTF_8};
use roxmltree::{Document, Node, ParsingOptions};
use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// Which `<counter>` elements are collected from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterScope {
    /// Every counter at any depth (report, package, class, method, sourcefile).
    /// Nested levels repeat the same lines, so totals are inflated.
    #[default]
    All,
    /// Only counters that are direct children of the root element.
    Report,
}

impl CounterScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Report => "report",
        }
    }
}

/// Trait for obtaining report contents
///
/// This trait allows for mocking in tests and alternative implementations
/// (e.g., reports fetched from an artifact store).
#[cfg_attr(test, automock)]
pub trait ReportSource {
    /// Check whether a report exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the raw report bytes
    fn read_report(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Reads reports from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReportSource;

impl ReportSource for FsReportSource {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_report(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => GateError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => GateError::UnreadableReport {
                path: path.to_path_buf(),
                source,
            },
        })
    }
}

/// Parse report bytes into counter records.
///
/// The bytes are decoded using a byte order mark if present, otherwise the
/// encoding named in the XML declaration, otherwise UTF-8.
/// `path` is only used for error messages.
pub fn parse_report_bytes(
    path: &Path,
    bytes: &[u8],
    scope: CounterScope,
) -> Result<Vec<CounterRecord>> {
    let text = decode_report(path, bytes)?;
    parse_report_str(path, &text, scope)
}

fn decode_report<'a>(path: &Path, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => {
            let encoding = match declared_encoding(bytes) {
                Some(label) => Encoding::for_label(label.as_bytes()).ok_or_else(|| {
                    GateError::malformed(path, format!("unsupported encoding '{}'", label))
                })?,
                None => UTF_8,
            };
            (encoding, bytes)
        }
    };

    tracing::debug!(encoding = encoding.name(), "decoding report");
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            GateError::malformed(path, format!("report is not valid {}", encoding.name()))
        })
}

/// `encoding` pseudo-attribute of an ASCII-compatible XML declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let head = bytes.strip_prefix(b"<?xml")?;
    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&head[..end]).ok()?;

    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    value.find(quote).map(|i| &value[..i])
}

/// Parse report text into counter records.
pub fn parse_report_str(path: &Path, xml: &str, scope: CounterScope) -> Result<Vec<CounterRecord>> {
    let xml = xml.trim_start_matches('\u{feff}');

    // JaCoCo emits a DOCTYPE referencing report.dtd; the external subset is never loaded.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| GateError::malformed(path, e.to_string()))?;

    let root = doc.root_element();
    let counters: Vec<Node> = match scope {
        CounterScope::All => root.descendants().skip(1).filter(is_counter).collect(),
        CounterScope::Report => root.children().filter(is_counter).collect(),
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for node in &counters {
        let covered = read_count(path, &doc, node, "covered")?;
        let missed = read_count(path, &doc, node, "missed")?;

        let Some(type_attr) = node.attribute("type") else {
            tracing::warn!(line = line_of(&doc, node), "counter without type attribute skipped");
            continue;
        };

        match CounterKind::parse(type_attr) {
            Some(kind) => records.push(CounterRecord::new(kind, covered, missed)),
            None => skipped += 1,
        }
    }

    tracing::debug!(
        scope = scope.as_str(),
        counters = counters.len(),
        tracked = records.len(),
        untracked = skipped,
        "parsed coverage counters"
    );

    Ok(records)
}

fn is_counter(node: &Node) -> bool {
    node.is_element() && node.tag_name().name() == "counter"
}

fn line_of(doc: &Document, node: &Node) -> u32 {
    doc.text_pos_at(node.range().start).row
}

/// Read a non-negative count attribute, defaulting to 0 when absent.
fn read_count(path: &Path, doc: &Document, node: &Node, attr: &str) -> Result<u64> {
    match node.attribute(attr) {
        None => Ok(0),
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
            GateError::malformed(
                path,
                format!(
                    "counter at line {} has invalid {} value '{}'",
                    line_of(doc, node),
                    attr,
                    raw
                ),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JACOCO_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<!DOCTYPE report PUBLIC "-//JACOCO//DTD Report 1.1//EN" "report.dtd">
<report name="wallet">
  <sessioninfo id="host-1" start="1700000000000" dump="1700000001000"/>
  <package name="com/github/yildizmy/service">
    <class name="com/github/yildizmy/service/WalletService" sourcefilename="WalletService.java">
      <method name="getById" desc="(J)V" line="42">
        <counter type="INSTRUCTION" missed="2" covered="10"/>
        <counter type="LINE" missed="1" covered="3"/>
        <counter type="METHOD" missed="0" covered="1"/>
      </method>
      <counter type="INSTRUCTION" missed="2" covered="10"/>
      <counter type="LINE" missed="1" covered="3"/>
      <counter type="BRANCH" missed="1" covered="1"/>
      <counter type="CLASS" missed="0" covered="1"/>
    </class>
  </package>
  <counter type="INSTRUCTION" missed="2" covered="10"/>
  <counter type="LINE" missed="1" covered="3"/>
  <counter type="BRANCH" missed="1" covered="1"/>
</report>
"#;

    fn parse(xml: &str) -> Result<Vec<CounterRecord>> {
        parse_report_str(Path::new("jacoco.xml"), xml, CounterScope::All)
    }

    fn sum(records: &[CounterRecord], kind: CounterKind) -> (u64, u64) {
        records
            .iter()
            .filter(|r| r.kind == kind)
            .fold((0, 0), |(c, m), r| (c + r.covered, m + r.missed))
    }

    #[test]
    fn test_collects_counters_at_every_depth() {
        let records = parse(JACOCO_SAMPLE).unwrap();
        // method + class + report level
        assert_eq!(sum(&records, CounterKind::Instruction), (30, 6));
        assert_eq!(sum(&records, CounterKind::Line), (9, 3));
        // class + report level
        assert_eq!(sum(&records, CounterKind::Branch), (2, 2));
    }

    #[test]
    fn test_untracked_kinds_are_skipped() {
        let records = parse(JACOCO_SAMPLE).unwrap();
        assert_eq!(records.len(), 8);
    }

    #[test]
    fn test_report_scope_reads_root_counters_only() {
        let path = Path::new("jacoco.xml");
        let records = parse_report_str(path, JACOCO_SAMPLE, CounterScope::Report).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(sum(&records, CounterKind::Line), (3, 1));
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let xml = r#"<report><counter type="LINE" covered="4"/><counter type="BRANCH"/></report>"#;
        let records = parse(xml).unwrap();
        assert_eq!(records[0], CounterRecord::new(CounterKind::Line, 4, 0));
        assert_eq!(records[1], CounterRecord::new(CounterKind::Branch, 0, 0));
    }

    #[test]
    fn test_counter_without_type_is_skipped() {
        let records = parse(r#"<report><counter covered="4" missed="1"/></report>"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_root_counter_element_is_not_counted() {
        let records = parse(r#"<counter type="LINE" covered="4" missed="1"/>"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_invalid_count_is_malformed() {
        let xml = r#"<report><counter type="LINE" covered="many" missed="1"/></report>"#;
        let err = parse(xml).unwrap_err();
        assert!(matches!(err, GateError::MalformedReport { .. }));
        assert!(err.to_string().contains("many"));
    }

    #[test]
    fn test_negative_count_is_malformed() {
        let xml = r#"<report><counter type="LINE" covered="3" missed="-1"/></report>"#;
        let err = parse(xml).unwrap_err();
        assert!(matches!(err, GateError::MalformedReport { .. }));
    }

    #[test]
    fn test_invalid_count_on_untracked_kind_is_malformed() {
        let err = parse(r#"<report><counter type="METHOD" covered="x"/></report>"#).unwrap_err();
        assert!(matches!(err, GateError::MalformedReport { .. }));
    }

    #[test]
    fn test_not_well_formed() {
        let err = parse("<report><counter type=\"LINE\"></report>").unwrap_err();
        assert!(matches!(err, GateError::MalformedReport { .. }));

        let err = parse("this is not xml").unwrap_err();
        assert!(matches!(err, GateError::MalformedReport { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let bytes = [0x3c, 0xff, 0xfe, 0x3e];
        let err = parse_report_bytes(Path::new("r.xml"), &bytes, CounterScope::All).unwrap_err();
        assert!(matches!(err, GateError::MalformedReport { .. }));
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_byte_order_mark_is_tolerated() {
        let xml = "\u{feff}<report><counter type=\"LINE\" covered=\"1\" missed=\"1\"/></report>";
        assert_eq!(parse(xml).unwrap().len(), 1);
    }

    #[test]
    fn test_latin1_report_is_decoded() {
        let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?><report name="caf"#.to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(br#""><counter type="LINE" covered="8" missed="2"/></report>"#);

        let records = parse_report_bytes(Path::new("r.xml"), &bytes, CounterScope::All).unwrap();
        assert_eq!(records, vec![CounterRecord::new(CounterKind::Line, 8, 2)]);
    }

    #[test]
    fn test_utf16_report_with_bom_is_decoded() {
        let xml = r#"<?xml version="1.0" encoding="UTF-16"?><report name="Größe">
            <counter type="LINE" covered="3" missed="1"/></report>"#;
        let bytes: Vec<u8> = std::iter::once(0xFEFFu16)
            .chain(xml.encode_utf16())
            .flat_map(|unit| unit.to_le_bytes())
            .collect();

        let records = parse_report_bytes(Path::new("r.xml"), &bytes, CounterScope::All).unwrap();
        assert_eq!(records, vec![CounterRecord::new(CounterKind::Line, 3, 1)]);
    }

    #[test]
    fn test_unknown_declared_encoding_is_malformed() {
        let xml = r#"<?xml version="1.0" encoding="x-made-up"?><report/>"#;
        let err = parse_report_bytes(Path::new("r.xml"), xml.as_bytes(), CounterScope::All)
            .unwrap_err();
        assert!(matches!(err, GateError::MalformedReport { .. }));
        assert!(err.to_string().contains("x-made-up"));
    }

    #[test]
    fn test_declared_encoding() {
        let double = br#"<?xml version="1.0" encoding="UTF-8"?><r/>"#;
        assert_eq!(declared_encoding(double), Some("UTF-8"));
        let single = b"<?xml version='1.0' encoding = 'latin1' ?>";
        assert_eq!(declared_encoding(single), Some("latin1"));
        assert_eq!(declared_encoding(br#"<?xml version="1.0"?><r encoding="x"/>"#), None);
        assert_eq!(declared_encoding(b"<report/>"), None);
    }

    #[test]
    fn test_fs_source_missing_file() {
        let source = FsReportSource;
        let path = Path::new("/definitely/not/here/jacoco.xml");
        assert!(!source.exists(path));
        assert!(matches!(source.read_report(path), Err(GateError::FileNotFound { .. })));
    }

    #[test]
    fn test_fs_source_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("jacoco.xml");
        std::fs::write(&path, JACOCO_SAMPLE).unwrap();

        let source = FsReportSource;
        assert!(source.exists(&path));
        let bytes = source.read_report(&path).unwrap();
        assert_eq!(parse_report_bytes(&path, &bytes, CounterScope::All).unwrap().len(), 8);
    }
}
