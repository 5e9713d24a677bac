//! Reader for the on-disk analysis text format.
//!
//! The format is line oriented: a version line, then one block per section
//! in declared element order:
//!
//! ```text
//! products:
//! 2 items
//! /src/A.scala -> /out/A.class
//! /src/B.scala -> /out/B.class
//! ```
//!
//! Sections of non-inlined elements write `key -> ` on one line and the
//! value on the next.

use std::str::Lines;

use crate::analysis::{Analysis, FORMAT_VERSION_LINE};
use crate::element::Element;
use crate::elements::{Apis, CompileSetup, Compilations, Relations, SourceInfos, Stamps};
use crate::error::{AnalysisError, AnalysisResult};
use crate::section::Section;

const ITEM_SEPARATOR: &str = " -> ";
const VERSION_PREFIX: &str = "format version:";

/// Parses the text form of an analysis.
///
/// Every declared section must be present, in order, with exactly the
/// announced number of items. Repeated keys accumulate values.
pub fn parse_analysis(text: &str) -> AnalysisResult<Analysis> {
    let mut reader = LineReader::new(text);
    let version = reader.next_line("version line")?;
    if version != FORMAT_VERSION_LINE {
        return Err(if version.starts_with(VERSION_PREFIX) {
            AnalysisError::UnsupportedVersion {
                found: version[VERSION_PREFIX.len()..].trim().to_string(),
            }
        } else {
            reader.error(format!("expected '{FORMAT_VERSION_LINE}', found '{version}'"))
        });
    }

    let compile_setup = parse_element::<CompileSetup>(&mut reader)?;
    let relations = parse_element::<Relations>(&mut reader)?;
    let stamps = parse_element::<Stamps>(&mut reader)?;
    let apis = parse_element::<Apis>(&mut reader)?;
    let source_infos = parse_element::<SourceInfos>(&mut reader)?;
    let compilations = parse_element::<Compilations>(&mut reader)?;

    if let Some(extra) = reader.next_nonblank() {
        return Err(reader.error(format!("unexpected trailing content '{extra}'")));
    }

    Ok(Analysis::new(
        compile_setup,
        relations,
        stamps,
        apis,
        source_infos,
        compilations,
    ))
}

fn parse_element<E: Element>(reader: &mut LineReader<'_>) -> AnalysisResult<E> {
    let sections = E::HEADERS
        .iter()
        .map(|header| parse_section(reader, header, E::INLINE_VALUES))
        .collect::<AnalysisResult<Vec<_>>>()?;
    Ok(E::from_sections(sections))
}

fn parse_section(
    reader: &mut LineReader<'_>,
    header: &str,
    inline_values: bool,
) -> AnalysisResult<Section> {
    let line = reader.next_line(header)?;
    if line.strip_suffix(':') != Some(header) {
        return Err(reader.error(format!("expected section '{header}:', found '{line}'")));
    }

    let line = reader.next_line("item count")?;
    let count: usize = line
        .strip_suffix(" items")
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| reader.error(format!("expected '<N> items', found '{line}'")))?;

    let mut section = Section::new();
    for _ in 0..count {
        let line = reader.next_line("item")?;
        let (key, value) = if inline_values {
            line.split_once(ITEM_SEPARATOR)
                .ok_or_else(|| reader.error(format!("expected 'key -> value', found '{line}'")))?
        } else {
            let key = line
                .strip_suffix(ITEM_SEPARATOR)
                .or_else(|| line.strip_suffix(ITEM_SEPARATOR.trim_end()))
                .ok_or_else(|| reader.error(format!("expected 'key -> ', found '{line}'")))?;
            (key, reader.next_line("item value")?)
        };
        section.push(key, value);
    }
    Ok(section)
}

/// Line cursor that remembers the current line number for error reports.
struct LineReader<'a> {
    lines: Lines<'a>,
    line: usize,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self, expected: &str) -> AnalysisResult<&'a str> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                Ok(line)
            }
            None => Err(AnalysisError::Parse {
                line: self.line + 1,
                reason: format!("unexpected end of input, expected {expected}"),
            }),
        }
    }

    fn next_nonblank(&mut self) -> Option<&'a str> {
        for line in self.lines.by_ref() {
            self.line += 1;
            if !line.trim().is_empty() {
                return Some(line);
            }
        }
        None
    }

    fn error(&self, reason: String) -> AnalysisError {
        AnalysisError::Parse {
            line: self.line,
            reason,
        }
    }
}
