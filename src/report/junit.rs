//! JUnit XML decoder.
//!
//! Accepts either a `<testsuites>` root holding `<testsuite>` children or a
//! bare `<testsuite>` root. Only direct `<testcase>` children of a suite are
//! read; everything else (properties, system-out, nested suites) is skipped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::ReportDecoder;
use crate::error::ReportError;
use crate::models::{RawReport, RawTestCase, RawTestSuite};

const TESTSUITES: &[u8] = b"testsuites";
const TESTSUITE: &[u8] = b"testsuite";
const TESTCASE: &[u8] = b"testcase";

/// Decoder for JUnit-style XML reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct JunitDecoder;

impl ReportDecoder for JunitDecoder {
    fn decode(&self, data: &[u8]) -> Result<RawReport, ReportError> {
        let text = std::str::from_utf8(data).map_err(malformed)?;

        // A document that mentions "testsuites" anywhere must use it as its root.
        let root = if text.contains("testsuites") {
            TESTSUITES
        } else {
            TESTSUITE
        };

        let suites = parse_document(text, root)?;
        if suites.is_empty() {
            return Err(ReportError::Malformed(
                "report contains no test suites".to_string(),
            ));
        }

        Ok(RawReport { suites })
    }
}

/// Position of the element being read, relative to the elements we care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Suites,
    Suite,
    Case,
    Other,
}

#[derive(Default)]
struct DocumentState {
    stack: Vec<Frame>,
    suites: Vec<RawTestSuite>,
    suite: Option<RawTestSuite>,
    case: Option<RawTestCase>,
    root_seen: bool,
}

impl DocumentState {
    /// Handle an opening tag. `empty` is true for self-closing elements.
    fn open(&mut self, e: &BytesStart, root: &[u8], empty: bool) -> Result<(), ReportError> {
        let local = e.local_name();
        let name = local.as_ref();

        let frame = match self.stack.last() {
            None => {
                if name != root {
                    return Err(ReportError::Malformed(format!(
                        "expected element type <{}> but have <{}>",
                        String::from_utf8_lossy(root),
                        String::from_utf8_lossy(name)
                    )));
                } else if name == TESTSUITES {
                    self.root_seen = true;
                    Frame::Suites
                } else {
                    self.root_seen = true;
                    self.suite = Some(read_suite(e)?);
                    Frame::Suite
                }
            }
            Some(Frame::Suites) if name == TESTSUITE => {
                self.suite = Some(read_suite(e)?);
                Frame::Suite
            }
            Some(Frame::Suite) if name == TESTCASE => {
                self.case = Some(read_case(e)?);
                Frame::Case
            }
            Some(Frame::Case) => {
                if let Some(case) = self.case.as_mut() {
                    match name {
                        b"failure" => case.markers.failure = true,
                        b"error" => case.markers.error = true,
                        b"skipped" => case.markers.skipped = true,
                        _ => {}
                    }
                }
                Frame::Other
            }
            Some(_) => Frame::Other,
        };

        self.stack.push(frame);
        if empty {
            self.close();
        }
        Ok(())
    }

    /// Handle a closing tag. Tag name matching is enforced by the reader.
    fn close(&mut self) {
        match self.stack.pop() {
            Some(Frame::Suite) => {
                if let Some(suite) = self.suite.take() {
                    self.suites.push(suite);
                }
            }
            Some(Frame::Case) => {
                if let (Some(case), Some(suite)) = (self.case.take(), self.suite.as_mut()) {
                    suite.cases.push(case);
                }
            }
            _ => {}
        }
    }

    fn root_closed(&self) -> bool {
        self.root_seen && self.stack.is_empty()
    }
}

fn parse_document(text: &str, root: &[u8]) -> Result<Vec<RawTestSuite>, ReportError> {
    let mut reader = Reader::from_str(text);
    let mut state = DocumentState::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            ReportError::Malformed(format!("{} at position {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => state.open(&e, root, false)?,
            Event::Empty(e) => state.open(&e, root, true)?,
            Event::End(_) => state.close(),
            Event::Eof => break,
            _ => {}
        }

        // Anything after the root element is ignored.
        if state.root_closed() {
            break;
        }
    }

    if !state.root_seen {
        return Err(ReportError::Malformed(format!(
            "no <{}> element found",
            String::from_utf8_lossy(root)
        )));
    }
    if !state.stack.is_empty() {
        return Err(ReportError::Malformed(
            "unexpected end of document".to_string(),
        ));
    }

    Ok(state.suites)
}

fn read_suite(e: &BytesStart) -> Result<RawTestSuite, ReportError> {
    Ok(RawTestSuite {
        name: attr(e, "name")?,
        tests: count_attr(e, "tests")?,
        failures: count_attr(e, "failures")?,
        errors: count_attr(e, "errors")?,
        skipped: count_attr(e, "skipped")?,
        time: time_attr(e)?,
        cases: Vec::new(),
    })
}

fn read_case(e: &BytesStart) -> Result<RawTestCase, ReportError> {
    let features = attr(e, "features")?
        .map(|tags| tags.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    Ok(RawTestCase {
        name: attr(e, "name")?.unwrap_or_default(),
        classname: attr(e, "classname")?.filter(|c| !c.is_empty()),
        time: time_attr(e)?,
        features,
        markers: Default::default(),
    })
}

fn attr(e: &BytesStart, name: &str) -> Result<Option<String>, ReportError> {
    match e.try_get_attribute(name).map_err(malformed)? {
        Some(attribute) => Ok(Some(
            attribute.unescape_value().map_err(malformed)?.into_owned(),
        )),
        None => Ok(None),
    }
}

/// Non-negative integer attribute; absent or empty means zero.
fn count_attr(e: &BytesStart, name: &str) -> Result<u32, ReportError> {
    match attr(e, name)? {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse::<u32>().map_err(|_| {
            ReportError::Malformed(format!("invalid value {:?} for attribute {}", raw, name))
        }),
        _ => Ok(0),
    }
}

/// Elapsed time in seconds; absent or empty means zero.
fn time_attr(e: &BytesStart) -> Result<f64, ReportError> {
    match attr(e, "time")? {
        Some(raw) if !raw.trim().is_empty() => match raw.trim().parse::<f64>() {
            Ok(time) if time.is_finite() && time >= 0.0 => Ok(time),
            _ => Err(ReportError::Malformed(format!(
                "invalid value {:?} for attribute time",
                raw
            ))),
        },
        _ => Ok(0.0),
    }
}

fn malformed(err: impl std::fmt::Display) -> ReportError {
    ReportError::Malformed(err.to_string())
}
