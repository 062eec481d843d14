use std::io::{BufRead, Lines};
use lazy_static::lazy_static;
use regex::Regex;
use crate::error::TraceError;

lazy_static! {
    static ref TRACE_LINE: Regex =
        Regex::new(r"^\s*(?P<op>[rRwW])\s+(?P<address>\S+)(?:\s+(?P<value>\S+))?\s*$")
            .expect("trace line pattern is valid");
}

/// A single access from a trace
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TraceOp {
    Read { address: u32 },
    Write { address: u32, value: u32 },
}

/// Parses one line of a trace.
///
/// Accepted forms are `R <address>` and `W <address> <value>`, with hex numbers which may carry
/// a `0x` prefix. Blank lines and lines starting with `#` yield `None`
///
/// # Arguments
///
/// * `line`: The 1-based line number, used in errors
/// * `text`: The line itself
///
/// returns: Result<Option<TraceOp>, TraceError>
///
/// # Examples
///
/// ```
/// use setcache::trace::{parse_line, TraceOp};
/// assert_eq!(parse_line(1, "W 0x10 ff").unwrap(), Some(TraceOp::Write { address: 0x10, value: 0xff }));
/// assert_eq!(parse_line(2, "# comment").unwrap(), None);
/// ```
pub fn parse_line(line: usize, text: &str) -> Result<Option<TraceOp>, TraceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let malformed = || TraceError::Malformed { line, text: text.to_string() };
    let tokens = TRACE_LINE.captures(trimmed).ok_or_else(malformed)?;
    let address = parse_hex(line, &tokens["address"])?;
    let value = tokens.name("value").map(|value| parse_hex(line, value.as_str())).transpose()?;
    match (&tokens["op"], value) {
        ("r" | "R", None) => Ok(Some(TraceOp::Read { address })),
        ("w" | "W", Some(value)) => Ok(Some(TraceOp::Write { address, value })),
        _ => Err(malformed()),
    }
}

fn parse_hex(line: usize, text: &str) -> Result<u32, TraceError> {
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
    u32::from_str_radix(digits, 16).map_err(|source| TraceError::BadNumber {
        line,
        text: text.to_string(),
        source,
    })
}

/// Iterator over the accesses in a trace, skipping blank and comment lines
pub struct TraceOps<R: BufRead> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> TraceOps<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceOps<R> {
    type Item = Result<TraceOp, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            match parse_line(self.line, &text) {
                Ok(Some(op)) => return Some(Ok(op)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
