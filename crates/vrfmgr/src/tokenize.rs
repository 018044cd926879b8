//! Whitespace tokenizer and fixed-arity record reader for the route domain
//! file.

use std::io::BufRead;
use std::ops::Index;

use tracing::{debug, warn};

/// Whitespace as classified by C `isspace` in the POSIX locale.
///
/// Unlike [`u8::is_ascii_whitespace`] this includes vertical tab.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Split `line` into at most `words.len()` whitespace separated words.
///
/// Words are written to the front of `words` in order and the number written
/// is returned; 0 for a blank line. Once the slice is full splitting stops,
/// and anything after the last word is ignored.
pub fn getwords<'a>(line: &'a str, words: &mut [&'a str]) -> usize {
    let bytes = line.as_bytes();
    let mut pos = 0;
    let mut nwords = 0;

    while nwords < words.len() {
        while pos < bytes.len() && is_space(bytes[pos]) {
            pos += 1;
        }
        if pos == bytes.len() {
            break;
        }

        let start = pos;
        while pos < bytes.len() && !is_space(bytes[pos]) {
            pos += 1;
        }
        // Both ends sit next to ASCII bytes, so they are char boundaries
        words[nwords] = &line[start..pos];
        nwords += 1;
    }

    nwords
}

/// Parse a numeric word the way C `atol` does.
///
/// Leading whitespace and one sign are accepted, digits are consumed until the
/// first non-digit, and text without leading digits yields 0. The result is
/// truncated to 32 bits like the assignment of a `long` to a `uint32_t`.
pub fn parse_u32_lenient(word: &str) -> u32 {
    let bytes = word.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }

    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    while let Some(digit) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
        pos += 1;
    }

    if negative {
        value = -value;
    }
    value as u32
}

/// Parse the leading unsigned integer of an attribute file the way
/// `fscanf("%u")` does: whitespace is skipped and at least one digit must
/// follow. Trailing text after the digits is ignored.
pub fn parse_leading_u32(text: &str) -> Option<u32> {
    let trimmed = text.trim_start_matches(|c: char| c.is_ascii() && is_space(c as u8));
    let digits = trimmed
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..digits].parse::<u32>().ok()
}

/// One line of the route domain file that split into exactly `N` words.
#[derive(Debug, Clone)]
pub struct Record<const N: usize> {
    line: String,
    spans: [(usize, usize); N],
}

impl<const N: usize> Record<N> {
    /// Tokenize `line`, keeping it only if it yields exactly `N` words.
    pub fn parse(line: String) -> Option<Self> {
        let mut words = [""; N];
        if getwords(&line, &mut words) != N {
            return None;
        }

        let base = line.as_ptr() as usize;
        let mut spans = [(0, 0); N];
        for (span, word) in spans.iter_mut().zip(words.iter()) {
            let start = word.as_ptr() as usize - base;
            *span = (start, start + word.len());
        }

        Some(Self { line, spans })
    }

    /// Word `i` of the record.
    pub fn word(&self, i: usize) -> &str {
        let (start, end) = self.spans[i];
        &self.line[start..end]
    }
}

impl<const N: usize> Index<usize> for Record<N> {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        self.word(i)
    }
}

/// Lazy reader yielding the well-formed `N`-word lines of a source.
///
/// Lines with any other word count are skipped. Reading stops at end of input
/// or at the first read error, like `getline` returning -1.
pub struct Records<R, const N: usize> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead, const N: usize> Records<R, N> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead, const N: usize> Iterator for Records<R, N> {
    type Item = Record<N>;

    fn next(&mut self) -> Option<Record<N>> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    warn!("Stopped reading route domain records: {}", e);
                    return None;
                }
            }

            // Invalid bytes never decode to whitespace, so word boundaries
            // are the same as in the raw line
            let line = match String::from_utf8(std::mem::take(&mut self.buf)) {
                Ok(line) => line,
                Err(e) => {
                    debug!("Route domain line is not valid UTF-8, decoding lossily");
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            };

            match Record::parse(line) {
                Some(record) => return Some(record),
                None => continue,
            }
        }
    }
}

/// Count newline-terminated lines remaining in `reader`.
///
/// A final line without a trailing newline is not counted.
pub fn count_lines<R: BufRead>(mut reader: R) -> std::io::Result<usize> {
    let mut count = 0;
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(count);
        }
        count += buf.iter().filter(|&&b| b == b'\n').count();
        let len = buf.len();
        reader.consume(len);
    }
}
