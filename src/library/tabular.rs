//! Reader for comma-delimited tabular text.
//!
//! Handles the subset of RFC 4180 that spreadsheet CSV exports produce:
//! - double-quoted fields with `""` as an escaped quote
//! - line breaks inside quoted fields
//! - `\n` and `\r\n` record terminators
//! - an optional leading UTF-8 byte order mark
//!
//! A record with stray text after a closing quote is reported on its own
//! and reading resumes at the next line. Only a quote left open at end of
//! input fails the whole read.

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

/// Structural failure while reading delimited text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TabularError {
    /// A quoted field was still open at end of input.
    #[error("unterminated quoted field in record {record}")]
    UnterminatedQuote { record: usize },
    /// Text followed a closing quote without a delimiter.
    #[error("unexpected text after closing quote in record {record}")]
    TrailingAfterQuote { record: usize },
}

/// One record: its raw fields, or the reason it could not be read.
pub type RecordResult = Result<Vec<String>, TabularError>;

/// Split `text` into records of raw (untrimmed) fields.
///
/// Empty lines produce no record. Record numbers in errors are 1-based
/// and count blank lines as records.
pub fn read_records(text: &str) -> Result<Vec<RecordResult>, TabularError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = Reader {
        chars: text.chars().peekable(),
        record: 1,
    };
    let mut records = Vec::new();
    while let Some(record) = reader.next_record()? {
        let blank = matches!(&record, Ok(fields) if fields.len() == 1 && fields[0].is_empty());
        if !blank {
            records.push(record);
        }
        reader.record += 1;
    }
    Ok(records)
}

struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
    record: usize,
}

impl Reader<'_> {
    /// Next record, `Ok(None)` at end of input.
    ///
    /// A malformed record comes back as `Ok(Some(Err(_)))` with the rest of
    /// its line consumed.
    fn next_record(&mut self) -> Result<Option<RecordResult>, TabularError> {
        if self.chars.peek().is_none() {
            return Ok(None);
        }
        let mut fields = Vec::new();
        loop {
            match self.next_field() {
                Ok((field, more)) => {
                    fields.push(field);
                    if !more {
                        return Ok(Some(Ok(fields)));
                    }
                }
                Err(e @ TabularError::TrailingAfterQuote { .. }) => {
                    self.skip_line();
                    return Ok(Some(Err(e)));
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn skip_line(&mut self) {
        for c in self.chars.by_ref() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Returns the field and whether another field follows on this record.
    fn next_field(&mut self) -> Result<(String, bool), TabularError> {
        if self.chars.peek() == Some(&'"') {
            self.chars.next();
            return self.quoted_field();
        }
        let mut field = String::new();
        while let Some(c) = self.chars.next() {
            match c {
                ',' => return Ok((field, true)),
                '\n' => return Ok((field, false)),
                '\r' if self.chars.peek() == Some(&'\n') => {
                    self.chars.next();
                    return Ok((field, false));
                }
                _ => field.push(c),
            }
        }
        Ok((field, false))
    }

    fn quoted_field(&mut self) -> Result<(String, bool), TabularError> {
        let mut field = String::new();
        loop {
            match self.chars.next() {
                None => {
                    return Err(TabularError::UnterminatedQuote {
                        record: self.record,
                    })
                }
                Some('"') if self.chars.peek() == Some(&'"') => {
                    self.chars.next();
                    field.push('"');
                }
                Some('"') => break,
                Some(c) => field.push(c),
            }
        }
        match self.chars.next() {
            None | Some('\n') => Ok((field, false)),
            Some(',') => Ok((field, true)),
            Some('\r') if self.chars.peek() == Some(&'\n') => {
                self.chars.next();
                Ok((field, false))
            }
            Some(_) => Err(TabularError::TrailingAfterQuote {
                record: self.record,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str) -> Vec<Vec<String>> {
        read_records(text)
            .unwrap()
            .into_iter()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn plain_records() {
        assert_eq!(
            rows("id,title\n1,A\n2,B"),
            vec![vec!["id", "title"], vec!["1", "A"], vec!["2", "B"]]
        );
    }

    #[test]
    fn crlf_and_blank_lines() {
        assert_eq!(
            rows("id,title\r\n\r\n1,A\r\n\n"),
            vec![vec!["id", "title"], vec!["1", "A"]]
        );
    }

    #[test]
    fn quoted_fields() {
        let parsed = rows("a,b,c\n\"x, y\",\"say \"\"hi\"\"\",\"multi\nline\"\n");
        assert_eq!(parsed[1], vec!["x, y", "say \"hi\"", "multi\nline"]);
    }

    #[test]
    fn empty_trailing_field() {
        assert_eq!(rows("1,,\n"), vec![vec!["1", "", ""]]);
    }

    #[test]
    fn strips_byte_order_mark() {
        assert_eq!(rows("\u{feff}id\n1"), vec![vec!["id"], vec!["1"]]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert_eq!(
            read_records("id,title\n1,\"open").unwrap_err(),
            TabularError::UnterminatedQuote { record: 2 }
        );
    }

    #[test]
    fn text_after_quote_fails_only_that_record() {
        let records = read_records("id,title\n1,\"A\"x,more\n2,B\r\n3,C").unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(
            records[1],
            Err(TabularError::TrailingAfterQuote { record: 2 })
        );
        assert_eq!(records[2], Ok(vec!["2".to_string(), "B".to_string()]));
        assert_eq!(records[3], Ok(vec!["3".to_string(), "C".to_string()]));
    }

    #[test]
    fn text_after_quote_on_last_line() {
        let records = read_records("\"a\"b,c").unwrap();
        assert_eq!(
            records,
            vec![Err(TabularError::TrailingAfterQuote { record: 1 })]
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            TabularError::UnterminatedQuote { record: 4 }.to_string(),
            "unterminated quoted field in record 4"
        );
        assert_eq!(
            TabularError::TrailingAfterQuote { record: 2 }.to_string(),
            "unexpected text after closing quote in record 2"
        );
    }

    #[test]
    fn empty_input_has_no_records() {
        assert!(rows("").is_empty());
        assert!(rows("\n\n").is_empty());
    }
}
