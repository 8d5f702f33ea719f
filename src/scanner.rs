//! Scan over newick formatted text.
//!

use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur when scanning text.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The next symbol in the text is not the one the caller asked for
    #[error("expected symbol '{expected}' but encountered symbol '{actual}'")]
    UnexpectedSymbol {
        /// The symbol we expected to read
        expected: char,
        /// The symbol sitting at the cursor
        actual: char,
    },
    /// The text ended where a specific symbol was expected
    #[error("expected symbol '{0}' but encountered end of stream")]
    UnexpectedEndOfStream(char),
    /// A number was expected but no digits were found at the cursor
    #[error("expected a floating-point value but did not encounter any digits")]
    MissingDigits,
    /// The characters gathered for a number do not parse as one
    #[error("expected a floating-point value but encountered '{0}'")]
    InvalidNumber(String),
}

/// A cursor over a string slice providing the primitive reads needed to
/// parse newick trees: whitespace skipping, symbol matching, delimited
/// tokens and plain decimal numbers.
///
/// # Example
/// ```
/// use treecov::scanner::Scanner;
///
/// let delimiters: &[char] = &[';', ':', '(', ')', ','];
/// let mut scanner = Scanner::new(" (leaf:0.1");
///
/// assert!(scanner.try_char('('));
/// assert_eq!(scanner.read_token(Some(delimiters)), "leaf");
/// assert!(scanner.try_char(':'));
/// assert_eq!(scanner.read_real::<f64>().unwrap(), 0.1);
/// assert!(scanner.is_end_of_data());
/// ```
pub struct Scanner<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner with the cursor on the first character of the text
    pub fn new(text: &'a str) -> Self {
        Self { text, cursor: 0 }
    }

    /// Look at the character under the cursor without consuming it
    fn peek(&self) -> Option<char> {
        self.text[self.cursor..].chars().next()
    }

    /// Consume the character under the cursor
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    /// Check whether the whole text has been consumed
    pub fn is_end_of_data(&self) -> bool {
        self.cursor >= self.text.len()
    }

    /// Skip a run of whitespace characters. Reaching the end of the text
    /// is not an error.
    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Skip whitespace and consume the next character if it matches
    /// `expected`. On a mismatch the character is left for the next read.
    /// ```
    /// use treecov::scanner::Scanner;
    ///
    /// let mut scanner = Scanner::new("  ab");
    /// assert!(!scanner.try_char('b'));
    /// assert!(scanner.try_char('a'));
    /// assert!(scanner.try_char('b'));
    /// ```
    pub fn try_char(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skip whitespace and consume the next character, which must match
    /// `expected`, otherwise a [`ScanError`] describing the mismatch is
    /// returned.
    pub fn expect(&mut self, expected: char) -> Result<(), ScanError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ScanError::UnexpectedEndOfStream(expected)),
            Some(actual) if actual == expected => {
                self.advance();
                Ok(())
            }
            Some(actual) => Err(ScanError::UnexpectedSymbol { expected, actual }),
        }
    }

    /// Read characters up to, but not including, the next delimiter or the
    /// end of the text. If no delimiters are given, whitespace delimits the
    /// token. Leading whitespace is not skipped.
    pub fn read_token(&mut self, delimiters: Option<&[char]>) -> String {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            let is_delimiter = match delimiters {
                Some(delimiters) => delimiters.contains(&c),
                None => c.is_whitespace(),
            };
            if is_delimiter {
                break;
            }
            token.push(c);
            self.advance();
        }

        token
    }

    /// Append the run of decimal digits under the cursor to `out`
    pub fn read_digits(&mut self, out: &mut String) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            out.push(c);
            self.advance();
        }
    }

    /// Skip whitespace and read a plain decimal number: an optional minus
    /// sign, digits, and an optional fractional part. Exponent notation is
    /// not part of the newick grammar and is not read.
    /// ```
    /// use treecov::scanner::Scanner;
    ///
    /// let value: f64 = Scanner::new(" -27.25").read_real().unwrap();
    /// assert_eq!(value, -27.25);
    /// ```
    pub fn read_real<T: FromStr>(&mut self) -> Result<T, ScanError> {
        self.skip_whitespace();

        let mut digits = String::new();
        if self.try_char('-') {
            digits.push('-');
        }

        self.read_digits(&mut digits);

        if self.try_char('.') {
            digits.push('.');
            self.read_digits(&mut digits);
        }

        if digits.is_empty() {
            return Err(ScanError::MissingDigits);
        }

        digits.parse().map_err(|_| ScanError::InvalidNumber(digits))
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn skip_whitespace_consumes_runs() {
        let mut scanner = Scanner::new(" \t\r\n x ");
        scanner.skip_whitespace();
        assert!(!scanner.is_end_of_data());
        assert!(scanner.try_char('x'));
        scanner.skip_whitespace();
        assert!(scanner.is_end_of_data());
    }

    #[test]
    fn try_char_leaves_mismatches() {
        let mut scanner = Scanner::new("ab");
        assert!(!scanner.try_char('b'));
        assert!(scanner.try_char('a'));
        assert!(scanner.try_char('b'));
        assert!(!scanner.try_char('c'));
        assert!(scanner.is_end_of_data());
    }

    #[test]
    fn expect_reports_mismatch() {
        let mut scanner = Scanner::new("(a");
        scanner.expect('(').unwrap();

        let err = scanner.expect(')').unwrap_err();
        assert!(matches!(
            err,
            ScanError::UnexpectedSymbol {
                expected: ')',
                actual: 'a'
            }
        ));
    }

    #[test]
    fn expect_reports_end_of_stream() {
        let err = Scanner::new("  ").expect(';').unwrap_err();
        assert!(matches!(err, ScanError::UnexpectedEndOfStream(';')));
    }

    #[test]
    fn read_token_stops_at_delimiters() {
        let delimiters: &[char] = &[';', ':', '(', ')', ','];
        let mut scanner = Scanner::new("name one:0.5");

        assert_eq!(scanner.read_token(Some(delimiters)), "name one");
        // The delimiter itself is left in place
        assert!(scanner.try_char(':'));
    }

    #[test]
    fn read_token_defaults_to_whitespace() {
        let mut scanner = Scanner::new("abc def");
        assert_eq!(scanner.read_token(None), "abc");
        scanner.skip_whitespace();
        assert_eq!(scanner.read_token(None), "def");
        assert_eq!(scanner.read_token(None), "");
    }

    #[test]
    fn read_real_parses_plain_decimals() {
        let test_cases = vec![
            ("0", 0.0),
            ("42", 42.0),
            ("1234.56", 1234.56),
            ("-3.25", -3.25),
            ("  7.5", 7.5),
            ("10.", 10.0),
            (".5", 0.5),
            ("2,", 2.0),
        ];

        for (text, expected) in test_cases {
            let value: f64 = Scanner::new(text).read_real().unwrap();
            assert!((value - expected).abs() < f64::EPSILON, "{text}");
        }
    }

    #[test]
    fn read_real_rejects_non_numbers() {
        assert!(matches!(
            Scanner::new("abc").read_real::<f64>(),
            Err(ScanError::MissingDigits)
        ));
        assert!(matches!(
            Scanner::new("").read_real::<f64>(),
            Err(ScanError::MissingDigits)
        ));

        let err = Scanner::new("-x").read_real::<f64>().unwrap_err();
        assert!(matches!(err, ScanError::InvalidNumber(ref s) if s == "-"));

        let err = Scanner::new(".x").read_real::<f64>().unwrap_err();
        assert!(matches!(err, ScanError::InvalidNumber(ref s) if s == "."));
    }

    #[test]
    fn read_real_has_no_exponent_syntax() {
        let mut scanner = Scanner::new("1e5");
        let value: f64 = scanner.read_real().unwrap();
        assert_eq!(value, 1.0);
        // The exponent marker is left in the text
        assert!(scanner.try_char('e'));
    }
}
