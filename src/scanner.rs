//! Numeric/token scanner for SVG attribute text.
//!
//! Shared by the path-data interpreter and the polyline/polygon `points`
//! parser. The scanner has two jobs: pull one command letter, or greedily
//! pull one floating-point literal (sign, decimal point, exponent form),
//! skipping whitespace and comma separators in between.

// ============================================================================
// Scanner
// ============================================================================

/// Byte-oriented scanner over attribute text.
pub struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Skip whitespace and comma separators.
    pub fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Read one ASCII command letter, skipping separators first.
    ///
    /// Returns `None` at end of input or if the next token is not a letter
    /// (the position is left on that token).
    pub fn next_command(&mut self) -> Option<u8> {
        self.skip_separators();
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() => {
                self.pos += 1;
                Some(b)
            }
            _ => None,
        }
    }

    /// Greedily read one floating-point literal, skipping separators first.
    ///
    /// Accepts an optional sign, integer and fractional digits, and an
    /// exponent (`e`/`E` with optional sign). Returns `None` if zero
    /// characters form a number at the current position; the position is
    /// then unchanged past the separators, so a command letter sitting
    /// there can be picked up by [`next_command`](Self::next_command).
    pub fn next_number(&mut self) -> Option<f64> {
        self.skip_separators();
        let start = self.pos;
        let mut p = self.pos;

        if matches!(self.bytes.get(p), Some(b'+') | Some(b'-')) {
            p += 1;
        }
        let mut digits = 0;
        while matches!(self.bytes.get(p), Some(b) if b.is_ascii_digit()) {
            p += 1;
            digits += 1;
        }
        if self.bytes.get(p) == Some(&b'.') {
            p += 1;
            while matches!(self.bytes.get(p), Some(b) if b.is_ascii_digit()) {
                p += 1;
                digits += 1;
            }
        }
        if digits == 0 {
            return None;
        }
        // Exponent is consumed only when digits actually follow it, so a
        // bare `e` stays in place (it would be a command letter in path data).
        if matches!(self.bytes.get(p), Some(b'e') | Some(b'E')) {
            let mut q = p + 1;
            if matches!(self.bytes.get(q), Some(b'+') | Some(b'-')) {
                q += 1;
            }
            if matches!(self.bytes.get(q), Some(b) if b.is_ascii_digit()) {
                while matches!(self.bytes.get(q), Some(b) if b.is_ascii_digit()) {
                    q += 1;
                }
                p = q;
            }
        }

        let text = std::str::from_utf8(&self.bytes[start..p]).ok()?;
        match text.parse::<f64>() {
            Ok(v) => {
                self.pos = p;
                Some(v)
            }
            Err(_) => None,
        }
    }
}

// ============================================================================
// Number lists
// ============================================================================

/// Extract every number from whitespace/comma separated text.
///
/// Used for `viewBox` and `points` attributes. Stops at the first token
/// that is not a number.
pub fn parse_number_list(text: &str) -> Vec<f64> {
    let mut scanner = Scanner::new(text);
    let mut out = Vec::new();
    while let Some(v) = scanner.next_number() {
        out.push(v);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
