//! A1-style cell address arithmetic.
//!
//! Column letters use bijective base-26 numbering: there is no zero digit, so
//! "A" is the lowest digit at every position (A=0, Z=25, AA=26, ZZ=701,
//! AAA=702). All coordinates returned here are 0-based; spans keep the
//! 1-based bounds found in the markup.

use crate::common::error::{Error, Result};

/// Highest column index (XFD) a worksheet can address.
pub const MAX_COLUMN_INDEX: usize = 16_383;

/// Highest row index (1048576) a worksheet can address.
pub const MAX_ROW_INDEX: usize = 1_048_575;

/// Longest column label accepted before the value would overflow.
const MAX_COLUMN_LETTERS: usize = 7;

/// Convert column letters (case-insensitive) to a 0-based column index.
///
/// # Examples
///
/// ```
/// use quince::ooxml::xlsx::address::column_letters_to_index;
///
/// assert_eq!(column_letters_to_index("A")?, 0);
/// assert_eq!(column_letters_to_index("az")?, 51);
/// assert_eq!(column_letters_to_index("AMI")?, 1022);
/// # Ok::<(), quince::Error>(())
/// ```
pub fn column_letters_to_index(letters: &str) -> Result<usize> {
    if letters.is_empty() || letters.len() > MAX_COLUMN_LETTERS {
        return Err(Error::MalformedAddress(letters.to_string()));
    }

    let mut value = 0usize;
    for byte in letters.bytes() {
        if !byte.is_ascii_alphabetic() {
            return Err(Error::MalformedAddress(letters.to_string()));
        }
        value = value * 26 + usize::from(byte.to_ascii_uppercase() - b'A' + 1);
    }

    Ok(value - 1)
}

/// Convert a 0-based column index to its uppercase column letters.
pub fn index_to_column_letters(index: usize) -> String {
    let mut letters = Vec::with_capacity(3);
    let mut n = index;

    loop {
        letters.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }

    letters.reverse();
    // Only ASCII uppercase letters were pushed
    letters.into_iter().map(char::from).collect()
}

/// Format a 0-based (column, row) coordinate as an A1 reference.
pub fn cell_reference(col: usize, row: usize) -> String {
    format!("{}{}", index_to_column_letters(col), row as u128 + 1)
}

/// Split a reference like "A3" into a 0-based `(column, row)` pair.
///
/// Coordinates outside the worksheet grid (past XFD or row 1048576) are rejected.
pub fn parse_cell_address(reference: &str) -> Result<(usize, usize)> {
    let bytes = reference.as_bytes();
    let split = bytes
        .iter()
        .position(|b| !b.is_ascii_alphabetic())
        .unwrap_or(bytes.len());
    let (letters, digits) = reference.split_at(split);

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedAddress(reference.to_string()));
    }

    let col = column_letters_to_index(letters)
        .map_err(|_| Error::MalformedAddress(reference.to_string()))?;
    let row: usize = atoi_simd::parse(digits.as_bytes())
        .map_err(|_| Error::MalformedAddress(reference.to_string()))?;
    if row == 0 || row > MAX_ROW_INDEX + 1 || col > MAX_COLUMN_INDEX {
        return Err(Error::MalformedAddress(reference.to_string()));
    }

    Ok((col, row - 1))
}

/// Parse a range like "A1:B2" into 0-based `(min_col, min_row, max_col, max_row)`.
///
/// A single reference without a colon is a one-cell range.
pub fn parse_range(reference: &str) -> Result<(usize, usize, usize, usize)> {
    let malformed = || Error::MalformedRange(reference.to_string());

    let (first, second) = match memchr::memchr(b':', reference.as_bytes()) {
        Some(pos) => (&reference[..pos], &reference[pos + 1..]),
        None => (reference, reference),
    };

    let (col_a, row_a) = parse_cell_address(first).map_err(|_| malformed())?;
    let (col_b, row_b) = parse_cell_address(second).map_err(|_| malformed())?;

    Ok((
        col_a.min(col_b),
        row_a.min(row_b),
        col_a.max(col_b),
        row_a.max(row_b),
    ))
}

/// Parse a row span like "1:3" into its 1-based inclusive `(lower, upper)` bounds.
///
/// Whitespace-separated span lists ("1:3 5:9") yield the outermost bounds.
/// Bounds must be 1-based, ordered, and within the worksheet's column count.
pub fn parse_span(span: &str) -> Result<(usize, usize)> {
    let malformed = || Error::MalformedRange(span.to_string());
    let mut bounds: Option<(usize, usize)> = None;

    for part in span.split_ascii_whitespace() {
        let pos = memchr::memchr(b':', part.as_bytes()).ok_or_else(malformed)?;
        let lower: usize = atoi_simd::parse(part[..pos].as_bytes()).map_err(|_| malformed())?;
        let upper: usize = atoi_simd::parse(part[pos + 1..].as_bytes()).map_err(|_| malformed())?;
        if lower == 0 || upper < lower || upper > MAX_COLUMN_INDEX + 1 {
            return Err(malformed());
        }

        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(lower), hi.max(upper)),
            None => (lower, upper),
        });
    }

    bounds.ok_or_else(malformed)
}

/// A rectangular block of cells in 0-based coordinates, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub min_col: usize,
    pub min_row: usize,
    pub max_col: usize,
    pub max_row: usize,
}

impl CellRange {
    /// Parse an "A1:B2" style range.
    pub fn parse(reference: &str) -> Result<Self> {
        let (min_col, min_row, max_col, max_row) = parse_range(reference)?;
        Ok(Self {
            min_col,
            min_row,
            max_col,
            max_row,
        })
    }

    /// Check whether the 0-based coordinate lies inside the range.
    #[inline]
    pub fn contains(&self, col: usize, row: usize) -> bool {
        (self.min_col..=self.max_col).contains(&col) && (self.min_row..=self.max_row).contains(&row)
    }
}

impl std::fmt::Display for CellRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}",
            cell_reference(self.min_col, self.min_row),
            cell_reference(self.max_col, self.max_row)
        )
    }
}
