//! `A1` style cell references.

/// The last column addressable with three letters, `ZZZ`.
const MAX_COLUMN: u32 = 18278;

/// A parsed cell reference. Either half may be missing: `"B"` has no row, `"12"` no column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellRef {
    /// 1-based.
    pub row: Option<u32>,
    /// 1-based.
    pub column: Option<u32>,
}

impl CellRef {
    pub const A1: Self = Self {
        row: Some(1),
        column: Some(1),
    };

    /// Trailing digits give the row, leading letters the column. Never fails; anything that
    /// doesn't parse is left as `None`.
    pub fn parse(reference: &str) -> Self {
        let digits_start = reference
            .char_indices()
            .rev()
            .take_while(|(_, ch)| ch.is_ascii_digit())
            .last()
            .map_or(reference.len(), |(idx, _)| idx);

        let row = reference[digits_start..].parse().ok();

        let letters_end = reference
            .find(|ch: char| !ch.is_ascii_alphabetic())
            .unwrap_or(reference.len());

        let column = column_index(&reference[..letters_end]);

        Self { row, column }
    }

    /// Both halves, or [`crate::Error::InvalidCellReference`].
    pub fn require(reference: &str) -> crate::Result<(u32, u32)> {
        match Self::parse(reference) {
            Self {
                row: Some(row),
                column: Some(column),
            } if row > 0 => Ok((row, column)),
            _ => Err(crate::Error::InvalidCellReference(reference.to_owned())),
        }
    }
}

impl std::fmt::Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(letters) = self.column.and_then(column_letters) {
            f.write_str(&letters)?;
        }
        if let Some(row) = self.row {
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

/// `A` = 1, `Z` = 26, `AA` = 27, up to `ZZZ`. Case insensitive.
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }

    letters.bytes().try_fold(0_u32, |acc, byte| {
        byte.is_ascii_alphabetic()
            .then(|| acc * 26 + u32::from(byte.to_ascii_uppercase() - b'A') + 1)
    })
}

/// Inverse of [`column_index`], for `1..=18278`.
pub fn column_letters(mut index: u32) -> Option<String> {
    if index == 0 || index > MAX_COLUMN {
        return None;
    }

    let mut letters = Vec::with_capacity(3);
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    letters.reverse();

    String::from_utf8(letters).ok()
}
