//! Reading `.xlsx` attachments into [`Frame`]s, every cell as text.
use std::io::Cursor;

use calamine::{DataType, Range, Reader, Xlsx};
use indexmap::IndexMap;
use tabular::Frame;

/// Local file header signature every `.xlsx` (zip) package starts with.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Decrypts password protected workbooks, passing others through untouched when no password is
/// given. A workbook given a password must be encrypted.
pub(crate) fn decrypt(bytes: Vec<u8>, password: Option<&str>) -> crate::Result<Vec<u8>> {
    match password {
        Some(password) if !password.is_empty() => {
            let plain = office_crypto::decrypt_from_bytes(bytes, password)?;
            if !plain.starts_with(ZIP_MAGIC) {
                return Err(crate::Error::WrongPassword);
            }
            Ok(plain)
        }
        _ => Ok(bytes),
    }
}

fn open(bytes: Vec<u8>) -> crate::Result<Xlsx<Cursor<Vec<u8>>>> {
    Ok(Xlsx::new(Cursor::new(bytes))?)
}

/// One sheet, the first if `sheet` is `None`.
pub(crate) fn read_sheet(bytes: Vec<u8>, sheet: Option<&str>) -> crate::Result<Frame> {
    let mut workbook = open(bytes)?;

    let name = match sheet {
        Some(name) => name.to_owned(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(crate::Error::EmptyWorkbook)?,
    };

    let range = workbook
        .worksheet_range(&name)
        .ok_or_else(|| crate::Error::SheetNotFound(name.clone()))??;

    Ok(range_to_frame(&range))
}

/// Every sheet, in workbook order.
pub(crate) fn read_sheets(bytes: Vec<u8>) -> crate::Result<IndexMap<String, Frame>> {
    let mut workbook = open(bytes)?;

    let mut frames = IndexMap::new();
    for name in workbook.sheet_names().to_vec() {
        let range = workbook
            .worksheet_range(&name)
            .ok_or_else(|| crate::Error::SheetNotFound(name.clone()))??;
        frames.insert(name, range_to_frame(&range));
    }

    Ok(frames)
}

fn cell_text(cell: &DataType) -> Option<String> {
    match cell {
        DataType::Empty => None,
        DataType::String(value) if value.is_empty() => None,
        DataType::String(value) => Some(value.clone()),
        DataType::Float(value) => Some(value.to_string()),
        DataType::Int(value) => Some(value.to_string()),
        DataType::Bool(value) => Some(value.to_string()),
        other => Some(other.to_string()),
    }
}

/// First row is the header; blank header cells are named `Unnamed: {index}`.
pub(crate) fn range_to_frame(range: &Range<DataType>) -> Frame {
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Frame::default();
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| cell_text(cell).unwrap_or_else(|| format!("Unnamed: {idx}")))
        .collect::<Vec<_>>();

    let rows = rows
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    Frame::from_ragged(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_to_frame() {
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), DataType::String("name".into()));
        range.set_value((0, 2), DataType::String("score".into()));
        range.set_value((1, 0), DataType::String("ada".into()));
        range.set_value((1, 1), DataType::Bool(true));
        range.set_value((1, 2), DataType::Float(9.5));
        range.set_value((2, 0), DataType::String("bob".into()));
        range.set_value((2, 2), DataType::Int(7));

        let frame = range_to_frame(&range);
        assert_eq!(frame.columns(), ["name", "Unnamed: 1", "score"]);
        assert_eq!(frame.get(0, "score"), Some("9.5"));
        assert_eq!(frame.get(0, "Unnamed: 1"), Some("true"));
        assert_eq!(frame.get(1, "Unnamed: 1"), None);
        assert_eq!(frame.get(1, "score"), Some("7"));
    }

    #[test]
    fn test_empty_range() {
        let range: Range<DataType> = Range::empty();
        assert!(range_to_frame(&range).columns().is_empty());
    }

    #[test]
    fn test_no_password_passes_through() {
        let bytes = vec![1, 2, 3];
        assert_eq!(decrypt(bytes.clone(), None).unwrap(), bytes);
        assert_eq!(decrypt(bytes.clone(), Some("")).unwrap(), bytes);
    }

    const ENCRYPTED: &[u8] = include_bytes!("../tests/fixtures/people-encrypted.xlsx");

    #[test]
    fn test_decrypt_with_password() {
        let plain = decrypt(ENCRYPTED.to_vec(), Some("hunter2")).unwrap();
        assert!(plain.starts_with(ZIP_MAGIC));

        let frame = read_sheet(plain, Some("People")).unwrap();
        assert_eq!(frame.columns(), ["name", "age"]);
        assert_eq!(frame.num_rows(), 100);
        assert_eq!(frame.get(1, "name"), Some("grace"));
    }

    #[test]
    fn test_decrypt_wrong_password() {
        let err = decrypt(ENCRYPTED.to_vec(), Some("hunter3")).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Decrypt(_) | crate::Error::WrongPassword
        ));
    }

    #[test]
    fn test_decrypt_unencrypted_workbook() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "x").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let err = decrypt(bytes, Some("hunter2")).unwrap_err();
        assert!(matches!(err, crate::Error::Decrypt(_)));
    }

    #[test]
    fn test_not_a_workbook() {
        assert!(read_sheet(b"definitely not a zip".to_vec(), None).is_err());
    }
}
