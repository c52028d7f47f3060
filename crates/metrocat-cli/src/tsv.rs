//! Tab-separated output for normalized catalog records.
//!
//! Rows end with `\r\n`. A field containing a tab, a double quote, or a line
//! break is wrapped in double quotes with embedded quotes doubled; every
//! other field is written as-is.

use std::borrow::Cow;
use std::io::{self, Write};

use metrocat_core::{NormalizedRecord, TSV_HEADERS};

const DELIMITER: char = '\t';
const QUOTE: char = '"';
const LINE_TERMINATOR: &str = "\r\n";

pub(crate) struct TsvWriter<W: Write> {
    inner: W,
    rows_written: usize,
}

impl<W: Write> TsvWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self {
            inner,
            rows_written: 0,
        }
    }

    pub(crate) fn write_header(&mut self) -> io::Result<()> {
        self.write_row(&TSV_HEADERS)
    }

    pub(crate) fn write_records(&mut self, records: &[NormalizedRecord]) -> io::Result<()> {
        for record in records {
            self.write_row(&record.as_row())?;
        }
        Ok(())
    }

    pub(crate) fn write_row<S: AsRef<str>>(&mut self, fields: &[S]) -> io::Result<()> {
        for (idx, field) in fields.iter().enumerate() {
            if idx > 0 {
                write!(self.inner, "{DELIMITER}")?;
            }
            self.inner.write_all(escape_field(field.as_ref()).as_bytes())?;
        }
        self.inner.write_all(LINE_TERMINATOR.as_bytes())?;
        self.rows_written += 1;
        Ok(())
    }

    /// Rows written so far, header included.
    pub(crate) fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.inner
    }
}

fn escape_field(field: &str) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\r' || c == '\n');
    if !needs_quotes {
        return Cow::Borrowed(field);
    }
    Cow::Owned(format!("{QUOTE}{}{QUOTE}", field.replace('"', "\"\"")))
}

#[cfg(test)]
mod tests {
    use serde_json::Number;

    use super::*;

    fn written(writer: TsvWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn header_matches_column_names() {
        let mut writer = TsvWriter::new(Vec::new());
        writer.write_header().unwrap();
        assert_eq!(
            written(writer),
            "ID\tName\tURL\tRegular Price, RUB\tSale Price, RUB\tBrand Name\r\n"
        );
    }

    #[test]
    fn records_are_written_in_column_order() {
        let records = vec![
            NormalizedRecord {
                id: 1,
                name: "Tea".to_owned(),
                absolute_url: "https://online.metro-cc.ru/p/1".to_owned(),
                regular_price: Number::from(120),
                sale_price: Some(Number::from(90)),
                brand: "Acme".to_owned(),
            },
            NormalizedRecord {
                id: 2,
                name: "Coffee".to_owned(),
                absolute_url: "https://online.metro-cc.ru/p/2".to_owned(),
                regular_price: Number::from_f64(349.9).unwrap(),
                sale_price: None,
                brand: "Beanery".to_owned(),
            },
        ];
        let mut writer = TsvWriter::new(Vec::new());
        writer.write_records(&records).unwrap();
        assert_eq!(writer.rows_written(), 2);
        assert_eq!(
            written(writer),
            "1\tTea\thttps://online.metro-cc.ru/p/1\t120\t90\tAcme\r\n\
             2\tCoffee\thttps://online.metro-cc.ru/p/2\t349.9\t\tBeanery\r\n"
        );
    }

    #[test]
    fn escape_field_leaves_plain_text_borrowed() {
        assert!(matches!(escape_field("Чай чёрный, 100 г"), Cow::Borrowed(_)));
    }

    #[test]
    fn escape_field_quotes_tabs_and_newlines() {
        assert_eq!(escape_field("a\tb"), "\"a\tb\"");
        assert_eq!(escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn escape_field_doubles_embedded_quotes() {
        assert_eq!(escape_field("Tea \"Earl Grey\""), "\"Tea \"\"Earl Grey\"\"\"");
    }
}
