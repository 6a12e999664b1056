//! CSV export of list screens (RFC 4180: quoted when needed, CRLF line ends).

use crate::modules::Screen;

/// Render `records` as CSV. `columns` are `(field, header)` pairs and `cell`
/// produces the text of one field.
pub fn to_csv<R>(records: &[R], columns: &[(&str, &str)], cell: impl Fn(&R, &str) -> String) -> String {
    let mut out = String::new();
    push_row(&mut out, columns.iter().map(|(_, header)| header.to_string()));
    for record in records {
        push_row(&mut out, columns.iter().map(|(field, _)| cell(record, field)));
    }
    out
}

/// Every field of a screen type, with select values shown by label.
pub fn screen_csv<R: Screen>(records: &[R]) -> String {
    let columns: Vec<(&str, &str)> = R::FIELDS.iter().map(|f| (f.name, f.label)).collect();
    to_csv(records, &columns, |record, field| record.display(field))
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(&cell));
    }
    out.push_str("\r\n");
}

fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::beds::{Bed, BedStatus};
    use crate::records::Record;

    fn bed(number: &str, patient: Option<&str>) -> Bed {
        Bed {
            id: number.into(),
            unit_id: "h1".into(),
            ward: "Clínica Médica".into(),
            number: number.into(),
            status: BedStatus::Occupied,
            patient: patient.map(str::to_string),
        }
    }

    #[test]
    fn test_quotes_only_when_needed() {
        let beds = vec![
            bed("01", Some("Silva, João")),
            bed("02", Some("Maria \"Preta\"")),
            bed("03", None),
        ];
        let csv = to_csv(&beds, &[("number", "Bed"), ("patient", "Patient")], |bed, field| {
            bed.field_text(field).unwrap_or_default()
        });
        assert_eq!(
            csv,
            "Bed,Patient\r\n01,\"Silva, João\"\r\n02,\"Maria \"\"Preta\"\"\"\r\n03,\r\n"
        );
    }

    #[test]
    fn test_screen_csv_uses_labels() {
        let csv = screen_csv(&[bed("07", Some("Ana\nSouza"))]);
        let mut lines = csv.split("\r\n");
        assert_eq!(lines.next(), Some("Ward,Bed,Status,Patient,Unit"));
        assert_eq!(lines.next(), Some("Clínica Médica,07,Occupied,\"Ana\nSouza\",h1"));
    }

    #[test]
    fn test_empty_collection_is_header_only() {
        let none: Vec<Bed> = Vec::new();
        let csv = to_csv(&none, &[("ward", "Ward")], |bed, field| bed.display(field));
        assert_eq!(csv, "Ward\r\n");
    }
}
