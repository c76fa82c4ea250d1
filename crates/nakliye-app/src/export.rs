//! CSV report of the ticket board

use std::io::Write;
use std::path::Path;

use nakliye_types::{Error, Result};

use crate::app::TicketBoardRow;

fn csv_error(e: csv::Error) -> Error {
    Error::Io(e.into())
}

/// Write board rows with a header line
pub fn write_board_csv<W: Write>(rows: &[TicketBoardRow], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    let mut header = vec!["ID"];
    header.extend(TicketBoardRow::HEADERS);
    writer.write_record(&header).map_err(csv_error)?;
    for row in rows {
        let mut record = vec![row.id.as_str()];
        record.extend(row.cells());
        writer.write_record(&record).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_board_csv(rows: &[TicketBoardRow], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_board_csv(rows, file)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "board exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::query_service::ticket_board_in;
    use chrono::{TimeZone, Utc};
    use nakliye_domain::model::Ticket;
    use nakliye_domain::service::PricingPolicy;

    fn ticket(id: &str, container: Option<&str>) -> Ticket {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();
        Ticket {
            id: id.to_string(),
            container_number: container.map(str::to_string),
            entry_time: Some(at),
            exit_time: Some(at + chrono::Duration::hours(7)),
            facility_id: None,
            organization_id: None,
            truck_id: None,
            is_invoice_created: false,
            created_by_id: None,
            created_at: at,
            updated_at: at,
            truck: None,
            facility: None,
            organization: None,
        }
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let tickets = vec![ticket("tk1", Some("MSCU, 1")), ticket("tk2", None)];
        let rows = ticket_board_in(&tickets, &PricingPolicy::default(), Utc::now(), &Utc);

        let mut buf = Vec::new();
        write_board_csv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ID,Tarih,Plaka,Konteyner No,Durum,Ücret,Fatura");
        assert_eq!(
            lines[1],
            "tk1,01.02.2024,-,\"MSCU, 1\",YÜK BOŞALTILDI (2),140 TL,KESİLMEDİ"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.csv");
        let rows = ticket_board_in(&[ticket("tk1", None)], &PricingPolicy::default(), Utc::now(), &Utc);

        export_board_csv(&rows, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("tk1"));
    }
}
