//! Output formatting module

use std::io;

use serde::Serialize;

use nakliye_app::app::{Notice, NoticeLevel, TicketBoardRow};
use nakliye_app::export::write_board_csv;
use nakliye_domain::model::{Facility, Organization, Ticket, Truck};
use nakliye_domain::service::TicketQuote;
use nakliye_types::{Error, OutputFormat, Result};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("✓ {}", notice.title),
        NoticeLevel::Error => println!("✗ {}", notice.title),
    }
    println!("  {}", notice.message);
}

/// Rows as CSV on stdout
fn write_csv(headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(headers).map_err(|e| Error::Io(e.into()))?;
    for row in rows {
        writer.write_record(&row).map_err(|e| Error::Io(e.into()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Left-aligned columns sized to their widest cell
fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{}{}", cell, " ".repeat(w - cell.chars().count())))
            .collect();
        println!("{}", padded.join("  ").trim_end());
    };

    line(headers.to_vec());
    println!("{}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    for row in rows {
        line(row.iter().map(String::as_str).collect());
    }
}

fn emit<T: Serialize>(format: OutputFormat, items: &[T], headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(items),
        OutputFormat::Csv => write_csv(headers, rows),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("Kayıt bulunamadı");
            } else {
                print_table(headers, &rows);
            }
            Ok(())
        }
    }
}

pub fn print_board(format: OutputFormat, rows: &[TicketBoardRow]) -> Result<()> {
    match format {
        OutputFormat::Csv => write_board_csv(rows, io::stdout()),
        _ => {
            let mut headers = vec!["ID"];
            headers.extend(TicketBoardRow::HEADERS);
            let cells = rows
                .iter()
                .map(|r| {
                    let mut cells = vec![r.id.clone()];
                    cells.extend(r.cells().iter().map(|c| c.to_string()));
                    cells
                })
                .collect();
            emit(format, rows, &headers, cells)
        }
    }
}

pub fn print_ticket(format: OutputFormat, ticket: &Ticket, row: &TicketBoardRow) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(ticket);
    }
    let time = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map(|t| t.with_timezone(&chrono::Local).format("%d.%m.%Y %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    println!("\nİş Kaydı {}", ticket.id);
    println!("===============");
    println!("Tarih:        {}", row.date);
    println!("Plaka:        {}", row.plate_number);
    println!("Konteyner:    {}", row.container_number);
    println!("Giriş:        {}", time(ticket.entry_time));
    println!("Çıkış:        {}", time(ticket.exit_time));
    if let Some(facility) = &ticket.facility {
        println!("Depo:         {}", facility.name);
    }
    if let Some(org) = &ticket.organization {
        println!("Cari:         {}", org.name);
    }
    println!("Durum:        {}", row.status);
    println!("Ücret:        {}", row.price);
    println!("Fatura:       {}", row.invoice);
    Ok(())
}

pub fn print_quote(format: OutputFormat, quote: &TicketQuote) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(quote);
    }
    println!("Durum:        {}", quote.status.label());
    println!("Bekleme:      {}", quote.wait_window_count);
    println!("Ücret:        {} TL", quote.total_price);
    Ok(())
}

const TRUCK_HEADERS: [&str; 6] = ["ID", "Plaka", "Sürücü", "Telefon", "Kapasite", "Durum"];

fn truck_cells(t: &Truck) -> Vec<String> {
    vec![
        t.id.clone(),
        t.plate_number.clone(),
        t.driver_name.clone(),
        t.driver_phone.clone(),
        t.capacity.to_string(),
        t.status.label().to_string(),
    ]
}

pub fn print_trucks(format: OutputFormat, trucks: &[&Truck]) -> Result<()> {
    let rows = trucks.iter().map(|t| truck_cells(t)).collect();
    emit(format, trucks, &TRUCK_HEADERS, rows)
}

const FACILITY_HEADERS: [&str; 5] = ["ID", "Depo", "Adres", "Şehir", "Ülke"];

pub fn print_facilities(format: OutputFormat, facilities: &[Facility]) -> Result<()> {
    let rows = facilities
        .iter()
        .map(|f| vec![f.id.clone(), f.name.clone(), f.address.clone(), f.city.clone(), f.country.clone()])
        .collect();
    emit(format, facilities, &FACILITY_HEADERS, rows)
}

const ORGANIZATION_HEADERS: [&str; 6] =
    ["ID", "Şirket", "Adres", "Vergi No", "Vergi Dairesi", "Fatura Adresi"];

pub fn print_organizations(format: OutputFormat, organizations: &[Organization]) -> Result<()> {
    let rows = organizations
        .iter()
        .map(|o| {
            vec![
                o.id.clone(),
                o.name.clone(),
                o.address.clone(),
                o.tax_number.clone(),
                o.tax_office.clone(),
                o.invoice_address.clone(),
            ]
        })
        .collect();
    emit(format, organizations, &ORGANIZATION_HEADERS, rows)
}
