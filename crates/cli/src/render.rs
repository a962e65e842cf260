// Terminal rendering for the client view and barber dashboard

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use queuesnip_core::application::{BarberBoard, WaitEstimate};
use queuesnip_core::domain::{Barber, EntryId, EntryStatus, QueueEntry, ServiceCatalog};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Queue number shown to clients
pub fn ticket(id: EntryId) -> String {
    format!("#{:04}", id.value())
}

fn clock_time(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

fn wait_label(wait: &WaitEstimate) -> String {
    if wait.position == 0 {
        "Up next".to_string()
    } else {
        format!("~{} min", wait.minutes)
    }
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Service")]
    name: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Price")]
    price: String,
}

#[derive(Tabled)]
struct BarberRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Barber")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "In queue")]
    queued: usize,
    #[tabled(rename = "Wait")]
    wait: String,
}

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "Ticket")]
    ticket: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Joined")]
    joined: String,
    #[tabled(rename = "Wait")]
    wait: String,
}

pub fn services(catalog: &ServiceCatalog) -> String {
    let rows: Vec<ServiceRow> = catalog
        .iter()
        .map(|s| ServiceRow {
            id: s.id.clone(),
            name: s.name.clone(),
            duration: format!("{} min", s.duration_minutes),
            price: format!("${}", s.price),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn barbers(boards: &[BarberBoard]) -> String {
    let rows: Vec<BarberRow> = boards
        .iter()
        .map(|b| BarberRow {
            id: b.barber.id,
            name: b.barber.name.clone(),
            status: if b.barber.active { "Active" } else { "Inactive" }.to_string(),
            queued: b.queued(),
            wait: format!("~{} min", b.next.minutes),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Confirmation after joining
pub fn joined(entry: &QueueEntry, barber: Option<&Barber>, wait: &WaitEstimate) -> String {
    let barber_name = barber.map(|b| b.name.as_str()).unwrap_or("your barber");
    let mut out = format!(
        "{}\n  {} {}\n",
        "✓ You've joined the queue!".green().bold(),
        "Queue number:".bold(),
        ticket(entry.id)
    );
    if wait.position == 0 {
        out.push_str(&format!("  {} you're next with {}\n", "Status:".bold(), barber_name));
    } else {
        out.push_str(&format!(
            "  {} {} ahead of you with {}, ~{} min wait\n",
            "Status:".bold(),
            wait.position,
            barber_name,
            wait.minutes
        ));
    }
    out
}

/// One barber's section of the dashboard
pub fn barber_board(board: &BarberBoard) -> String {
    let status = if board.barber.active {
        "Active".green()
    } else {
        "Inactive".dimmed()
    };
    let mut out = format!(
        "{} {}  [{}]  {} waiting\n",
        format!("{}.", board.barber.id).dimmed(),
        board.barber.name.bold(),
        status,
        board.queued()
    );

    match board.current() {
        Some(current) => {
            let state = match current.entry.status {
                EntryStatus::InService => "in chair".green().to_string(),
                _ => "up next".yellow().to_string(),
            };
            out.push_str(&format!(
                "  {} {} - {} ({}) {}\n",
                "Current client:".bold(),
                ticket(current.entry.id),
                current.entry.client_name,
                current.service_name.as_deref().unwrap_or("unknown service"),
                state
            ));
        }
        None => {
            out.push_str(&format!("  {}\n", "No clients in queue".dimmed()));
            return out;
        }
    }

    let rows: Vec<QueueRow> = board
        .rows
        .iter()
        .map(|row| QueueRow {
            ticket: ticket(row.entry.id),
            client: row.entry.client_name.clone(),
            service: row
                .service_name
                .clone()
                .unwrap_or_else(|| row.entry.service_id.clone()),
            joined: clock_time(row.entry.joined_at),
            wait: wait_label(&row.wait),
        })
        .collect();
    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    out.push('\n');
    out
}

/// Whole dashboard: stats header plus every barber
pub fn dashboard(boards: &[BarberBoard], now_ms: i64) -> String {
    let total: usize = boards.iter().map(|b| b.queued()).sum();
    let active = boards.iter().filter(|b| b.barber.active).count();

    let mut out = format!(
        "{}  {}\n  {} {}   {} {}\n\n",
        "QueueSnip".cyan().bold(),
        clock_time(now_ms).dimmed(),
        "Total in queue:".bold(),
        total,
        "Active barbers:".bold(),
        active
    );
    for board in boards {
        out.push_str(&barber_board(board));
        out.push('\n');
    }
    out
}
