//! QueueSnip CLI - walk-in front desk and barber dashboard
//!
//! Every change reloads the state file, applies one command and saves it
//! back while holding a lock beside the file, so several terminals can share
//! one queue.

mod logging;
mod render;
mod session;
mod settings;
mod state_lock;
mod watch;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use queuesnip_core::application::EnqueueRequest;
use queuesnip_core::domain::{BarberId, EntryId};
use session::Session;
use settings::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "queuesnip")]
#[command(about = "Walk-in barbershop queue", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Shop configuration file (TOML)
    #[arg(long, global = true, env = "QUEUESNIP_CONFIG")]
    config: Option<PathBuf>,

    /// Queue state file (JSON)
    #[arg(long, global = true, env = "QUEUESNIP_STATE")]
    state: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the service catalog
    Services,

    /// List barbers with queue length and current wait
    Barbers,

    /// Join a barber's queue
    Join {
        /// Client name
        #[arg(short, long)]
        name: String,

        /// Phone number (for notifications)
        #[arg(short, long)]
        phone: Option<String>,

        /// Barber ID
        #[arg(short, long)]
        barber: BarberId,

        /// Service ID (e.g., haircut, shave)
        #[arg(short, long)]
        service: String,
    },

    /// Seat the next client of a barber
    Start {
        /// Barber ID
        barber: BarberId,
    },

    /// Complete a client's service and remove them from the queue
    Complete {
        /// Queue entry ID (the number on the ticket)
        entry: u64,
    },

    /// Remove a waiting client who left
    Cancel {
        /// Queue entry ID
        entry: u64,
    },

    /// Show the queue board
    Status {
        /// Only show this barber
        #[arg(short, long)]
        barber: Option<BarberId>,

        /// Print the board as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show position and estimated wait for a ticket
    Wait {
        /// Queue entry ID
        entry: u64,
    },

    /// Open or close a barber for new clients
    SetActive {
        /// Barber ID
        barber: BarberId,

        /// true / false
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        active: bool,
    },

    /// Clear every queue
    Reset,

    /// Redraw the board periodically until Ctrl+C
    Watch {
        /// Refresh interval in seconds (default from settings)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref(), cli.state)?;
    let session = Session::open(settings.shop.clone(), settings.state_path.clone()).await?;
    let queue = session.queue();

    match cli.command {
        Commands::Services => {
            println!("{}", render::services(queue.catalog()));
        }

        Commands::Barbers => {
            println!("{}", render::barbers(&queue.board()?));
        }

        Commands::Join {
            name,
            phone,
            barber,
            service,
        } => {
            let mut req = EnqueueRequest::new(name, barber, service);
            req.client_phone = phone;

            let entry = session
                .transact(|queue| queue.enqueue(req).context("Could not join the queue"))
                .await?;

            let wait = queue.wait_for_entry(entry.id)?;
            let barber = queue.barber(entry.barber_id)?;
            print!("{}", render::joined(&entry, barber.as_ref(), &wait));
        }

        Commands::Start { barber } => {
            let entry = session
                .transact(|queue| {
                    queue
                        .start_service(barber)
                        .with_context(|| format!("Could not start service for barber {}", barber))
                })
                .await?;

            println!(
                "{}",
                format!("✓ {} {} is in the chair", render::ticket(entry.id), entry.client_name)
                    .green()
                    .bold()
            );
        }

        Commands::Complete { entry } => {
            let done = session
                .transact(|queue| {
                    queue
                        .dequeue_completed(EntryId::new(entry))
                        .context("Could not complete service")
                })
                .await?;

            println!(
                "{}",
                format!("✓ Service complete for {} {}", render::ticket(done.id), done.client_name)
                    .green()
                    .bold()
            );
            match queue.current_client(done.barber_id)? {
                Some(next) => println!(
                    "  {} {} {}",
                    "Next up:".bold(),
                    render::ticket(next.id),
                    next.client_name
                ),
                None => println!("  {}", "No more clients in queue".dimmed()),
            }
        }

        Commands::Cancel { entry } => {
            let removed = session
                .transact(|queue| {
                    queue
                        .cancel(EntryId::new(entry))
                        .context("Could not leave the queue")
                })
                .await?;

            println!(
                "{}",
                format!("✓ {} {} left the queue", render::ticket(removed.id), removed.client_name)
                    .yellow()
                    .bold()
            );
        }

        Commands::Status { barber, json } => {
            let mut boards = queue.board()?;
            if let Some(id) = barber {
                boards.retain(|b| b.barber.id == id);
                if boards.is_empty() {
                    anyhow::bail!("Unknown barber {}", id);
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&boards)?);
            } else {
                print!(
                    "{}",
                    render::dashboard(&boards, chrono::Utc::now().timestamp_millis())
                );
            }
        }

        Commands::Wait { entry } => {
            let id = EntryId::new(entry);
            let wait = queue
                .wait_for_entry(id)
                .with_context(|| format!("Ticket {} is not in the queue", render::ticket(id)))?;

            if wait.position == 0 {
                println!("{} {}", render::ticket(id), "is up next".green().bold());
            } else {
                println!(
                    "{} {} ahead, ~{} min wait",
                    render::ticket(id),
                    wait.position,
                    wait.minutes
                );
            }
        }

        Commands::SetActive { barber, active } => {
            session
                .transact(|queue| Ok(queue.set_barber_active(barber, active)?))
                .await?;

            let state = if active { "open".green() } else { "closed".yellow() };
            println!("Barber {} is now {} for new clients", barber, state);
        }

        Commands::Reset => {
            let removed = session.transact(|queue| Ok(queue.reset()?)).await?;
            println!("{}", format!("✓ Cleared {} queued clients", removed).green().bold());
        }

        Commands::Watch { interval } => {
            let secs = interval.unwrap_or(settings.refresh_secs).max(1);
            watch::run(&session, secs).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging() {
        eprintln!("{} {:#}", "warning:".yellow().bold(), e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
