// Watch - periodic board redisplay

use crate::render;
use crate::session::Session;
use anyhow::Result;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Redraw the dashboard every `interval_secs` until Ctrl+C
///
/// Each tick reloads the state file, so commands run from other terminals
/// show up on the next redraw. Refresh is presentation only; a failed reload
/// keeps the previous state on screen.
pub async fn run(session: &Session, interval_secs: u64) -> Result<()> {
    info!(interval_secs = interval_secs, "Watching queue");

    let mut tick = interval(Duration::from_secs(interval_secs));
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Err(e) = session.reload().await {
                    error!(error = ?e, "Failed to reload queue state");
                }
                let boards = session.queue().board()?;
                // Clear screen and home the cursor
                print!("\x1B[2J\x1B[H");
                println!("{}", render::dashboard(&boards, chrono::Utc::now().timestamp_millis()));
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopped watching");
                return Ok(());
            }
        }
    }
}
