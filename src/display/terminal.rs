// src/display/terminal.rs
//! Terminal-based clock display

use crate::{
    error::{ClockError, Result},
    gps::GpsReceiver,
};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};
use tokio::time::sleep;

pub struct TerminalDisplay {
    utc_offset: i32,
}

impl TerminalDisplay {
    pub fn new(utc_offset: i32) -> Self {
        Self { utc_offset }
    }

    /// Start the terminal display loop
    pub async fn run(
        &self,
        receiver: Arc<RwLock<GpsReceiver>>,
        running: Arc<AtomicBool>,
    ) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Hide, DisableLineWrap)
            .map_err(|e| ClockError::Io(e))?;

        // Set up Ctrl+C handler
        let running_clone = Arc::clone(&running);
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.unwrap();
            running_clone.store(false, Ordering::Relaxed);
        });

        while running.load(Ordering::Relaxed) {
            execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))
                .map_err(|e| ClockError::Io(e))?;

            {
                let mut rx = receiver.write().unwrap();
                self.render_display(&mut stdout, &mut rx)?;
            }

            stdout.flush().map_err(|e| ClockError::Io(e))?;
            sleep(Duration::from_secs(1)).await;
        }

        execute!(stdout, Show, EnableLineWrap)
            .map_err(|e| ClockError::Io(e))?;
        println!("\nShutting down...");
        Ok(())
    }

    /// Render the clock state to the terminal
    fn render_display(&self, stdout: &mut impl Write, rx: &mut GpsReceiver) -> Result<()> {
        // Header
        execute!(
            stdout,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print("GPS Clock - Satellite-Synchronized Time Display"),
            Print("\n"),
            Print("=".repeat(60)),
            Print("\n"),
            ResetColor
        ).map_err(|e| ClockError::Io(e))?;

        self.render_time_section(stdout, rx)?;
        self.render_position_section(stdout, rx)?;
        self.render_signal_section(stdout, rx)?;
        self.render_link_section(stdout, rx)?;

        // Footer
        execute!(
            stdout,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print("Press Ctrl+C to exit"),
            Print("\n"),
            ResetColor
        ).map_err(|e| ClockError::Io(e))?;

        Ok(())
    }

    fn render_time_section(&self, stdout: &mut impl Write, rx: &mut GpsReceiver) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print("TIME:\n"),
            ResetColor
        ).map_err(|e| ClockError::Io(e))?;

        let sync_marker = if rx.has_ever_had_fix() { "" } else { "  (awaiting sync)" };
        execute!(
            stdout,
            Print(format!("  Local:     {}{}\n", rx.time_str(self.utc_offset), sync_marker))
        ).map_err(|e| ClockError::Io(e))?;

        execute!(
            stdout,
            Print(format!("  Date:      {}\n", rx.date_str(self.utc_offset)))
        ).map_err(|e| ClockError::Io(e))?;

        execute!(
            stdout,
            Print(format!("  UTC:       {} (offset {:+})\n\n", rx.time_str(0), self.utc_offset))
        ).map_err(|e| ClockError::Io(e))?;

        Ok(())
    }

    fn render_position_section(&self, stdout: &mut impl Write, rx: &mut GpsReceiver) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Cyan),
            Print("POSITION:\n"),
            ResetColor
        ).map_err(|e| ClockError::Io(e))?;

        execute!(
            stdout,
            Print(format!("  Latitude:  {}\n", rx.lat_str()))
        ).map_err(|e| ClockError::Io(e))?;

        execute!(
            stdout,
            Print(format!("  Longitude: {}\n", rx.lon_str()))
        ).map_err(|e| ClockError::Io(e))?;

        execute!(
            stdout,
            Print(format!("  Grid:      {}\n", rx.maidenhead()))
        ).map_err(|e| ClockError::Io(e))?;

        execute!(
            stdout,
            Print(format!("  UTM:       {}\n\n", rx.utm()))
        ).map_err(|e| ClockError::Io(e))?;

        Ok(())
    }

    fn render_signal_section(&self, stdout: &mut impl Write, rx: &mut GpsReceiver) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Magenta),
            Print("SIGNAL:\n"),
            ResetColor
        ).map_err(|e| ClockError::Io(e))?;

        let fix_state = if rx.has_fix() { "Valid" } else { "No fix" };
        execute!(
            stdout,
            Print(format!("  Fix:        {} ({})\n", fix_state, rx.fix_type_str()))
        ).map_err(|e| ClockError::Io(e))?;

        execute!(
            stdout,
            Print(format!(
                "  Satellites: {} in use / {} in view\n",
                rx.satellites_in_use(),
                rx.satellites_in_view()
            ))
        ).map_err(|e| ClockError::Io(e))?;

        let age = match rx.fix_age_seconds() {
            Some(age) => format!("{} s ago", age),
            None => "never".to_string(),
        };
        execute!(
            stdout,
            Print(format!("  Last fix:   {}\n\n", age))
        ).map_err(|e| ClockError::Io(e))?;

        Ok(())
    }

    fn render_link_section(&self, stdout: &mut impl Write, rx: &mut GpsReceiver) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Blue),
            Print("LINK:\n"),
            ResetColor
        ).map_err(|e| ClockError::Io(e))?;

        let fix = rx.fix();
        execute!(
            stdout,
            Print(format!(
                "  Sentences:  {} clean / {} parsed / {} CRC failures\n",
                fix.clean_sentences, fix.parsed_sentences, fix.crc_fails
            ))
        ).map_err(|e| ClockError::Io(e))?;

        let last = match rx.last_sentence() {
            Some(kind) => kind.label(),
            None => "none",
        };
        execute!(
            stdout,
            Print(format!("  Last type:  {}\n\n", last))
        ).map_err(|e| ClockError::Io(e))?;

        Ok(())
    }
}
