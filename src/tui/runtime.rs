//! Event loop for the browser TUI.
//!
//! A reader thread pumps crossterm events into a crossbeam channel. The
//! main loop multiplexes those with a frame tick and a small deadline
//! wheel that turns scheduled commands (search debounce, banner expiry,
//! toast expiry) back into messages for the update function.

#![allow(missing_docs)]

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use crossterm::event::{self, Event};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::model::{BrowserCmd, BrowserModel, BrowserMsg, NotificationLevel};
use super::render::render_frame;
use super::terminal_guard::TerminalGuard;
use super::update::update;
use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::core::errors::{Result, SibError};
use crate::logger::LogHandle;

/// Buffered events between the reader thread and the loop.
const EVENT_QUEUE_DEPTH: usize = 64;

/// How long the degraded-logger warning toast stays up.
const LOG_WARNING_DISPLAY: Duration = Duration::from_secs(10);

/// A command armed against the clock; fires as its message when due.
struct PendingTimer {
    due: Instant,
    msg: BrowserMsg,
}

/// Run the browser until the user quits.
///
/// # Errors
/// Returns terminal setup and draw failures, and a channel error when the
/// event reader drops (stdin closed underneath us).
pub fn run_browser(config: Config, catalog: &Catalog, log: LogHandle) -> Result<()> {
    let mut model = BrowserModel::new(config, catalog, log)?;
    model
        .log
        .session_start(model.screen.slug(), model.controller.len());

    let mut timers: Vec<PendingTimer> = Vec::new();
    if model.config.log.enabled && model.log.state() != "normal" {
        let id = model.push_notification(
            NotificationLevel::Warning,
            "interaction log degraded; events may be lost",
        );
        arm(
            BrowserCmd::ScheduleNotificationExpiry {
                id,
                after: LOG_WARNING_DISPLAY,
            },
            Instant::now(),
            &mut timers,
        );
    }

    let guard = TerminalGuard::new().map_err(terminal_error)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout())).map_err(terminal_error)?;

    // Seed the viewport before the first draw.
    let (cols, rows) = TerminalGuard::terminal_size();
    let cmd = update(&mut model, BrowserMsg::Resize(cols, rows));
    arm(cmd, Instant::now(), &mut timers);

    let events = spawn_event_pump()?;
    let result = event_loop(&mut terminal, &mut model, &events, &mut timers);

    let duration_ms = u64::try_from(model.started.elapsed().as_millis()).unwrap_or(u64::MAX);
    model.log.session_stop(duration_ms);
    model.log.flush();
    drop(guard);
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: &mut BrowserModel,
    events: &Receiver<Event>,
    timers: &mut Vec<PendingTimer>,
) -> Result<()> {
    let tick_interval = Duration::from_millis(model.config.tui.tick_ms.max(1));
    let mut next_tick = Instant::now() + tick_interval;

    loop {
        terminal
            .draw(|frame| render_frame(model, frame))
            .map_err(terminal_error)?;
        if model.quit {
            return Ok(());
        }

        let now = Instant::now();
        let deadline = timers
            .iter()
            .map(|timer| timer.due)
            .min()
            .map_or(next_tick, |due| due.min(next_tick));

        match events.recv_timeout(deadline.saturating_duration_since(now)) {
            Ok(event) => {
                if let Some(msg) = translate(event) {
                    let cmd = update(model, msg);
                    arm(cmd, Instant::now(), timers);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(SibError::ChannelClosed {
                    component: "event pump",
                });
            }
        }

        let now = Instant::now();
        fire_due_timers(model, timers, now);
        if now >= next_tick {
            while next_tick <= now {
                next_tick += tick_interval;
            }
            let cmd = update(model, BrowserMsg::Tick);
            arm(cmd, now, timers);
        }
        if model.quit {
            return Ok(());
        }
    }
}

/// Deliver every timer at or past its deadline, in arming order. Firing may
/// arm fresh timers; those land in the future and wait their turn.
fn fire_due_timers(model: &mut BrowserModel, timers: &mut Vec<PendingTimer>, now: Instant) {
    let mut index = 0;
    while index < timers.len() {
        if timers[index].due <= now {
            let timer = timers.remove(index);
            let cmd = update(model, timer.msg);
            arm(cmd, now, timers);
        } else {
            index += 1;
        }
    }
}

/// Translate a command into pending timers. Quit is level-triggered through
/// the model flag, so it arms nothing here.
fn arm(cmd: BrowserCmd, now: Instant, timers: &mut Vec<PendingTimer>) {
    match cmd {
        BrowserCmd::None | BrowserCmd::Quit => {}
        BrowserCmd::ScheduleSearchCommit { generation, after } => timers.push(PendingTimer {
            due: now + after,
            msg: BrowserMsg::SearchDebounceFired { generation },
        }),
        BrowserCmd::ScheduleBannerExpiry { generation, after } => timers.push(PendingTimer {
            due: now + after,
            msg: BrowserMsg::BannerExpired { generation },
        }),
        BrowserCmd::ScheduleNotificationExpiry { id, after } => timers.push(PendingTimer {
            due: now + after,
            msg: BrowserMsg::NotificationExpired(id),
        }),
        BrowserCmd::Batch(cmds) => {
            for cmd in cmds {
                arm(cmd, now, timers);
            }
        }
    }
}

fn translate(event: Event) -> Option<BrowserMsg> {
    match event {
        Event::Key(key) => Some(BrowserMsg::Key(key)),
        Event::Resize(cols, rows) => Some(BrowserMsg::Resize(cols, rows)),
        _ => None,
    }
}

/// Blocking crossterm reader on its own thread. The channel closes when
/// either side goes away; the loop exits on send failure.
fn spawn_event_pump() -> Result<Receiver<Event>> {
    let (sender, receiver) = bounded::<Event>(EVENT_QUEUE_DEPTH);
    thread::Builder::new()
        .name("sib-events".to_string())
        .spawn(move || {
            while let Ok(event) = event::read() {
                if sender.send(event).is_err() {
                    break;
                }
            }
        })
        .map_err(|err| SibError::Runtime {
            details: format!("event pump thread: {err}"),
        })?;
    Ok(receiver)
}

fn terminal_error(err: io::Error) -> SibError {
    SibError::Terminal {
        details: err.to_string(),
    }
}

// ──────────────────── tests ────────────────────
