//! Keyboard-wedge barcode scanner buffering.
//!
//! The scanner "types" the code as a burst of key-ups, usually followed by
//! Enter. A code is complete on Enter key-up, or once no character arrives
//! for [`SCAN_THRESHOLD`].

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

/// Idle gap that ends a scan.
pub const SCAN_THRESHOLD: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    /// Any other named key (`Shift`, `ArrowUp`, ...).
    Named(String),
}

impl Key {
    /// Map a DOM-style key name onto a `Key`.
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            _ if name == "Enter" => Key::Enter,
            (Some(c), None) => Key::Char(c),
            _ => Key::Named(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}

/// What the caller should do with the event it just fed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    /// Enter key-down: swallow it so the input field does not submit.
    PreventDefault,
    Buffered,
    /// Scan finished; `None` when the buffer was empty.
    Completed(Option<String>),
}

fn is_printable(c: char) -> bool {
    (' '..='~').contains(&c)
}

#[derive(Debug, Default)]
pub struct BarcodeScanner {
    buffer: String,
    deadline: Option<Instant>,
    threshold: Option<Duration>,
}

impl BarcodeScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(threshold: Duration) -> Self {
        Self {
            threshold: Some(threshold),
            ..Self::default()
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold.unwrap_or(SCAN_THRESHOLD)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// When the idle timer fires, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn handle(&mut self, event: &KeyEvent, now: Instant) -> KeyOutcome {
        match event {
            KeyEvent::Down(Key::Enter) => KeyOutcome::PreventDefault,
            KeyEvent::Down(_) => KeyOutcome::Ignored,
            KeyEvent::Up(Key::Enter) => KeyOutcome::Completed(self.complete()),
            KeyEvent::Up(Key::Char(c)) if is_printable(*c) => {
                self.buffer.push(*c);
                self.deadline = Some(now + self.threshold());
                KeyOutcome::Buffered
            }
            KeyEvent::Up(_) => KeyOutcome::Ignored,
        }
    }

    /// Complete the scan if the idle timer has expired by `now`.
    pub fn poll_timeout(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.complete(),
            _ => None,
        }
    }

    /// Emit the buffered code, if any, and reset.
    pub fn complete(&mut self) -> Option<String> {
        self.deadline = None;
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.deadline = None;
    }
}

/// Drive a scanner over a key-event channel, sending each completed code to
/// `scans`. Returns when the event channel closes or `scans` is dropped; a
/// partial code pending at close is flushed first.
pub async fn run_scanner(
    mut scanner: BarcodeScanner,
    mut events: mpsc::Receiver<KeyEvent>,
    scans: mpsc::Sender<String>,
) {
    loop {
        let deadline = scanner.deadline();
        let idle = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
                None => std::future::pending::<()>().await,
            }
        };

        let code = tokio::select! {
            event = events.recv() => match event {
                Some(event) => match scanner.handle(&event, Instant::now()) {
                    KeyOutcome::Completed(code) => code,
                    _ => None,
                },
                None => {
                    if let Some(code) = scanner.complete() {
                        let _ = scans.send(code).await;
                    }
                    tracing::debug!("Key event channel closed, scanner stopping");
                    return;
                }
            },
            _ = idle => scanner.poll_timeout(Instant::now()),
        };

        if let Some(code) = code {
            tracing::info!(barcode = %code, "Barcode scanned");
            if scans.send(code).await.is_err() {
                tracing::debug!("Scan receiver dropped, scanner stopping");
                return;
            }
        }
    }
}
