use std::collections::VecDeque;
use std::io::Read;
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// Non-blocking source of key codes.
pub trait KeySource: Send {
    /// Next pending key, if any. Never blocks.
    fn poll_key(&mut self) -> Option<u32>;
}

/// No interactive input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoKeys;

impl KeySource for NoKeys {
    fn poll_key(&mut self) -> Option<u32> {
        None
    }
}

/// Keys scheduled by cycle: `(cycle, key)` pairs are released once `cycle` polls have happened.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    queue: VecDeque<(u64, u32)>,
    polls: u64,
}

impl ScriptedKeys {
    pub fn new(schedule: impl IntoIterator<Item = (u64, u32)>) -> Self {
        let mut queue: Vec<_> = schedule.into_iter().collect();
        queue.sort_by_key(|(cycle, _)| *cycle);
        Self {
            queue: queue.into(),
            polls: 0,
        }
    }

    /// One key per poll, starting immediately.
    pub fn immediate(keys: impl IntoIterator<Item = u32>) -> Self {
        Self::new(keys.into_iter().map(|k| (0, k)))
    }
}

impl KeySource for ScriptedKeys {
    fn poll_key(&mut self) -> Option<u32> {
        let now = self.polls;
        self.polls += 1;
        match self.queue.front() {
            Some(&(cycle, key)) if cycle <= now => {
                self.queue.pop_front();
                Some(key)
            }
            _ => None,
        }
    }
}

/// Keys typed on stdin, read by a background thread.
///
/// Stdin is line-buffered by the terminal, so keys arrive after Enter; the newline itself is
/// dropped.
#[derive(Debug)]
pub struct StdinKeys {
    rx: Receiver<u32>,
    closed: bool,
}

impl StdinKeys {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for byte in stdin.lock().bytes() {
                let Ok(byte) = byte else { break };
                if byte == b'\n' || byte == b'\r' {
                    continue;
                }
                if tx.send(u32::from(byte)).is_err() {
                    break;
                }
            }
        });
        Self { rx, closed: false }
    }
}

impl KeySource for StdinKeys {
    fn poll_key(&mut self) -> Option<u32> {
        if self.closed {
            return None;
        }
        match self.rx.try_recv() {
            Ok(key) => Some(key),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::debug!("stdin closed, no more keys");
                self.closed = true;
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/input.rs"]
mod tests;
