//! Simulated Octosonar board for driver tests.
//!
//! `Board` plays both external collaborators: `MockI2c` records every bus
//! operation, and when a trigger selects a channel with a configured echo,
//! the board fires the pulse edges into whatever `MockGpio` registered.

#![allow(dead_code)]

use octosonar::{
    DeviceHandle, EdgeCallback, EdgeEvent, EdgeNotifier, Error, Level, Registration, Result,
    Tick, Transport, ZipStep,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Everything the driver did to the board, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open { bus: u8, address: u8 },
    WriteByte(u8),
    Transaction(Vec<ZipStep>),
    Close(DeviceHandle),
    SetInput(u8),
    Register(u8),
    Cancel(Registration),
    Edge(Tick),
    /// A trigger arrived while the previous echo was still pending.
    Overlap,
}

#[derive(Default)]
struct BoardState {
    log: Vec<Event>,
    echoes: HashMap<u8, u32>,
    glitch_after: Option<u32>,
    echo_delay: Option<Duration>,
    callback: Option<Arc<Mutex<EdgeCallback>>>,
    open_handles: HashSet<u32>,
    next_handle: u32,
    pin: u8,
    clock: u32,
    pending: bool,
    fail_open: bool,
    fail_write_byte: bool,
    fail_set_input: bool,
    fail_register: bool,
    fail_transaction: bool,
}

#[derive(Clone, Default)]
pub struct Board {
    state: Arc<Mutex<BoardState>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transport(&self) -> MockI2c {
        MockI2c { board: self.clone() }
    }

    pub fn notifier(&self) -> MockGpio {
        MockGpio { board: self.clone() }
    }

    /// Channel `ch` answers every ping with a pulse of `micros`.
    pub fn set_echo(&self, ch: u8, micros: u32) {
        self.state.lock().unwrap().echoes.insert(ch, micros);
    }

    /// Adds a spurious edge `micros` after the pulse starts.
    pub fn set_glitch(&self, micros: u32) {
        self.state.lock().unwrap().glitch_after = Some(micros);
    }

    /// Deliver echoes from another thread after `delay` instead of inline.
    pub fn set_echo_delay(&self, delay: Duration) {
        self.state.lock().unwrap().echo_delay = Some(delay);
    }

    /// Starts the tick counter at `tick`, e.g. just before wraparound.
    pub fn set_clock(&self, tick: u32) {
        self.state.lock().unwrap().clock = tick;
    }

    pub fn fail_open(&self) {
        self.state.lock().unwrap().fail_open = true;
    }

    pub fn fail_write_byte(&self) {
        self.state.lock().unwrap().fail_write_byte = true;
    }

    pub fn fail_set_input(&self) {
        self.state.lock().unwrap().fail_set_input = true;
    }

    pub fn fail_register(&self) {
        self.state.lock().unwrap().fail_register = true;
    }

    pub fn fail_transaction(&self) {
        self.state.lock().unwrap().fail_transaction = true;
    }

    pub fn log(&self) -> Vec<Event> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.lock().unwrap().log.clear();
    }

    pub fn open_handles(&self) -> usize {
        self.state.lock().unwrap().open_handles.len()
    }

    pub fn is_registered(&self) -> bool {
        self.state.lock().unwrap().callback.is_some()
    }

    /// Select bytes of every trigger transaction, in order.
    pub fn triggered_masks(&self) -> Vec<u8> {
        self.log()
            .iter()
            .filter_map(|e| match e {
                Event::Transaction(steps) => match steps.get(1) {
                    Some(ZipStep::Write(bytes)) => bytes.first().copied(),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    /// Fires edges at the given ticks through the registered callback.
    pub fn deliver(&self, ticks: &[u32]) {
        let (callback, pin) = {
            let state = self.state.lock().unwrap();
            (state.callback.clone(), state.pin)
        };
        let Some(callback) = callback else { return };
        for (i, &tick) in ticks.iter().enumerate() {
            {
                let mut state = self.state.lock().unwrap();
                state.log.push(Event::Edge(Tick(tick)));
                if i + 1 == ticks.len() {
                    state.pending = false;
                }
            }
            let level = if i % 2 == 0 { Level::High } else { Level::Low };
            let mut guard = callback.lock().unwrap();
            let cb: &mut EdgeCallback = &mut guard;
            cb(EdgeEvent {
                pin,
                level,
                tick: Tick(tick),
            });
        }
    }

    fn ping(&self, mask: u8) {
        let ch = mask.trailing_zeros() as u8;
        let (edges, delay) = {
            let mut state = self.state.lock().unwrap();
            let Some(&width) = state.echoes.get(&ch) else {
                return;
            };
            let start = state.clock.wrapping_add(150);
            let mut edges = vec![start];
            if let Some(glitch) = state.glitch_after {
                edges.push(start.wrapping_add(glitch));
            }
            edges.push(start.wrapping_add(width));
            state.clock = start.wrapping_add(width).wrapping_add(1_000);
            state.pending = true;
            (edges, state.echo_delay)
        };
        match delay {
            None => self.deliver(&edges),
            Some(delay) => {
                let board = self.clone();
                thread::spawn(move || {
                    thread::sleep(delay);
                    board.deliver(&edges);
                });
            }
        }
    }
}

pub struct MockI2c {
    board: Board,
}

impl Transport for MockI2c {
    fn open(&mut self, bus: u8, address: u8) -> Result<DeviceHandle> {
        let mut state = self.board.state.lock().unwrap();
        if state.fail_open {
            return Err(Error::Transport(format!("no such bus /dev/i2c-{}", bus)));
        }
        state.log.push(Event::Open { bus, address });
        let handle = state.next_handle;
        state.next_handle += 1;
        state.open_handles.insert(handle);
        Ok(DeviceHandle(handle))
    }

    fn write_byte(&mut self, handle: DeviceHandle, byte: u8) -> Result<()> {
        let mut state = self.board.state.lock().unwrap();
        if !state.open_handles.contains(&handle.0) {
            return Err(Error::HandleClosed);
        }
        if state.fail_write_byte {
            return Err(Error::Transport("NACK".to_string()));
        }
        state.log.push(Event::WriteByte(byte));
        Ok(())
    }

    fn transaction(&mut self, handle: DeviceHandle, steps: &[ZipStep]) -> Result<Vec<u8>> {
        let mask = {
            let mut state = self.board.state.lock().unwrap();
            if !state.open_handles.contains(&handle.0) {
                return Err(Error::HandleClosed);
            }
            if state.fail_transaction {
                return Err(Error::Transport("NACK from 0x3D".to_string()));
            }
            if state.pending {
                state.log.push(Event::Overlap);
            }
            state.log.push(Event::Transaction(steps.to_vec()));
            match steps.get(1) {
                Some(ZipStep::Write(bytes)) => bytes.first().copied().unwrap_or(0),
                _ => 0,
            }
        };
        if mask != 0 {
            self.board.ping(mask);
        }
        Ok(Vec::new())
    }

    fn close(&mut self, handle: DeviceHandle) -> Result<()> {
        let mut state = self.board.state.lock().unwrap();
        if !state.open_handles.remove(&handle.0) {
            return Err(Error::Transport(format!("{} already closed", handle)));
        }
        state.log.push(Event::Close(handle));
        Ok(())
    }
}

pub struct MockGpio {
    board: Board,
}

impl EdgeNotifier for MockGpio {
    fn set_input(&mut self, pin: u8) -> Result<()> {
        let mut state = self.board.state.lock().unwrap();
        if state.fail_set_input {
            return Err(Error::Gpio(format!("GPIO {} busy", pin)));
        }
        state.log.push(Event::SetInput(pin));
        Ok(())
    }

    fn register(&mut self, pin: u8, callback: EdgeCallback) -> Result<Registration> {
        let mut state = self.board.state.lock().unwrap();
        if state.fail_register {
            return Err(Error::Gpio("interrupt already claimed".to_string()));
        }
        state.log.push(Event::Register(pin));
        state.pin = pin;
        state.callback = Some(Arc::new(Mutex::new(callback)));
        Ok(Registration(u32::from(pin)))
    }

    fn cancel(&mut self, registration: Registration) -> Result<()> {
        let mut state = self.board.state.lock().unwrap();
        if state.callback.take().is_none() {
            return Err(Error::Gpio("not registered".to_string()));
        }
        state.log.push(Event::Cancel(registration));
        Ok(())
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
