// src/driver/mocks.rs

// Shared test doubles. Every mock is a cheap handle around shared state so a test
// can hand one clone to the driver and keep another for assertions.

use crate::common::{
    address::Dht12Addr,
    frame::FRAME_LEN,
    hal_traits::{Dht12Bus, Dht12Timer, InterruptLock, Level, PinMode, SignalPin},
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

// --- Mock Errors ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockPinError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockBusError;

// --- Mock Interrupt Lock ---
#[derive(Clone, Default)]
pub struct MockLock {
    masked: Rc<Cell<bool>>,
    disables: Rc<Cell<u32>>,
    restores: Rc<Cell<u32>>,
}

impl MockLock {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_masked(&self) -> bool {
        self.masked.get()
    }
    pub fn disables(&self) -> u32 {
        self.disables.get()
    }
    pub fn restores(&self) -> u32 {
        self.restores.get()
    }
    /// Flag the pin can watch to tell masked reads from unmasked ones.
    pub fn flag(&self) -> Rc<Cell<bool>> {
        self.masked.clone()
    }
}

impl InterruptLock for MockLock {
    fn disable(&mut self) {
        assert!(!self.masked.get(), "nested disable");
        self.masked.set(true);
        self.disables.set(self.disables.get() + 1);
    }
    fn restore(&mut self) {
        assert!(self.masked.get(), "restore without disable");
        self.masked.set(false);
        self.restores.set(self.restores.get() + 1);
    }
}

// --- Mock Pin ---

/// Line model: a queue of (level, polls) segments consumed one poll per `read`,
/// falling back to `idle` once empty. The poll that observes an edge belongs to
/// the next segment, so every measured pulse after the first is one poll short.
#[derive(Default)]
pub struct PinState {
    script: VecDeque<(Level, u32)>,
    idle: Option<Level>,
    fail_reads: bool,
    reads: u32,
    masked_reads: u32,
    writes: Vec<Level>,
    modes: Vec<PinMode>,
    masked: Option<Rc<Cell<bool>>>,
}

#[derive(Clone)]
pub struct MockPin(Rc<RefCell<PinState>>);

impl MockPin {
    pub fn idle(level: Level) -> Self {
        Self::scripted(&[], level)
    }

    pub fn scripted(segments: &[(Level, u32)], idle: Level) -> Self {
        let state = PinState {
            script: segments.iter().copied().filter(|(_, n)| *n > 0).collect(),
            idle: Some(idle),
            ..PinState::default()
        };
        MockPin(Rc::new(RefCell::new(state)))
    }

    /// The sensor's full answer for `bytes`: handshake, 40 bits, trailing low.
    pub fn sensor_reply(bytes: [u8; FRAME_LEN]) -> Self {
        let pin = Self::idle(Level::High);
        pin.stage_reply(bytes);
        pin
    }

    pub fn stage_reply(&self, bytes: [u8; FRAME_LEN]) {
        let mut segments = Vec::new();
        segments.push((Level::Low, 80));
        segments.push((Level::High, 80));
        for byte in bytes {
            for bit in (0..8).rev() {
                segments.push((Level::Low, 50));
                segments.push((Level::High, if byte & (1 << bit) != 0 { 70 } else { 28 }));
            }
        }
        segments.push((Level::Low, 50));
        self.stage(&segments);
    }

    pub fn stage(&self, segments: &[(Level, u32)]) {
        let mut state = self.0.borrow_mut();
        state.script = segments.iter().copied().filter(|(_, n)| *n > 0).collect();
    }

    pub fn watch(&self, masked: Rc<Cell<bool>>) {
        self.0.borrow_mut().masked = Some(masked);
    }

    pub fn fail_reads(&mut self) {
        self.0.borrow_mut().fail_reads = true;
    }

    pub fn reads(&self) -> u32 {
        self.0.borrow().reads
    }
    pub fn masked_reads(&self) -> u32 {
        self.0.borrow().masked_reads
    }
    pub fn writes(&self) -> Vec<Level> {
        self.0.borrow().writes.clone()
    }
    pub fn modes(&self) -> Vec<PinMode> {
        self.0.borrow().modes.clone()
    }
    /// Any interaction at all, used to prove the throttle left the pin alone.
    pub fn touches(&self) -> usize {
        let state = self.0.borrow();
        state.reads as usize + state.writes.len() + state.modes.len()
    }
}

impl SignalPin for MockPin {
    type Error = MockPinError;

    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        self.0.borrow_mut().modes.push(mode);
        Ok(())
    }

    fn write(&mut self, level: Level) -> Result<(), Self::Error> {
        self.0.borrow_mut().writes.push(level);
        Ok(())
    }

    fn read(&mut self) -> Result<Level, Self::Error> {
        let mut state = self.0.borrow_mut();
        if state.fail_reads {
            return Err(MockPinError);
        }
        state.reads += 1;
        if state.masked.as_ref().map_or(false, |m| m.get()) {
            state.masked_reads += 1;
        }
        let idle = state.idle.unwrap_or(Level::High);
        let next = state.script.front_mut().map(|(level, remaining)| {
            *remaining -= 1;
            (*level, *remaining == 0)
        });
        match next {
            Some((level, drained)) => {
                if drained {
                    state.script.pop_front();
                }
                Ok(level)
            }
            None => Ok(idle),
        }
    }
}

// --- Mock Bus ---
#[derive(Default)]
pub struct BusState {
    pub nack: bool,
    pub request_fails: bool,
    staged: VecDeque<Vec<u8>>,
    rx: VecDeque<u8>,
    pub written: Vec<u8>,
    pub addresses: Vec<u8>,
    pub transactions: u32,
    pub requests: u32,
}

#[derive(Clone, Default)]
pub struct MockBus(Rc<RefCell<BusState>>);

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues what the device puts on the bus for one request. Replies are
    /// served in order, an empty queue answers with nothing.
    pub fn stage(&self, bytes: &[u8]) {
        self.0.borrow_mut().staged.push_back(bytes.to_vec());
    }

    pub fn set_nack(&self, nack: bool) {
        self.0.borrow_mut().nack = nack;
    }

    pub fn set_request_fails(&self, fails: bool) {
        self.0.borrow_mut().request_fails = fails;
    }

    pub fn state(&self) -> std::cell::Ref<'_, BusState> {
        self.0.borrow()
    }

    /// Any interaction at all, used to prove the throttle left the bus alone.
    pub fn touches(&self) -> u32 {
        let state = self.0.borrow();
        state.transactions + state.requests
    }
}

impl Dht12Bus for MockBus {
    type Error = MockBusError;

    fn begin_transaction(&mut self, address: Dht12Addr) {
        let mut state = self.0.borrow_mut();
        state.transactions += 1;
        state.addresses.push(address.as_u8());
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.0.borrow_mut().written.push(byte);
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), Self::Error> {
        if self.0.borrow().nack {
            Err(MockBusError)
        } else {
            Ok(())
        }
    }

    fn request_bytes(&mut self, address: Dht12Addr, _count: usize) -> Result<usize, Self::Error> {
        let mut state = self.0.borrow_mut();
        state.requests += 1;
        state.addresses.push(address.as_u8());
        if state.request_fails {
            return Err(MockBusError);
        }
        // A misbehaving device may push more than asked for; keep all of it
        let reply = state.staged.pop_front().unwrap_or_default();
        state.rx.extend(reply);
        Ok(state.rx.len())
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.0.borrow_mut().rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn bytes_remaining(&self) -> usize {
        self.0.borrow().rx.len()
    }
}

// --- Mock Timer ---
#[derive(Debug, Default, Clone)]
pub struct MockTimer {
    pub now_ms: u32,
    pub micros: u64,
    pub delays_ms: Vec<u32>,
    pub delays_us: Vec<u32>,
}

impl MockTimer {
    pub fn at(now_ms: u32) -> Self {
        Self { now_ms, ..Self::default() }
    }

    pub fn advance_ms(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }
}

impl Dht12Timer for MockTimer {
    fn delay_us(&mut self, us: u32) {
        self.delays_us.push(us);
        self.micros += us as u64;
        while self.micros >= 1000 {
            self.micros -= 1000;
            self.advance_ms(1);
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
        self.advance_ms(ms);
    }

    fn now_ms(&self) -> u32 {
        self.now_ms
    }
}
