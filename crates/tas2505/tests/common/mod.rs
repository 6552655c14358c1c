//! Simulated TAS2505 on an async I²C bus, shared by the integration tests.
//!
//! `SimBus` models the paged register file: a write of `[0x00, n]` switches
//! the page, every other write stores a value at `(page, address)`, and a
//! `write_read` returns the stored value (0 if never written). Every
//! successful transfer and every delay lands in one shared event log, so
//! tests can assert the exact interleaving of bus traffic and sleeps.
#![allow(
    dead_code,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::unwrap_used,
    clippy::cast_possible_truncation
)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{
    Error, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation,
};

use tas2505::registers::{I2C_ADDRESS, PAGE_SELECT};
use tas2505::Tas2505;

/// One observed bus transfer or delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// `[0x00, page]` written.
    PageSelect(u8),
    /// Value written to `register` on the then-current `page`.
    Write { page: u8, register: u8, value: u8 },
    /// `register` read on the then-current `page`.
    Read { page: u8, register: u8 },
    /// Delay provider asked to sleep.
    Delay(u32),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Error injected by [`SimBus::fail_on`] or produced by a wrong address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError(pub ErrorKind);

impl Error for SimError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Paged register file behind an async I²C interface.
pub struct SimBus {
    log: EventLog,
    page: u8,
    pointer: u8,
    registers: BTreeMap<(u8, u8), u8>,
    transactions: usize,
    fail_on: Option<usize>,
}

impl SimBus {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            page: 0,
            pointer: 0,
            registers: BTreeMap::new(),
            transactions: 0,
            fail_on: None,
        }
    }

    /// Fail the `n`th bus transaction (zero-based) with `ErrorKind::Other`.
    pub fn fail_on(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }

    /// Seed a register value, as if the device had been configured earlier.
    pub fn preset(&mut self, page: u8, register: u8, value: u8) {
        self.registers.insert((page, register), value);
    }

    pub fn register(&self, page: u8, register: u8) -> Option<u8> {
        self.registers.get(&(page, register)).copied()
    }

    pub fn current_page(&self) -> u8 {
        self.page
    }

    /// Transactions attempted so far, including a failed one.
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    fn apply_write(&mut self, bytes: &[u8]) {
        let Some((&register, values)) = bytes.split_first() else {
            return;
        };
        if register == PAGE_SELECT {
            if let Some(&page) = values.first() {
                self.page = page;
                self.log.borrow_mut().push(Event::PageSelect(page));
            }
            return;
        }
        self.pointer = register;
        for (offset, &value) in values.iter().enumerate() {
            let address = register.wrapping_add(offset as u8);
            self.registers.insert((self.page, address), value);
            self.log.borrow_mut().push(Event::Write {
                page: self.page,
                register: address,
                value,
            });
        }
    }

    fn apply_read(&mut self, buf: &mut [u8]) {
        for (offset, slot) in buf.iter_mut().enumerate() {
            let address = self.pointer.wrapping_add(offset as u8);
            *slot = self.register(self.page, address).unwrap_or(0);
        }
        self.log.borrow_mut().push(Event::Read {
            page: self.page,
            register: self.pointer,
        });
    }
}

impl ErrorType for SimBus {
    type Error = SimError;
}

impl I2c for SimBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let index = self.transactions;
        self.transactions += 1;

        if self.fail_on == Some(index) {
            return Err(SimError(ErrorKind::Other));
        }
        if address != I2C_ADDRESS {
            return Err(SimError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address,
            )));
        }

        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => self.apply_write(bytes),
                Operation::Read(buf) => self.apply_read(buf),
            }
        }
        Ok(())
    }
}

/// Delay provider that logs instead of sleeping.
pub struct RecordingDelay {
    log: EventLog,
}

impl RecordingDelay {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::Delay(ns / 1_000_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::Delay(ms));
    }
}

/// Driver over a fresh simulated device, plus the shared event log.
pub fn sim_driver() -> (Tas2505<SimBus, RecordingDelay>, EventLog) {
    sim_driver_with(|bus| bus)
}

/// Like [`sim_driver`], letting the caller configure the bus first.
pub fn sim_driver_with(
    configure: impl FnOnce(SimBus) -> SimBus,
) -> (Tas2505<SimBus, RecordingDelay>, EventLog) {
    let log = EventLog::default();
    let bus = configure(SimBus::new(log.clone()));
    let driver = Tas2505::with_delay(bus, RecordingDelay::new(log.clone()));
    (driver, log)
}

/// Snapshot of the event log.
pub fn events(log: &EventLog) -> Vec<Event> {
    log.borrow().clone()
}
