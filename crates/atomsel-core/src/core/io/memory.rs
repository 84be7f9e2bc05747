use std::cell::RefCell;
use sysinfo::System;

/// Reports how much system memory is still available.
pub trait MemoryProbe {
    /// Available memory as a fraction of total memory, or `None` when unknown.
    fn available_fraction(&self) -> Option<f64>;
}

/// [`MemoryProbe`] backed by the operating system's memory counters.
pub struct SystemMemory {
    system: RefCell<System>,
}

impl SystemMemory {
    pub fn new() -> Self {
        Self {
            system: RefCell::new(System::new()),
        }
    }
}

impl Default for SystemMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SystemMemory {
    fn available_fraction(&self) -> Option<f64> {
        let mut system = self.system.borrow_mut();
        system.refresh_memory();
        let total = system.total_memory();
        if total == 0 {
            return None;
        }
        Some(system.available_memory() as f64 / total as f64)
    }
}

/// A probe that never reports memory pressure.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl MemoryProbe for Unlimited {
    fn available_fraction(&self) -> Option<f64> {
        None
    }
}
