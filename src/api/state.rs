//! Application state for the attendance API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::attendance::{AttendanceGuard, AttendanceStore, EventBus};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::payroll::PayCalculator;

struct Inner {
    config: EngineConfig,
    store: Arc<AttendanceStore>,
    events: EventBus,
    guard: AttendanceGuard,
    payroll: PayCalculator,
    clock: Arc<dyn Clock>,
}

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration, the attendance store and the services built on it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    /// Wires up the store, event bus, guard and pay calculator from `config`.
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let service = config.service();
        let store = Arc::new(AttendanceStore::new(Duration::from_millis(
            service.lock_timeout_ms,
        )));
        let events = EventBus::new(service.event_channel_capacity);
        let guard = AttendanceGuard::new(Arc::clone(&store), events.clone(), Arc::clone(&clock));
        let payroll = PayCalculator::new(Arc::clone(&store), config.pay_rules().clone());

        Self {
            inner: Arc::new(Inner {
                config,
                store,
                events,
                guard,
                payroll,
                clock,
            }),
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Returns the attendance store.
    pub fn store(&self) -> &AttendanceStore {
        &self.inner.store
    }

    /// Returns the attendance event bus.
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Returns the check-in/check-out guard.
    pub fn guard(&self) -> &AttendanceGuard {
        &self.inner.guard
    }

    /// Returns the pay calculator.
    pub fn payroll(&self) -> &PayCalculator {
        &self.inner.payroll
    }

    /// Returns the clock used for "now" and "today".
    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }
}
