//! Process-wide `tracing` default.
//!
//! Once a logger is installed in the registry, plain `tracing` macros (and
//! any library logging through `tracing`) are forwarded to whichever
//! logger is the current default, through its active sink. Rotations and
//! replacements of the default are picked up on the next event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Once;
use tracing::span::{Attributes, Id, Record};
use tracing::subscriber::Interest;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::filter::LevelFilter;

use crate::registry;
use crate::sink::MIN_LEVEL;

static INSTALL: Once = Once::new();

/// Make [`Forward`] the global default, once per process.
///
/// If the application already installed its own global subscriber, that
/// one is kept.
pub(crate) fn install() {
    INSTALL.call_once(|| {
        let _ = tracing::subscriber::set_global_default(Forward::new());
    });
}

/// Subscriber that hands every event to the registry's current logger.
///
/// Spans opened outside a logger scope are accepted so that instrumented
/// code keeps working, but they are not recorded.
pub(crate) struct Forward {
    next_span: AtomicU64,
}

impl Forward {
    fn new() -> Self {
        Self {
            next_span: AtomicU64::new(1),
        }
    }
}

impl Subscriber for Forward {
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.enabled(metadata) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        *metadata.level() <= MIN_LEVEL
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(MIN_LEVEL)
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(self.next_span.fetch_add(1, Ordering::Relaxed))
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        registry::forward_event(event);
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}
