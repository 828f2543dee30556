//! Metrics sink boundary.
//!
//! Compilation logic MUST NOT touch obs::metrics directly.
//! All instrumentation flows through CompileEvent and CompileSink.
use crate::{error::ErrorClass, filter::Strategy, obs::metrics};
use log::trace;
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn CompileSink>> = const { RefCell::new(None) };
}

///
/// CompileEvent
///

#[derive(Clone, Copy, Debug)]
pub enum CompileEvent<'a> {
    CompileStart {
        model: &'a str,
    },
    Fragment {
        strategy: Strategy,
        negate: bool,
        depth: usize,
    },
    CompileFailed {
        model: &'a str,
        class: ErrorClass,
    },
}

///
/// CompileSink
///

pub trait CompileSink {
    fn record(&self, event: CompileEvent<'_>);
}

/// GlobalCompileSink
/// Default sink that writes into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalCompileSink;

impl CompileSink for GlobalCompileSink {
    fn record(&self, event: CompileEvent<'_>) {
        match event {
            CompileEvent::CompileStart { model } => {
                metrics::with_state_mut(|m| {
                    m.ops.compile_calls = m.ops.compile_calls.saturating_add(1);
                    let entry = m.models.entry(model.to_string()).or_default();
                    entry.compile_calls = entry.compile_calls.saturating_add(1);
                });
            }

            CompileEvent::Fragment {
                strategy, negate, ..
            } => {
                metrics::with_state_mut(|m| {
                    let counter = match (strategy, negate) {
                        (Strategy::Exists, false) => &mut m.ops.exists_fragments,
                        (Strategy::Exists, true) => &mut m.ops.not_exists_fragments,
                        (Strategy::In, false) => &mut m.ops.in_fragments,
                        (Strategy::In, true) => &mut m.ops.not_in_fragments,
                        (Strategy::Count, _) => &mut m.ops.count_fragments,
                    };
                    *counter = counter.saturating_add(1);
                });
            }

            CompileEvent::CompileFailed { model, class } => {
                metrics::with_state_mut(|m| {
                    m.ops.failures = m.ops.failures.saturating_add(1);
                    let by_class = match class {
                        ErrorClass::InvalidInput => &mut m.ops.invalid_input,
                        ErrorClass::NotFound => &mut m.ops.not_found,
                        ErrorClass::Unsupported => &mut m.ops.unsupported,
                        ErrorClass::Conflict => &mut m.ops.conflict,
                    };
                    *by_class = by_class.saturating_add(1);

                    let entry = m.models.entry(model.to_string()).or_default();
                    entry.failures = entry.failures.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_COMPILE_SINK: GlobalCompileSink = GlobalCompileSink;

pub(crate) fn record(event: CompileEvent<'_>) {
    trace!("compile event: {event:?}");

    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn CompileSink` in `with_compile_sink`,
        //   which restores the previous slot on every exit, including unwind.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        // - Only a shared reference is materialized, matching the caller's borrow.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_COMPILE_SINK.record(event);
    }
}

/// Run a closure with a temporary sink override.
pub fn with_compile_sink<T>(sink: &dyn CompileSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn CompileSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - The erased pointer is installed only for this dynamic scope.
    // - `Guard` restores the previous slot on all exits, including panic.
    // - `record` dereferences synchronously and never persists the pointer.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn CompileSink, *const dyn CompileSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink_ptr));
    let _guard = Guard(prev);

    f()
}
