//! Lazy "which file was that?" header for third-party warnings.
//!
//! PDF parsing crates warn about broken fonts and xref tables without saying
//! which document they were reading. While a submission is being extracted
//! its path is parked here; the first WARN-or-above event from a non-`handin`
//! target triggers a single `Processing <path>` line ahead of it.
//!
//! Usage:
//!   1. Register `FileHeaderLayer` in the tracing subscriber stack.
//!   2. Call `set_pending(path)` immediately before extracting a file.
//!   3. Call `clear_pending()` immediately after (success or error).

use std::cell::RefCell;

use tracing::{Event, Subscriber};
use tracing_subscriber::{layer::Context, Layer};

struct Pending {
    path: String,
    emitted: bool,
}

thread_local! {
    static PENDING: RefCell<Option<Pending>> = const { RefCell::new(None) };
    // Set while the header itself is being logged.
    static IN_HEADER: RefCell<bool> = const { RefCell::new(false) };
}

pub fn set_pending(path: &str) {
    PENDING.with(|p| {
        *p.borrow_mut() = Some(Pending { path: path.to_owned(), emitted: false });
    });
}

pub fn clear_pending() {
    PENDING.with(|p| *p.borrow_mut() = None);
}

/// Path still waiting for its header, if one is pending and not yet printed.
fn take_unemitted() -> Option<String> {
    PENDING.with(|p| {
        let mut pending = p.borrow_mut();
        match pending.as_mut() {
            Some(hdr) if !hdr.emitted => {
                hdr.emitted = true;
                Some(hdr.path.clone())
            }
            _ => None,
        }
    })
}

pub struct FileHeaderLayer;

impl<S: Subscriber> Layer<S> for FileHeaderLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() > tracing::Level::WARN {
            return;
        }
        // Our own warnings already name the file.
        if event.metadata().target().starts_with("handin") {
            return;
        }
        if IN_HEADER.with(|h| *h.borrow()) {
            return;
        }
        // The PENDING borrow is released before logging so a re-entrant
        // on_event cannot hit a BorrowMutError.
        if let Some(path) = take_unemitted() {
            IN_HEADER.with(|h| *h.borrow_mut() = true);
            tracing::info!(target: "handin::similarity", "Processing {path}");
            IN_HEADER.with(|h| *h.borrow_mut() = false);
        }
    }
}
