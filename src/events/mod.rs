//! # Events Module
//!
//! Progress reporting for sorting and deduplication.
//!
//! ## Design
//! The core library emits events through channels, allowing any UI
//! (CLI, GUI) to subscribe and display progress.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Sort(SortEvent::Sorted { source, canonical }) = event {
//!             println!("{} --> {}", source.display(), canonical.display());
//!         }
//!     }
//! });
//!
//! sorter.sort_all(&files, &sender);
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
