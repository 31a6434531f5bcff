//! Touch-gesture pipeline for Linux evdev touchscreens mounted at a 90°
//! rotation.
//!
//! The crate reads raw `input_event` records from a touch device node,
//! reassembles them into report-delimited packets (recovering from kernel
//! `SYN_DROPPED` loss), decodes button and absolute-position fields, applies
//! the mounting rotation, classifies touch sessions into taps, holds, moves,
//! and swipes, and dispatches them synchronously to registered listeners.
//! Everything runs on one background thread; listener registration and
//! removal are safe from any thread.
//!
//! ```no_run
//! use evtouch::{Config, GestureEvent, GestureKind, Touchscreen};
//!
//! fn main() -> Result<(), evtouch::Error> {
//!   let screen = Touchscreen::open(Config::new(1080))?;
//!   screen.add_listener(GestureKind::Tap, |event| {
//!     if let GestureEvent::Tap { x, y } = event {
//!       println!("tap at ({x}, {y})");
//!     }
//!   });
//!   // ... run the application ...
//!   screen.shutdown();
//!   Ok(())
//! }
//! ```

mod config;
mod decode;
mod defs;
mod device;
mod event;
mod gesture;
mod packet;
mod registry;
mod touchscreen;

use std::io;
use std::path::PathBuf;

pub use config::{Config, Debounce, DEFAULT_DEVICE_PATH};
pub use event::{GestureEvent, GestureKind, SwipeDirection};
pub use registry::Handle;
pub use touchscreen::Touchscreen;

/// Errors that can occur while bringing the pipeline up.
///
/// Stream-level failures after startup (short reads, end of stream) are not
/// surfaced here: they terminate the background pipeline thread, which is
/// reaped by [`Touchscreen::shutdown`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The input device node could not be opened.
  #[error("failed to open input device {}: {source}", path.display())]
  Open { path: PathBuf, source: io::Error },
  /// The background reader thread could not be spawned.
  #[error("failed to spawn touch pipeline thread: {0}")]
  Spawn(#[source] io::Error),
}
