//! Pipeline controller: owns the device, the listener registry, and the
//! background reader thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, error, trace};

use crate::config::Config;
use crate::decode::{TouchDecoder, TouchState};
use crate::device::Device;
use crate::event::{GestureEvent, GestureKind};
use crate::gesture::GestureClassifier;
use crate::packet::PacketAssembler;
use crate::registry::{Handle, ListenerRegistry};
use crate::Error;

/// A running touch pipeline.
///
/// Created with [`Touchscreen::open`]; the whole pipeline runs on one
/// background thread, and listeners are invoked synchronously on that
/// thread. Dropping the handle shuts the pipeline down.
pub struct Touchscreen {
  device: Arc<Device>,
  registry: Arc<ListenerRegistry>,
  reader: Option<JoinHandle<()>>,
}

impl Touchscreen {
  /// Open the configured device and start the pipeline thread.
  pub fn open(config: Config) -> Result<Touchscreen, Error> {
    let device = Arc::new(Device::open(&config.device_path, config.exclusive)?);
    let registry = Arc::new(ListenerRegistry::new());
    let reader = thread::Builder::new()
      .name("evtouch-pipeline".into())
      .spawn({
        let device = device.clone();
        let registry = registry.clone();
        move || run_pipeline(&device, &registry, &config)
      })
      .map_err(Error::Spawn)?;
    Ok(Touchscreen { device, registry, reader: Some(reader) })
  }

  /// Register a listener for one gesture kind.
  ///
  /// The listener runs on the pipeline thread, so it should return quickly;
  /// a slow listener delays every event behind it.
  pub fn add_listener<F>(&self, kind: GestureKind, listener: F) -> Handle
  where
    F: Fn(&GestureEvent) + Send + Sync + 'static,
  {
    self.registry.add(kind, Box::new(listener))
  }

  /// Remove a previously registered listener. Returns whether it was still
  /// registered.
  pub fn remove_listener(&self, handle: Handle) -> bool {
    self.registry.remove(handle)
  }

  /// Remove every listener of one kind.
  pub fn clear_listeners(&self, kind: GestureKind) {
    self.registry.clear(kind)
  }

  /// Stop the pipeline: close the device, reap the reader thread, and drop
  /// all listeners. Equivalent to dropping the handle.
  pub fn shutdown(mut self) {
    self.teardown();
  }

  fn teardown(&mut self) {
    // Closing the descriptor is what ends a read blocked in the kernel.
    self.device.close();
    if let Some(reader) = self.reader.take() {
      if reader.join().is_err() {
        error!("touch pipeline thread panicked");
      }
    }
    self.registry.clear_all();
  }
}

impl Drop for Touchscreen {
  fn drop(&mut self) {
    self.teardown();
  }
}

/// Body of the pipeline thread. Runs until the device stream ends.
fn run_pipeline(device: &Device, registry: &ListenerRegistry, config: &Config) {
  let clock = Instant::now();
  let mut assembler = PacketAssembler::new();
  let decoder = TouchDecoder::new(device.axis_codes());
  let mut classifier =
    GestureClassifier::new(config.hold_delay_ms, config.swipe_dead_zone, config.debounce);
  let mut state = TouchState::new(config.view_width);

  debug!("touch pipeline running on {}", config.device_path.display());
  while let Some(raw) = device.read_raw_event() {
    if let Some(packet) = assembler.push(raw) {
      let now_ms = clock.elapsed().as_millis() as u64;
      let transition = decoder.decode(&packet, &mut state, now_ms);
      for event in classifier.classify(transition, &mut state, now_ms) {
        trace!("dispatching {event:?}");
        registry.dispatch(&event);
      }
    }
  }
  debug!("touch pipeline stopped");
}
