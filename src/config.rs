//! Pipeline configuration.

use std::path::{Path, PathBuf};

/// Device node used when none is configured.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/input/event1";

/// Optional repeated-touch suppression.
///
/// After an accepted touch, further touch-starts inside a square window
/// around it are suppressed for `window_ms`. A suppressed session produces
/// no events at all, and each accepted touch re-centers the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
  pub(crate) half_size: i32,
  pub(crate) window_ms: u64,
}

impl Debounce {
  /// `half_size` is the half-width of the square, in screen pixels.
  pub const fn new(half_size: i32, window_ms: u64) -> Self {
    Self { half_size, window_ms }
  }
}

/// Tuning for the whole pipeline. Only the view width is mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub(crate) device_path: PathBuf,
  pub(crate) exclusive: bool,
  pub(crate) view_width: i32,
  pub(crate) hold_delay_ms: u64,
  pub(crate) swipe_dead_zone: i32,
  pub(crate) debounce: Option<Debounce>,
}

impl Config {
  /// Defaults: [`DEFAULT_DEVICE_PATH`], exclusive grab, a 200 ms hold delay,
  /// a 40-pixel swipe dead zone, and no debounce.
  pub fn new(view_width: i32) -> Self {
    Self {
      device_path: PathBuf::from(DEFAULT_DEVICE_PATH),
      exclusive: true,
      view_width,
      hold_delay_ms: 200,
      swipe_dead_zone: 40,
      debounce: None,
    }
  }

  pub fn with_device_path(mut self, path: impl AsRef<Path>) -> Self {
    self.device_path = path.as_ref().to_path_buf();
    self
  }

  /// Whether to request exclusive delivery of the device's events.
  pub fn with_exclusive(mut self, exclusive: bool) -> Self {
    self.exclusive = exclusive;
    self
  }

  /// Releases held at least this long classify as hold-end instead of tap.
  pub fn with_hold_delay_ms(mut self, hold_delay_ms: u64) -> Self {
    self.hold_delay_ms = hold_delay_ms;
    self
  }

  /// Minimum travel along the dominant axis for a release to swipe.
  pub fn with_swipe_dead_zone(mut self, swipe_dead_zone: i32) -> Self {
    self.swipe_dead_zone = swipe_dead_zone;
    self
  }

  pub fn with_debounce(mut self, debounce: Debounce) -> Self {
    self.debounce = Some(debounce);
    self
  }
}
