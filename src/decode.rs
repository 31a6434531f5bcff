//! Field extraction and the 90° mounting rotation.

use crate::defs::{RawEvent, BTN_TOUCH, EV_ABS, EV_KEY};
use crate::device::AxisCodes;

/// Persistent touch-session state, owned by the pipeline thread.
///
/// Mutated only by the decoder and the classifier. The start fields change
/// only on a fresh touch-start transition.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TouchState {
  pub(crate) is_touching: bool,
  pub(crate) touch_start_time_ms: u64,
  pub(crate) touch_start_x: i32,
  pub(crate) touch_start_y: i32,
  pub(crate) current_x: i32,
  pub(crate) current_y: i32,
  pub(crate) view_width: i32,
}

impl TouchState {
  pub(crate) fn new(view_width: i32) -> Self {
    Self {
      is_touching: false,
      touch_start_time_ms: 0,
      touch_start_x: 0,
      touch_start_y: 0,
      current_x: 0,
      current_y: 0,
      view_width,
    }
  }
}

/// Decoded outcome of one packet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Transition {
  pub(crate) touch_started: bool,
  pub(crate) touch_ended: bool,
  pub(crate) moved: bool,
  pub(crate) x: i32,
  pub(crate) y: i32,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TouchDecoder {
  codes: AxisCodes,
}

impl TouchDecoder {
  pub(crate) fn new(codes: AxisCodes) -> Self {
    Self { codes }
  }

  /// Scan one packet, update `state`, and report the observed transitions.
  ///
  /// `now_ms` comes from the pipeline's monotonic clock and is recorded as
  /// the session start time on a fresh touch-start. A touch-press while
  /// already touching (and a release while idle) is ignored, so at most one
  /// touch session is active at a time.
  pub(crate) fn decode(&self, packet: &[RawEvent], state: &mut TouchState, now_ms: u64) -> Transition {
    // Presence of an axis update is tracked separately from its value: a
    // reported coordinate of exactly zero is still an update.
    let mut raw_x: Option<i32> = None;
    let mut raw_y: Option<i32> = None;
    let mut touch_started = false;
    let mut touch_ended = false;

    for event in packet {
      if event.kind == EV_KEY && event.code == BTN_TOUCH {
        if event.value == 1 && !state.is_touching {
          touch_started = true;
          state.is_touching = true;
          state.touch_start_time_ms = now_ms;
        } else if event.value == 0 && state.is_touching {
          touch_ended = true;
          state.is_touching = false;
        }
      } else if event.kind == EV_ABS {
        if event.code == self.codes.x {
          raw_x = Some(event.value as i32);
        } else if event.code == self.codes.y {
          raw_y = Some(event.value as i32);
        }
      }
    }

    // The panel is mounted at 90°: device X runs along screen Y, and device
    // Y runs against screen X.
    if let Some(x) = raw_x {
      state.current_y = x;
    }
    if let Some(y) = raw_y {
      state.current_x = state.view_width - y + 1;
    }

    Transition {
      touch_started,
      touch_ended,
      moved: raw_x.is_some() || raw_y.is_some(),
      x: state.current_x,
      y: state.current_y,
    }
  }
}
