/******************************************************************************
 * Linux input-event wire protocol, from <linux/input-event-codes.h>.         *
 * These values are part of the kernel ABI: fixed, not configurable.          *
 ******************************************************************************/

// Event types
pub(crate) const EV_SYN: u16 = 0x00;
pub(crate) const EV_KEY: u16 = 0x01;
pub(crate) const EV_ABS: u16 = 0x03;

// Synchronization codes
pub(crate) const SYN_REPORT: u16 = 0x00;
pub(crate) const SYN_DROPPED: u16 = 0x03;

// Touch button
pub(crate) const BTN_TOUCH: u16 = 0x14a;

// Absolute-position codes, single-touch and multi-touch variants
pub(crate) const ABS_X: u16 = 0x00;
pub(crate) const ABS_Y: u16 = 0x01;
pub(crate) const ABS_MT_POSITION_X: u16 = 0x35;
pub(crate) const ABS_MT_POSITION_Y: u16 = 0x36;
#[allow(dead_code)] // Reported by the panel; the decoder ignores pressure.
pub(crate) const ABS_MT_PRESSURE: u16 = 0x3a;

// Highest absolute-axis code; sizes EVIOCGBIT capability bitmaps.
pub(crate) const ABS_MAX: u16 = 0x3f;

/// One fixed-size kernel input record.
///
/// The layout must be bit-exact with the host kernel's `struct input_event`.
/// Field widths are platform-ABI-dependent, so a mismatch is a configuration
/// error, not something to recover from at runtime; the assertion below turns
/// it into a build failure.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawEvent {
  pub(crate) time_sec: i64,
  pub(crate) time_usec: i64,
  pub(crate) kind: u16,
  pub(crate) code: u16,
  pub(crate) value: u32,
}

const _: () = assert!(core::mem::size_of::<RawEvent>() == core::mem::size_of::<libc::input_event>());

#[cfg(test)]
impl RawEvent {
  pub(crate) const fn new(kind: u16, code: u16, value: u32) -> Self {
    Self { time_sec: 0, time_usec: 0, kind, code, value }
  }
}
