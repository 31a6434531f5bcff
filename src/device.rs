//! Blocking reader for an evdev touch character device.
//!
//! Opens the device node with `libc::open`, optionally requests exclusive
//! delivery via `EVIOCGRAB`, and performs fixed-size blocking reads of one
//! kernel record at a time. `close` is idempotent and releases the grab;
//! closing the descriptor from another thread is what unblocks a pending
//! read during shutdown.

use std::ffi::CString;
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};

use log::{debug, error, warn};

use crate::defs::{RawEvent, ABS_MAX, ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_X, ABS_Y};
use crate::Error;

nix::ioctl_write_int!(eviocgrab, b'E', 0x90);
// EVIOCGBIT(EV_ABS, ..): request number is 0x20 + EV_ABS.
nix::ioctl_read_buf!(eviocgbit_abs, b'E', 0x23, u8);

const ABS_BITS_LEN: usize = ABS_MAX as usize / 8 + 1;

/// Absolute-axis codes the opened device uses for touch positions.
///
/// Kernels report either the single-touch pair (`ABS_X`/`ABS_Y`) or the
/// multi-touch pair (`ABS_MT_POSITION_X`/`ABS_MT_POSITION_Y`). Which pair is
/// in effect is decided once at open time from the device's advertised
/// capabilities, not re-examined per packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AxisCodes {
  pub(crate) x: u16,
  pub(crate) y: u16,
}

pub(crate) const SINGLE_TOUCH_CODES: AxisCodes = AxisCodes { x: ABS_X, y: ABS_Y };
pub(crate) const MULTI_TOUCH_CODES: AxisCodes = AxisCodes { x: ABS_MT_POSITION_X, y: ABS_MT_POSITION_Y };

pub(crate) struct Device {
  fd: AtomicI32,
  grabbed: bool,
  codes: AxisCodes,
  path: PathBuf,
}

impl Device {
  /// Open the device node for raw binary reads.
  ///
  /// When `exclusive` is set an `EVIOCGRAB` is issued. The grab is
  /// best-effort: a failure is logged as a warning and does not abort the
  /// open.
  pub(crate) fn open(path: &Path, exclusive: bool) -> Result<Device, Error> {
    let raw_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| Error::Open {
      path: path.to_path_buf(),
      source: io::Error::from(io::ErrorKind::InvalidInput),
    })?;
    let fd = unsafe { libc::open(raw_path.as_ptr(), libc::O_RDONLY) };
    if fd < 0 {
      return Err(Error::Open { path: path.to_path_buf(), source: io::Error::last_os_error() });
    }

    let mut grabbed = false;
    if exclusive {
      match unsafe { eviocgrab(fd, 1) } {
        Ok(_) => grabbed = true,
        Err(err) => warn!(
          "exclusive grab of {} failed: {err}; continuing without exclusivity",
          path.display()
        ),
      }
    }

    let codes = probe_axis_codes(fd, path);
    debug!("opened {} (grabbed: {grabbed}, axis codes: {codes:?})", path.display());
    Ok(Device { fd: AtomicI32::new(fd), grabbed, codes, path: path.to_path_buf() })
  }

  pub(crate) fn axis_codes(&self) -> AxisCodes {
    self.codes
  }

  /// Blocking read of exactly one kernel record.
  ///
  /// Returns `None` at end of stream, on a closed descriptor, and on a short
  /// read. A short read means the stream framing is gone, so it ends the
  /// stream rather than being retried.
  pub(crate) fn read_raw_event(&self) -> Option<RawEvent> {
    let fd = self.fd.load(Ordering::Acquire);
    if fd < 0 {
      return None;
    }

    let mut record = MaybeUninit::<RawEvent>::uninit();
    let wanted = std::mem::size_of::<RawEvent>();
    let n = unsafe { libc::read(fd, record.as_mut_ptr().cast(), wanted) };

    if n == wanted as isize {
      return Some(unsafe { record.assume_init() });
    }
    if n == 0 {
      debug!("end of stream on {}", self.path.display());
    } else if n < 0 {
      debug!("read on {} failed: {}", self.path.display(), io::Error::last_os_error());
    } else {
      error!(
        "short read of {n} bytes (wanted {wanted}) on {}; treating stream as corrupt",
        self.path.display()
      );
    }
    None
  }

  /// Release the grab if held and close the descriptor. Safe to call twice.
  pub(crate) fn close(&self) {
    let fd = self.fd.swap(-1, Ordering::AcqRel);
    if fd < 0 {
      return;
    }
    if self.grabbed {
      if let Err(err) = unsafe { eviocgrab(fd, 0) } {
        warn!("releasing grab of {} failed: {err}", self.path.display());
      }
    }
    unsafe { libc::close(fd) };
    debug!("closed {}", self.path.display());
  }
}

impl Drop for Device {
  fn drop(&mut self) {
    self.close();
  }
}

fn probe_axis_codes(fd: i32, path: &Path) -> AxisCodes {
  let mut bits = [0u8; ABS_BITS_LEN];
  match unsafe { eviocgbit_abs(fd, &mut bits) } {
    Ok(_) => {
      if !has_bit(&bits, ABS_X) && !has_bit(&bits, ABS_MT_POSITION_X) {
        warn!("{} advertises no absolute touch axes; assuming multi-touch", path.display());
      }
      axis_codes_from_bits(&bits)
    }
    Err(err) => {
      debug!(
        "absolute-axis capability probe of {} failed: {err}; assuming multi-touch",
        path.display()
      );
      MULTI_TOUCH_CODES
    }
  }
}

/// Pick the touch protocol from an `EVIOCGBIT(EV_ABS)` capability bitmap,
/// preferring the multi-touch pair when a device advertises both.
fn axis_codes_from_bits(bits: &[u8]) -> AxisCodes {
  if has_bit(bits, ABS_MT_POSITION_X) && has_bit(bits, ABS_MT_POSITION_Y) {
    MULTI_TOUCH_CODES
  } else if has_bit(bits, ABS_X) && has_bit(bits, ABS_Y) {
    SINGLE_TOUCH_CODES
  } else {
    MULTI_TOUCH_CODES
  }
}

fn has_bit(bits: &[u8], code: u16) -> bool {
  let byte = code as usize / 8;
  byte < bits.len() && bits[byte] & (1 << (code % 8)) != 0
}
