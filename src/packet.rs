//! Report-delimited packet assembly with kernel drop recovery.
//!
//! Records accumulate until a `SYN_REPORT` closes the batch. A `SYN_DROPPED`
//! marker means the kernel discarded events; the batch in flight is abandoned
//! and everything is ignored until the next `SYN_REPORT` boundary, after
//! which normal assembly resumes. Loss is therefore bounded to exactly the
//! packet in flight when the drop was signaled, and no packet is ever
//! emitted partially.

use log::warn;

use crate::defs::{RawEvent, EV_SYN, SYN_DROPPED, SYN_REPORT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
  Collecting,
  Discarding,
}

pub(crate) struct PacketAssembler {
  state: State,
  buffer: Vec<RawEvent>,
}

impl PacketAssembler {
  pub(crate) fn new() -> Self {
    Self { state: State::Collecting, buffer: Vec::new() }
  }

  /// Feed one record; returns a complete packet at a `SYN_REPORT` boundary.
  pub(crate) fn push(&mut self, event: RawEvent) -> Option<Vec<RawEvent>> {
    match self.state {
      State::Collecting => {
        if event.kind == EV_SYN && event.code == SYN_DROPPED {
          warn!("kernel dropped events; discarding packet in flight ({} records)", self.buffer.len());
          self.buffer.clear();
          self.state = State::Discarding;
          None
        } else if event.kind == EV_SYN && event.code == SYN_REPORT {
          Some(std::mem::take(&mut self.buffer))
        } else {
          self.buffer.push(event);
          None
        }
      }
      State::Discarding => {
        if event.kind == EV_SYN && event.code == SYN_REPORT {
          self.buffer.clear();
          self.state = State::Collecting;
        }
        None
      }
    }
  }
}
