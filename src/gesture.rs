//! Gesture classification over decoded touch transitions.
//!
//! The classifier turns the per-packet transitions produced by the decoder
//! into gesture events. A touch session runs from a touch-start to the
//! matching touch-end; the release classifies the whole session. Tap and
//! swipe are independent verdicts: a quick flick past the dead zone reports
//! both.

use log::trace;

use crate::config::Debounce;
use crate::decode::{Transition, TouchState};
use crate::event::{GestureEvent, SwipeDirection};

#[derive(Debug, Clone, Copy)]
struct AcceptedTouch {
  x: i32,
  y: i32,
  at_ms: u64,
}

pub(crate) struct GestureClassifier {
  hold_delay_ms: u64,
  swipe_dead_zone: i32,
  debounce: Option<Debounce>,
  // A debounced session is suppressed wholesale: no start, no moves, no end.
  suppressing: bool,
  last_accepted: Option<AcceptedTouch>,
}

impl GestureClassifier {
  pub(crate) fn new(hold_delay_ms: u64, swipe_dead_zone: i32, debounce: Option<Debounce>) -> Self {
    Self { hold_delay_ms, swipe_dead_zone, debounce, suppressing: false, last_accepted: None }
  }

  /// Classify one packet's transitions into zero or more gesture events.
  pub(crate) fn classify(
    &mut self,
    transition: Transition,
    state: &mut TouchState,
    now_ms: u64,
  ) -> Vec<GestureEvent> {
    let mut events = Vec::new();

    if transition.touch_started {
      if self.debounced(transition.x, transition.y, now_ms) {
        trace!("suppressing repeated touch at ({}, {})", transition.x, transition.y);
        self.suppressing = true;
      } else {
        state.touch_start_x = transition.x;
        state.touch_start_y = transition.y;
        self.last_accepted = Some(AcceptedTouch { x: transition.x, y: transition.y, at_ms: now_ms });
        events.push(GestureEvent::TouchStart { x: transition.x, y: transition.y });
      }
    }

    if transition.moved && !transition.touch_started && !transition.touch_ended {
      if state.is_touching && !self.suppressing {
        events.push(GestureEvent::TouchMove { x: transition.x, y: transition.y });
      }
    }

    if transition.touch_ended {
      if self.suppressing {
        self.suppressing = false;
        return events;
      }
      let held_ms = now_ms.saturating_sub(state.touch_start_time_ms);
      events.push(GestureEvent::TouchEnd { x: transition.x, y: transition.y });
      if held_ms < self.hold_delay_ms {
        events.push(GestureEvent::Tap { x: transition.x, y: transition.y });
      } else {
        events.push(GestureEvent::HoldEnd { x: transition.x, y: transition.y, held_ms });
      }
      if let Some(direction) = self.swipe_direction(state, transition.x, transition.y) {
        events.push(GestureEvent::Swipe {
          direction,
          start_x: state.touch_start_x,
          start_y: state.touch_start_y,
          x: transition.x,
          y: transition.y,
        });
      }
    }

    events
  }

  /// Direction of travel if the dominant axis crossed the dead zone.
  ///
  /// Ties between the axes go to the vertical verdict. Travel exactly at
  /// the dead zone counts as a swipe.
  fn swipe_direction(&self, state: &TouchState, x: i32, y: i32) -> Option<SwipeDirection> {
    let dx = state.touch_start_x - x;
    let dy = state.touch_start_y - y;
    if dx.abs() > dy.abs() {
      if dx.abs() < self.swipe_dead_zone {
        None
      } else if dx < 0 {
        Some(SwipeDirection::Right)
      } else {
        Some(SwipeDirection::Left)
      }
    } else if dy.abs() < self.swipe_dead_zone {
      None
    } else if dy < 0 {
      Some(SwipeDirection::Down)
    } else {
      Some(SwipeDirection::Up)
    }
  }

  fn debounced(&self, x: i32, y: i32, now_ms: u64) -> bool {
    let (debounce, last) = match (self.debounce, self.last_accepted) {
      (Some(debounce), Some(last)) => (debounce, last),
      _ => return false,
    };
    now_ms.saturating_sub(last.at_ms) < debounce.window_ms
      && (x - last.x).abs() <= debounce.half_size
      && (y - last.y).abs() <= debounce.half_size
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::decode::TouchDecoder;
  use crate::defs::{RawEvent, ABS_MT_POSITION_X, ABS_MT_POSITION_Y, BTN_TOUCH, EV_ABS, EV_KEY};
  use crate::device::MULTI_TOUCH_CODES;
  use crate::event::GestureKind;

  /// Drives decoder and classifier together with an explicit clock.
  struct Harness {
    decoder: TouchDecoder,
    classifier: GestureClassifier,
    state: TouchState,
  }

  impl Harness {
    fn new(hold_delay_ms: u64, swipe_dead_zone: i32, debounce: Option<Debounce>) -> Self {
      Self {
        decoder: TouchDecoder::new(MULTI_TOUCH_CODES),
        classifier: GestureClassifier::new(hold_delay_ms, swipe_dead_zone, debounce),
        state: TouchState::new(1080),
      }
    }

    fn feed(&mut self, packet: &[RawEvent], now_ms: u64) -> Vec<GestureEvent> {
      let transition = self.decoder.decode(packet, &mut self.state, now_ms);
      self.classifier.classify(transition, &mut self.state, now_ms)
    }
  }

  fn touch(value: u32) -> RawEvent {
    RawEvent::new(EV_KEY, BTN_TOUCH, value)
  }

  fn pos(x: u32, y: u32) -> [RawEvent; 2] {
    [RawEvent::new(EV_ABS, ABS_MT_POSITION_X, x), RawEvent::new(EV_ABS, ABS_MT_POSITION_Y, y)]
  }

  fn start_at(x: u32, y: u32) -> Vec<RawEvent> {
    let mut packet = vec![touch(1)];
    packet.extend_from_slice(&pos(x, y));
    packet
  }

  fn kinds(events: &[GestureEvent]) -> Vec<GestureKind> {
    events.iter().map(GestureEvent::kind).collect()
  }

  #[test]
  fn quick_release_is_a_tap() {
    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(100, 200), 0);

    let events = harness.feed(&[touch(0)], 50);

    assert_eq!(events, vec![
      GestureEvent::TouchEnd { x: 881, y: 100 },
      GestureEvent::Tap { x: 881, y: 100 },
    ]);
  }

  #[test]
  fn release_just_under_the_hold_delay_is_still_a_tap() {
    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(100, 200), 0);

    let events = harness.feed(&[touch(0)], 199);

    assert_eq!(kinds(&events), vec![GestureKind::TouchEnd, GestureKind::Tap]);
  }

  #[test]
  fn release_at_exactly_the_hold_delay_is_a_hold() {
    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(100, 200), 1_000);

    let events = harness.feed(&[touch(0)], 1_200);

    assert_eq!(kinds(&events), vec![GestureKind::TouchEnd, GestureKind::HoldEnd]);
    assert!(matches!(events[1], GestureEvent::HoldEnd { held_ms: 200, .. }));
  }

  #[test]
  fn end_to_end_tap_with_rotation() {
    let mut harness = Harness::new(200, 40, None);

    let starts = harness.feed(&start_at(100, 200), 0);
    let ends = harness.feed(&[touch(0)], 50);

    let mut all = starts;
    all.extend(ends);
    assert_eq!(all, vec![
      GestureEvent::TouchStart { x: 881, y: 100 },
      GestureEvent::TouchEnd { x: 881, y: 100 },
      GestureEvent::Tap { x: 881, y: 100 },
    ]);
  }

  #[test]
  fn travel_at_exactly_the_dead_zone_swipes() {
    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(100, 200), 0);
    // Device X maps to screen Y: moving device X by 40 is a vertical swipe.
    harness.feed(&pos(140, 200).to_vec(), 10);

    let events = harness.feed(&[touch(0)], 20);

    assert!(events.iter().any(|event| matches!(
      event,
      GestureEvent::Swipe { direction: SwipeDirection::Down, start_x: 881, start_y: 100, x: 881, y: 140 }
    )));
  }

  #[test]
  fn travel_inside_the_dead_zone_does_not_swipe() {
    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(100, 200), 0);
    harness.feed(&pos(139, 200).to_vec(), 10);

    let events = harness.feed(&[touch(0)], 20);

    assert_eq!(kinds(&events), vec![GestureKind::TouchEnd, GestureKind::Tap]);
  }

  #[test]
  fn horizontal_swipe_directions_follow_screen_x() {
    // Device Y decreasing raises screen X, which is a rightward swipe.
    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(100, 500), 0);
    harness.feed(&pos(100, 400).to_vec(), 10);
    let events = harness.feed(&[touch(0)], 20);
    assert!(events.iter().any(|event| matches!(
      event,
      GestureEvent::Swipe { direction: SwipeDirection::Right, .. }
    )));

    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(100, 400), 0);
    harness.feed(&pos(100, 500).to_vec(), 10);
    let events = harness.feed(&[touch(0)], 20);
    assert!(events.iter().any(|event| matches!(
      event,
      GestureEvent::Swipe { direction: SwipeDirection::Left, .. }
    )));
  }

  #[test]
  fn upward_swipe_when_screen_y_decreases() {
    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(500, 200), 0);
    harness.feed(&pos(400, 200).to_vec(), 10);

    let events = harness.feed(&[touch(0)], 20);

    assert!(events.iter().any(|event| matches!(
      event,
      GestureEvent::Swipe { direction: SwipeDirection::Up, .. }
    )));
  }

  #[test]
  fn diagonal_tie_goes_to_the_vertical_axis() {
    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(100, 500), 0);
    // Equal travel on both screen axes.
    harness.feed(&pos(160, 440).to_vec(), 10);

    let events = harness.feed(&[touch(0)], 20);

    assert!(events.iter().any(|event| matches!(
      event,
      GestureEvent::Swipe { direction: SwipeDirection::Down, .. }
    )));
  }

  #[test]
  fn quick_flick_reports_both_tap_and_swipe() {
    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(100, 200), 0);
    harness.feed(&pos(300, 200).to_vec(), 10);

    let events = harness.feed(&[touch(0)], 30);

    assert_eq!(kinds(&events), vec![GestureKind::TouchEnd, GestureKind::Tap, GestureKind::Swipe]);
  }

  #[test]
  fn move_packets_report_touch_move() {
    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(100, 200), 0);

    let events = harness.feed(&pos(110, 200).to_vec(), 10);

    assert_eq!(events, vec![GestureEvent::TouchMove { x: 881, y: 110 }]);
  }

  #[test]
  fn position_in_a_start_packet_is_not_a_move() {
    let mut harness = Harness::new(200, 40, None);
    let events = harness.feed(&start_at(100, 200), 0);
    assert_eq!(kinds(&events), vec![GestureKind::TouchStart]);
  }

  #[test]
  fn position_without_an_active_touch_is_not_a_move() {
    let mut harness = Harness::new(200, 40, None);
    let events = harness.feed(&pos(100, 200).to_vec(), 0);
    assert!(events.is_empty());
  }

  #[test]
  fn start_without_position_uses_the_last_known_point() {
    let mut harness = Harness::new(200, 40, None);
    harness.feed(&start_at(100, 200), 0);
    harness.feed(&[touch(0)], 10);

    let events = harness.feed(&[touch(1)], 1_000);

    assert_eq!(events, vec![GestureEvent::TouchStart { x: 881, y: 100 }]);
  }

  #[test]
  fn debounce_suppresses_the_whole_repeated_session() {
    let mut harness = Harness::new(200, 40, Some(Debounce::new(30, 500)));

    harness.feed(&start_at(100, 200), 0);
    harness.feed(&[touch(0)], 50);

    // Same spot inside the window: nothing from start, move, or end.
    assert!(harness.feed(&start_at(105, 205), 100).is_empty());
    assert!(harness.feed(&pos(110, 210).to_vec(), 120).is_empty());
    assert!(harness.feed(&[touch(0)], 150).is_empty());

    // Past the window the same spot is accepted again.
    let events = harness.feed(&start_at(105, 205), 700);
    assert_eq!(kinds(&events), vec![GestureKind::TouchStart]);
  }

  #[test]
  fn debounce_allows_a_touch_outside_the_window_square() {
    let mut harness = Harness::new(200, 40, Some(Debounce::new(30, 500)));
    harness.feed(&start_at(100, 200), 0);
    harness.feed(&[touch(0)], 50);

    // Screen Y moves by 100, outside the 30-pixel half-size.
    let events = harness.feed(&start_at(200, 200), 100);

    assert_eq!(kinds(&events), vec![GestureKind::TouchStart]);
  }

  #[test]
  fn each_accepted_touch_recenters_the_debounce_window() {
    let mut harness = Harness::new(200, 40, Some(Debounce::new(30, 500)));
    harness.feed(&start_at(100, 200), 0);
    harness.feed(&[touch(0)], 10);

    // Far from the first touch, accepted; the window now follows it.
    harness.feed(&start_at(500, 200), 100);
    harness.feed(&[touch(0)], 120);

    assert!(harness.feed(&start_at(505, 200), 200).is_empty());
    harness.feed(&[touch(0)], 210);

    // The original spot is no longer covered.
    let events = harness.feed(&start_at(100, 200), 300);
    assert_eq!(kinds(&events), vec![GestureKind::TouchStart]);
  }
}
