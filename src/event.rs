//! Gesture event types delivered to listeners.

/// The families of gestures the classifier can emit.
///
/// Listeners subscribe per kind. `Tap` and `Swipe` are not mutually
/// exclusive: a short touch that also travels past the swipe dead zone
/// reports both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
  /// A finger made contact.
  TouchStart,
  /// The finger lifted.
  TouchEnd,
  /// A release within the hold delay.
  Tap,
  /// A release at or past the hold delay.
  HoldEnd,
  /// The position changed with no start or end in the same packet.
  TouchMove,
  /// The touch travelled past the dead zone along its dominant axis.
  Swipe,
}

impl GestureKind {
  pub(crate) const COUNT: usize = 6;

  pub(crate) const ALL: [GestureKind; Self::COUNT] = [
    GestureKind::TouchStart,
    GestureKind::TouchEnd,
    GestureKind::Tap,
    GestureKind::HoldEnd,
    GestureKind::TouchMove,
    GestureKind::Swipe,
  ];

  pub(crate) fn index(self) -> usize {
    match self {
      GestureKind::TouchStart => 0,
      GestureKind::TouchEnd => 1,
      GestureKind::Tap => 2,
      GestureKind::HoldEnd => 3,
      GestureKind::TouchMove => 4,
      GestureKind::Swipe => 5,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      GestureKind::TouchStart => "touch-start",
      GestureKind::TouchEnd => "touch-end",
      GestureKind::Tap => "tap",
      GestureKind::HoldEnd => "hold-end",
      GestureKind::TouchMove => "touch-move",
      GestureKind::Swipe => "swipe",
    }
  }
}

/// Direction of a swipe in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
  Left,
  Right,
  Up,
  Down,
}

impl SwipeDirection {
  pub fn is_horizontal(self) -> bool {
    matches!(self, SwipeDirection::Left | SwipeDirection::Right)
  }

  pub fn is_vertical(self) -> bool {
    !self.is_horizontal()
  }

  pub fn opposite(self) -> SwipeDirection {
    match self {
      SwipeDirection::Left => SwipeDirection::Right,
      SwipeDirection::Right => SwipeDirection::Left,
      SwipeDirection::Up => SwipeDirection::Down,
      SwipeDirection::Down => SwipeDirection::Up,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      SwipeDirection::Left => "left",
      SwipeDirection::Right => "right",
      SwipeDirection::Up => "up",
      SwipeDirection::Down => "down",
    }
  }
}

/// One classified gesture, in screen coordinates after rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
  TouchStart { x: i32, y: i32 },
  TouchEnd { x: i32, y: i32 },
  Tap { x: i32, y: i32 },
  /// `held_ms` is how long the finger stayed down.
  HoldEnd { x: i32, y: i32, held_ms: u64 },
  TouchMove { x: i32, y: i32 },
  Swipe { direction: SwipeDirection, start_x: i32, start_y: i32, x: i32, y: i32 },
}

impl GestureEvent {
  pub fn kind(&self) -> GestureKind {
    match self {
      GestureEvent::TouchStart { .. } => GestureKind::TouchStart,
      GestureEvent::TouchEnd { .. } => GestureKind::TouchEnd,
      GestureEvent::Tap { .. } => GestureKind::Tap,
      GestureEvent::HoldEnd { .. } => GestureKind::HoldEnd,
      GestureEvent::TouchMove { .. } => GestureKind::TouchMove,
      GestureEvent::Swipe { .. } => GestureKind::Swipe,
    }
  }

  /// The event's position; for swipes this is the release point.
  pub fn position(&self) -> (i32, i32) {
    match *self {
      GestureEvent::TouchStart { x, y }
      | GestureEvent::TouchEnd { x, y }
      | GestureEvent::Tap { x, y }
      | GestureEvent::HoldEnd { x, y, .. }
      | GestureEvent::TouchMove { x, y }
      | GestureEvent::Swipe { x, y, .. } => (x, y),
    }
  }
}
