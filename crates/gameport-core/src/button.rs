//! Logical buttons and the 16-bit set the guest reads every frame.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// One of the sixteen digital inputs a guest module understands.
///
/// The discriminant is the bit position in the word returned by the
/// `js_button_states` import, so the order here is part of the guest ABI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LogicalButton {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    North = 4,
    South = 5,
    West = 6,
    East = 7,
    L = 8,
    R = 9,
    Select = 10,
    Start = 11,
    RUp = 12, // righthand dpad/thumbstick
    RDown = 13,
    RLeft = 14,
    RRight = 15,
}

impl LogicalButton {
    pub const ALL: [LogicalButton; 16] = [
        LogicalButton::Up,
        LogicalButton::Down,
        LogicalButton::Left,
        LogicalButton::Right,
        LogicalButton::North,
        LogicalButton::South,
        LogicalButton::West,
        LogicalButton::East,
        LogicalButton::L,
        LogicalButton::R,
        LogicalButton::Select,
        LogicalButton::Start,
        LogicalButton::RUp,
        LogicalButton::RDown,
        LogicalButton::RLeft,
        LogicalButton::RRight,
    ];

    #[inline]
    pub const fn bit(self) -> u16 {
        1 << self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            LogicalButton::Up => "UP",
            LogicalButton::Down => "DOWN",
            LogicalButton::Left => "LEFT",
            LogicalButton::Right => "RIGHT",
            LogicalButton::North => "NORTH",
            LogicalButton::South => "SOUTH",
            LogicalButton::West => "WEST",
            LogicalButton::East => "EAST",
            LogicalButton::L => "L",
            LogicalButton::R => "R",
            LogicalButton::Select => "SELECT",
            LogicalButton::Start => "START",
            LogicalButton::RUp => "R_UP",
            LogicalButton::RDown => "R_DOWN",
            LogicalButton::RLeft => "R_LEFT",
            LogicalButton::RRight => "R_RIGHT",
        }
    }

    /// Parse a button name as written in key tables (`"R_UP"`, `"select"`).
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|b| b.name() == upper)
    }
}

impl fmt::Display for LogicalButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`LogicalButton`]s packed into the guest's 16-bit layout.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonSet(u16);

impl ButtonSet {
    pub const EMPTY: ButtonSet = ButtonSet(0);

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, button: LogicalButton) -> bool {
        self.0 & button.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, button: LogicalButton) {
        self.0 |= button.bit();
    }

    #[inline]
    pub fn remove(&mut self, button: LogicalButton) {
        self.0 &= !button.bit();
    }

    #[inline]
    pub const fn union(self, other: ButtonSet) -> ButtonSet {
        ButtonSet(self.0 | other.0)
    }

    #[inline]
    pub const fn difference(self, other: ButtonSet) -> ButtonSet {
        ButtonSet(self.0 & !other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = LogicalButton> {
        LogicalButton::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl From<LogicalButton> for ButtonSet {
    fn from(button: LogicalButton) -> Self {
        ButtonSet(button.bit())
    }
}

impl FromIterator<LogicalButton> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = LogicalButton>>(iter: I) -> Self {
        iter.into_iter().fold(ButtonSet::EMPTY, |acc, b| acc | b)
    }
}

impl BitOr for ButtonSet {
    type Output = ButtonSet;
    fn bitor(self, rhs: ButtonSet) -> ButtonSet {
        self.union(rhs)
    }
}

impl BitOr<LogicalButton> for ButtonSet {
    type Output = ButtonSet;
    fn bitor(self, rhs: LogicalButton) -> ButtonSet {
        self.union(rhs.into())
    }
}

impl BitOrAssign for ButtonSet {
    fn bitor_assign(&mut self, rhs: ButtonSet) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ButtonSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
