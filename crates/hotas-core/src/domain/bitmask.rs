//! Raw button state read from a joystick.
//!
//! Bit `n - 1` set means physical button `n` is held.  Button numbers are
//! 1-based; `0` is reserved for "unassigned" and is never pressed.

/// Highest button number a bitmask can represent.
pub const MAX_BUTTONS: u32 = 32;

/// One observation of up to 32 digital buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonBitmask(pub u32);

impl ButtonBitmask {
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if 1-based `button` is held.
    ///
    /// Button `0` and buttons above [`MAX_BUTTONS`] are never pressed.
    pub fn is_pressed(self, button: u32) -> bool {
        if button == 0 || button > MAX_BUTTONS {
            return false;
        }
        self.0 & (1 << (button - 1)) != 0
    }

    /// Bits set here that were clear in `previous`.
    pub fn rising_edges(self, previous: ButtonBitmask) -> ButtonBitmask {
        ButtonBitmask(self.0 & !previous.0)
    }

    /// 1-based number of the lowest held button, if any.
    pub fn lowest_button(self) -> Option<u32> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() + 1)
        }
    }

    /// Picks the button a capture should resolve to after observing `self`
    /// following `previous`.
    ///
    /// Newly pressed buttons win.  When nothing rose (a release, or noise),
    /// every held button is a candidate so a button that was already down
    /// when capture began can still be picked.  `None` means nothing is held.
    pub fn capture_candidate(self, previous: ButtonBitmask) -> Option<u32> {
        let rising = self.rising_edges(previous);
        let candidates = if rising.is_empty() { self } else { rising };
        candidates.lowest_button()
    }
}
