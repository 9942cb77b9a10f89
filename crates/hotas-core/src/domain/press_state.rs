//! Logical press state per direction and the transitions that change it.
//!
//! [`PressState`] remembers which directions were last reported as held to
//! the key-injection target.  Feeding it a fresh [`ButtonBitmask`] returns
//! only the directions whose state flipped, so a held button produces one
//! key-down and one key-up no matter how many polls observe it.

use super::bitmask::ButtonBitmask;
use super::config::ButtonMapping;
use super::direction::Direction;

/// A key-down (`pressed == true`) or key-up for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTransition {
    pub direction: Direction,
    pub pressed: bool,
}

impl KeyTransition {
    pub fn down(direction: Direction) -> Self {
        Self {
            direction,
            pressed: true,
        }
    }

    pub fn up(direction: Direction) -> Self {
        Self {
            direction,
            pressed: false,
        }
    }
}

/// Last logical state sent for each direction.  Starts fully released.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressState {
    pressed: [bool; 4],
}

impl PressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, direction: Direction) -> bool {
        self.pressed[direction.index()]
    }

    pub fn any_pressed(&self) -> bool {
        self.pressed.iter().any(|p| *p)
    }

    /// Diffs `bitmask` against the recorded state and records the result.
    ///
    /// Directions mapped to button `0` are skipped entirely.  Transitions are
    /// returned in [`Direction::ALL`] order.
    pub fn apply(&mut self, mapping: &ButtonMapping, bitmask: ButtonBitmask) -> Vec<KeyTransition> {
        let mut transitions = Vec::new();
        for (direction, button) in mapping.assigned() {
            let now = bitmask.is_pressed(button);
            let slot = &mut self.pressed[direction.index()];
            if *slot != now {
                *slot = now;
                transitions.push(KeyTransition { direction, pressed: now });
            }
        }
        transitions
    }

    /// Clears every held direction, returning one key-up per direction that
    /// was held.  Calling it again returns nothing.
    pub fn release_all(&mut self) -> Vec<KeyTransition> {
        let mut transitions = Vec::new();
        for direction in Direction::ALL {
            let slot = &mut self.pressed[direction.index()];
            if *slot {
                *slot = false;
                transitions.push(KeyTransition::up(direction));
            }
        }
        transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up_on_button_two() -> ButtonMapping {
        ButtonMapping {
            up: 2,
            ..ButtonMapping::default()
        }
    }

    #[test]
    fn test_press_hold_release_emits_one_down_and_one_up() {
        // Arrange
        let mapping = up_on_button_two();
        let mut state = PressState::new();

        // Act
        let tick1 = state.apply(&mapping, ButtonBitmask(0b00));
        let tick2 = state.apply(&mapping, ButtonBitmask(0b10));
        let tick3 = state.apply(&mapping, ButtonBitmask(0b10));
        let tick4 = state.apply(&mapping, ButtonBitmask(0b00));

        // Assert
        assert!(tick1.is_empty());
        assert_eq!(tick2, vec![KeyTransition::down(Direction::Up)]);
        assert!(tick3.is_empty());
        assert_eq!(tick4, vec![KeyTransition::up(Direction::Up)]);
    }

    #[test]
    fn test_unmapped_directions_are_never_reported() {
        let mapping = up_on_button_two();
        let mut state = PressState::new();

        // Button 1 has no direction; all bits set only touches "up".
        let transitions = state.apply(&mapping, ButtonBitmask(u32::MAX));

        assert_eq!(transitions, vec![KeyTransition::down(Direction::Up)]);
        assert!(!state.is_pressed(Direction::Down));
    }

    #[test]
    fn test_two_directions_sharing_a_button_both_transition() {
        let mapping = ButtonMapping {
            left: 5,
            right: 5,
            ..ButtonMapping::default()
        };
        let mut state = PressState::new();

        let transitions = state.apply(&mapping, ButtonBitmask(0b1_0000));

        assert_eq!(
            transitions,
            vec![
                KeyTransition::down(Direction::Left),
                KeyTransition::down(Direction::Right)
            ]
        );
    }

    #[test]
    fn test_release_all_emits_key_up_only_for_held_directions() {
        let mapping = ButtonMapping {
            up: 1,
            down: 2,
            left: 3,
            right: 4,
        };
        let mut state = PressState::new();
        state.apply(&mapping, ButtonBitmask(0b0100));

        let released = state.release_all();

        assert_eq!(released, vec![KeyTransition::up(Direction::Left)]);
        assert!(!state.any_pressed());
    }

    #[test]
    fn test_release_all_twice_releases_once() {
        let mapping = up_on_button_two();
        let mut state = PressState::new();
        state.apply(&mapping, ButtonBitmask(0b10));

        assert_eq!(state.release_all().len(), 1);
        assert!(state.release_all().is_empty());
    }

    #[test]
    fn test_held_button_after_release_all_presses_again() {
        let mapping = up_on_button_two();
        let mut state = PressState::new();
        state.apply(&mapping, ButtonBitmask(0b10));
        state.release_all();

        let transitions = state.apply(&mapping, ButtonBitmask(0b10));

        assert_eq!(transitions, vec![KeyTransition::down(Direction::Up)]);
    }
}
