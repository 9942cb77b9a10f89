//! Direction to Windows Virtual-Key code table (winuser.h arrow keys).

use crate::domain::direction::Direction;

pub const VK_LEFT: u16 = 0x25;
pub const VK_UP: u16 = 0x26;
pub const VK_RIGHT: u16 = 0x27;
pub const VK_DOWN: u16 = 0x28;

/// Arrow-key VK code synthesized for `direction`.
pub fn direction_to_vk(direction: Direction) -> u16 {
    match direction {
        Direction::Up => VK_UP,
        Direction::Down => VK_DOWN,
        Direction::Left => VK_LEFT,
        Direction::Right => VK_RIGHT,
    }
}

/// Reverse of [`direction_to_vk`]; `None` for anything but the four arrows.
pub fn vk_to_direction(vk: u16) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|d| direction_to_vk(*d) == vk)
}
