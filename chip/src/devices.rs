//! The seams between the interpreter and the host devices, together with the
//! internal keypad latch.
use crate::definitions::keyboard;

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will clear the display
    fn clear_display(&mut self);
    /// Will display all from the pixels (row major, `pixels[y][x]`)
    fn display(&mut self, pixels: &[Vec<bool>]);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the keyboard data from the host
pub trait KeyboardCommands {
    /// Polls the current state of all the keys
    fn get_keyboard(&mut self) -> [bool; keyboard::SIZE];
    /// Checks if the user asked to end the session
    fn quit_requested(&self) -> bool;
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the tone output
pub trait SoundCommands {
    /// Will start or stop the tone
    fn set_tone(&mut self, active: bool);
}

/// Will represent the last set key with the previous
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    index: usize,
    last: bool,
    current: bool,
}

impl Key {
    fn new(index: usize, last: bool, current: bool) -> Self {
        Self {
            index,
            last,
            current,
        }
    }

    pub fn get_index(&self) -> usize {
        self.index
    }

    pub fn get_last(&self) -> bool {
        self.last
    }

    pub fn get_current(&self) -> bool {
        self.current
    }
}

/// Will store the last change to the given keybord
/// and represent the internal keyboard as well
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and then stores it in one of
/// the data registers.
#[derive(Default, Debug, Clone)]
pub struct Keyboard {
    keys: [bool; keyboard::SIZE],
    last: Option<Key>,
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    pub fn toggle_key(&mut self, key: usize) {
        self.set_key(key, !self.keys[key])
    }

    /// Will set a single key, panics if the key is not in the range `0x0-0xF`.
    pub fn set_key(&mut self, key: usize, to: bool) {
        assert!(key < keyboard::SIZE, "There is no key {:#X}.", key);

        self.last = Some(Key::new(key, self.keys[key], to));
        self.keys[key] = to;
    }

    /// Will overwrite the whole latch at once.
    pub fn set_mult(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keys.copy_from_slice(keys);
        self.last = None;
    }

    pub fn get_keys(&self) -> &[bool] {
        &self.keys
    }

    pub fn get_last(&self) -> Option<Key> {
        self.last
    }

    /// Checks a key, any value outside of `0x0-0xF` counts as not pressed.
    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// Returns the lowest key that is currently pressed.
    pub fn first_pressed(&self) -> Option<usize> {
        self.keys.iter().position(|pressed| *pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_key_tracks_last_change() {
        let mut keyboard = Keyboard::new();
        assert!(keyboard.get_last().is_none());

        keyboard.set_key(0xA, true);
        let last = keyboard.get_last().expect("a key was just set");
        assert_eq!(0xA, last.get_index());
        assert!(!last.get_last());
        assert!(last.get_current());

        keyboard.toggle_key(0xA);
        let last = keyboard.get_last().expect("a key was just toggled");
        assert!(last.get_last());
        assert!(!last.get_current());
        assert!(!keyboard.is_pressed(0xA));
    }

    #[test]
    fn test_set_mult_resets_last() {
        let mut keyboard = Keyboard::new();
        keyboard.set_key(0x1, true);

        let mut keys = [false; keyboard::SIZE];
        keys[0xF] = true;
        keys[0x7] = true;
        keyboard.set_mult(&keys);

        assert!(keyboard.get_last().is_none());
        assert_eq!(&keys[..], keyboard.get_keys());
        assert_eq!(Some(0x7), keyboard.first_pressed());
    }

    #[test]
    fn test_all_sixteen_keys_are_addressable() {
        let mut keyboard = Keyboard::new();
        keyboard.set_key(0xF, true);

        assert!(keyboard.is_pressed(0xF));
        assert!(!keyboard.is_pressed(0x10));
        assert!(!keyboard.is_pressed(0xFF));
    }

    #[test]
    #[should_panic(expected = "There is no key 0x10.")]
    fn test_set_key_out_of_range() {
        Keyboard::new().set_key(0x10, true);
    }
}
