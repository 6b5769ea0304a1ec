//! Headless stand ins for the window, the keyboard and the speaker.
use chip::{
    definitions::keyboard,
    devices::{DisplayCommands, KeyboardCommands, SoundCommands},
};

const PIXEL_ON: char = '#';
const PIXEL_OFF: char = '.';

/// Renders the pixels as ascii art, a line per row.
pub fn render(pixels: &[Vec<bool>]) -> String {
    let width = pixels.first().map(|row| row.len()).unwrap_or(0);
    let mut text = String::with_capacity((width + 1) * pixels.len());
    for row in pixels {
        text.extend(row.iter().map(|p| if *p { PIXEL_ON } else { PIXEL_OFF }));
        text.push('\n');
    }
    text.pop();
    text
}

/// A display without a window, it only counts the redraws.
#[derive(Debug, Default)]
pub struct TextDisplay {
    draws: usize,
}

impl TextDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplayCommands for TextDisplay {
    fn clear_display(&mut self) {
        self.draws = 0;
    }

    fn display(&mut self, pixels: &[Vec<bool>]) {
        self.draws += 1;
        log::trace!("frame {}\n{}", self.draws, render(pixels));
    }
}

/// A keyboard that never presses a key and asks to quit after the
/// given amount of frames.
#[derive(Debug)]
pub struct ScriptedKeyboard {
    frames: u64,
    polled: u64,
}

impl ScriptedKeyboard {
    pub fn new(frames: u64) -> Self {
        Self { frames, polled: 0 }
    }
}

impl KeyboardCommands for ScriptedKeyboard {
    fn get_keyboard(&mut self) -> [bool; keyboard::SIZE] {
        self.polled += 1;
        [false; keyboard::SIZE]
    }

    fn quit_requested(&self) -> bool {
        self.polled >= self.frames
    }
}

/// Only logs when the tone starts or stops.
#[derive(Debug, Default)]
pub struct SilentSound {
    active: bool,
}

impl SoundCommands for SilentSound {
    fn set_tone(&mut self, active: bool) {
        if self.active != active {
            log::debug!("tone {}", if active { "on" } else { "off" });
        }
        self.active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let pixels = vec![vec![true, false, true], vec![false, false, true]];
        assert_eq!("#.#\n..#", render(&pixels));
        assert_eq!("", render(&[]));
    }

    #[test]
    fn test_keyboard_quits_after_frames() {
        let mut keyboard = ScriptedKeyboard::new(2);
        assert!(!keyboard.quit_requested());
        assert_eq!([false; keyboard::SIZE], keyboard.get_keyboard());
        assert!(!keyboard.quit_requested());
        keyboard.get_keyboard();
        assert!(keyboard.quit_requested());
    }
}
