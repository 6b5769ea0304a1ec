//! The configuration surface of an emulation session.
use std::time::Duration;

use crate::{definitions::timer, ConfigError};

/// All the values a host needs to drive the interpreter, render the display
/// and play the tone.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// How many screen pixels a single chip8 pixel takes up.
    pub scale: u32,
    /// Draw an outline in the background color around every lit pixel.
    pub pixel_outlines: bool,
    /// The amount of instructions executed between two timer ticks.
    pub instructions_per_frame: u32,
    /// The color of lit pixels as `0xRRGGBBAA`.
    pub foreground: u32,
    /// The color of unlit pixels as `0xRRGGBBAA`.
    pub background: u32,
    /// The frequency of the square wave tone in hertz.
    pub tone_frequency: u32,
    /// The amplitude of the square wave tone.
    pub volume: i16,
    /// The time a single frame takes.
    pub frame_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scale: 20,
            pixel_outlines: true,
            instructions_per_frame: 20,
            foreground: 0xFFFF_FFFF,
            background: 0x0000_0000,
            tone_frequency: 440,
            volume: 3000,
            frame_interval: timer::INTERVAL,
        }
    }
}

impl Config {
    /// Checks all the values that would break the host loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scale == 0 {
            return Err(ConfigError::Scale);
        }
        if self.instructions_per_frame == 0 {
            return Err(ConfigError::InstructionsPerFrame);
        }
        if self.tone_frequency == 0 {
            return Err(ConfigError::ToneFrequency);
        }
        if self.volume < 0 {
            return Err(ConfigError::Volume(self.volume));
        }
        Ok(())
    }

    /// The instructions per second resulting from the frame configuration.
    pub fn instructions_per_second(&self) -> u64 {
        let frames = Duration::from_secs(1).as_micros() / self.frame_interval.as_micros().max(1);
        frames as u64 * u64::from(self.instructions_per_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert_eq!(Ok(()), config.validate());
        assert_eq!(20, config.instructions_per_frame);
        assert_eq!(20, config.scale);
        assert!(config.pixel_outlines);
    }

    #[test]
    fn test_invalid_values() {
        let tests = [
            (
                Config {
                    scale: 0,
                    ..Config::default()
                },
                ConfigError::Scale,
            ),
            (
                Config {
                    instructions_per_frame: 0,
                    ..Config::default()
                },
                ConfigError::InstructionsPerFrame,
            ),
            (
                Config {
                    tone_frequency: 0,
                    ..Config::default()
                },
                ConfigError::ToneFrequency,
            ),
            (
                Config {
                    volume: -1,
                    ..Config::default()
                },
                ConfigError::Volume(-1),
            ),
        ];

        for (config, err) in tests {
            assert_eq!(Err(err), config.validate());
        }
    }

    #[test]
    fn test_instructions_per_second() {
        let config = Config {
            instructions_per_frame: 10,
            frame_interval: Duration::from_millis(10),
            ..Config::default()
        };
        assert_eq!(1000, config.instructions_per_second());
    }
}
