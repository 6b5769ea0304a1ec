use std::{thread, time::Instant};

use crate::{
    chip8::{ChipSet, State},
    config::Config,
    devices::{DisplayCommands, KeyboardCommands, SoundCommands},
    opcode::Operation,
    ConfigError, ProcessError,
};

/// Drives a [`ChipSet`](ChipSet) frame by frame against the host devices.
pub struct Runner<D, K, S>
where
    D: DisplayCommands,
    K: KeyboardCommands,
    S: SoundCommands,
{
    chip: ChipSet,
    display: D,
    keyboard: K,
    sound: S,
    config: Config,
}

impl<D, K, S> Runner<D, K, S>
where
    D: DisplayCommands,
    K: KeyboardCommands,
    S: SoundCommands,
{
    /// Will validate the configuration and clear the display.
    pub fn new(
        chip: ChipSet,
        mut display: D,
        keyboard: K,
        sound: S,
        config: Config,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        display.clear_display();

        log::debug!(
            "Running '{}' with {} instructions per frame ({} per second)",
            chip.get_name(),
            config.instructions_per_frame,
            config.instructions_per_second()
        );

        Ok(Self {
            chip,
            display,
            keyboard,
            sound,
            config,
        })
    }

    /// Runs a single frame: polls the keyboard, executes the configured amount
    /// of instructions, ticks the timers and updates the display and the tone.
    pub fn frame(&mut self) -> Result<State, ProcessError> {
        if self.keyboard.quit_requested() {
            log::debug!("Quit requested");
            self.chip.quit();
            self.sound.set_tone(false);
            return Ok(self.chip.get_state());
        }

        let keys = self.keyboard.get_keyboard();
        self.chip.set_keyboard(&keys);

        if self.chip.get_state() != State::Running {
            self.sound.set_tone(false);
            return Ok(self.chip.get_state());
        }

        let mut redraw = false;
        for _ in 0..self.config.instructions_per_frame {
            match self.chip.next() {
                Ok(Operation::Draw) => redraw = true,
                // the keyboard will not change until the next frame
                Ok(Operation::Wait) => break,
                Ok(Operation::None) => {}
                Err(err) => {
                    log::error!(
                        "Stopping '{}' at {:#06X}: {}",
                        self.chip.get_name(),
                        self.chip.get_program_counter(),
                        err
                    );
                    self.chip.quit();
                    self.sound.set_tone(false);
                    return Err(err);
                }
            }
        }

        let tone = self.chip.tick_timers();

        if redraw {
            self.display.display(self.chip.get_display());
        }
        self.sound.set_tone(tone);

        Ok(self.chip.get_state())
    }

    /// Will run frames at the configured interval until the chip halts.
    pub fn run(&mut self) -> Result<State, ProcessError> {
        loop {
            let start = Instant::now();
            let state = self.frame()?;
            if state == State::Halted {
                return Ok(state);
            }

            let elapsed = start.elapsed();
            if elapsed < self.config.frame_interval {
                thread::sleep(self.config.frame_interval - elapsed);
            }
        }
    }

    pub fn get_chip(&self) -> &ChipSet {
        &self.chip
    }

    /// Mutable access for pausing and resuming the session.
    pub fn get_chip_mut(&mut self) -> &mut ChipSet {
        &mut self.chip
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }
}
