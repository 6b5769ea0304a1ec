use std::{convert::TryFrom, ops::Range};

use rand::RngCore;
use tinyvec::ArrayVec;

use crate::{
    definitions::{cpu, display, keyboard, memory},
    devices::Keyboard,
    opcode::{self, ChipOpcodes, Instruction, Opcode, Operation, ProgramCounter, ProgramCounterStep},
    resources::Rom,
    timer::Timer,
    MemoryError, ProcessError, StackError,
};

/// The run states of the interpreter. Only `Running` executes instructions,
/// the transitions are driven by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Paused,
    Halted,
}

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// name of the loaded rom
    pub(super) name: String,
    /// all two bytes long and stored big-endian
    pub(super) opcode: Opcode,
    /// - `0x000-0x04F` - Used for the built in `4x5` pixel font set (`0-F`)
    /// - `0x050-0x1FF` - Reserved for the interpreter
    /// - `0x200-0xFFF` - Program ROM and work RAM
    pub(super) memory: Vec<u8>,
    /// `8-bit` data registers named `V0` to `VF`. They are all general purpose, but the opcodes
    /// `8XY4`, `8XY5`, `8XY6`, `8XY7`, `8XYE` and `DXYN` overwrite `VF` as a side channel flag
    /// (carry, no borrow, shifted out bit and pixel collision).
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`
    pub(super) index_register: u16,
    /// The program counter is a CPU register in the computer processor which has the address of the
    /// next instruction to be executed from memory.
    pub(super) program_counter: usize,
    /// The stack is only used to store return addresses when subroutines are called. The original
    /// [RCA 1802](https://de.wikipedia.org/wiki/RCA1802) version allocated `48` bytes for up to
    /// `12` levels of nesting; modern implementations usually have more.
    /// (here we are using `16`)
    pub(super) stack: ArrayVec<[u16; cpu::stack::SIZE]>,
    /// Delay timer: This timer is intended to be used for timing the events of games. Its value
    /// can be set and read.
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) delay_timer: Timer,
    /// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
    /// sound is made.
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) sound_timer: Timer,
    /// The graphics of the Chip 8 are black and white and the screen has a total of `2048` pixels
    /// `(64 x 32)`, stored row major as `display[y][x]`.
    pub(super) display: Vec<Vec<bool>>,
    /// The latch of the hex keypad, written by the host between two cycles.
    pub(super) keyboard: Keyboard,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
    /// The register waiting for a key press (`FX0A`), while set the
    /// program counter stays on the waiting instruction.
    pub(super) awaiting_key: Option<usize>,
    /// The current run state
    pub(super) state: State,
}

impl ChipSet {
    /// will create a new chipset object
    pub fn new(rom: Rom) -> Self {
        Self::with_rng(rom, Box::new(rand::rngs::OsRng))
    }

    /// will create a new chipset object, using the given random number generator
    pub fn with_rng(rom: Rom, rng: Box<dyn RngCore + Send>) -> Self {
        // initialize all the memory with 0
        let mut ram = vec![0; memory::SIZE];

        // load fonts
        ram[display::fontset::LOCATION
            ..(display::fontset::LOCATION + display::fontset::FONTSET.len())]
            .copy_from_slice(&display::fontset::FONTSET);

        // write the rom data into memory, the rom guarantees that it fits
        ram[cpu::PROGRAM_COUNTER..(cpu::PROGRAM_COUNTER + rom.get_data().len())]
            .copy_from_slice(rom.get_data());

        log::debug!(
            "Initialized chipset with rom '{}' ({} bytes)",
            rom.get_name(),
            rom.get_data().len()
        );

        Self {
            name: rom.get_name().to_string(),
            opcode: 0,
            memory: ram,
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER,
            stack: ArrayVec::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            display: vec![vec![false; display::WIDTH]; display::HEIGHT],
            keyboard: Keyboard::new(),
            rng,
            awaiting_key: None,
            state: State::Running,
        }
    }

    /// will get the next opcode from memory
    pub(super) fn set_opcode(&mut self) -> Result<(), MemoryError> {
        // will build the opcode given from the pointer
        self.opcode = opcode::build_opcode(&self.memory, self.program_counter)?;
        Ok(())
    }

    /// will advance the program by a single step
    pub fn next(&mut self) -> Result<Operation, ProcessError> {
        if self.state != State::Running {
            return Ok(Operation::None);
        }

        if let Some(register) = self.awaiting_key {
            return Ok(self.resume_key_wait(register));
        }

        // get next opcode
        self.set_opcode()?;
        let address = self.program_counter;
        self.program_counter += memory::opcodes::SIZE;

        match Instruction::try_from(self.opcode) {
            Ok(instruction) => {
                log::trace!("{:#06X}: {:#06X} {}", address, self.opcode, instruction);
                self.calc(&instruction)
            }
            Err(err) => {
                // unknown opcodes do nothing except moving on
                log::warn!("{} Ignored at {:#06X}.", err, address);
                Ok(Operation::None)
            }
        }
    }

    /// Checks the keyboard for the pending `FX0A` instruction.
    fn resume_key_wait(&mut self, register: usize) -> Operation {
        match self.keyboard.first_pressed() {
            Some(key) => {
                log::debug!("Key {:#X} pressed, stored in V{:X}", key, register);
                self.registers[register] = key as u8;
                self.awaiting_key = None;
                // move past the waiting instruction
                self.program_counter += memory::opcodes::SIZE;
                Operation::None
            }
            None => Operation::Wait,
        }
    }

    /// Will count both timers down by a single tick, returns if the
    /// tone shall be played.
    pub fn tick_timers(&mut self) -> bool {
        self.delay_timer.tick();
        self.sound_timer.tick();
        self.sound_timer.is_active()
    }

    /// Will write keyboard data into interncal keyboard representation.
    pub fn set_keyboard(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keyboard.set_mult(keys);
    }

    /// Will set the value of the given key
    pub fn set_key(&mut self, key: usize, to: bool) {
        self.keyboard.set_key(key, to)
    }

    /// Will toggle the given key
    pub fn toggle_key(&mut self, key: usize) {
        self.keyboard.toggle_key(key)
    }

    /// Will get the current state of the keyboard
    pub fn get_keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    /// will return the sound timer
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer.get_value()
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer.get_value()
    }

    /// Checks if the tone shall currently be played
    pub fn is_tone_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    /// Will return a immutable slice of the current display configuration
    pub fn get_display(&self) -> &[Vec<bool>] {
        &self.display[..]
    }

    pub fn get_registers(&self) -> &[u8] {
        &self.registers
    }

    pub fn get_index_register(&self) -> u16 {
        self.index_register
    }

    pub fn get_program_counter(&self) -> usize {
        self.program_counter
    }

    pub fn get_memory(&self) -> &[u8] {
        &self.memory
    }

    /// The amount of currently nested subroutines
    pub fn get_stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Returns the register that waits for a key press, if any.
    pub fn awaiting_key(&self) -> Option<usize> {
        self.awaiting_key
    }

    pub fn get_state(&self) -> State {
        self.state
    }

    /// Suspends the execution, until [`resume`](Self::resume) is called.
    pub fn pause(&mut self) {
        if self.state == State::Running {
            log::debug!("Pausing '{}'", self.name);
            self.state = State::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == State::Paused {
            log::debug!("Resuming '{}'", self.name);
            self.state = State::Running;
        }
    }

    /// Ends the session, there is no way back from here.
    pub fn quit(&mut self) {
        log::debug!("Halting '{}'", self.name);
        self.state = State::Halted;
    }

    /// Will push the current pointer to the stack
    pub(super) fn push_stack(&mut self, pointer: u16) -> Result<(), StackError> {
        // try_push hands the value back if there is no space left
        match self.stack.try_push(pointer) {
            None => Ok(()),
            Some(_) => Err(StackError::Full),
        }
    }

    /// Will pop from the stack
    pub(super) fn pop_stack(&mut self) -> Result<u16, StackError> {
        self.stack.pop().ok_or(StackError::Empty)
    }

    /// The range of `len` bytes starting at `address`, if all of them are
    /// inside of the memory.
    pub(super) fn readable(&self, address: usize, len: usize) -> Result<Range<usize>, MemoryError> {
        let end = address + len;
        if end > self.memory.len() {
            return Err(MemoryError::OutOfBounds {
                address: address.max(self.memory.len()),
            });
        }
        Ok(address..end)
    }

    /// Same as [`readable`](Self::readable), but additionally guards the
    /// interpreter area.
    pub(super) fn writable(&self, address: usize, len: usize) -> Result<Range<usize>, MemoryError> {
        if address < memory::RESERVED {
            return Err(MemoryError::Reserved { address });
        }
        self.readable(address, len)
    }
}

impl ProgramCounter for ChipSet {
    fn step(&mut self, step: ProgramCounterStep) -> Result<(), MemoryError> {
        self.program_counter = step.apply(self.program_counter)?;
        Ok(())
    }
}
