//! Opcode abstractions, decoding and the traits the interpreter has to fulfill.
use std::{convert::TryFrom, fmt};

use crate::{
    definitions::memory,
    MemoryError, OpcodeError, ProcessError,
};

/// the mask for the type nibble
pub(crate) const OPCODE_MASK_F000: u16 = 0xF000;

/// the mask for the register nibble `X`
pub(crate) const OPCODE_MASK_0F00: u16 = 0x0F00;

/// the mask for the register nibble `Y`
pub(crate) const OPCODE_MASK_00F0: u16 = 0x00F0;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = 0x000F;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = 0x00FF;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = 0x0FFF;

/// the size of a nibble
const NIBBLE: u16 = 4;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// will build an opcode from data and the given point
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcodes
/// - `pointer` - Where in the data the opcode shall be extracted, so `pointer` and `pointer + 1` make
/// the opcode up (big-endian)
///
/// # Example
/// ```rust
/// # use chip::opcode::*;
/// # use chip::MemoryError;
///  const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
///  const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
///  for (i, val) in OPCODES.iter().enumerate() {
///      let opcode = build_opcode(&SPLIT_OPCODE, i * 2).expect("This will work.");
///      assert_eq!(opcode, *val);
///  }
/// # assert_eq!(
/// #    Err(MemoryError::OutOfBounds { address: 4 }),
/// #    build_opcode(&SPLIT_OPCODE, 3)
/// # );
/// ```
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, MemoryError> {
    // controlling that there is no illegal access here
    if pointer + 1 < data.len() {
        Ok(Opcode::from_be_bytes([data[pointer], data[pointer + 1]]))
    } else {
        Err(MemoryError::OutOfBounds {
            address: pointer + 1,
        })
    }
}

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// the opcode type, the highest nibble
    fn t(&self) -> u8;

    /// the register index `X` of `TXNN`
    fn x(&self) -> usize;

    /// the register index `Y` of `TXYN`
    fn y(&self) -> usize;

    /// the lowest nibble `N`
    fn n(&self) -> u8;

    /// the lowest byte `NN`
    fn nn(&self) -> u8;

    /// the address `NNN` of `TNNN`
    fn nnn(&self) -> usize;

    /// this is an opcode extractor for the opcode type `TXNN`
    fn xnn(&self) -> (usize, u8) {
        (self.x(), self.nn())
    }

    /// this is an opcode extractor for the opcode type `TXYN`
    fn xyn(&self) -> (usize, usize, u8) {
        (self.x(), self.y(), self.n())
    }
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1);
    /// ```
    fn t(&self) -> u8 {
        ((self & OPCODE_MASK_F000) >> (3 * NIBBLE)) as u8
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.x(), 0xE);
    /// ```
    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0F00) >> (2 * NIBBLE)) as usize
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.y(), 0xD);
    /// ```
    fn y(&self) -> usize {
        ((self & OPCODE_MASK_00F0) >> NIBBLE) as usize
    }

    fn n(&self) -> u8 {
        (self & OPCODE_MASK_000F) as u8
    }

    fn nn(&self) -> u8 {
        (self & OPCODE_MASK_00FF) as u8
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA);
    ///  assert_eq!(BASE_OPCODE.xnn(), (0xE, 0xDA));
    ///  assert_eq!(BASE_OPCODE.xyn(), (0xE, 0xD, 0xA));
    /// ```
    fn nnn(&self) -> usize {
        (self & OPCODE_MASK_0FFF) as usize
    }
}

/// Generates a sub opcode enum together with the lookup from the
/// distinguishing opcode bits.
macro_rules! sub_opcode {
    ($(#[$meta:meta])* $name:ident : $from:ty { $( $key:literal => $variant:ident ),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $variant, )+
        }

        impl TryFrom<$from> for $name {
            type Error = ();

            fn try_from(value: $from) -> Result<Self, Self::Error> {
                match value {
                    $( $key => Ok($name::$variant), )+
                    _ => Err(()),
                }
            }
        }
    };
}

sub_opcode!(
    /// The register to register operations of type `8XYT`.
    Arithmetic : u8 {
        0x0 => Assign,
        0x1 => Or,
        0x2 => And,
        0x3 => Xor,
        0x4 => Add,
        0x5 => Sub,
        0x6 => ShiftRight,
        0x7 => SubReverse,
        0xE => ShiftLeft,
    }
);

sub_opcode!(
    /// The keypad conditions of type `EXTT`.
    KeyCondition : u8 {
        0x9E => Pressed,
        0xA1 => NotPressed,
    }
);

sub_opcode!(
    /// The timer, keypad and memory operations of type `FXTT`.
    Misc : u8 {
        0x07 => GetDelayTimer,
        0x0A => AwaitKeyPress,
        0x15 => SetDelayTimer,
        0x18 => SetSoundTimer,
        0x1E => AddVxToI,
        0x29 => SetIToSprite,
        0x33 => StoreBCD,
        0x55 => StoreV0ToVx,
        0x65 => FillV0ToVx,
    }
);

/// A fully decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0`
    Clear,
    /// `00EE`
    Return,
    /// `1NNN`
    Jump { nnn: usize },
    /// `2NNN`
    Call { nnn: usize },
    /// `3XNN`
    SkipEqual { x: usize, nn: u8 },
    /// `4XNN`
    SkipNotEqual { x: usize, nn: u8 },
    /// `5XY0`
    SkipRegisterEqual { x: usize, y: usize },
    /// `6XNN`
    Set { x: usize, nn: u8 },
    /// `7XNN`
    Add { x: usize, nn: u8 },
    /// `8XYT`
    Arithmetic { op: Arithmetic, x: usize, y: usize },
    /// `9XY0`
    SkipRegisterNotEqual { x: usize, y: usize },
    /// `ANNN`
    SetIndex { nnn: usize },
    /// `BNNN`
    JumpOffset { nnn: usize },
    /// `CXNN`
    Random { x: usize, nn: u8 },
    /// `DXYN`
    Draw { x: usize, y: usize, n: u8 },
    /// `EXTT`
    Key { op: KeyCondition, x: usize },
    /// `FXTT`
    Misc { op: Misc, x: usize },
}

#[inline]
fn err<T>(value: Opcode) -> Result<T, OpcodeError> {
    Err(OpcodeError::InvalidOpcode(value))
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let (x, y, n) = value.xyn();
        let nn = value.nn();
        let nnn = value.nnn();

        let res = match value.t() {
            0x0 => match value {
                0x00E0 => Instruction::Clear,
                0x00EE => Instruction::Return,
                // 0NNN machine code routines are not supported
                _ => return err(value),
            },
            0x1 => Instruction::Jump { nnn },
            0x2 => Instruction::Call { nnn },
            0x3 => Instruction::SkipEqual { x, nn },
            0x4 => Instruction::SkipNotEqual { x, nn },
            0x5 if n == 0 => Instruction::SkipRegisterEqual { x, y },
            0x6 => Instruction::Set { x, nn },
            0x7 => Instruction::Add { x, nn },
            0x8 => match Arithmetic::try_from(n) {
                Ok(op) => Instruction::Arithmetic { op, x, y },
                Err(_) => return err(value),
            },
            0x9 if n == 0 => Instruction::SkipRegisterNotEqual { x, y },
            0xA => Instruction::SetIndex { nnn },
            0xB => Instruction::JumpOffset { nnn },
            0xC => Instruction::Random { x, nn },
            0xD => Instruction::Draw { x, y, n },
            0xE => match KeyCondition::try_from(nn) {
                Ok(op) => Instruction::Key { op, x },
                Err(_) => return err(value),
            },
            0xF => match Misc::try_from(nn) {
                Ok(op) => Instruction::Misc { op, x },
                Err(_) => return err(value),
            },
            _ => return err(value),
        };
        Ok(res)
    }
}

/// Renders the instruction in the common assembler notation, used for
/// tracing the execution.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Clear => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump { nnn } => write!(f, "JP {:#05X}", nnn),
            Instruction::Call { nnn } => write!(f, "CALL {:#05X}", nnn),
            Instruction::SkipEqual { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            Instruction::SkipNotEqual { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            Instruction::SkipRegisterEqual { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::Set { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            Instruction::Add { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Instruction::Arithmetic { op, x, y } => {
                let name = match op {
                    Arithmetic::Assign => "LD",
                    Arithmetic::Or => "OR",
                    Arithmetic::And => "AND",
                    Arithmetic::Xor => "XOR",
                    Arithmetic::Add => "ADD",
                    Arithmetic::Sub => "SUB",
                    Arithmetic::ShiftRight => "SHR",
                    Arithmetic::SubReverse => "SUBN",
                    Arithmetic::ShiftLeft => "SHL",
                };
                write!(f, "{} V{:X}, V{:X}", name, x, y)
            }
            Instruction::SkipRegisterNotEqual { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::SetIndex { nnn } => write!(f, "LD I, {:#05X}", nnn),
            Instruction::JumpOffset { nnn } => write!(f, "JP V0, {:#05X}", nnn),
            Instruction::Random { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Instruction::Key { op, x } => match op {
                KeyCondition::Pressed => write!(f, "SKP V{:X}", x),
                KeyCondition::NotPressed => write!(f, "SKNP V{:X}", x),
            },
            Instruction::Misc { op, x } => match op {
                Misc::GetDelayTimer => write!(f, "LD V{:X}, DT", x),
                Misc::AwaitKeyPress => write!(f, "LD V{:X}, K", x),
                Misc::SetDelayTimer => write!(f, "LD DT, V{:X}", x),
                Misc::SetSoundTimer => write!(f, "LD ST, V{:X}", x),
                Misc::AddVxToI => write!(f, "ADD I, V{:X}", x),
                Misc::SetIToSprite => write!(f, "LD F, V{:X}", x),
                Misc::StoreBCD => write!(f, "LD B, V{:X}", x),
                Misc::StoreV0ToVx => write!(f, "LD [I], V{:X}", x),
                Misc::FillV0ToVx => write!(f, "LD V{:X}, [I]", x),
            },
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents the program steps that the chip can take after the fetch
/// already moved the program counter past the current instruction.
pub enum ProgramCounterStep {
    /// Continue with the following instruction
    Next,
    /// Skip the following instruction
    Skip,
    /// Move back onto the current instruction, so it runs again
    Repeat,
    /// Move the program counter to the given location.
    Jump(usize),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Applies the step to the (already advanced) program counter.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// # use chip::MemoryError;
    /// assert_eq!(Ok(0x202), ProgramCounterStep::Next.apply(0x202));
    /// assert_eq!(Ok(0x204), ProgramCounterStep::Skip.apply(0x202));
    /// assert_eq!(Ok(0x200), ProgramCounterStep::Repeat.apply(0x202));
    /// assert_eq!(
    ///     Err(MemoryError::OutOfBounds { address: 0x1000 }),
    ///     ProgramCounterStep::Jump(0x1000).apply(0x202)
    /// );
    /// ```
    pub fn apply(&self, pointer: usize) -> Result<usize, MemoryError> {
        let next = match *self {
            ProgramCounterStep::Next => pointer,
            ProgramCounterStep::Skip => pointer + memory::opcodes::SIZE,
            ProgramCounterStep::Repeat => pointer.saturating_sub(memory::opcodes::SIZE),
            ProgramCounterStep::Jump(address) => address,
        };

        if next < memory::SIZE {
            Ok(next)
        } else {
            Err(MemoryError::OutOfBounds { address: next })
        }
    }
}

/// Represents a step of the program counter
/// this requires the enum ProgramCounterStep
/// to work.
pub trait ProgramCounter {
    /// will move the program counter by a step.
    fn step(&mut self, step: ProgramCounterStep) -> Result<(), MemoryError>;
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents a command from the interpreter up to the host.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// The interpreter waits for the next key press
    Wait,
    /// The display changed and has to be redrawn
    Draw,
}

/// These are the traits that have to be full filled for a working opcode
/// table.
///
/// This trait requires the implementation of the [`ProgramCounter`](ProgramCounter) trait, as
/// every instruction ends with a program counter step.
pub trait ChipOpcodes: ProgramCounter {
    /// will execute a single decoded instruction
    fn calc(&mut self, instruction: &Instruction) -> Result<Operation, ProcessError> {
        let (step, operation) = match *instruction {
            Instruction::Clear | Instruction::Return => self.zero(instruction)?,
            Instruction::Jump { nnn } => (ProgramCounterStep::Jump(nnn), Operation::None),
            Instruction::Call { nnn } => (self.call(nnn)?, Operation::None),
            Instruction::SkipEqual { .. }
            | Instruction::SkipNotEqual { .. }
            | Instruction::SkipRegisterEqual { .. }
            | Instruction::SkipRegisterNotEqual { .. } => {
                (self.conditional(instruction), Operation::None)
            }
            Instruction::Set { .. } | Instruction::Add { .. } | Instruction::SetIndex { .. } => {
                self.constant(instruction);
                (ProgramCounterStep::Next, Operation::None)
            }
            Instruction::Arithmetic { op, x, y } => {
                self.arithmetic(op, x, y);
                (ProgramCounterStep::Next, Operation::None)
            }
            Instruction::JumpOffset { nnn } => (self.jump_offset(nnn), Operation::None),
            Instruction::Random { x, nn } => {
                self.random(x, nn);
                (ProgramCounterStep::Next, Operation::None)
            }
            Instruction::Draw { x, y, n } => (self.draw(x, y, n)?, Operation::Draw),
            Instruction::Key { op, x } => (self.key(op, x), Operation::None),
            Instruction::Misc { op, x } => self.misc(op, x)?,
        };

        self.step(step)?;
        Ok(operation)
    }

    /// - `00E0` - Display  - `disp_clear()`        - Clears the screen.
    /// - `00EE` - Flow     - `return;`             - Returns from a subroutine.
    fn zero(
        &mut self,
        instruction: &Instruction,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `2NNN` - Flow     - `*(0xNNN)()`          - Calls subroutine at `NNN`.
    fn call(&mut self, nnn: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `3XNN` - Cond     - `if(Vx==NN)`          - Skips the next instruction if `VX` equals `NN`.
    /// - `4XNN` - Cond     - `if(Vx!=NN)`          - Skips the next instruction if `VX` doesn't equal `NN`.
    /// - `5XY0` - Cond     - `if(Vx==Vy)`          - Skips the next instruction if `VX` equals `VY`.
    /// - `9XY0` - Cond     - `if(Vx!=Vy)`          - Skips the next instruction if `VX` doesn't equal `VY`.
    fn conditional(&self, instruction: &Instruction) -> ProgramCounterStep;

    /// - `6XNN` - Const    - `Vx = NN`             - Sets `VX` to `NN`.
    /// - `7XNN` - Const    - `Vx += NN`            - Adds `NN` to `VX`. (Carry flag is not changed)
    /// - `ANNN` - MEM      - `I = NNN`             - Sets `I` to the address `NNN`.
    fn constant(&mut self, instruction: &Instruction);

    /// A multiuse opcode base for type `8XYT` (T is a sub opcode)
    ///
    /// - `8XY0` - Assign   - `Vx=Vy`               - Sets `VX` to the value of `VY`.
    /// - `8XY1` - BitOp    - `Vx=Vx|Vy`            - Sets `VX` to `VX` or `VY`.
    /// - `8XY2` - BitOp    - `Vx=Vx&Vy`            - Sets `VX` to `VX` and `VY`.
    /// - `8XY3` - BitOp    - `Vx=Vx^Vy`            - Sets `VX` to `VX` xor `VY`.
    /// - `8XY4` - Math     - `Vx += Vy`            - Adds `VY` to `VX`. `VF` is set to `1` when there's a carry, and to `0` when there isn't.
    /// - `8XY5` - Math     - `Vx -= Vy`            - `VY` is subtracted from `VX`. `VF` is set to `0` when there's a borrow, and `1` when there isn't.
    /// - `8XY6` - BitOp    - `Vx>>=1`              - Stores the least significant bit of `VX` in `VF` and then shifts `VX` to the right by `1`.
    /// - `8XY7` - Math     - `Vx=Vy-Vx`            - Sets `VX` to `VY` minus `VX`. `VF` is set to `0` when there's a borrow, and `1` when there isn't.
    /// - `8XYE` - BitOp    - `Vx<<=1`              - Stores the most significant bit of `VX` in `VF` and then shifts `VX` to the left by `1`.
    fn arithmetic(&mut self, op: Arithmetic, x: usize, y: usize);

    /// - `BNNN` - Flow     - `PC=V0+NNN`           - Jumps to the address `NNN` plus `V0`.
    fn jump_offset(&self, nnn: usize) -> ProgramCounterStep;

    /// - `CXNN` - Rand     - `Vx=rand()&NN`        - Sets `VX` to a random byte and `NN`.
    fn random(&mut self, x: usize, nn: u8);

    /// - `DXYN` - Disp     - `draw(Vx,Vy,N)`       - Draws a sprite at coordinate `(VX, VY)` that has a width of `8` pixels and a height of `N` pixels, read from memory location `I`. `VF` is set to `1` if any screen pixels are flipped from set to unset.
    fn draw(&mut self, x: usize, y: usize, n: u8) -> Result<ProgramCounterStep, ProcessError>;

    /// - `EX9E` - KeyOp    - `if(key()==Vx)`       - Skips the next instruction if the key stored in `VX` is pressed.
    /// - `EXA1` - KeyOp    - `if(key()!=Vx)`       - Skips the next instruction if the key stored in `VX` isn't pressed.
    fn key(&self, op: KeyCondition, x: usize) -> ProgramCounterStep;

    /// A multiuse opcode base for type `FXTT` (T is a sub opcode)
    ///
    /// - `FX07` - Timer    - `Vx = get_delay()`    - Sets `VX` to the value of the delay timer.
    /// - `FX0A` - KeyOp    - `Vx = get_key()`      - A key press is awaited, and then stored in `VX`.
    /// - `FX15` - Timer    - `delay_timer(Vx)`     - Sets the delay timer to `VX`.
    /// - `FX18` - Sound    - `sound_timer(Vx)`     - Sets the sound timer to `VX`.
    /// - `FX1E` - MEM      - `I +=Vx`              - Adds `VX` to `I`. `VF` is not affected.
    /// - `FX29` - MEM      - `I=sprite_addr[Vx]`   - Sets `I` to the location of the font glyph for `VX`.
    /// - `FX33` - BCD      - `set_BCD(Vx)`         - Stores the hundreds, tens and ones of `VX` at `I`, `I+1` and `I+2`.
    /// - `FX55` - MEM      - `reg_dump(Vx,&I)`     - Stores `V0` to `VX` (including `VX`) in memory starting at address `I`.
    /// - `FX65` - MEM      - `reg_load(Vx,&I)`     - Fills `V0` to `VX` (including `VX`) with values from memory starting at address `I`.
    fn misc(&mut self, op: Misc, x: usize)
        -> Result<(ProgramCounterStep, Operation), ProcessError>;
}
