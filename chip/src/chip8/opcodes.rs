use crate::{
    definitions::{cpu, display},
    opcode::{Arithmetic, ChipOpcodes, Instruction, KeyCondition, Misc, Operation, ProgramCounterStep},
    MemoryError, ProcessError,
};

use super::ChipSet;

impl ChipSet {
    #[inline]
    fn set_flag(&mut self, flag: bool) {
        self.registers[cpu::register::LAST] = flag as u8;
    }
}

impl ChipOpcodes for ChipSet {
    fn zero(
        &mut self,
        instruction: &Instruction,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        match instruction {
            Instruction::Return => {
                // 00EE
                // Return from sub routine => pop from stack
                let pc = self.pop_stack()?;
                log::debug!("Return to {:#06X}", pc);
                Ok((ProgramCounterStep::Jump(pc as usize), Operation::None))
            }
            _ => {
                // 00E0
                // clear display
                for row in self.display.iter_mut() {
                    row.fill(false);
                }
                Ok((ProgramCounterStep::Next, Operation::Draw))
            }
        }
    }

    fn call(&mut self, nnn: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 2NNN
        // the program counter already points to the instruction after the call
        self.push_stack(self.program_counter as u16)?;
        Ok(ProgramCounterStep::Jump(nnn))
    }

    fn conditional(&self, instruction: &Instruction) -> ProgramCounterStep {
        let cond = match *instruction {
            Instruction::SkipEqual { x, nn } => self.registers[x] == nn,
            Instruction::SkipNotEqual { x, nn } => self.registers[x] != nn,
            Instruction::SkipRegisterEqual { x, y } => self.registers[x] == self.registers[y],
            Instruction::SkipRegisterNotEqual { x, y } => self.registers[x] != self.registers[y],
            _ => false,
        };
        ProgramCounterStep::cond(cond)
    }

    fn constant(&mut self, instruction: &Instruction) {
        match *instruction {
            Instruction::Set { x, nn } => self.registers[x] = nn,
            // let VX overflow, but ignore carry
            Instruction::Add { x, nn } => self.registers[x] = self.registers[x].wrapping_add(nn),
            Instruction::SetIndex { nnn } => self.index_register = nnn as u16,
            _ => {}
        }
    }

    fn arithmetic(&mut self, op: Arithmetic, x: usize, y: usize) {
        // read both operands first, as VF might be one of them
        let vx = self.registers[x];
        let vy = self.registers[y];

        let res = match op {
            Arithmetic::Assign => vy,
            Arithmetic::Or => vx | vy,
            Arithmetic::And => vx & vy,
            Arithmetic::Xor => vx ^ vy,
            Arithmetic::Add => {
                let (res, carry) = vx.overflowing_add(vy);
                self.set_flag(carry);
                res
            }
            Arithmetic::Sub => {
                // VF is the "no borrow" flag
                self.set_flag(vx >= vy);
                vx.wrapping_sub(vy)
            }
            Arithmetic::ShiftRight => {
                self.set_flag(vx & 0x01 == 0x01);
                vx >> 1
            }
            Arithmetic::SubReverse => {
                self.set_flag(vy >= vx);
                vy.wrapping_sub(vx)
            }
            Arithmetic::ShiftLeft => {
                self.set_flag(vx & 0x80 == 0x80);
                vx << 1
            }
        };
        self.registers[x] = res;
    }

    fn jump_offset(&self, nnn: usize) -> ProgramCounterStep {
        // BNNN
        // the target is checked once the step gets applied
        ProgramCounterStep::Jump(self.registers[0] as usize + nnn)
    }

    fn random(&mut self, x: usize, nn: u8) {
        // using a fill bytes call here, as the trait RngCore does not
        // support random u8.
        let mut rand: [u8; 1] = [0];
        self.rng.fill_bytes(&mut rand);
        self.registers[x] = nn & rand[0];
    }

    fn draw(&mut self, x: usize, y: usize, n: u8) -> Result<ProgramCounterStep, ProcessError> {
        // DXYN
        // see https://tobiasvl.github.io/blog/write-a-chip-8-emulator/
        let index = self.index_register as usize;
        let coorx = self.registers[x] as usize % display::WIDTH;
        let coory = self.registers[y] as usize % display::HEIGHT;

        self.set_flag(false);

        for i in 0..n as usize {
            let address = index + i;
            let row = *self
                .memory
                .get(address)
                .ok_or(MemoryError::OutOfBounds { address })?;

            // no vertical wrap around
            let y = coory + i;
            if y >= display::HEIGHT {
                break;
            }

            for j in 0..display::SPRITE_WIDTH {
                // no horizontal wrap around
                let x = coorx + j;
                if x >= display::WIDTH {
                    break;
                }

                let mask = 0x80 >> j;
                if row & mask == 0 {
                    continue;
                }

                let pixel = &mut self.display[y][x];
                if *pixel {
                    self.registers[cpu::register::LAST] = 1;
                }
                *pixel = !*pixel;
            }
        }

        Ok(ProgramCounterStep::Next)
    }

    fn key(&self, op: KeyCondition, x: usize) -> ProgramCounterStep {
        let pressed = self.keyboard.is_pressed(self.registers[x] as usize);
        match op {
            KeyCondition::Pressed => ProgramCounterStep::cond(pressed),
            KeyCondition::NotPressed => ProgramCounterStep::cond(!pressed),
        }
    }

    fn misc(
        &mut self,
        op: Misc,
        x: usize,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        let mut operation = Operation::None;
        let mut pcs = ProgramCounterStep::Next;
        match op {
            Misc::GetDelayTimer => {
                // FX07
                self.registers[x] = self.delay_timer.get_value();
            }
            Misc::AwaitKeyPress => {
                // FX0A
                // A key press is awaited, and then stored in VX.
                match self.keyboard.first_pressed() {
                    Some(key) => self.registers[x] = key as u8,
                    None => {
                        log::debug!("Waiting for a key press to store in V{:X}", x);
                        self.awaiting_key = Some(x);
                        pcs = ProgramCounterStep::Repeat;
                        operation = Operation::Wait;
                    }
                }
            }
            Misc::SetDelayTimer => {
                // FX15
                self.delay_timer.set_value(self.registers[x]);
            }
            Misc::SetSoundTimer => {
                // FX18
                self.sound_timer.set_value(self.registers[x]);
            }
            Misc::AddVxToI => {
                // FX1E
                // VF is not affected.
                self.index_register = self.index_register.wrapping_add(self.registers[x] as u16);
            }
            Misc::SetIToSprite => {
                // FX29
                let glyph = self.registers[x] as usize * display::fontset::GLYPH_SIZE;
                self.index_register = (display::fontset::LOCATION + glyph) as u16;
            }
            Misc::StoreBCD => {
                // FX33
                let range = self.writable(self.index_register as usize, 3)?;
                let r = self.registers[x];

                self.memory[range].copy_from_slice(&[
                    r / 100,      // 246u8 / 100 => 2
                    r / 10 % 10,  // 246u8 / 10 => 24 % 10 => 4
                    r % 10,       // 246u8 % 10 => 6
                ]);
            }
            Misc::StoreV0ToVx => {
                // FX55
                // I itself is left unmodified.
                let range = self.writable(self.index_register as usize, x + 1)?;
                self.memory[range].copy_from_slice(&self.registers[..=x]);
            }
            Misc::FillV0ToVx => {
                // FX65
                // I itself is left unmodified.
                let range = self.readable(self.index_register as usize, x + 1)?;
                self.registers[..=x].copy_from_slice(&self.memory[range]);
            }
        }
        Ok((pcs, operation))
    }
}
