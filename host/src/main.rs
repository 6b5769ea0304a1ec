//! Runs a chip8 program without a window for a fixed amount of frames and
//! prints the final screen.
//!
//! ```bash
//! chip8-host roms/IBM.ch8 --frames 120
//! chip8-host --archive roms.zip 15PUZZLE
//! ```
use std::fs;

use anyhow::Context;
use chip::{
    chip8::ChipSet,
    config::Config,
    resources::{Rom, RomArchives},
    Runner,
};
use clap::{ArgAction, Parser};

mod adapters;

use adapters::{ScriptedKeyboard, SilentSound, TextDisplay};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the rom, or its name inside of the archive
    rom: String,

    #[arg(long, help = "Zip archive to load the rom from")]
    archive: Option<String>,

    #[arg(short, long, default_value_t = Config::default().scale, help = "Screen pixels per chip8 pixel")]
    scale: u32,

    #[arg(long, default_value_t = Config::default().pixel_outlines, action = ArgAction::Set, help = "Outline lit pixels")]
    pixel_outlines: bool,

    #[arg(short, long, default_value_t = Config::default().instructions_per_frame, help = "Instructions executed per frame")]
    instructions_per_frame: u32,

    #[arg(short, long, default_value_t = Config::default().volume, help = "Amplitude of the tone")]
    volume: i16,

    #[arg(long, default_value_t = 600, help = "Frames to run before quitting")]
    frames: u64,

    #[arg(long, help = "Print the full machine state at the end")]
    dump: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            scale: self.scale,
            pixel_outlines: self.pixel_outlines,
            instructions_per_frame: self.instructions_per_frame,
            volume: self.volume,
            ..Config::default()
        }
    }
}

fn load_rom(args: &Args) -> anyhow::Result<Rom> {
    match &args.archive {
        Some(archive) => {
            let data =
                fs::read(archive).with_context(|| format!("Unable to read '{}'", archive))?;
            let mut roms = RomArchives::new(&data)?;
            roms.get_file_data(&args.rom).with_context(|| {
                format!(
                    "Unable to load '{}', available are: {}",
                    args.rom,
                    roms.file_names().join(", ")
                )
            })
        }
        None => Rom::from_file(&args.rom).with_context(|| format!("Unable to load '{}'", args.rom)),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = load_rom(&args)?;
    let chip = ChipSet::new(rom);

    let mut runner = Runner::new(
        chip,
        TextDisplay::new(),
        ScriptedKeyboard::new(args.frames),
        SilentSound::default(),
        args.config(),
    )?;

    let state = runner.run()?;
    log::info!("Stopped in state {:?}", state);

    let chip = runner.get_chip();
    println!("{}", adapters::render(chip.get_display()));
    if args.dump {
        println!("{}", chip);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["chip8-host", "game.ch8"]).unwrap();
        assert_eq!("game.ch8", args.rom);
        assert_eq!(None, args.archive);
        assert_eq!(600, args.frames);
        assert_eq!(Config::default(), args.config());
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "chip8-host",
            "-s",
            "10",
            "--pixel-outlines",
            "false",
            "-i",
            "7",
            "-v",
            "100",
            "--archive",
            "roms.zip",
            "PONG",
        ])
        .unwrap();

        let config = args.config();
        assert_eq!(10, config.scale);
        assert!(!config.pixel_outlines);
        assert_eq!(7, config.instructions_per_frame);
        assert_eq!(100, config.volume);
        assert_eq!(Some("roms.zip".to_string()), args.archive);
        assert_eq!("PONG", args.rom);
    }

    #[test]
    fn test_missing_rom_file() {
        let args = Args::try_parse_from(["chip8-host", "/does/not/exist.ch8"]).unwrap();
        assert!(load_rom(&args).is_err());
    }
}
