//! Loading of program images, either from raw bytes, a file on disk or a zip
//! archive containing multiple roms.
use std::{
    fs,
    io::{prelude::*, Cursor},
    path::Path,
};
use zip::read::ZipArchive;

use crate::{definitions::cpu, LoadError};

/// Represents an archive of roms
/// it contains all kind of information about the information of the archives
pub struct RomArchives<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> RomArchives<'a> {
    /// Will open the given zip archive data
    pub fn new(data: &'a [u8]) -> Result<Self, LoadError> {
        Ok(RomArchives {
            archive: ZipArchive::new(Cursor::new(data))?,
        })
    }

    /// Will return all the rom names available to be chosen
    pub fn file_names(&self) -> Vec<&'_ str> {
        self.archive.file_names().collect()
    }

    // Will decompress the information from the zip archive
    pub fn get_file_data(&mut self, name: &str) -> Result<Rom, LoadError> {
        let mut file = self.archive.by_name(name)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        Rom::new(name, data)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Represents a single rom with it's information
pub struct Rom {
    /// The rom name
    name: String,
    /// The raw program image, loaded verbatim at the program start
    data: Box<[u8]>,
}

impl Rom {
    /// Will generate a new rom based of the given data, fails if the
    /// data does not fit into the program memory.
    pub fn new<D: Into<Vec<u8>>>(name: &str, data: D) -> Result<Self, LoadError> {
        let data = data.into();
        if data.len() > cpu::PROGRAM_MAX_SIZE {
            return Err(LoadError::ProgramTooLarge {
                size: data.len(),
                max: cpu::PROGRAM_MAX_SIZE,
            });
        }

        Ok(Rom {
            name: name.to_string(),
            data: data.into_boxed_slice(),
        })
    }

    /// Will read the rom from the given file, the file name is used as the rom name.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::debug!("Loaded rom '{}' with {} bytes", name, data.len());
        Rom::new(&name, data)
    }

    /// Will return a slice internal values of the given data
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{build_opcode, Opcode};
    use std::io::Write;
    use zip::{write::FileOptions, CompressionMethod, ZipWriter};

    const RAW_ROM_DATA: [Opcode; 8] = [
        0x00E0, 0x6C00, 0x4C00, 0x6E0F, 0xA203, 0x6020, 0xF055, 0x00E0,
    ];

    const ROM_NAMES: [&str; 2] = ["MAZE", "PONG"];

    fn rom_bytes() -> Vec<u8> {
        RAW_ROM_DATA.iter().flat_map(|op| op.to_be_bytes()).collect()
    }

    fn build_archive() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        for name in ROM_NAMES.iter() {
            writer.start_file(*name, options).unwrap();
            writer.write_all(&rom_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_rom_extract() {
        let archive = build_archive();
        let mut ra = RomArchives::new(&archive).unwrap();
        let rom = ra.get_file_data(ROM_NAMES[0]).unwrap();
        let data = rom.get_data();

        assert_eq!(ROM_NAMES[0], rom.get_name());
        assert_eq!(RAW_ROM_DATA.len() * 2, data.len());
        for i in (0..data.len()).step_by(2) {
            let opcode = build_opcode(data, i).unwrap();
            assert_eq!(RAW_ROM_DATA[i / 2], opcode);
        }
    }

    #[test]
    fn test_file_names() {
        let archive = build_archive();
        let ra = RomArchives::new(&archive).unwrap();
        let mut files = ra.file_names();
        files.sort_unstable();

        assert_eq!(&ROM_NAMES, &files[..]);
    }

    #[test]
    fn test_missing_rom_in_archive() {
        let archive = build_archive();
        let mut ra = RomArchives::new(&archive).unwrap();
        assert!(matches!(
            ra.get_file_data("TETRIS"),
            Err(LoadError::Archive(_))
        ));
    }

    #[test]
    fn test_rom_size_limit() {
        assert!(Rom::new("full", vec![0xAA; cpu::PROGRAM_MAX_SIZE]).is_ok());

        let err = Rom::new("too large", vec![0xAA; cpu::PROGRAM_MAX_SIZE + 1]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ProgramTooLarge {
                size: 3585,
                max: 3584
            }
        ));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("chip8-vm-{}.ch8", std::process::id()));
        fs::write(&path, rom_bytes()).unwrap();

        let rom = Rom::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(&rom_bytes()[..], rom.get_data());
        assert!(rom.get_name().ends_with(".ch8"));
    }

    #[test]
    fn test_from_missing_file() {
        let err = Rom::from_file("/this/rom/does/not/exist.ch8").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
