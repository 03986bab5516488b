/*!
 * Cartridge header classification. Produces a read-only descriptor for whoever builds the memory
 * bus; the CPU never looks at it.
 */

use std::fmt::Display;

use log::*;
use strum_macros::AsRefStr;

const TITLE_START: usize = 0x0134;
const TITLE_END: usize = 0x0143;
const CARTRIDGE_TYPE_ADDRESS: usize = 0x0147;
const ROM_SIZE_ADDRESS: usize = 0x0148;
const RAM_SIZE_ADDRESS: usize = 0x0149;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartridgeError {
    /// The image ends before the header does.
    HeaderTooShort(usize),
    InvalidMbc(u8),
    InvalidRomSize(u8),
    InvalidRamSize(u8),
}

impl Display for CartridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartridgeError::HeaderTooShort(len) => {
                write!(f, "image of {:#x} bytes is too short for a cartridge header", len)
            }
            CartridgeError::InvalidMbc(byte) => write!(f, "unknown cartridge type {:#04x}", byte),
            CartridgeError::InvalidRomSize(byte) => write!(f, "unknown rom size code {:#04x}", byte),
            CartridgeError::InvalidRamSize(byte) => write!(f, "unknown ram size code {:#04x}", byte),
        }
    }
}

impl std::error::Error for CartridgeError {}

/// Memory bank controller named by header byte 0x0147.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum MbcType {
    RomOnly,
    Mbc1,
    Mbc1Ram,
    Mbc1RamBattery,
    Mbc2,
    Mbc2Battery,
    RomRam,
    RomRamBattery,
    Mmm01,
    Mmm01Ram,
    Mmm01RamBattery,
    Mbc3TimerBattery,
    Mbc3TimerRamBattery,
    Mbc3,
    Mbc3Ram,
    Mbc3RamBattery,
    Mbc5,
    Mbc5Ram,
    Mbc5RamBattery,
    Mbc5Rumble,
    Mbc5RumbleRam,
    Mbc5RumbleRamBattery,
    Mbc6,
    Mbc7SensorRumbleRamBattery,
    PocketCamera,
    BandaiTama5,
    HuC3,
    HuC1RamBattery,
}

impl TryFrom<u8> for MbcType {
    type Error = CartridgeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        let mbc_type = match byte {
            0x00 => MbcType::RomOnly,
            0x01 => MbcType::Mbc1,
            0x02 => MbcType::Mbc1Ram,
            0x03 => MbcType::Mbc1RamBattery,
            0x05 => MbcType::Mbc2,
            0x06 => MbcType::Mbc2Battery,
            0x08 => MbcType::RomRam,
            0x09 => MbcType::RomRamBattery,
            0x0b => MbcType::Mmm01,
            0x0c => MbcType::Mmm01Ram,
            0x0d => MbcType::Mmm01RamBattery,
            0x0f => MbcType::Mbc3TimerBattery,
            0x10 => MbcType::Mbc3TimerRamBattery,
            0x11 => MbcType::Mbc3,
            0x12 => MbcType::Mbc3Ram,
            0x13 => MbcType::Mbc3RamBattery,
            0x19 => MbcType::Mbc5,
            0x1a => MbcType::Mbc5Ram,
            0x1b => MbcType::Mbc5RamBattery,
            0x1c => MbcType::Mbc5Rumble,
            0x1d => MbcType::Mbc5RumbleRam,
            0x1e => MbcType::Mbc5RumbleRamBattery,
            0x20 => MbcType::Mbc6,
            0x22 => MbcType::Mbc7SensorRumbleRamBattery,
            0xfc => MbcType::PocketCamera,
            0xfd => MbcType::BandaiTama5,
            0xfe => MbcType::HuC3,
            0xff => MbcType::HuC1RamBattery,
            _ => return Err(CartridgeError::InvalidMbc(byte)),
        };
        Ok(mbc_type)
    }
}

/// Examines the header to get the number of 16 KiB rom banks.
fn get_rom_banks(byte: u8) -> Result<u32, CartridgeError> {
    match byte {
        0..=8 => Ok(2 << byte),
        _ => Err(CartridgeError::InvalidRomSize(byte)),
    }
}

/// Examines the header to get the size of the ram located on the cartridge.
fn get_ram_size(byte: u8) -> Result<usize, CartridgeError> {
    match byte {
        0 => Ok(0),
        1 => Ok(2 * 1024),
        2 => Ok(8 * 1024),
        3 => Ok(32 * 1024),
        4 => Ok(128 * 1024),
        5 => Ok(64 * 1024),
        _ => Err(CartridgeError::InvalidRamSize(byte)),
    }
}

/// Reads bytes 0x134 ..= 0x143 into a string, or `None` if they are not ASCII.
fn get_title(data: &[u8]) -> Option<String> {
    let bytes = &data[TITLE_START..=TITLE_END];
    if !bytes.is_ascii() {
        return None;
    }
    let title: String = bytes.iter().map(|byte| char::from(*byte)).collect();
    Some(title.trim_end_matches('\0').to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeDescriptor {
    pub mbc_type: MbcType,
    pub rom_banks: u32,
    pub ram_size: usize,
    pub name: String,
}

impl CartridgeDescriptor {
    /// Classifies a rom image by its header. `fallback_name` (usually the file name) is used when
    /// the title field is not ASCII.
    pub fn from_header(data: &[u8], fallback_name: &str) -> Result<Self, CartridgeError> {
        if data.len() <= RAM_SIZE_ADDRESS {
            return Err(CartridgeError::HeaderTooShort(data.len()));
        }

        debug!("cartridge type byte: {:#x}", data[CARTRIDGE_TYPE_ADDRESS]);
        let mbc_type = MbcType::try_from(data[CARTRIDGE_TYPE_ADDRESS])?;
        let rom_banks = get_rom_banks(data[ROM_SIZE_ADDRESS])?;
        let ram_size = get_ram_size(data[RAM_SIZE_ADDRESS])?;
        let name = get_title(data).unwrap_or_else(|| {
            warn!("cartridge title is not ascii, using {}", fallback_name);
            fallback_name.to_string()
        });

        Ok(Self {
            mbc_type,
            rom_banks,
            ram_size,
            name,
        })
    }

    pub fn rom_size(&self) -> usize {
        self.rom_banks as usize * 0x4000
    }
}

impl Display for CartridgeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "mbc: {}", self.mbc_type.as_ref())?;
        writeln!(f, "rom banks: {} ({:#x} bytes)", self.rom_banks, self.rom_size())?;
        writeln!(f, "ram size: {:#x} bytes", self.ram_size)
    }
}
