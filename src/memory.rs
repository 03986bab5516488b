/*!
 * A flat memory bus: every address maps straight onto a byte vector with no banking or
 * memory-mapped peripherals. Enough to run CPU tests and simple test ROMs.
 */

use crate::component::{Address, Addressable};
use crate::error::{Error, Result};

const SERIAL_DATA_ADDRESS: Address = 0xff01;
const SERIAL_CONTROL_ADDRESS: Address = 0xff02;
const SERIAL_TRANSFER_START: u8 = 0x81;

#[derive(Debug, Clone)]
pub struct MemoryBus {
    data: Vec<u8>,
    serial_port_data: Vec<u8>,
}

impl MemoryBus {
    /// A bus covering the full 64 KiB address space.
    pub fn new() -> Self {
        Self::with_size(0x10000)
    }

    /// A bus covering addresses `0..size`. Accesses past the end are bus faults.
    pub fn with_size(size: usize) -> Self {
        Self {
            data: vec![0; size.min(0x10000)],
            serial_port_data: Vec::new(),
        }
    }

    /// Copies `bytes` in starting at `address`. Bytes that do not fit are dropped.
    pub fn load(&mut self, address: Address, bytes: &[u8]) {
        let start = usize::from(address).min(self.data.len());
        let end = (start + bytes.len()).min(self.data.len());
        self.data[start..end].copy_from_slice(&bytes[..end - start]);
    }

    /// Bytes sent through the serial port so far.
    pub fn get_serial_port_data(&self) -> &[u8] {
        &self.serial_port_data
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Addressable for MemoryBus {
    fn read_u8(&mut self, address: Address) -> Result<u8> {
        self.data
            .get(usize::from(address))
            .copied()
            .ok_or_else(|| Error::from_address(address))
    }

    fn write_u8(&mut self, address: Address, value: u8) -> Result<()> {
        if address == SERIAL_CONTROL_ADDRESS && value == SERIAL_TRANSFER_START {
            let byte = self.read_u8(SERIAL_DATA_ADDRESS)?;
            self.serial_port_data.push(byte);
        }

        match self.data.get_mut(usize::from(address)) {
            Some(entry) => {
                *entry = value;
                Ok(())
            }
            None => Err(Error::from_address(address)),
        }
    }
}
