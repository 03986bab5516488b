use std::error::Error as StdError;

use crate::component::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The byte at `address` has no defined behaviour in the base table. The CB table is total
    /// and never produces this.
    DecodeError { opcode: u8, address: Address },
    BusFault {
        address: Address,
        source: Option<String>,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> core::result::Result<(), std::fmt::Error> {
        match self {
            Error::DecodeError { opcode, address } => {
                write!(f, "DecodeError: no entry for {:#04x} at {:#06x}", opcode, address)
            }
            Error::BusFault { address, source } => {
                if let Some(source) = source {
                    write!(f, "BusFault at {:#06x} from {}", address, source)
                } else {
                    write!(f, "BusFault at {:#06x}", address)
                }
            }
        }
    }
}

impl StdError for Error {}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn decode(opcode: u8, address: Address) -> Self {
        Error::DecodeError { opcode, address }
    }

    pub fn from_address(address: Address) -> Self {
        Error::BusFault {
            address,
            source: None,
        }
    }

    pub fn from_address_with_source(address: Address, source: String) -> Self {
        Error::BusFault {
            address,
            source: Some(source),
        }
    }
}
