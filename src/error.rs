// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

use crate::{frame::Exception, source::DataSourceError};

/// modbus-server-core Error
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Invalid coil value
    CoilValue(u16),
    /// Invalid buffer size
    BufferSize,
    /// Unsupported function code
    FnCode(u8),
    /// Quantity outside of the allowed range
    Quantity(u16),
    /// Address range `(start, quantity)` exceeds the 16 bit address space
    AddressRange(u16, u16),
    /// Length Mismatch `(expected, actual)`
    LengthMismatch(usize, usize),
    /// Protocol not Modbus
    ProtocolNotModbus(u16),
    /// MBAP length field outside of `2..=254`
    FrameLength(usize),
    /// The data source rejected the access
    DataSource(DataSourceError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match self {
            CoilValue(v) => write!(f, "Invalid coil value: 0x{v:0>4X}"),
            BufferSize => write!(f, "Invalid buffer size"),
            FnCode(fn_code) => write!(f, "Unsupported function code: 0x{fn_code:0>2X}"),
            Quantity(quantity) => write!(f, "Invalid quantity: {quantity}"),
            AddressRange(start, quantity) => write!(
                f,
                "Address range out of bounds: start = {start}, quantity = {quantity}"
            ),
            LengthMismatch(expected, actual) => write!(
                f,
                "Length Mismatch: expected {expected} byte(s), got {actual}"
            ),
            ProtocolNotModbus(protocol_id) => {
                write!(f, "Protocol not Modbus(0), received {protocol_id} instead")
            }
            FrameLength(len) => write!(f, "Invalid MBAP length field: {len}"),
            DataSource(err) => write!(f, "Data source: {err}"),
        }
    }
}

impl From<DataSourceError> for Error {
    fn from(err: DataSourceError) -> Self {
        Self::DataSource(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<Error> for Exception {
    fn from(err: Error) -> Self {
        use Error as E;

        match err {
            E::FnCode(_) => Self::IllegalFunction,
            E::CoilValue(_) | E::Quantity(_) | E::LengthMismatch(_, _) => Self::IllegalDataValue,
            E::AddressRange(_, _) | E::DataSource(DataSourceError::AddressOutOfRange(_)) => {
                Self::IllegalDataAddress
            }
            E::DataSource(DataSourceError::DeviceFailure)
            | E::BufferSize
            | E::ProtocolNotModbus(_)
            | E::FrameLength(_) => Self::ServerDeviceFailure,
        }
    }
}
