// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

mod coils;
mod data;
#[cfg(feature = "tcp")]
pub(crate) mod tcp;

pub use self::{coils::*, data::*};

/// Maximum quantity of coils or discrete inputs per read request.
pub const MAX_READ_BITS: u16 = 2000;

/// Maximum quantity of registers per read request.
pub const MAX_READ_REGISTERS: u16 = 125;

/// The location of all bytes that belong to the frame.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLocation {
    /// The index where the frame starts
    pub start: usize,
    /// Number of bytes that belong to the frame
    pub size: usize,
}

impl FrameLocation {
    /// One past the last byte of the frame.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.size
    }
}

/// A supported Modbus function code.
///
/// Only the basic bit and register access functions are served. Any other
/// code is answered with [`Exception::IllegalFunction`].
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCode {
    /// Modbus Function Code: `01` (`0x01`).
    ReadCoils,

    /// Modbus Function Code: `02` (`0x02`).
    ReadDiscreteInputs,

    /// Modbus Function Code: `03` (`0x03`).
    ReadHoldingRegisters,

    /// Modbus Function Code: `04` (`0x04`).
    ReadInputRegisters,

    /// Modbus Function Code: `05` (`0x05`).
    WriteSingleCoil,

    /// Modbus Function Code: `06` (`0x06`).
    WriteSingleRegister,
}

impl FunctionCode {
    /// Look up the [`FunctionCode`] for `value`.
    ///
    /// Returns `None` if the code is not served.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        let code = match value {
            0x01 => Self::ReadCoils,
            0x02 => Self::ReadDiscreteInputs,
            0x03 => Self::ReadHoldingRegisters,
            0x04 => Self::ReadInputRegisters,
            0x05 => Self::WriteSingleCoil,
            0x06 => Self::WriteSingleRegister,
            _ => return None,
        };
        Some(code)
    }

    /// Get the [`u8`] value of the current [`FunctionCode`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::ReadCoils => 0x01,
            Self::ReadDiscreteInputs => 0x02,
            Self::ReadHoldingRegisters => 0x03,
            Self::ReadInputRegisters => 0x04,
            Self::WriteSingleCoil => 0x05,
            Self::WriteSingleRegister => 0x06,
        }
    }

    /// Binary layout of the request payload.
    #[must_use]
    pub const fn layout(self) -> RequestLayout {
        match self {
            Self::ReadCoils
            | Self::ReadDiscreteInputs
            | Self::ReadHoldingRegisters
            | Self::ReadInputRegisters => RequestLayout::AddressQuantity,
            Self::WriteSingleCoil | Self::WriteSingleRegister => RequestLayout::AddressValue,
        }
    }
}

impl From<FunctionCode> for u8 {
    fn from(code: FunctionCode) -> Self {
        code.value()
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}

/// Request payload layout (everything after the function code).
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestLayout {
    /// `address: u16be, quantity: u16be`
    AddressQuantity,
    /// `address: u16be, value: u16be`
    AddressValue,
}

impl RequestLayout {
    /// Number of payload bytes.
    #[must_use]
    pub const fn payload_len(self) -> usize {
        match self {
            Self::AddressQuantity | Self::AddressValue => 4,
        }
    }
}

/// Unit (slave) identifier of the addressed sub-device.
pub type UnitId = u8;

/// A Modbus address is represented by 16 bit (from `0` to `65535`).
pub type Address = u16;

/// A Coil represents a single bit.
///
/// - `true` is equivalent to `ON`, `1` and `0xFF00`.
/// - `false` is equivalent to `OFF`, `0` and `0x0000`.
pub type Coil = bool;

/// Modbus uses 16 bit for its data items (big-endian representation).
pub type Word = u16;

/// Number of items to process (`0` - `65535`).
pub type Quantity = u16;

/// A raw request PDU: function code plus undecoded payload.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pdu<'r> {
    pub function: u8,
    pub payload: &'r [u8],
}

/// An inbound request as isolated by the transport layer.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<'r> {
    pub unit_id: UnitId,
    pub pdu: Pdu<'r>,
}

impl<'r> Message<'r> {
    /// Create a message from a unit id and raw PDU bytes.
    pub fn new(unit_id: UnitId, pdu: &'r [u8]) -> Result<Self, crate::Error> {
        let pdu = Pdu::try_from(pdu)?;
        Ok(Self { unit_id, pdu })
    }
}

/// A decoded request of one of the supported functions.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    ReadCoils(Address, Quantity),
    ReadDiscreteInputs(Address, Quantity),
    ReadHoldingRegisters(Address, Quantity),
    ReadInputRegisters(Address, Quantity),
    WriteSingleCoil(Address, Coil),
    WriteSingleRegister(Address, Word),
}

/// The response data of a successful request.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    ReadCoils(BitStream),
    ReadDiscreteInputs(BitStream),
    ReadHoldingRegisters(Registers),
    ReadInputRegisters(Registers),
    WriteSingleCoil(Address, Coil),
    WriteSingleRegister(Address, Word),
}

impl From<&Response> for FunctionCode {
    fn from(r: &Response) -> Self {
        use Response as R;

        match r {
            R::ReadCoils(_) => Self::ReadCoils,
            R::ReadDiscreteInputs(_) => Self::ReadDiscreteInputs,
            R::ReadHoldingRegisters(_) => Self::ReadHoldingRegisters,
            R::ReadInputRegisters(_) => Self::ReadInputRegisters,
            R::WriteSingleCoil(_, _) => Self::WriteSingleCoil,
            R::WriteSingleRegister(_, _) => Self::WriteSingleRegister,
        }
    }
}

/// A server (slave) exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exception {
    IllegalFunction = 0x01,
    IllegalDataAddress = 0x02,
    IllegalDataValue = 0x03,
    ServerDeviceFailure = 0x04,
}

impl Exception {
    const fn get_name(self) -> &'static str {
        match self {
            Self::IllegalFunction => "Illegal function",
            Self::IllegalDataAddress => "Illegal data address",
            Self::IllegalDataValue => "Illegal data value",
            Self::ServerDeviceFailure => "Server device failure",
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

#[cfg(all(feature = "defmt", target_os = "none"))]
impl defmt::Format for Exception {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.get_name())
    }
}

/// A server (slave) exception response.
///
/// `function` is the raw request code without the exception bit, so that
/// unsupported codes can be echoed as well.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionResponse {
    pub function: u8,
    pub exception: Exception,
}

/// Represents a message from the server (slave) to the client (master).
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePdu(pub Result<Response, ExceptionResponse>);

impl From<Response> for ResponsePdu {
    fn from(rsp: Response) -> Self {
        Self(Ok(rsp))
    }
}

impl From<ExceptionResponse> for ResponsePdu {
    fn from(ex: ExceptionResponse) -> Self {
        Self(Err(ex))
    }
}

impl Response {
    /// Number of bytes required for a serialized PDU frame.
    #[must_use]
    pub const fn pdu_len(&self) -> usize {
        match self {
            Self::ReadCoils(bits) | Self::ReadDiscreteInputs(bits) => 2 + bits.packed_len(),
            Self::ReadHoldingRegisters(words) | Self::ReadInputRegisters(words) => {
                2 + words.len() * 2
            }
            Self::WriteSingleCoil(_, _) | Self::WriteSingleRegister(_, _) => 5,
        }
    }
}

impl ResponsePdu {
    /// Number of bytes required for a serialized PDU frame.
    #[must_use]
    pub const fn pdu_len(&self) -> usize {
        match &self.0 {
            Ok(rsp) => rsp.pdu_len(),
            Err(_) => 2,
        }
    }

    /// Function code byte the response starts with.
    #[must_use]
    pub fn function(&self) -> u8 {
        match &self.0 {
            Ok(rsp) => FunctionCode::from(rsp).value(),
            Err(ex) => ex.function | 0x80,
        }
    }
}
