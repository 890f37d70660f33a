// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus TCP (MBAP) framing

use super::*;

pub mod server;
pub use crate::frame::tcp::*;

/// Size of the MBAP header including the unit id.
pub const HEADER_LEN: usize = 7;

// [MODBUS MESSAGING ON TCP/IP IMPLEMENTATION GUIDE V1.0b](http://modbus.org/docs/Modbus_Messaging_Implementation_Guide_V1_0b.pdf), page 5
// "The maximum size of a MODBUS PDU is 253 bytes."
pub const MAX_PDU_LEN: usize = 253;

/// An extracted TCP PDU frame.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame<'a> {
    pub transaction_id: TransactionId,
    pub unit_id: UnitId,
    pub pdu: &'a [u8],
}

/// Extract a PDU frame out of the beginning of `buf`.
///
/// The PDU length is taken from the MBAP length field, so frames of
/// unsupported functions can still be answered. Returns `Ok(None)` if
/// the frame is incomplete.
pub fn extract_frame(buf: &[u8]) -> Result<Option<(DecodedFrame<'_>, FrameLocation)>> {
    if buf.len() < HEADER_LEN {
        // Incomplete header
        return Ok(None);
    }
    let (header, rest) = buf.split_at(HEADER_LEN);
    let transaction_id = BigEndian::read_u16(&header[0..2]);
    let protocol_id = BigEndian::read_u16(&header[2..4]);
    if protocol_id != 0 {
        return Err(Error::ProtocolNotModbus(protocol_id));
    }
    let m_length = BigEndian::read_u16(&header[4..6]) as usize;
    if m_length < 2 || m_length > MAX_PDU_LEN + 1 {
        // The length covers the unit id and at least the function code.
        return Err(Error::FrameLength(m_length));
    }
    let pdu_len = m_length - 1;
    if rest.len() < pdu_len {
        // Incomplete frame
        return Ok(None);
    }
    let frame = DecodedFrame {
        transaction_id,
        unit_id: header[6],
        pdu: &rest[..pdu_len],
    };
    let location = FrameLocation {
        start: 0,
        size: HEADER_LEN + pdu_len,
    };
    Ok(Some((frame, location)))
}
