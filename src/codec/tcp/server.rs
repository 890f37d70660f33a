// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus TCP server (slave) specific functions.
use super::*;

/// Decode a TCP request.
///
/// Returns the MBAP header to echo, the [`Message`] for the processor and
/// the location of the consumed bytes.
pub fn decode_request(buf: &[u8]) -> Result<Option<(Header, Message<'_>, FrameLocation)>> {
    if buf.is_empty() {
        return Ok(None);
    }
    let frame = extract_frame(buf).map_err(|err| {
        // Unrecoverable error
        #[cfg(feature = "log")]
        log::error!("Failed to decode request frame: {err}");
        err
    })?;
    let Some((decoded_frame, location)) = frame else {
        return Ok(None);
    };
    let DecodedFrame {
        transaction_id,
        unit_id,
        pdu,
    } = decoded_frame;
    let hdr = Header {
        transaction_id,
        unit_id,
    };
    let message = Message::new(unit_id, pdu)?;
    Ok(Some((hdr, message, location)))
}

/// Encode a TCP response.
pub fn encode_response(hdr: Header, pdu: &ResponsePdu, buf: &mut [u8]) -> Result<usize> {
    if buf.len() < HEADER_LEN {
        return Err(Error::BufferSize);
    }
    BigEndian::write_u16(&mut buf[0..2], hdr.transaction_id);
    BigEndian::write_u16(&mut buf[2..4], 0); //MODBUS Protocol
    buf[6] = hdr.unit_id;
    let len = pdu.encode(&mut buf[HEADER_LEN..])?;
    BigEndian::write_u16(&mut buf[4..6], (len + 1) as u16);

    Ok(len + HEADER_LEN)
}
