// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{error::*, frame::*, util::*};
use byteorder::{BigEndian, ByteOrder};

#[cfg(feature = "tcp")]
pub mod tcp;

type Result<T> = core::result::Result<T, Error>;

impl From<ExceptionResponse> for [u8; 2] {
    fn from(ex: ExceptionResponse) -> [u8; 2] {
        [ex.function | 0x80, ex.exception as u8]
    }
}

impl<'r> TryFrom<&'r [u8]> for Pdu<'r> {
    type Error = Error;

    fn try_from(bytes: &'r [u8]) -> Result<Self> {
        let Some((&function, payload)) = bytes.split_first() else {
            return Err(Error::BufferSize);
        };
        Ok(Pdu { function, payload })
    }
}

impl Request {
    /// Decode the request payload of `fn_code` according to its layout.
    ///
    /// The payload must have exactly the length of the layout.
    pub fn decode(fn_code: FunctionCode, payload: &[u8]) -> Result<Self> {
        let expected = fn_code.layout().payload_len();
        if payload.len() != expected {
            return Err(Error::LengthMismatch(expected, payload.len()));
        }
        let addr = BigEndian::read_u16(&payload[0..2]);
        let word = BigEndian::read_u16(&payload[2..4]);

        use FunctionCode as f;
        let req = match fn_code {
            f::ReadCoils => Self::ReadCoils(addr, word),
            f::ReadDiscreteInputs => Self::ReadDiscreteInputs(addr, word),
            f::ReadHoldingRegisters => Self::ReadHoldingRegisters(addr, word),
            f::ReadInputRegisters => Self::ReadInputRegisters(addr, word),
            f::WriteSingleCoil => Self::WriteSingleCoil(addr, u16_coil_to_bool(word)?),
            f::WriteSingleRegister => Self::WriteSingleRegister(addr, word),
        };
        Ok(req)
    }
}

impl Response {
    /// Encode the PDU into `buf` and return the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let len = self.pdu_len();
        if buf.len() < len {
            return Err(Error::BufferSize);
        }
        buf[0] = FunctionCode::from(self).value();
        match self {
            Self::ReadCoils(bits) | Self::ReadDiscreteInputs(bits) => {
                buf[1] = bits.byte_count();
                buf[2..len].copy_from_slice(bits.to_bytes());
            }
            Self::ReadHoldingRegisters(words) | Self::ReadInputRegisters(words) => {
                buf[1] = words.byte_count();
                buf[2..len].copy_from_slice(words.payload());
            }
            Self::WriteSingleCoil(address, state) => {
                BigEndian::write_u16(&mut buf[1..3], *address);
                BigEndian::write_u16(&mut buf[3..5], bool_to_u16_coil(*state));
            }
            Self::WriteSingleRegister(address, word) => {
                BigEndian::write_u16(&mut buf[1..3], *address);
                BigEndian::write_u16(&mut buf[3..5], *word);
            }
        }
        Ok(len)
    }
}

impl ResponsePdu {
    /// Encode the PDU into `buf` and return the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        match &self.0 {
            Ok(rsp) => rsp.encode(buf),
            Err(ex) => {
                if buf.len() < 2 {
                    return Err(Error::BufferSize);
                }
                let bytes: [u8; 2] = (*ex).into();
                buf[..2].copy_from_slice(&bytes);
                Ok(2)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exception_response_into_bytes() {
        let bytes: [u8; 2] = ExceptionResponse {
            function: 0x03,
            exception: Exception::IllegalDataAddress,
        }
        .into();
        assert_eq!(bytes, [0x83, 0x02]);

        let bytes: [u8; 2] = ExceptionResponse {
            function: 0x09,
            exception: Exception::IllegalFunction,
        }
        .into();
        assert_eq!(bytes, [0x89, 0x01]);
    }

    mod deserialize_requests {
        use super::*;

        #[test]
        fn empty_pdu() {
            let data: &[u8] = &[];
            assert_eq!(Pdu::try_from(data).err().unwrap(), Error::BufferSize);
        }

        #[test]
        fn split_function_code() {
            let data: &[u8] = &[0x09, 0x00, 0x00, 0x00, 0x01];
            let pdu = Pdu::try_from(data).unwrap();
            assert_eq!(pdu.function, 0x09);
            assert_eq!(pdu.payload, &[0x00, 0x00, 0x00, 0x01]);
        }

        #[test]
        fn read_coils() {
            assert_eq!(
                Request::decode(FunctionCode::ReadCoils, &[]).err().unwrap(),
                Error::LengthMismatch(4, 0)
            );
            let payload: &[u8] = &[0x0, 0x0, 0x22];
            assert_eq!(
                Request::decode(FunctionCode::ReadCoils, payload).err().unwrap(),
                Error::LengthMismatch(4, 3)
            );

            let payload: &[u8] = &[0x00, 0x12, 0x0, 0x4];
            let req = Request::decode(FunctionCode::ReadCoils, payload).unwrap();
            assert_eq!(req, Request::ReadCoils(0x12, 4));
        }

        #[test]
        fn trailing_bytes() {
            let payload: &[u8] = &[0x00, 0x12, 0x00, 0x04, 0x00];
            assert_eq!(
                Request::decode(FunctionCode::ReadCoils, payload)
                    .err()
                    .unwrap(),
                Error::LengthMismatch(4, 5)
            );
        }

        #[test]
        fn read_discrete_inputs() {
            let payload: &[u8] = &[0x00, 0x03, 0x00, 19];
            let req = Request::decode(FunctionCode::ReadDiscreteInputs, payload).unwrap();
            assert_eq!(req, Request::ReadDiscreteInputs(0x03, 19));
        }

        #[test]
        fn read_holding_registers() {
            let payload: &[u8] = &[0x00, 0x09, 0x00, 0x4D];
            let req = Request::decode(FunctionCode::ReadHoldingRegisters, payload).unwrap();
            assert_eq!(req, Request::ReadHoldingRegisters(0x09, 77));
        }

        #[test]
        fn read_input_registers() {
            let payload: &[u8] = &[0x00, 0x09, 0x00, 0x4D];
            let req = Request::decode(FunctionCode::ReadInputRegisters, payload).unwrap();
            assert_eq!(req, Request::ReadInputRegisters(0x09, 77));
        }

        #[test]
        fn write_single_coil() {
            let payload: &[u8] = &[0x12, 0x34, 0xFF, 0x00];
            let req = Request::decode(FunctionCode::WriteSingleCoil, payload).unwrap();
            assert_eq!(req, Request::WriteSingleCoil(0x1234, true));

            let payload: &[u8] = &[0x12, 0x34, 0x00, 0x00];
            let req = Request::decode(FunctionCode::WriteSingleCoil, payload).unwrap();
            assert_eq!(req, Request::WriteSingleCoil(0x1234, false));

            let payload: &[u8] = &[0x12, 0x34, 0x00, 0x01];
            assert_eq!(
                Request::decode(FunctionCode::WriteSingleCoil, payload)
                    .err()
                    .unwrap(),
                Error::CoilValue(0x0001)
            );
        }

        #[test]
        fn write_single_register() {
            let payload: &[u8] = &[0x00, 0x07, 0xAB, 0xCD];
            let req = Request::decode(FunctionCode::WriteSingleRegister, payload).unwrap();
            assert_eq!(req, Request::WriteSingleRegister(0x07, 0xABCD));
        }
    }

    mod serialize_responses {
        use super::*;

        #[test]
        fn read_coils() {
            let bits = BitStream::from_bools(&[true, false, true]).unwrap();
            let buf = &mut [0; 8];
            let len = Response::ReadCoils(bits).encode(buf).unwrap();
            assert_eq!(&buf[..len], &[0x01, 0x01, 0x05]);
        }

        #[test]
        fn read_discrete_inputs() {
            let bits = BitStream::from_bools(&[false; 9]).unwrap();
            let buf = &mut [0xFF; 8];
            let len = Response::ReadDiscreteInputs(bits).encode(buf).unwrap();
            assert_eq!(&buf[..len], &[0x02, 0x02, 0x00, 0x00]);
        }

        #[test]
        fn read_holding_registers() {
            let words = Registers::from_words(&[0xAA00, 0x1111]).unwrap();
            let buf = &mut [0; 8];
            let len = Response::ReadHoldingRegisters(words).encode(buf).unwrap();
            assert_eq!(&buf[..len], &[0x03, 0x04, 0xAA, 0x00, 0x11, 0x11]);
        }

        #[test]
        fn read_input_registers() {
            let words = Registers::from_words(&[0x1234]).unwrap();
            let buf = &mut [0; 4];
            let len = Response::ReadInputRegisters(words).encode(buf).unwrap();
            assert_eq!(&buf[..len], &[0x04, 0x02, 0x12, 0x34]);
        }

        #[test]
        fn write_single_coil() {
            let buf = &mut [0; 5];
            let len = Response::WriteSingleCoil(0x0033, true).encode(buf).unwrap();
            assert_eq!(&buf[..len], &[0x05, 0x00, 0x33, 0xFF, 0x00]);
            let len = Response::WriteSingleCoil(0x0033, false).encode(buf).unwrap();
            assert_eq!(&buf[..len], &[0x05, 0x00, 0x33, 0x00, 0x00]);
        }

        #[test]
        fn write_single_register() {
            let buf = &mut [0; 5];
            let len = Response::WriteSingleRegister(0x07, 0xABCD)
                .encode(buf)
                .unwrap();
            assert_eq!(&buf[..len], &[0x06, 0x00, 0x07, 0xAB, 0xCD]);
        }

        #[test]
        fn exception() {
            let rsp = ResponsePdu(Err(ExceptionResponse {
                function: 0x09,
                exception: Exception::IllegalFunction,
            }));
            let buf = &mut [0; 2];
            assert_eq!(rsp.encode(buf).unwrap(), 2);
            assert_eq!(buf, &[0x89, 0x01]);
            assert_eq!(rsp.encode(&mut [0]).err().unwrap(), Error::BufferSize);
        }

        #[test]
        fn buffer_too_small() {
            let buf = &mut [0; 4];
            assert_eq!(
                Response::WriteSingleRegister(0x07, 0xABCD)
                    .encode(buf)
                    .err()
                    .unwrap(),
                Error::BufferSize
            );
        }
    }
}
