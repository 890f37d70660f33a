// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server side request processing.

use crate::{error::*, frame::*, source::*};

type Result<T> = core::result::Result<T, Error>;

/// Request limits of a [`ModbusProcessor`].
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum quantity of coils or discrete inputs per read request.
    pub max_read_bits: Quantity,
    /// Maximum quantity of registers per read request.
    pub max_read_registers: Quantity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_read_bits: MAX_READ_BITS,
            max_read_registers: MAX_READ_REGISTERS,
        }
    }
}

/// Answers Modbus request PDUs from a [`DataSource`].
///
/// The processor has no mutable state and can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct ModbusProcessor {
    config: Config,
}

impl ModbusProcessor {
    /// Create a processor.
    ///
    /// Limits above the protocol maxima are clamped.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let config = Config {
            max_read_bits: config.max_read_bits.min(MAX_READ_BITS),
            max_read_registers: config.max_read_registers.min(MAX_READ_REGISTERS),
        };
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Process a single request.
    ///
    /// Every failure is answered with an exception response:
    ///
    /// - unsupported function code: [`Exception::IllegalFunction`]
    /// - malformed payload, invalid quantity or coil value: [`Exception::IllegalDataValue`]
    /// - address range out of bounds: [`Exception::IllegalDataAddress`]
    /// - any other data source failure: [`Exception::ServerDeviceFailure`]
    pub fn process<D>(&self, source: &mut D, message: &Message<'_>) -> ResponsePdu
    where
        D: DataSource + ?Sized,
    {
        let Message { unit_id, pdu } = *message;
        let Some(fn_code) = FunctionCode::new(pdu.function) else {
            #[cfg(feature = "log")]
            log::warn!(
                "Unit {unit_id}: unsupported function code 0x{:0>2X}",
                pdu.function
            );
            return ExceptionResponse {
                function: pdu.function,
                exception: Exception::IllegalFunction,
            }
            .into();
        };
        match self.dispatch(source, unit_id, fn_code, pdu.payload) {
            Ok(rsp) => rsp.into(),
            Err(err) => {
                let exception = Exception::from(err);
                #[cfg(feature = "log")]
                log::warn!("Unit {unit_id}: function {fn_code} failed: {err} ({exception})");
                ExceptionResponse {
                    function: pdu.function,
                    exception,
                }
                .into()
            }
        }
    }

    /// Process a single request and encode the response PDU into `buf`.
    ///
    /// Only fails if `buf` is too small for the response.
    pub fn process_into<D>(
        &self,
        source: &mut D,
        message: &Message<'_>,
        buf: &mut [u8],
    ) -> Result<usize>
    where
        D: DataSource + ?Sized,
    {
        self.process(source, message).encode(buf)
    }

    fn dispatch<D>(
        &self,
        source: &mut D,
        unit_id: UnitId,
        fn_code: FunctionCode,
        payload: &[u8],
    ) -> Result<Response>
    where
        D: DataSource + ?Sized,
    {
        let req = Request::decode(fn_code, payload)?;
        self.validate(req)?;
        #[cfg(feature = "log")]
        log::debug!("Unit {unit_id}: {req:?}");
        handle(source, unit_id, req)
    }

    fn validate(&self, req: Request) -> Result<()> {
        use Request as R;

        match req {
            R::ReadCoils(address, quantity) | R::ReadDiscreteInputs(address, quantity) => {
                check_range(address, quantity, self.config.max_read_bits)
            }
            R::ReadHoldingRegisters(address, quantity)
            | R::ReadInputRegisters(address, quantity) => {
                check_range(address, quantity, self.config.max_read_registers)
            }
            R::WriteSingleCoil(_, _) | R::WriteSingleRegister(_, _) => Ok(()),
        }
    }
}

fn check_range(address: Address, quantity: Quantity, max_quantity: Quantity) -> Result<()> {
    if quantity == 0 || quantity > max_quantity {
        return Err(Error::Quantity(quantity));
    }
    if u32::from(address) + u32::from(quantity) > 0x1_0000 {
        return Err(Error::AddressRange(address, quantity));
    }
    Ok(())
}

fn handle<D>(source: &mut D, unit_id: UnitId, req: Request) -> Result<Response>
where
    D: DataSource + ?Sized,
{
    use Request as R;

    let rsp = match req {
        R::ReadCoils(address, quantity) => Response::ReadCoils(read_bits(address, quantity, |a| {
            source.get_coil(unit_id, a)
        })?),
        R::ReadDiscreteInputs(address, quantity) => {
            Response::ReadDiscreteInputs(read_bits(address, quantity, |a| {
                source.get_discrete_input(unit_id, a)
            })?)
        }
        R::ReadHoldingRegisters(address, quantity) => {
            Response::ReadHoldingRegisters(read_words(address, quantity, |a| {
                source.get_holding_register(unit_id, a)
            })?)
        }
        R::ReadInputRegisters(address, quantity) => {
            Response::ReadInputRegisters(read_words(address, quantity, |a| {
                source.get_analog_input(unit_id, a)
            })?)
        }
        R::WriteSingleCoil(address, state) => {
            source.set_coil(unit_id, address, state)?;
            Response::WriteSingleCoil(address, state)
        }
        R::WriteSingleRegister(address, word) => {
            source.set_holding_register(unit_id, address, word)?;
            Response::WriteSingleRegister(address, word)
        }
    };
    Ok(rsp)
}

/// Read `[address, address + quantity)` in ascending order.
fn read_bits<F>(address: Address, quantity: Quantity, mut get: F) -> Result<BitStream>
where
    F: FnMut(Address) -> core::result::Result<Coil, DataSourceError>,
{
    let mut bits = BitStream::new();
    for offset in 0..quantity {
        bits.add(get(address + offset)?)?;
    }
    Ok(bits)
}

/// Read `[address, address + quantity)` in ascending order.
fn read_words<F>(address: Address, quantity: Quantity, mut get: F) -> Result<Registers>
where
    F: FnMut(Address) -> core::result::Result<Word, DataSourceError>,
{
    let mut words = Registers::new();
    for offset in 0..quantity {
        words.push(get(address + offset)?)?;
    }
    Ok(words)
}
