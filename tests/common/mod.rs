// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

use std::collections::HashMap;

use modbus_server_core::{Address, Coil, DataSource, DataSourceError, UnitId, Word};

/// A data source access recorded by [`MemorySource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    GetCoil(UnitId, Address),
    SetCoil(UnitId, Address, Coil),
    GetDiscreteInput(UnitId, Address),
    GetHoldingRegister(UnitId, Address),
    SetHoldingRegister(UnitId, Address, Word),
    GetAnalogInput(UnitId, Address),
}

/// In-memory data source where every address below `size` is mapped.
///
/// Unset values read as `false` / `0`.
#[derive(Debug, Default)]
pub struct MemorySource {
    pub size: u32,
    pub coils: HashMap<(UnitId, Address), Coil>,
    pub discrete_inputs: HashMap<(UnitId, Address), Coil>,
    pub holding_registers: HashMap<(UnitId, Address), Word>,
    pub input_registers: HashMap<(UnitId, Address), Word>,
    pub log: Vec<Access>,
}

impl MemorySource {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    fn check(&self, address: Address) -> Result<(), DataSourceError> {
        if u32::from(address) >= self.size {
            return Err(DataSourceError::AddressOutOfRange(address));
        }
        Ok(())
    }
}

impl DataSource for MemorySource {
    fn get_coil(&mut self, unit_id: UnitId, address: Address) -> Result<Coil, DataSourceError> {
        self.log.push(Access::GetCoil(unit_id, address));
        self.check(address)?;
        Ok(self.coils.get(&(unit_id, address)).copied().unwrap_or_default())
    }

    fn set_coil(
        &mut self,
        unit_id: UnitId,
        address: Address,
        value: Coil,
    ) -> Result<(), DataSourceError> {
        self.log.push(Access::SetCoil(unit_id, address, value));
        self.check(address)?;
        self.coils.insert((unit_id, address), value);
        Ok(())
    }

    fn get_discrete_input(
        &mut self,
        unit_id: UnitId,
        address: Address,
    ) -> Result<Coil, DataSourceError> {
        self.log.push(Access::GetDiscreteInput(unit_id, address));
        self.check(address)?;
        Ok(self
            .discrete_inputs
            .get(&(unit_id, address))
            .copied()
            .unwrap_or_default())
    }

    fn get_holding_register(
        &mut self,
        unit_id: UnitId,
        address: Address,
    ) -> Result<Word, DataSourceError> {
        self.log.push(Access::GetHoldingRegister(unit_id, address));
        self.check(address)?;
        Ok(self
            .holding_registers
            .get(&(unit_id, address))
            .copied()
            .unwrap_or_default())
    }

    fn set_holding_register(
        &mut self,
        unit_id: UnitId,
        address: Address,
        value: Word,
    ) -> Result<(), DataSourceError> {
        self.log
            .push(Access::SetHoldingRegister(unit_id, address, value));
        self.check(address)?;
        self.holding_registers.insert((unit_id, address), value);
        Ok(())
    }

    fn get_analog_input(
        &mut self,
        unit_id: UnitId,
        address: Address,
    ) -> Result<Word, DataSourceError> {
        self.log.push(Access::GetAnalogInput(unit_id, address));
        self.check(address)?;
        Ok(self
            .input_registers
            .get(&(unit_id, address))
            .copied()
            .unwrap_or_default())
    }
}

/// Process a raw PDU for `unit_id` and return the encoded response.
pub fn process(source: &mut MemorySource, unit_id: UnitId, pdu: &[u8]) -> Vec<u8> {
    let processor = modbus_server_core::ModbusProcessor::default();
    let msg = modbus_server_core::Message::new(unit_id, pdu).unwrap();
    let mut buf = [0; 256];
    let len = processor.process_into(source, &msg, &mut buf).unwrap();
    buf[..len].to_vec()
}
