// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The register/coil store a server answers requests from.

use core::fmt;

use crate::frame::{Address, Coil, UnitId, Word};

/// Failure reported by a [`DataSource`].
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceError {
    /// The address is not mapped for this unit.
    AddressOutOfRange(Address),
    /// Any other failure of the underlying storage.
    DeviceFailure,
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AddressOutOfRange(addr) => write!(f, "Address out of range: {addr}"),
            Self::DeviceFailure => write!(f, "Device failure"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DataSourceError {}

/// Per-unit access to the four Modbus data tables.
///
/// All accessors take `&mut self`: reading a value may have side effects
/// (e.g. clear-on-read status registers). Sharing a source between
/// connections is up to the implementation.
pub trait DataSource {
    fn get_coil(&mut self, unit_id: UnitId, address: Address) -> Result<Coil, DataSourceError>;

    fn set_coil(
        &mut self,
        unit_id: UnitId,
        address: Address,
        value: Coil,
    ) -> Result<(), DataSourceError>;

    fn get_discrete_input(
        &mut self,
        unit_id: UnitId,
        address: Address,
    ) -> Result<Coil, DataSourceError>;

    fn get_holding_register(
        &mut self,
        unit_id: UnitId,
        address: Address,
    ) -> Result<Word, DataSourceError>;

    fn set_holding_register(
        &mut self,
        unit_id: UnitId,
        address: Address,
        value: Word,
    ) -> Result<(), DataSourceError>;

    /// Read an input register.
    fn get_analog_input(
        &mut self,
        unit_id: UnitId,
        address: Address,
    ) -> Result<Word, DataSourceError>;
}

impl<D> DataSource for &mut D
where
    D: DataSource + ?Sized,
{
    fn get_coil(&mut self, unit_id: UnitId, address: Address) -> Result<Coil, DataSourceError> {
        (**self).get_coil(unit_id, address)
    }

    fn set_coil(
        &mut self,
        unit_id: UnitId,
        address: Address,
        value: Coil,
    ) -> Result<(), DataSourceError> {
        (**self).set_coil(unit_id, address, value)
    }

    fn get_discrete_input(
        &mut self,
        unit_id: UnitId,
        address: Address,
    ) -> Result<Coil, DataSourceError> {
        (**self).get_discrete_input(unit_id, address)
    }

    fn get_holding_register(
        &mut self,
        unit_id: UnitId,
        address: Address,
    ) -> Result<Word, DataSourceError> {
        (**self).get_holding_register(unit_id, address)
    }

    fn set_holding_register(
        &mut self,
        unit_id: UnitId,
        address: Address,
        value: Word,
    ) -> Result<(), DataSourceError> {
        (**self).set_holding_register(unit_id, address, value)
    }

    fn get_analog_input(
        &mut self,
        unit_id: UnitId,
        address: Address,
    ) -> Result<Word, DataSourceError> {
        (**self).get_analog_input(unit_id, address)
    }
}
