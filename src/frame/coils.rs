// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::*;
use crate::{error::*, util::*};

const CAPACITY: usize = packed_coils_len(MAX_READ_BITS as usize);

/// Packed bits of a coil or discrete input read response.
///
/// Bit 0 of the first byte holds the first coil, bits fill each byte from
/// low to high and the unused high bits of the last byte stay zero.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    bytes: [u8; CAPACITY],
    quantity: usize,
}

impl BitStream {
    /// Create an empty bit stream.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; CAPACITY],
            quantity: 0,
        }
    }

    /// Pack coils defined by a bool slice.
    pub fn from_bools(bools: &[bool]) -> Result<Self, Error> {
        let mut bits = Self::new();
        for bit in bools {
            bits.add(*bit)?;
        }
        Ok(bits)
    }

    /// Append a single bit.
    ///
    /// Fails with [`Error::BufferSize`] once [`MAX_READ_BITS`] bits
    /// have been added.
    pub fn add(&mut self, bit: Coil) -> Result<(), Error> {
        let idx = self.quantity;
        if idx >= MAX_READ_BITS as usize {
            return Err(Error::BufferSize);
        }
        if bit {
            self.bytes[idx / 8] |= 1 << (idx % 8);
        }
        self.quantity += 1;
        Ok(())
    }

    /// Quantity of bits
    #[must_use]
    pub const fn len(&self) -> usize {
        self.quantity
    }

    ///  Returns `true` if the container has no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    /// Number of bytes used by the packed bits.
    #[must_use]
    pub const fn packed_len(&self) -> usize {
        packed_coils_len(self.quantity)
    }

    /// Value of the `byte_count` response field.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn byte_count(&self) -> u8 {
        // CAPACITY fits into a u8
        self.packed_len() as u8
    }

    /// The packed bytes, zero padded in the final byte.
    #[must_use]
    pub fn to_bytes(&self) -> &[u8] {
        &self.bytes[..self.packed_len()]
    }

    /// Get a specific bit.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Coil> {
        if idx >= self.quantity {
            return None;
        }
        Some((self.bytes[idx / 8] >> (idx % 8)) & 0b1 > 0)
    }

    /// Iterate over all bits.
    #[must_use]
    pub const fn iter(&self) -> BitStreamIter<'_> {
        BitStreamIter { cnt: 0, bits: self }
    }
}

impl Default for BitStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Bit stream iterator.
#[derive(Debug, Clone)]
pub struct BitStreamIter<'b> {
    cnt: usize,
    bits: &'b BitStream,
}

impl Iterator for BitStreamIter<'_> {
    type Item = Coil;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.bits.get(self.cnt);
        self.cnt += 1;
        result
    }
}

impl<'b> IntoIterator for &'b BitStream {
    type Item = Coil;
    type IntoIter = BitStreamIter<'b>;

    fn into_iter(self) -> Self::IntoIter {
        BitStreamIter { cnt: 0, bits: self }
    }
}
