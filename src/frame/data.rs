// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::*;
use crate::error::*;
use byteorder::{BigEndian, ByteOrder};

const CAPACITY: usize = MAX_READ_REGISTERS as usize * 2;

/// Register values (u16) of a read response, stored big-endian.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    data: [u8; CAPACITY],
    quantity: usize,
}

impl Registers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: [0; CAPACITY],
            quantity: 0,
        }
    }

    /// Pack words (u16 values).
    pub fn from_words(words: &[u16]) -> Result<Self, Error> {
        let mut registers = Self::new();
        for w in words {
            registers.push(*w)?;
        }
        Ok(registers)
    }

    /// Append a word.
    ///
    /// At most [`MAX_READ_REGISTERS`] words fit.
    pub fn push(&mut self, word: Word) -> Result<(), Error> {
        let idx = self.quantity * 2;
        if idx >= CAPACITY {
            return Err(Error::BufferSize);
        }
        BigEndian::write_u16(&mut self.data[idx..idx + 2], word);
        self.quantity += 1;
        Ok(())
    }

    /// Quantity of words (u16 values)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.quantity
    }

    ///  Returns `true` if the container has no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    /// Value of the `byte_count` response field.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn byte_count(&self) -> u8 {
        (self.quantity * 2) as u8
    }

    /// Get a specific word.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Word> {
        if idx >= self.quantity {
            return None;
        }
        let idx = idx * 2;
        Some(BigEndian::read_u16(&self.data[idx..idx + 2]))
    }

    /// The big-endian encoded words.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.quantity * 2]
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers iterator
#[derive(Debug, Clone)]
pub struct RegistersIter<'d> {
    cnt: usize,
    registers: &'d Registers,
}

impl Iterator for RegistersIter<'_> {
    type Item = Word;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.registers.get(self.cnt);
        self.cnt += 1;
        result
    }
}

impl<'d> IntoIterator for &'d Registers {
    type Item = Word;
    type IntoIter = RegistersIter<'d>;

    fn into_iter(self) -> Self::IntoIter {
        RegistersIter {
            cnt: 0,
            registers: self,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn from_word_slice() {
        let words: &[u16] = &[0xABCD, 0xEF00, 0x1234];
        let registers = Registers::from_words(words).unwrap();
        assert_eq!(registers.len(), 3);
        assert_eq!(registers.byte_count(), 6);
        assert_eq!(registers.payload(), &[0xAB, 0xCD, 0xEF, 0x00, 0x12, 0x34]);
        let mut iter = (&registers).into_iter();
        assert_eq!(iter.next(), Some(0xABCD));
        assert_eq!(iter.next(), Some(0xEF00));
        assert_eq!(iter.next(), Some(0x1234));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn registers_empty() {
        let registers = Registers::default();
        assert!(registers.is_empty());
        assert_eq!(registers.byte_count(), 0);
        assert!(registers.payload().is_empty());
    }

    #[test]
    fn registers_capacity() {
        let words = [0x1234; MAX_READ_REGISTERS as usize];
        let mut registers = Registers::from_words(&words).unwrap();
        assert_eq!(registers.byte_count(), 250);
        assert_eq!(registers.push(0).err().unwrap(), Error::BufferSize);

        let too_many = [0; MAX_READ_REGISTERS as usize + 1];
        assert_eq!(
            Registers::from_words(&too_many).err().unwrap(),
            Error::BufferSize
        );
    }

    #[test]
    fn registers_get() {
        let registers = Registers::from_words(&[0xABBC]).unwrap();
        assert_eq!(registers.get(0), Some(0xABBC));
        assert_eq!(registers.get(1), None);

        let registers = Registers::from_words(&[0xFFAB, 0xCDEF]).unwrap();
        assert_eq!(registers.get(0), Some(0xFFAB));
        assert_eq!(registers.get(1), Some(0xCDEF));
        assert_eq!(registers.get(2), None);
    }
}
