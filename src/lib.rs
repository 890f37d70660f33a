// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![doc = include_str!("../README.md")]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod codec;
mod error;
mod frame;
mod processor;
mod source;
mod util;

#[cfg(feature = "tcp")]
pub use codec::tcp;
pub use error::*;
pub use frame::*;
pub use processor::*;
pub use source::*;
pub use util::{bool_to_u16_coil, packed_coils_len, u16_coil_to_bool};
