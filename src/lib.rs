// SPDX-License-Identifier: MIT
// Project: decomment
// Description: A streaming filter that strips comments from source text.
// File: src/lib.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

//! Strips `/* ... */` comments from a byte stream while leaving quoted
//! literals and line structure intact.

pub mod error;
pub mod header;
pub mod stream;
pub mod transducer;

pub use error::{DecommentError, Result};
pub use stream::{decomment_stream, Summary};
pub use transducer::{step, Decommenter, Emission, State, Stats};
