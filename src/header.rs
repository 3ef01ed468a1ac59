// SPDX-License-Identifier: MIT
// Project: decomment
// Description: A streaming filter that strips comments from source text.
// File: src/header.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use std::io::{self, BufRead, ErrorKind, Write};

use crate::transducer::LINE_TERMINATOR;

/// Copies up to `header_lines` lines from `reader` to `writer` untouched,
/// comments included. Returns how many line terminators were copied, which
/// is less than requested only if the input ends first.
pub fn copy_header<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    header_lines: usize,
) -> io::Result<usize> {
    let mut copied = 0;

    while copied < header_lines {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if chunk.is_empty() {
            break;
        }

        let mut take = chunk.len();
        for (idx, &byte) in chunk.iter().enumerate() {
            if byte == LINE_TERMINATOR {
                copied += 1;
                if copied == header_lines {
                    take = idx + 1;
                    break;
                }
            }
        }

        writer.write_all(&chunk[..take])?;
        reader.consume(take);
    }

    if copied > 0 {
        log::debug!("Preserved {} header line(s).", copied);
    }
    Ok(copied)
}
