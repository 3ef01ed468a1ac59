// SPDX-License-Identifier: MIT
// Project: decomment
// Description: A streaming filter that strips comments from source text.
// File: src/stream.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use std::io::{BufRead, ErrorKind, Write};

use crate::transducer::{Decommenter, Stats};
use crate::error::Result;
use crate::header::copy_header;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub header_lines: usize,
    pub lines: usize,
    pub stats: Stats,
}

/// Runs `reader` through a [`Decommenter`] into `writer`.
///
/// Input is pulled in buffered chunks but fed to the transducer one byte at
/// a time, so memory use does not depend on input length. Whatever was
/// produced is flushed before an unterminated comment is reported.
pub fn decomment_stream<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    header_lines: usize,
) -> Result<Summary> {
    let copied = copy_header(reader, writer, header_lines)?;
    let mut decommenter = Decommenter::starting_at_line(copied + 1);
    let mut out = Vec::new();

    loop {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if chunk.is_empty() {
            break;
        }

        out.clear();
        for &byte in chunk {
            out.extend_from_slice(decommenter.feed(byte).as_bytes());
        }
        let consumed = chunk.len();
        reader.consume(consumed);
        writer.write_all(&out)?;
    }

    let finished = decommenter.finish();
    if let Ok(tail) = &finished {
        writer.write_all(tail.as_bytes())?;
    }
    writer.flush()?;
    finished?;

    let summary = Summary {
        header_lines: copied,
        lines: decommenter.line(),
        stats: decommenter.stats(),
    };
    log::info!(
        "Read {} bytes, wrote {} bytes over {} line(s); removed {} comment(s).",
        summary.stats.bytes_read,
        summary.stats.bytes_written,
        summary.lines,
        summary.stats.comments_removed
    );
    Ok(summary)
}
