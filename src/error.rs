// SPDX-License-Identifier: MIT
// Project: decomment
// Description: A streaming filter that strips comments from source text.
// File: src/error.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecommentError {
    /// Input ended inside a comment; `line` is where the comment opened.
    #[error("line {line}: unterminated comment")]
    UnterminatedComment { line: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DecommentError>;
