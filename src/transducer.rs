// SPDX-License-Identifier: MIT
// Project: decomment
// Description: A streaming filter that strips comments from source text.
// File: src/transducer.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use crate::error::{DecommentError, Result};

pub const LINE_TERMINATOR: u8 = b'\n';
const ESCAPE: u8 = b'\\';
const SLASH: u8 = b'/';
const STAR: u8 = b'*';
const SINGLE_QUOTE: u8 = b'\'';
const DOUBLE_QUOTE: u8 = b'"';

/// Lexical context of the byte about to be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Plain,
    InSingleQuote,
    InDoubleQuote,
    SingleQuoteEscape,
    DoubleQuoteEscape,
    SlashSeen,
    InComment,
    StarSeen,
}

/// Bytes produced by a single transition. Never more than two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emission {
    buf: [u8; 2],
    len: u8,
}

impl Emission {
    pub const NONE: Emission = Emission { buf: [0; 2], len: 0 };

    pub const fn one(byte: u8) -> Self {
        Emission { buf: [byte, 0], len: 1 }
    }

    pub const fn two(first: u8, second: u8) -> Self {
        Emission { buf: [first, second], len: 2 }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }
}

/// The transition function. Pure: everything it needs is in `state` and `byte`.
pub fn step(state: State, byte: u8) -> (State, Emission) {
    match state {
        State::Plain => match byte {
            SINGLE_QUOTE => (State::InSingleQuote, Emission::one(byte)),
            DOUBLE_QUOTE => (State::InDoubleQuote, Emission::one(byte)),
            SLASH => (State::SlashSeen, Emission::NONE),
            _ => (State::Plain, Emission::one(byte)),
        },
        State::InSingleQuote => {
            let next = match byte {
                ESCAPE => State::SingleQuoteEscape,
                SINGLE_QUOTE => State::Plain,
                _ => State::InSingleQuote,
            };
            (next, Emission::one(byte))
        }
        State::SingleQuoteEscape => (State::InSingleQuote, Emission::one(byte)),
        State::InDoubleQuote => {
            let next = match byte {
                ESCAPE => State::DoubleQuoteEscape,
                DOUBLE_QUOTE => State::Plain,
                _ => State::InDoubleQuote,
            };
            (next, Emission::one(byte))
        }
        State::DoubleQuoteEscape => (State::InDoubleQuote, Emission::one(byte)),
        State::SlashSeen => match byte {
            // The space keeps `a/**/b` as two tokens.
            STAR => (State::InComment, Emission::one(b' ')),
            SLASH => (State::SlashSeen, Emission::one(SLASH)),
            SINGLE_QUOTE => (State::InSingleQuote, Emission::two(SLASH, byte)),
            DOUBLE_QUOTE => (State::InDoubleQuote, Emission::two(SLASH, byte)),
            _ => (State::Plain, Emission::two(SLASH, byte)),
        },
        State::InComment => match byte {
            STAR => (State::StarSeen, Emission::NONE),
            LINE_TERMINATOR => (State::InComment, Emission::one(byte)),
            _ => (State::InComment, Emission::NONE),
        },
        State::StarSeen => match byte {
            SLASH => (State::Plain, Emission::NONE),
            STAR => (State::StarSeen, Emission::NONE),
            // A newline between the star and the slash breaks the closer.
            LINE_TERMINATOR => (State::InComment, Emission::one(byte)),
            _ => (State::InComment, Emission::NONE),
        },
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub comments_removed: u64,
}

/// Drives [`step`] over a byte stream, tracking the line bookkeeping needed
/// to report where an unterminated comment began.
#[derive(Debug, Clone)]
pub struct Decommenter {
    state: State,
    line: usize,
    comment_lines: usize,
    stats: Stats,
}

impl Default for Decommenter {
    fn default() -> Self {
        Decommenter::starting_at_line(1)
    }
}

impl Decommenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Used when earlier lines were consumed by something else (a copied
    /// header) but diagnostics must still refer to the original numbering.
    pub fn starting_at_line(line: usize) -> Self {
        Decommenter {
            state: State::Plain,
            line,
            comment_lines: 0,
            stats: Stats::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    fn comment_start_line(&self) -> usize {
        self.line - self.comment_lines
    }

    pub fn feed(&mut self, byte: u8) -> Emission {
        let is_newline = byte == LINE_TERMINATOR;
        if is_newline {
            self.line += 1;
        }

        let previous = self.state;
        let (next, emission) = step(previous, byte);

        match previous {
            State::Plain if is_newline => self.comment_lines = 0,
            State::InComment | State::StarSeen if is_newline => self.comment_lines += 1,
            _ => {}
        }

        match (previous, next) {
            (State::SlashSeen, State::InComment) => self.comment_lines = 0,
            (State::StarSeen, State::Plain) => {
                self.stats.comments_removed += 1;
                let start_line = self.comment_start_line();
                if start_line == self.line {
                    log::debug!("Line {}: Removed block comment.", start_line);
                } else {
                    log::debug!("Lines {}-{}: Removed block comment.", start_line, self.line);
                }
            }
            _ => {}
        }

        self.state = next;
        self.stats.bytes_read += 1;
        self.stats.bytes_written += emission.as_bytes().len() as u64;
        emission
    }

    /// Settles the end of input. A pending slash is flushed; an open comment
    /// is an error carrying the line it opened on.
    pub fn finish(&mut self) -> Result<Emission> {
        match self.state {
            State::SlashSeen => {
                self.state = State::Plain;
                self.stats.bytes_written += 1;
                Ok(Emission::one(SLASH))
            }
            State::InComment | State::StarSeen => Err(DecommentError::UnterminatedComment {
                line: self.comment_start_line(),
            }),
            _ => Ok(Emission::NONE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(input: &[u8]) -> (Vec<u8>, Result<()>) {
        let mut decommenter = Decommenter::new();
        let mut output = Vec::new();
        for &byte in input {
            output.extend_from_slice(decommenter.feed(byte).as_bytes());
        }
        let outcome = decommenter.finish().map(|tail| output.extend_from_slice(tail.as_bytes()));
        (output, outcome)
    }

    fn decomment_ok(input: &str) -> String {
        let (output, outcome) = run(input.as_bytes());
        assert!(outcome.is_ok(), "unexpected failure for {:?}: {:?}", input, outcome);
        String::from_utf8(output).unwrap()
    }

    fn unterminated_line(input: &str) -> usize {
        match run(input.as_bytes()).1 {
            Err(DecommentError::UnterminatedComment { line }) => line,
            other => panic!("expected unterminated comment for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_comment_replaced_by_single_space() {
        assert_eq!(decomment_ok("a/**/b"), "a b");
        assert_eq!(decomment_ok("int x = 1; /* set x */"), "int x = 1;  ");
    }

    #[test]
    fn test_comment_inside_double_quotes_is_kept() {
        assert_eq!(decomment_ok("\"/*not a comment*/\""), "\"/*not a comment*/\"");
    }

    #[test]
    fn test_comment_inside_single_quotes_is_kept() {
        assert_eq!(decomment_ok("'/* x */'"), "'/* x */'");
    }

    #[test]
    fn test_escaped_quote_stays_in_literal() {
        assert_eq!(decomment_ok("'\\'' /* c */"), "'\\''  ");
        assert_eq!(decomment_ok("\"a\\\"/* b */\"c"), "\"a\\\"/* b */\"c");
    }

    #[test]
    fn test_escape_consumes_newline() {
        assert_eq!(decomment_ok("\"a\\\nb\"/**/"), "\"a\\\nb\" ");
    }

    #[test]
    fn test_newlines_inside_comment_are_kept() {
        assert_eq!(decomment_ok("a/* one\ntwo\nthree */b\n"), "a \n\nb\n");
    }

    #[test]
    fn test_slash_runs() {
        assert_eq!(decomment_ok("a / b"), "a / b");
        assert_eq!(decomment_ok("// line"), "// line");
        assert_eq!(decomment_ok("///**/x"), "// x");
        assert_eq!(decomment_ok("/\"a\""), "/\"a\"");
        assert_eq!(decomment_ok("/'a'"), "/'a'");
    }

    #[test]
    fn test_trailing_slash_is_flushed() {
        assert_eq!(decomment_ok("x /"), "x /");
        assert_eq!(decomment_ok("/"), "/");
    }

    #[test]
    fn test_star_runs() {
        assert_eq!(decomment_ok("/**/"), " ");
        assert_eq!(decomment_ok("/***/"), " ");
        assert_eq!(decomment_ok("/* **/x"), " x");
        assert_eq!(decomment_ok("/* * / */x"), " x");
    }

    #[test]
    fn test_newline_between_star_and_slash_does_not_close() {
        assert_eq!(decomment_ok("/* *\n/ still */x"), " \nx");
    }

    #[test]
    fn test_slash_star_slash_is_unterminated() {
        let (output, outcome) = run(b"/*/");
        assert_eq!(output, b" ");
        assert!(matches!(outcome, Err(DecommentError::UnterminatedComment { line: 1 })));
    }

    #[test]
    fn test_unterminated_comment_reports_opening_line() {
        assert_eq!(unterminated_line("/* never closed"), 1);
        assert_eq!(unterminated_line("a\nb\n/* x\ny\nz"), 3);
        assert_eq!(unterminated_line("a\n/* x *\n*"), 2);
    }

    #[test]
    fn test_unterminated_comment_keeps_preceding_text() {
        let (output, _) = run(b"keep\nthis /* lost\n");
        assert_eq!(output, b"keep\nthis  \n");
    }

    #[test]
    fn test_unterminated_after_quoted_newline_between_comments() {
        let input = "/* a\nb */ \"s\n\" /* c\nd";
        assert_eq!(unterminated_line(input), 3);
    }

    #[test]
    fn test_unterminated_quotes_are_not_errors() {
        assert_eq!(decomment_ok("'abc"), "'abc");
        assert_eq!(decomment_ok("\"abc\\"), "\"abc\\");
    }

    #[test]
    fn test_starting_line_offsets_diagnostics() {
        let mut decommenter = Decommenter::starting_at_line(5);
        for &byte in b"\n/* x" {
            decommenter.feed(byte);
        }
        assert!(matches!(
            decommenter.finish(),
            Err(DecommentError::UnterminatedComment { line: 6 })
        ));
    }

    #[test]
    fn test_stats_are_counted() {
        let mut decommenter = Decommenter::new();
        for &byte in b"a/* x */b/**/c/" {
            decommenter.feed(byte);
        }
        decommenter.finish().unwrap();
        let stats = decommenter.stats();
        assert_eq!(stats.comments_removed, 2);
        assert_eq!(stats.bytes_read, 15);
        assert_eq!(stats.bytes_written, "a b c/".len() as u64);
    }

    #[test]
    fn test_step_table_for_slash_seen() {
        assert_eq!(step(State::SlashSeen, b'*'), (State::InComment, Emission::one(b' ')));
        assert_eq!(step(State::SlashSeen, b'/'), (State::SlashSeen, Emission::one(b'/')));
        assert_eq!(step(State::SlashSeen, b'\n'), (State::Plain, Emission::two(b'/', b'\n')));
        assert_eq!(step(State::SlashSeen, b'\''), (State::InSingleQuote, Emission::two(b'/', b'\'')));
    }

    fn comment_region() -> impl Strategy<Value = String> {
        (0usize..4, 0usize..3, 0usize..3).prop_map(|(code_lines, comment_lines, quoted_lines)| {
            let mut text = "x;\n".repeat(code_lines);
            text.push_str("/* c");
            text.push_str(&"\n".repeat(comment_lines));
            text.push_str(" */ \"q");
            text.push_str(&"\n".repeat(quoted_lines));
            text.push_str("\"\n");
            text
        })
    }

    proptest! {
        #[test]
        fn prop_identity_without_stars_or_quotes(content in "[^*'\"]{0,256}") {
            let (output, outcome) = run(content.as_bytes());
            prop_assert!(outcome.is_ok());
            prop_assert_eq!(output, content.into_bytes());
        }

        #[test]
        fn prop_newline_count_is_preserved(input in proptest::collection::vec(any::<u8>(), 0..512)) {
            let (output, _) = run(&input);
            let count = |bytes: &[u8]| bytes.iter().filter(|&&b| b == LINE_TERMINATOR).count();
            prop_assert_eq!(count(&output), count(&input));
        }

        #[test]
        fn prop_idempotent_once_delimiters_are_gone(input in "[a/*'\"\\\\\n ]{0,128}") {
            let (once, _) = run(input.as_bytes());
            if !once.windows(2).any(|pair| pair == b"/*") {
                let (twice, outcome) = run(&once);
                prop_assert!(outcome.is_ok());
                prop_assert_eq!(twice, once);
            }
        }

        #[test]
        fn prop_reports_line_of_last_opener(
            regions in proptest::collection::vec(comment_region(), 0..5),
            tail_lines in 0usize..4,
        ) {
            let mut input: String = regions.concat();
            let opener_line = 1 + input.matches('\n').count();
            input.push_str("/* open");
            input.push_str(&"\n".repeat(tail_lines));
            prop_assert_eq!(unterminated_line(&input), opener_line);
        }
    }
}
