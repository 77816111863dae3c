//! Console messages. Warnings and errors go to stderr so `--json` output on
//! stdout stays parseable.

use ansi_term::{Colour, Style};
use std::fmt;

#[derive(Clone, Copy)]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn icon(self) -> &'static str {
        match self {
            Level::Info => "ℹ️",
            Level::Success => "✅",
            Level::Warning => "⚠️",
            Level::Error => "❌",
        }
    }

    fn style(self) -> Style {
        match self {
            Level::Info => Colour::Blue.bold(),
            Level::Success => Colour::Green.bold(),
            Level::Warning => Colour::Yellow.bold(),
            Level::Error => Colour::Red.bold(),
        }
    }
}

fn emit<T: fmt::Display>(level: Level, msg: T) {
    let line = format!("{} {}", level.style().paint(level.icon()), msg);
    match level {
        Level::Info | Level::Success => println!("{}", line),
        Level::Warning | Level::Error => eprintln!("{}", line),
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    emit(Level::Info, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    emit(Level::Success, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    emit(Level::Warning, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    emit(Level::Error, msg);
}

/// Section header
pub fn header<T: fmt::Display>(msg: T) {
    let rule = "=".repeat(22);
    println!("{}\n", Colour::Blue.bold().paint(format!("{} {}", rule, msg)));
}
