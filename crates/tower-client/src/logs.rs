//! Normalizes raw event stdout into display lines and writes them to the
//! caller's log sink.

use regex_lite::Regex;

/// Line-oriented sink the core writes progress and relayed job output to.
pub trait LogSink {
    fn write_line(&mut self, line: &str);
}

/// Writes lines to stdout; the default sink for CLI adapters.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Collects lines in memory, for tests and early wiring.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogSink for MemorySink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Splits event text on the server's CRLF convention and optionally strips
/// ANSI SGR color sequences before emission. Pure text processing over
/// already-fetched data; there is no error path here.
pub struct LogRelay {
    remove_color: bool,
    sgr: Regex,
}

impl LogRelay {
    pub fn new(remove_color: bool) -> Self {
        Self {
            remove_color,
            // ESC [ <params> m
            sgr: Regex::new("\u{1b}\\[[;\\d]*m").expect("static pattern"),
        }
    }

    /// Splits on literal CRLF only; the server terminates its own lines
    /// that way and lone `\n` bytes inside a line are content. Trailing
    /// empty segments from a terminating CRLF are not echoed as blank
    /// lines.
    pub fn split_lines<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        let mut lines: Vec<&str> = raw.split("\r\n").collect();
        while lines.len() > 1 && lines.last() == Some(&"") {
            lines.pop();
        }
        lines
    }

    /// Writes each display line of `raw` to the sink in original order.
    pub fn relay(&self, raw: &str, sink: &mut dyn LogSink) {
        for line in self.split_lines(raw) {
            if self.remove_color {
                sink.write_line(&self.sgr.replace_all(line, ""));
            } else {
                sink.write_line(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relayed(raw: &str, remove_color: bool) -> Vec<String> {
        let relay = LogRelay::new(remove_color);
        let mut sink = MemorySink::new();
        relay.relay(raw, &mut sink);
        sink.lines
    }

    #[test]
    fn splits_on_crlf() {
        assert_eq!(relayed("line1\r\nline2", false), vec!["line1", "line2"]);
    }

    #[test]
    fn lone_newlines_are_not_line_breaks() {
        assert_eq!(relayed("a\nb\r\nc", false), vec!["a\nb", "c"]);
    }

    #[test]
    fn strips_sgr_sequences_when_asked() {
        assert_eq!(relayed("\u{1b}[31mred\u{1b}[0m", true), vec!["red"]);
        assert_eq!(relayed("\u{1b}[1;32mok\u{1b}[m done", true), vec!["ok done"]);
    }

    #[test]
    fn keeps_color_codes_by_default() {
        assert_eq!(relayed("\u{1b}[31mred\u{1b}[0m", false), vec!["\u{1b}[31mred\u{1b}[0m"]);
    }

    #[test]
    fn trailing_crlf_does_not_emit_a_blank_line() {
        assert_eq!(relayed("done\r\n", false), vec!["done"]);
    }

    #[test]
    fn empty_stdout_is_one_blank_line() {
        assert_eq!(relayed("", false), vec![""]);
    }
}
