// ── Transcript scraping ──
//
// The terminal transcript interleaves the ssh banner, the password
// prompt, our own echoed command, prompts and the actual output. These
// helpers recover the useful part. They never fail: unexpected input
// degrades to a best-effort (possibly empty) result.

use crate::model::{Device, MacAddress};

/// Prompt terminators the terminal may print.
const PROMPT_SUFFIXES: [&str; 3] = ["WAP>", "#", "$"];
/// A prompt followed by whatever was typed after it, e.g. `WAP>exit`.
const PROMPT_PREFIX: &str = "WAP>";
const SPAWN_MARKER: &str = "spawn ssh";
const PASSWORD_MARKER: &str = "password:";
const ERROR_MARKER: &str = "ERROR:";
const CLOSE_NOTICE: (&str, &str) = ("Connection to ", " closed.");

const HEADER_MARKER: &str = "SSID Index";
const SEPARATOR_MARKER: &str = "---";
const LIST_BANNER: &str = "success!";
const SUCCESS_MARKER: &str = "success";

/// Strip echo and noise from a raw transcript.
///
/// Everything up to and including the first line containing `command` is
/// discarded, and the output ends at the next prompt line. If no such line
/// exists (or `command` is empty) nothing is dropped by position and only
/// the line filters apply.
pub fn clean_output(raw: &str, command: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    let echo = if command.is_empty() {
        None
    } else {
        lines.iter().position(|line| line.contains(command))
    };

    lines
        .iter()
        .skip(echo.map_or(0, |idx| idx + 1))
        .take_while(|line| echo.is_none() || !is_prompt_line(line.trim()))
        .filter(|line| keep_line(line))
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

fn is_prompt_line(trimmed: &str) -> bool {
    trimmed.starts_with(PROMPT_PREFIX) || PROMPT_SUFFIXES.iter().any(|p| trimmed.ends_with(p))
}

fn keep_line(line: &str) -> bool {
    let trimmed = line.trim();
    let (close_head, close_tail) = CLOSE_NOTICE;
    !trimmed.is_empty()
        && !is_prompt_line(trimmed)
        && !(trimmed.starts_with(close_head) && trimmed.ends_with(close_tail))
        && !line.contains(SPAWN_MARKER)
        && !line.contains(PASSWORD_MARKER)
        && !line.contains(ERROR_MARKER)
}

/// Parse `display wifi filter` output into fresh, unmerged devices.
///
/// Rows look like `SSID-1  2a:77:3c:e8:bc:2e  Whitelist`; the second
/// whitespace-separated token is the MAC. Row order is kept and
/// duplicates are left for the registry to resolve.
pub fn parse_device_list(output: &str) -> Vec<Device> {
    output
        .lines()
        .map(str::trim)
        .filter(|row| {
            !row.is_empty()
                && !row.contains(HEADER_MARKER)
                && !row.contains(SEPARATOR_MARKER)
                && !row.contains(LIST_BANNER)
        })
        .filter_map(|row| row.split_whitespace().nth(1))
        .map(|mac| Device::new(MacAddress::new(mac)))
        .collect()
}

/// Whether an admit/revoke transcript carries the terminal's success marker.
pub fn reports_success(output: &str) -> bool {
    output.contains(SUCCESS_MARKER)
}
