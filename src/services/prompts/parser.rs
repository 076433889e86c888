//! Prompt file parsing.
//!
//! One prompt per line. Supported shapes:
//! - plain text
//! - `id|title|prompt[|...]` (two fields: `id|prompt`)
//! - a leading reference URL followed by the prompt text
//!
//! Blank lines and comments (`#` followed by whitespace, or a bare `#`) are
//! skipped, so prompts such as `#1 neon city` survive. Indented lines continue
//! the previous prompt.

use crate::services::config::MatchConfig;
use crate::services::matcher::Prompt;
use crate::types::errors::{MatchError, MatchResult};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const REFERENCE_SCHEMES: &[&str] = &["http://", "https://", "file://"];

/// Decode and parse an uploaded prompt file.
///
/// Fails with `NoPrompts` when nothing usable remains after parsing.
pub fn parse_prompts(bytes: &[u8], config: &MatchConfig) -> MatchResult<Vec<Prompt>> {
    let text = decode_text(bytes);
    let prompts = parse_prompt_text(&text, config);
    if prompts.is_empty() {
        return Err(MatchError::NoPrompts);
    }
    log::info!("Parsed {} prompt(s)", prompts.len());
    Ok(prompts)
}

/// UTF-8 with optional BOM; anything else is read as Windows-1252.
pub fn decode_text(bytes: &[u8]) -> String {
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    match std::str::from_utf8(content) {
        Ok(text) => text.to_string(),
        Err(_) => {
            log::warn!("Prompt file is not valid UTF-8, decoding as Windows-1252");
            let (cow, _encoding, _had_errors) = encoding_rs::WINDOWS_1252.decode(content);
            cow.into_owned()
        }
    }
}

pub fn parse_prompt_text(text: &str, config: &MatchConfig) -> Vec<Prompt> {
    let mut entries: Vec<Entry> = Vec::new();
    // Continuations only attach to a prompt directly above them (comments allowed in between).
    let mut can_continue = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            can_continue = false;
            continue;
        }
        if is_comment(trimmed) {
            continue;
        }

        let indented = line.starts_with(|c: char| c.is_whitespace());
        if indented && can_continue {
            if let Some(entry) = entries.last_mut() {
                entry.text.push(' ');
                entry.text.push_str(trimmed);
                continue;
            }
        }

        if let Some(entry) = parse_line(trimmed) {
            entries.push(entry);
            can_continue = true;
        }
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut prompt = Prompt::new(i + 1, entry.text, config);
            if let Some(reference) = entry.reference {
                prompt = prompt.with_reference(reference);
            }
            if let Some(title) = entry.title {
                prompt = prompt.with_title(title, config);
            }
            prompt
        })
        .collect()
}

#[derive(Debug, Default)]
struct Entry {
    text: String,
    reference: Option<String>,
    title: Option<String>,
}

fn is_comment(line: &str) -> bool {
    line.strip_prefix('#').is_some_and(|rest| {
        let rest = rest.trim_start_matches('#');
        rest.is_empty() || rest.starts_with(char::is_whitespace)
    })
}

fn parse_line(line: &str) -> Option<Entry> {
    if line.contains('|') {
        return parse_pipe_line(line);
    }

    let (first, rest) = match line.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (line, ""),
    };
    if is_reference(first) {
        if rest.is_empty() {
            return None;
        }
        return Some(Entry {
            text: rest.to_string(),
            reference: Some(first.to_string()),
            title: None,
        });
    }

    Some(Entry {
        text: line.to_string(),
        ..Entry::default()
    })
}

/// `id|prompt` or `id|title|prompt[|...]`; any URL field is the reference.
fn parse_pipe_line(line: &str) -> Option<Entry> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();

    let reference = fields
        .iter()
        .find(|field| is_reference(field))
        .map(|field| field.to_string());

    let text = match fields.len() {
        0 | 1 => fields.first().copied().unwrap_or_default(),
        2 => fields[1],
        _ => fields[2],
    };
    // A URL in the prompt slot leaves nothing to match on textually.
    let text = if is_reference(text) { "" } else { text };

    let title = match fields.len() {
        0..=2 => None,
        _ => Some(fields[1]).filter(|title| !title.is_empty() && !is_reference(title)),
    };

    // Title only: it becomes the prompt text.
    let (text, title) = match (text.is_empty(), title) {
        (true, Some(title)) => (title, None),
        (_, title) => (text, title),
    };

    if text.is_empty() && reference.is_none() {
        return None;
    }
    Some(Entry {
        text: text.to_string(),
        reference,
        title: title.map(str::to_string),
    })
}

fn is_reference(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    REFERENCE_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod tests;
