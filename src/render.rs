//! Presentation adapter: markdown-to-terminal rendering, the typewriter
//! display effect, and the structured dump used by print-all mode.
//!
//! This is boundary code. The renderer is intentionally minimal (headings,
//! bold, italic, inline code, fenced blocks kept verbatim); challenge
//! authors write simple markdown, not HTML.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use tracing::error;

use crate::domain::Level;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const ITALIC: &str = "\x1b[3m";
const HEADING: &str = "\x1b[1;4m";
const CODE: &str = "\x1b[33m";

/// Per-character delay of the typewriter effect.
pub const CHAR_DELAY: Duration = Duration::from_millis(4);

/// Renders a level's body and runs nothing: hooks stay with the session.
pub fn print_level(level: &Level, plain: bool) {
  print_text(&markdown_to_terminal(&level.body), plain, CHAR_DELAY);
}

/// Minimal markdown -> ANSI transform.
pub fn markdown_to_terminal(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut in_code_block = false;
  for line in text.lines() {
    if line.trim_start().starts_with("```") {
      in_code_block = !in_code_block;
      continue;
    }
    if in_code_block {
      // Fenced code stays verbatim, just indented.
      out.push_str("    ");
      out.push_str(line);
      out.push('\n');
      continue;
    }
    if let Some(rest) = line.strip_prefix("## ") {
      out.push_str(BOLD);
      out.push_str(rest);
      out.push_str(RESET);
    } else if let Some(rest) = line.strip_prefix("# ") {
      out.push_str(HEADING);
      out.push_str(rest);
      out.push_str(RESET);
    } else if let Some(rest) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
      out.push_str("  • ");
      out.push_str(&render_inline(rest));
    } else {
      out.push_str(&render_inline(line));
    }
    out.push('\n');
  }
  // Drop the trailing newline so callers control spacing.
  if out.ends_with('\n') {
    out.pop();
  }
  out
}

/// Toggle-based inline styling. Unterminated markers are closed at end of
/// line so styling never leaks into the next line.
fn render_inline(line: &str) -> String {
  let mut out = String::with_capacity(line.len());
  let mut bold = false;
  let mut italic = false;
  let mut code = false;
  let mut chars = line.chars().peekable();
  while let Some(c) = chars.next() {
    match c {
      '`' => {
        code = !code;
        out.push_str(if code { CODE } else { RESET });
      }
      '*' if !code && chars.peek() == Some(&'*') => {
        chars.next();
        bold = !bold;
        out.push_str(if bold { BOLD } else { RESET });
      }
      '*' if !code => {
        italic = !italic;
        out.push_str(if italic { ITALIC } else { RESET });
      }
      _ => out.push(c),
    }
  }
  if bold || italic || code {
    out.push_str(RESET);
  }
  out
}

/// Writes text to stdout. `plain` disables the typewriter animation.
pub fn print_text(text: &str, plain: bool, char_delay: Duration) {
  if plain {
    println!("{text}");
    return;
  }
  let mut stdout = io::stdout();
  for ch in text.chars() {
    print!("{ch}");
    let _ = stdout.flush();
    thread::sleep(char_delay);
  }
  println!();
}

/// Structured YAML dump of one level: metadata plus body.
pub fn dump_level(level: &Level) -> String {
  serde_yaml::to_string(level).unwrap_or_else(|e| {
    error!(target: "gauntlet", level = %level.name, error = %e, "level dump failed");
    String::new()
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn headings_and_inline_styles_get_ansi_codes() {
    let rendered = markdown_to_terminal("# Title\n\nUse `ls` and be **brave**.");
    assert!(rendered.contains("\x1b[1;4mTitle\x1b[0m"));
    assert!(rendered.contains("\x1b[33mls\x1b[0m"));
    assert!(rendered.contains("\x1b[1mbrave\x1b[0m"));
  }

  #[test]
  fn fenced_code_is_kept_verbatim() {
    let rendered = markdown_to_terminal("```\ncat *flag* `raw`\n```");
    assert!(rendered.contains("cat *flag* `raw`"));
    assert!(!rendered.contains("```"));
  }

  #[test]
  fn dangling_style_is_closed_at_line_end() {
    let rendered = markdown_to_terminal("broken **bold\nnext line");
    assert!(rendered.contains("bold\x1b[0m"));
    assert!(rendered.ends_with("next line"));
  }

  #[test]
  fn dump_includes_metadata_and_body() {
    let level = Level {
      name: "start".into(),
      test_cmd: "check".into(),
      next: vec!["end".into()],
      body: "Hello.".into(),
      ..Level::default()
    };
    let dump = dump_level(&level);
    assert!(dump.contains("name: start"));
    assert!(dump.contains("test: check"));
    assert!(dump.contains("Hello."));
  }
}
