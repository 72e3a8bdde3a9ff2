//! Challenge source parsing.
//!
//! A challenge file is a sequence of blocks separated by a line of eleven or
//! more hyphens framed by blank lines. Each block starts with a YAML metadata
//! paragraph (name, hooks, next-level names); the remaining paragraphs,
//! re-joined with blank lines, form the level's body text.
//!
//! Parsing is total and eager: the whole input is split before any level is
//! constructed, and one bad metadata block aborts the whole load. Later
//! levels may reference earlier ones by name, so a partial level set is
//! never usable.

use tracing::debug;

use crate::domain::Level;
use crate::errors::{Error, Result};

/// Parses raw challenge text into its ordered level list.
pub fn parse_levels(raw: &str) -> Result<Vec<Level>> {
  let mut levels: Vec<Level> = Vec::new();
  for block in split_blocks(raw) {
    let level = build_level(&block).map_err(|e| {
      Error::MalformedChallenge(format!(
        "bad metadata block after level '{}': {e}",
        last_good(&levels)
      ))
    })?;
    if level.name.is_empty() {
      return Err(Error::MalformedChallenge(format!(
        "level with an empty name after level '{}'",
        last_good(&levels)
      )));
    }
    if levels.iter().any(|l| l.name == level.name) {
      return Err(Error::MalformedChallenge(format!(
        "duplicate level name '{}'",
        level.name
      )));
    }
    debug!(target: "gauntlet", level = %level.name, next = level.next.len(), "loaded level");
    levels.push(level);
  }
  if levels.is_empty() {
    return Err(Error::MalformedChallenge("no level blocks found".into()));
  }
  Ok(levels)
}

/// The name in the error diagnostic when a later block is broken.
fn last_good(levels: &[Level]) -> &str {
  levels
    .last()
    .map(|l| l.name.as_str())
    .unwrap_or("<none> (the first level is likely broken)")
}

/// Splits on delimiter lines: >= 11 hyphens, nothing else on the line,
/// preceded by a blank line. A terminating delimiter is optional.
fn split_blocks(raw: &str) -> Vec<String> {
  let mut blocks = Vec::new();
  let mut current: Vec<&str> = Vec::new();
  for line in raw.lines() {
    let after_blank = current.last().map_or(true, |l| l.trim().is_empty());
    if is_delimiter(line) && after_blank {
      push_block(&mut blocks, &current);
      current.clear();
    } else {
      current.push(line);
    }
  }
  push_block(&mut blocks, &current);
  blocks
}

fn push_block(blocks: &mut Vec<String>, lines: &[&str]) {
  let block = lines.join("\n").trim().to_string();
  if !block.is_empty() {
    blocks.push(block);
  }
}

fn is_delimiter(line: &str) -> bool {
  line.len() >= 11 && line.bytes().all(|b| b == b'-')
}

/// First paragraph = YAML metadata, the rest = body.
fn build_level(block: &str) -> std::result::Result<Level, serde_yaml::Error> {
  let mut paragraphs = block.split("\n\n");
  let metadata = paragraphs.next().unwrap_or_default();
  let body = paragraphs.collect::<Vec<_>>().join("\n\n");
  let mut level: Level = serde_yaml::from_str(metadata)?;
  level.body = body;
  Ok(level)
}
