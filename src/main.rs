//! gauntlet · terminal wargame level ladder
//!
//! One invocation drives one step of a participant's progression: resolve
//! the persisted level, run its test hook, advance on success, and print the
//! (possibly new) level's text if it has not been shown yet.
//!
//! Env variables:
//!   LOG_LEVEL  : tracing filter (default "warn")
//!   LOG_FORMAT : "pretty" (default) or "json"
//!
//! The content key is baked in at build time via the GAUNTLET_KEY env
//! variable; challenges distributed as `.enc` files are decrypted with it
//! before parsing.

mod codec;
mod domain;
mod errors;
mod hooks;
mod ident;
mod parser;
mod render;
mod session;
mod store;
mod telemetry;
mod util;

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::error;

use crate::domain::Challenge;
use crate::errors::Result;
use crate::hooks::ShellHooks;
use crate::session::{Session, Verdict};
use crate::store::FileStore;

const EMBEDDED_KEY: Option<&str> = option_env!("GAUNTLET_KEY");
const DEFAULT_KEY: &str = "gauntlet-development-key";

#[derive(Parser, Debug)]
#[command(name = "gauntlet", version, about = "Text-based wargame level ladder")]
struct Cli {
  /// Challenge file. A `.enc` suffix means decrypt before parsing.
  path: PathBuf,

  /// Level token (only with --detect-level).
  token: Option<String>,

  /// Home directory the token was issued under (only with --detect-level).
  homedir: Option<String>,

  /// Print every loaded level and exit.
  #[arg(long)]
  print: bool,

  /// Disable the typewriter animation.
  #[arg(long = "no-pretty-print")]
  no_pretty_print: bool,

  /// Detect which level a token belongs to, given a home directory.
  #[arg(long = "detect-level")]
  detect_level: bool,

  /// Encrypt the given challenge file and exit.
  #[arg(long)]
  enc: bool,

  /// Decrypt the given challenge file and exit.
  #[arg(long)]
  dec: bool,
}

fn main() -> ExitCode {
  telemetry::init_tracing();

  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) => {
      let _ = e.print();
      return match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        // Missing/invalid arguments exit 1, not clap's default 2.
        _ => ExitCode::from(1),
      };
    }
  };

  match run(cli) {
    Ok(code) => code,
    Err(e) => {
      error!(target: "gauntlet", error = %e, "fatal");
      eprintln!("[error] {e}");
      ExitCode::from(1)
    }
  }
}

fn run(cli: Cli) -> Result<ExitCode> {
  let key = EMBEDDED_KEY.unwrap_or(DEFAULT_KEY);
  let challenge_name = util::basename_from_path(&cli.path);
  let raw = fs::read_to_string(&cli.path)?;

  if cli.enc {
    println!("{}", codec::encrypt(key, &raw)?);
    return Ok(ExitCode::SUCCESS);
  }

  let source = if cli.path.extension().is_some_and(|e| e == "enc") {
    codec::decrypt(key, &raw)?
  } else {
    raw
  };

  if cli.dec {
    println!("{source}");
    return Ok(ExitCode::SUCCESS);
  }

  let challenge = Challenge::load(challenge_name, &source)?;

  if cli.detect_level {
    let (Some(token), Some(homedir)) = (&cli.token, &cli.homedir) else {
      eprintln!("usage: gauntlet --detect-level <path> <token> <homedir>");
      return Ok(ExitCode::from(1));
    };
    // A miss is a normal negative result; no internal detail leaks out.
    return Ok(match challenge.detect_level(token, homedir) {
      Some(level) => {
        println!("Detected level: {}", level.name);
        ExitCode::SUCCESS
      }
      None => {
        println!("Level undetected");
        ExitCode::from(1)
      }
    });
  }

  if cli.print {
    println!("We have {} levels.", challenge.levels.len());
    for level in &challenge.levels {
      println!("\n{}", render::dump_level(level));
    }
    return Ok(ExitCode::SUCCESS);
  }

  let home = ident::current_home()?;
  let store = FileStore::for_challenge(&challenge.name)?;
  let mut session =
    Session::start(challenge, home, store, ShellHooks, StdRng::from_entropy());

  match session.check_advance()? {
    Verdict::Stay => {}
    Verdict::Advance => session.advance(None)?,
    Verdict::AdvanceTo(name) => session.advance(Some(&name))?,
  }
  session.print_if_needed(cli.no_pretty_print)?;

  // Prompt trailer, deliberately without a trailing newline.
  print!("{}", session.identifier()?);
  let _ = std::io::stdout().flush();
  Ok(ExitCode::SUCCESS)
}
