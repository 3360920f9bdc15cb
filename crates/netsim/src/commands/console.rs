//! `netsim console`: drive an interpreter session from stdin or a script.

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use netsim_core::{CatalogAdvisor, Outcome, Response, Session};

use crate::cli::{ConsoleArgs, GlobalOpts};
use crate::config::LoadedLab;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Input sources ───────────────────────────────────────────────────

enum Input {
    Script(std::vec::IntoIter<String>),
    Stdin(Lines<BufReader<Stdin>>),
}

impl Input {
    fn script(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        let lines: Vec<String> = text.lines().map(str::to_owned).collect();
        Ok(Self::Script(lines.into_iter()))
    }

    fn stdin() -> Self {
        Self::Stdin(BufReader::new(tokio::io::stdin()).lines())
    }

    async fn next_line(&mut self) -> Result<Option<String>, CliError> {
        match self {
            Self::Script(lines) => Ok(lines.next()),
            Self::Stdin(lines) => Ok(lines.next_line().await?),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(lab: &LoadedLab, args: ConsoleArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let device = util::resolve_device(&lab.store, &args.device)?;
    let mut config = lab.session.clone();
    if args.no_hints {
        config.hints_enabled = false;
    }
    let mut session = Session::open(Arc::clone(&lab.store), device.id.clone(), config)?
        .with_advisor(Arc::new(CatalogAdvisor));

    let color = output::should_color(&global.color);
    let (mut input, echo) = match &args.script {
        Some(path) => (Input::script(path)?, true),
        None => (Input::stdin(), !std::io::stdin().is_terminal()),
    };

    loop {
        if !echo {
            print!("{}", session.prompt());
            std::io::stdout().flush()?;
        }
        let Some(line) = input.next_line().await? else {
            break;
        };
        if echo {
            println!("{}{line}", session.prompt());
        }

        let response = session.execute(&line);
        print_response(&response, color);

        match response.outcome {
            Outcome::Closed => break,
            Outcome::Reloading => {
                for line in wait_for_boot(&mut session).await {
                    println!("{line}");
                }
            }
            Outcome::Continue | Outcome::Refused => {}
        }

        if response.is_error() {
            tokio::task::yield_now().await;
            print_hints(&session.drain_hints(), color);
        }
    }

    // End of input without `exit`: flush hints for the last line.
    if !session.is_closed() {
        tokio::task::yield_now().await;
        print_hints(&session.drain_hints(), color);
    }

    if args.save {
        lab.save()?;
        if !global.quiet {
            eprintln!("Saved topology to {}", lab.path.display());
        }
    }
    Ok(())
}

fn print_response(response: &Response, color: bool) {
    print_hints(&response.hints, color);
    for line in &response.lines {
        println!("{line}");
    }
}

fn print_hints(hints: &[String], color: bool) {
    for hint in hints {
        println!("{}", output::hint(hint, color));
    }
}

/// Block on the reload timer behind a spinner. The spinner draws to
/// stderr and hides itself when stderr is not a terminal.
async fn wait_for_boot(session: &mut Session) -> Vec<String> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Booting {}...", session.hostname()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let banner = session.wait_until_ready().await;
    spinner.finish_and_clear();
    banner
}
