//! quicksearch 命令行
//!
//! `quicksearch [--config <path>] <root> [pattern]`
//!
//! 之后 stdin 的每一行都会替换当前模式（空行清空结果），EOF 时等待搜索结束并退出。

mod logging;

use quicksearch::kernel::services::adapters::{
    build_runtime, ensure_settings_file, load_settings, load_settings_from, LocalResourceTree,
};
use quicksearch::kernel::services::ports::{MatchRecord, SearchConfig};
use quicksearch::kernel::QuickSearchSession;
use rustc_hash::FxHashSet;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    root: Option<String>,
    config: Option<PathBuf>,
    pattern: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> io::Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "--config requires a path")
            })?;
            parsed.config = Some(PathBuf::from(path));
        } else if parsed.root.is_none() {
            parsed.root = Some(arg);
        } else if parsed.pattern.is_none() {
            parsed.pattern = Some(arg);
        } else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unexpected argument: {}", arg),
            ));
        }
    }

    Ok(parsed)
}

/// 根目录：未指定时用当前目录，相对路径基于当前目录
fn resolve_root(cwd: &Path, arg: Option<&str>) -> io::Result<PathBuf> {
    let root = match arg {
        None => cwd.to_path_buf(),
        Some(arg) => {
            let path = PathBuf::from(arg);
            if path.is_absolute() {
                path
            } else {
                cwd.join(path)
            }
        }
    };

    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", root.display()),
        ));
    }
    Ok(root)
}

fn load_config(explicit: Option<&Path>) -> SearchConfig {
    let loaded = match explicit {
        Some(path) => load_settings_from(path),
        None => {
            if let Err(e) = ensure_settings_file() {
                tracing::warn!(error = %e, "cannot create default settings file");
            }
            load_settings()
        }
    };

    loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid settings, using defaults");
        SearchConfig::default()
    })
}

fn format_record(record: &MatchRecord) -> String {
    format!(
        "{}:{}: {}",
        record.resource_id(),
        record.line_label(),
        record.line_text
    )
}

/// 只打印上次之后新出现的结果
fn print_new_results(
    session: &mut QuickSearchSession,
    printed: &mut FxHashSet<MatchRecord>,
    out: &mut impl Write,
) -> io::Result<()> {
    if session.refresh().count == 0 {
        printed.clear();
    }

    for record in session.results() {
        if printed.contains(&record) {
            continue;
        }
        writeln!(out, "{}", format_record(&record))?;
        printed.insert(record);
    }
    out.flush()
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
    });
    rx
}

fn run(args: CliArgs) -> io::Result<()> {
    let cwd = std::env::current_dir()?;
    let root = resolve_root(&cwd, args.root.as_deref())?;
    let config = load_config(args.config.as_deref());

    let runtime = build_runtime()?;
    let tree = LocalResourceTree::new(&root, &config)
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e.to_string()))?;
    let (mut session, refresh_rx) =
        QuickSearchSession::new(runtime.handle().clone(), Arc::new(tree), &config);

    tracing::info!(root = %root.display(), "quick search session opened");

    if let Some(pattern) = args.pattern.as_deref() {
        session.set_initial_pattern(pattern);
    }

    let lines = spawn_stdin_reader();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut printed = FxHashSet::default();
    let mut input_open = true;

    loop {
        if input_open {
            loop {
                match lines.try_recv() {
                    Ok(line) => {
                        session.set_pattern(&line);
                        printed.clear();
                    }
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        input_open = false;
                        break;
                    }
                }
            }
        }

        match refresh_rx.recv_timeout(POLL_INTERVAL) {
            Ok(()) => print_new_results(&mut session, &mut printed, &mut out)?,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if !input_open && !session.is_busy() {
            // 等最后一次合并刷新落地
            std::thread::sleep(config.refresh_delay());
            print_new_results(&mut session, &mut printed, &mut out)?;
            break;
        }
    }

    session.cancel();
    tracing::info!(results = session.len(), "quick search session closed");
    Ok(())
}

fn main() -> ExitCode {
    let _logging = logging::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: quicksearch [--config <path>] <root> [pattern]");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "quicksearch failed");
            eprintln!("quicksearch: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/cli_args.rs"]
mod tests;
