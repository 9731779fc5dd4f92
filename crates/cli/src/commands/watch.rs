use super::parse;
use bunsenite_core::{Error, Result};
use bunsenite_ffi_bridge::NickelBridge;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};

pub fn execute(bridge: &NickelBridge, file: &Path, pretty: bool) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut watcher =
        notify::recommended_watcher(tx).map_err(|e| Error::watch(file, e.to_string()))?;
    watcher
        .watch(file, RecursiveMode::NonRecursive)
        .map_err(|e| Error::watch(file, e.to_string()))?;

    eprintln!("Watching {} for changes (Ctrl+C to stop)...", file.display());
    run(bridge, file, pretty, &rx, &mut std::io::stdout().lock())?;
    Ok(())
}

/// Evaluates `file` once, then again for every change event until the
/// sender hangs up
///
/// Evaluation failures are reported and the loop keeps going, so a broken
/// intermediate save does not end the session. Returns how many re-parses ran.
pub fn run<W: Write>(
    bridge: &NickelBridge,
    file: &Path,
    pretty: bool,
    events: &Receiver<notify::Result<Event>>,
    out: &mut W,
) -> Result<usize> {
    emit(bridge, file, pretty, out)?;

    let mut reparses = 0;
    for event in events {
        let event = event.map_err(|e| Error::watch(file, e.to_string()))?;
        if !triggers_reparse(&event.kind) {
            tracing::trace!(kind = ?event.kind, "ignoring file event");
            continue;
        }
        tracing::debug!(file = %file.display(), "file changed, re-parsing");
        writeln!(out, "\n--- {} changed, re-parsing ---\n", file.display())
            .map_err(|e| write_failed(file, &e))?;
        emit(bridge, file, pretty, out)?;
        reparses += 1;
    }
    Ok(reparses)
}

/// Editors either write in place or replace the file
fn triggers_reparse(kind: &EventKind) -> bool {
    kind.is_modify() || kind.is_create()
}

fn emit<W: Write>(bridge: &NickelBridge, file: &Path, pretty: bool, out: &mut W) -> Result<()> {
    let rendered = parse::evaluate(bridge, file).and_then(|value| parse::render(&value, pretty));
    match rendered {
        Ok(text) => writeln!(out, "{text}").map_err(|e| write_failed(file, &e)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            tracing::error!(file = %file.display(), error = %e, "evaluation failed");
            eprintln!("error: {e}");
            Ok(())
        }
    }
}

fn write_failed(file: &Path, e: &std::io::Error) -> Error {
    Error::watch(file, format!("failed to write output: {e}"))
}
