//! Writing a finished report to the terminal.

use std::io::Write;

use console::Term;
use lsipclib::{render, RenderOptions, Report};

/// Width of stdout when it is a terminal; pipes are never truncated.
fn terminal_width(term: &Term) -> Option<usize> {
    if !term.is_term() {
        return None;
    }
    term.size_checked().map(|(_, cols)| usize::from(cols))
}

/// Render `report` and write it to stdout.
pub fn print_report(report: &Report, options: RenderOptions) -> anyhow::Result<()> {
    let term = Term::stdout();
    let options = options.term_width(terminal_width(&term));
    let text = render(report, &options)?;

    let mut out = std::io::stdout().lock();
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}
