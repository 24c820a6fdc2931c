//! Plain text output formatting.
//!
//! [`render`] is the uncolored summary report; the `print_*` helpers add
//! terminal styling for interactive use.

use crate::scanner::{ScanReport, TargetResult, TargetStatus};
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "============================================================";

/// Styles used by the report writer. All no-ops when styling is off.
struct Palette {
    rule: Style,
    title: Style,
    target: Style,
    notice: Style,
    failure: Style,
}

impl Palette {
    fn new(enabled: bool) -> Self {
        let make = |s: Style| s.force_styling(enabled);
        Self {
            rule: make(Style::new().magenta()),
            title: make(Style::new().magenta().bold()),
            target: make(Style::new().cyan().bold()),
            notice: make(Style::new().yellow()),
            failure: make(Style::new().red()),
        }
    }
}

/// Render the summary report as plain text.
pub fn render(report: &ScanReport) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_report(&mut buf, report, &Palette::new(false));
    String::from_utf8_lossy(&buf).into_owned()
}

/// Print the summary report to stdout, colored when the terminal allows.
pub fn print_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, &Palette::new(console::colors_enabled()))?;
    out.flush()
}

fn write_report(out: &mut impl Write, report: &ScanReport, palette: &Palette) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", palette.rule.apply_to(RULE))?;
    writeln!(out, "{}", palette.title.apply_to("SCAN SUMMARY REPORT"))?;
    writeln!(out, "{}", palette.rule.apply_to(RULE))?;

    if report.targets.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", palette.notice.apply_to("No targets were scanned"))?;
    }

    for target in &report.targets {
        writeln!(out)?;
        write_target(out, target, palette)?;
    }

    if report.interrupted {
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            palette
                .failure
                .apply_to("Scan interrupted by user; results are partial")
        )?;
    }

    Ok(())
}

fn write_target(out: &mut impl Write, target: &TargetResult, palette: &Palette) -> io::Result<()> {
    writeln!(out, "{}", palette.target.apply_to(format!("Target: {}", target.target)))?;

    match &target.status {
        TargetStatus::Unresolved => {
            return writeln!(
                out,
                "  {}",
                palette
                    .failure
                    .apply_to(format!("Could not resolve host {}", target.target))
            );
        }
        TargetStatus::Failed { reason } => {
            return writeln!(
                out,
                "  {}",
                palette.failure.apply_to(format!("Scan failed: {}", reason))
            );
        }
        TargetStatus::Complete | TargetStatus::Interrupted => {}
    }

    if target.open_ports.is_empty() {
        writeln!(out, "  {}", palette.notice.apply_to("No open ports found"))?;
    } else {
        let mut ports: Vec<_> = target.open_ports.iter().collect();
        ports.sort_by_key(|p| p.port);
        for open in ports {
            writeln!(out, "  Port {:<6} - {}", open.port, open.service)?;
        }
    }

    if target.status == TargetStatus::Interrupted {
        writeln!(out, "  {}", palette.notice.apply_to("(interrupted before all ports were probed)"))?;
    }

    Ok(())
}

/// Print the startup banner.
pub fn print_banner() {
    println!();
    println!("{}", style(RULE).magenta());
    println!(
        "       {} v{}",
        style("PORTSCOUT TCP PORT SCANNER").magenta().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style(RULE).magenta());
    println!();
}

/// Announce the start of a target's scan.
pub fn print_scan_header(target: &str, ports: usize) {
    println!();
    println!(
        "{}",
        style(format!("[*] Starting scan for {} ({} ports)", target, ports)).cyan()
    );
    println!(
        "{}",
        style(format!(
            "[*] Scan started at {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ))
        .yellow()
    );
}

/// Announce the end of a target's scan.
pub fn print_target_summary(result: &TargetResult) {
    let finished = result.started_at
        + chrono::Duration::milliseconds(i64::try_from(result.duration_ms).unwrap_or(i64::MAX));
    println!(
        "{}",
        style(format!(
            "[*] Scan completed at {}",
            finished
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
        ))
        .yellow()
    );

    let line = match &result.status {
        TargetStatus::Unresolved => style(format!("[-] Host {} could not be resolved", result.target)).red(),
        TargetStatus::Failed { reason } => {
            style(format!("[-] Error scanning {}: {}", result.target, reason)).red()
        }
        _ => style(format!(
            "[*] Found {} open ports on {}",
            result.open_ports.len(),
            result.target
        ))
        .cyan(),
    };
    println!("{}", line);
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("[-]").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("[!]").yellow().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("[*]").green().bold(), msg);
}
