//! CSV output formatting.
//!
//! One row per open port. Targets without open ports still get a row
//! with empty port columns so their status is visible.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Write the report as CSV.
pub fn write_csv(out: impl Write, report: &ScanReport) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["target", "address", "status", "port", "service"])?;

    for target in &report.targets {
        let address = target.address.map(|a| a.to_string()).unwrap_or_default();
        let status = target.status.to_string();

        if target.open_ports.is_empty() {
            wtr.write_record([target.target.as_str(), address.as_str(), status.as_str(), "", ""])?;
            continue;
        }

        for open in &target.open_ports {
            wtr.write_record([
                target.target.as_str(),
                address.as_str(),
                status.as_str(),
                open.port.to_string().as_str(),
                open.service.as_str(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Print the report as CSV on stdout.
pub fn print_csv(report: &ScanReport) -> csv::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{OpenPort, TargetResult};
    use crate::types::Port;

    #[test]
    fn test_csv_rows() {
        let mut report = ScanReport::new();
        let mut up = TargetResult::new("127.0.0.1");
        up.address = Some("127.0.0.1".parse().unwrap());
        up.open_ports = vec![
            OpenPort::new(Port::new(22).unwrap(), "ssh"),
            OpenPort::new(Port::new(80).unwrap(), "http"),
        ];
        report.targets.push(up);
        report.targets.push(TargetResult::unresolved("nowhere.invalid"));
        report.targets.push(TargetResult::new("quiet.lan"));

        let mut buf = Vec::new();
        write_csv(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "target,address,status,port,service",
                "127.0.0.1,127.0.0.1,complete,22,ssh",
                "127.0.0.1,127.0.0.1,complete,80,http",
                "nowhere.invalid,,unresolved,,",
                "quiet.lan,,complete,,",
            ]
        );
    }
}
