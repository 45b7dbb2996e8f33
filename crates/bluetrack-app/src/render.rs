//! Plain-text rendering of a session snapshot

use bluetrack_core::ChartSeries;
use bluetrack_session::SessionSnapshot;
use std::fmt::Write;

/// Width of the longest chart bar, in characters
pub const BAR_WIDTH: usize = 40;

/// Full view: header, error line, device list, and chart
pub fn render_view(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();

    let button = snapshot.scan_button();
    let refreshed = snapshot
        .last_refreshed
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    let _ = writeln!(
        out,
        "[{}] {} device(s), refreshed {}",
        button.label,
        snapshot.devices.len(),
        refreshed
    );

    if let Some(message) = snapshot.error_message() {
        let _ = writeln!(out, "Error: {}", message);
    }

    out.push('\n');
    out.push_str(&render_list(snapshot));
    out.push('\n');
    out.push_str(&render_chart(&snapshot.chart()));
    out
}

/// One block per device: title, mac, distance, RSSI if reported, and the
/// offered action
pub fn render_list(snapshot: &SessionSnapshot) -> String {
    let rows = snapshot.rows();
    if rows.is_empty() {
        return "No devices\n".to_string();
    }

    let mut out = String::new();
    for (row, device) in rows.iter().zip(&snapshot.devices) {
        let _ = writeln!(out, "{} ({})", row.title, row.state);
        let _ = writeln!(out, "  {}", row.mac);
        let _ = writeln!(out, "  {}", row.distance);
        if let Some(rssi) = device.rssi {
            let _ = writeln!(out, "  RSSI: {} dBm", rssi);
        }
        let _ = writeln!(out, "  [{}]", row.action);
    }
    out
}

/// Horizontal bars scaled to the largest value in the series
pub fn render_chart(series: &ChartSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", series.name);
    if series.is_empty() {
        return out;
    }

    let label_width = series.labels().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = series.max_value();

    for point in &series.points {
        let len = if max > 0.0 {
            ((point.value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:<width$} | {} {}",
            point.label,
            "#".repeat(len),
            point.value,
            width = label_width
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluetrack_core::{project_chart, Device, Mac};
    use std::collections::HashSet;

    fn snapshot(devices: Vec<Device>) -> SessionSnapshot {
        SessionSnapshot {
            devices,
            revision: 1,
            scanning: false,
            last_error: None,
            last_refreshed: None,
            pending: HashSet::new(),
            seen_connected: HashSet::new(),
        }
    }

    fn earbuds() -> Device {
        Device::new("AA:BB").with_name("Earbuds").with_distance(1.2)
    }

    #[test]
    fn test_list_shows_earbuds_row() {
        let text = render_list(&snapshot(vec![earbuds()]));
        assert_eq!(
            text,
            "Earbuds (discovered)\n  AA:BB\n  Distance: 1.2 m\n  [Pair]\n"
        );
    }

    #[test]
    fn test_connected_device_offers_disconnect() {
        let text = render_list(&snapshot(vec![earbuds().with_connected(true)]));
        assert!(text.contains("[Disconnect]"));
        assert!(text.contains("(connected)"));
    }

    #[test]
    fn test_rssi_line_when_reported() {
        let mut device = earbuds();
        device.rssi = Some(-58);
        let text = render_list(&snapshot(vec![device]));
        assert_eq!(
            text,
            "Earbuds (discovered)\n  AA:BB\n  Distance: 1.2 m\n  RSSI: -58 dBm\n  [Pair]\n"
        );
    }

    #[test]
    fn test_unknown_name_and_distance() {
        let text = render_list(&snapshot(vec![Device::new("CC:DD")]));
        assert!(text.starts_with("Unknown Device"));
        assert!(text.contains("Distance: ?"));
    }

    #[test]
    fn test_chart_bars_scale_to_largest() {
        let devices = vec![
            earbuds(),
            Device::new("CC:DD").with_name("Speaker").with_distance(2.4),
            Device::new("EE:FF"),
        ];
        let text = render_chart(&project_chart(&devices));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Distance (m)");
        assert_eq!(lines[1], format!("Earbuds | {} 1.2", "#".repeat(20)));
        assert_eq!(lines[2], format!("Speaker | {} 2.4", "#".repeat(40)));
        assert_eq!(lines[3], "EE:FF   |  0");
    }

    #[test]
    fn test_empty_view() {
        let text = render_view(&snapshot(Vec::new()));
        assert!(text.starts_with("[Scan] 0 device(s), refreshed never"));
        assert!(text.contains("No devices"));
    }

    #[test]
    fn test_view_shows_error_and_scanning() {
        let mut snap = snapshot(vec![earbuds()]);
        snap.scanning = true;
        snap.pending.insert(Mac::from("AA:BB"));
        snap.last_error = Some(bluetrack_core::ErrorCategory::NetworkUnreachable);

        let text = render_view(&snap);
        assert!(text.starts_with("[Scanning...]"));
        assert!(text.contains("Error: Backend unreachable"));
        assert!(text.contains("Earbuds (pending)"));
    }
}
