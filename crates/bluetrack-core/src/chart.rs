//! Distance chart projection
//!
//! Unknown distances are plotted as `0` while the list view shows `?` for
//! them. The two views intentionally disagree on this.

use serde::Serialize;

use crate::device::Device;

/// Series name shown in the chart legend
pub const CHART_SERIES_NAME: &str = "Distance (m)";

/// One labeled point on the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Labeled distance series in registry order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: &'static str,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.label.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Largest value in the series, `0` when empty
    pub fn max_value(&self) -> f64 {
        self.values().fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Derive the chart series from a registry snapshot
pub fn project_chart(devices: &[Device]) -> ChartSeries {
    let points = devices
        .iter()
        .map(|device| ChartPoint {
            label: device.label().to_string(),
            value: device.known_distance().unwrap_or(0.0),
        })
        .collect();

    ChartSeries {
        name: CHART_SERIES_NAME,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_device_with_distance() {
        let devices = vec![Device::new("AA:BB").with_name("Earbuds").with_distance(1.2)];
        let series = project_chart(&devices);

        assert_eq!(series.name, "Distance (m)");
        assert_eq!(
            series.points,
            vec![ChartPoint {
                label: "Earbuds".to_string(),
                value: 1.2
            }]
        );
    }

    #[test]
    fn test_unknown_distance_plots_as_zero() {
        let devices = vec![Device::new("AA:BB")];
        let series = project_chart(&devices);

        assert_eq!(series.labels().collect::<Vec<_>>(), vec!["AA:BB"]);
        assert_eq!(series.values().collect::<Vec<_>>(), vec![0.0]);
    }

    #[test]
    fn test_order_follows_snapshot() {
        let devices = vec![
            Device::new("CC:DD").with_distance(4.0),
            Device::new("AA:BB").with_name("Earbuds").with_distance(1.0),
        ];
        let series = project_chart(&devices);

        assert_eq!(series.labels().collect::<Vec<_>>(), vec!["CC:DD", "Earbuds"]);
        assert_eq!(series.max_value(), 4.0);
    }

    #[test]
    fn test_empty_snapshot() {
        let series = project_chart(&[]);
        assert!(series.is_empty());
        assert_eq!(series.max_value(), 0.0);
    }
}
