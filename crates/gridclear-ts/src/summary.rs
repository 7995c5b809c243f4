use gridclear_core::HourlyPrices;
use serde::Serialize;
use std::collections::BTreeMap;

/// Daily price statistics for one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDailySummary {
    pub node_id: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// First hour at which `max` occurs
    pub peak_hour: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub nodes: Vec<NodeDailySummary>,
    /// Mean over all node-hours
    pub system_average: f64,
    /// Mean across nodes for each hour, in hour order
    pub hourly_system_average: Vec<f64>,
    /// Hour with the highest system average; first occurrence wins
    pub peak_hour: Option<usize>,
    /// Hour with the lowest system average; first occurrence wins
    pub off_peak_hour: Option<usize>,
}

/// Summarize hourly prices per node, in node id order.
pub fn summarize(prices: &HourlyPrices) -> DailySummary {
    // node id -> (hour, price) in hour order
    let mut by_node: BTreeMap<&str, Vec<(usize, f64)>> = BTreeMap::new();
    for (&hour, node_prices) in prices {
        for (node_id, &price) in node_prices {
            by_node.entry(node_id.as_str()).or_default().push((hour, price));
        }
    }

    let mut total = 0.0;
    let mut count = 0usize;
    let nodes = by_node
        .into_iter()
        .map(|(node_id, series)| {
            let sum: f64 = series.iter().map(|(_, p)| p).sum();
            total += sum;
            count += series.len();
            let (peak_hour, max) = series
                .iter()
                .fold((0, f64::NEG_INFINITY), |best, &(hour, price)| {
                    if price > best.1 {
                        (hour, price)
                    } else {
                        best
                    }
                });
            let min = series
                .iter()
                .map(|(_, p)| *p)
                .fold(f64::INFINITY, f64::min);
            NodeDailySummary {
                node_id: node_id.to_string(),
                mean: sum / series.len() as f64,
                min,
                max,
                peak_hour,
            }
        })
        .collect();

    let hourly: Vec<(usize, f64)> = prices
        .iter()
        .filter(|(_, node_prices)| !node_prices.is_empty())
        .map(|(&hour, node_prices)| {
            let sum: f64 = node_prices.values().sum();
            (hour, sum / node_prices.len() as f64)
        })
        .collect();
    let peak_hour = extreme_hour(&hourly, |candidate, best| candidate > best);
    let off_peak_hour = extreme_hour(&hourly, |candidate, best| candidate < best);

    DailySummary {
        nodes,
        system_average: if count == 0 { 0.0 } else { total / count as f64 },
        hourly_system_average: hourly.into_iter().map(|(_, avg)| avg).collect(),
        peak_hour,
        off_peak_hour,
    }
}

/// Hour whose value beats every earlier one under `better`.
fn extreme_hour(hourly: &[(usize, f64)], better: impl Fn(f64, f64) -> bool) -> Option<usize> {
    let (&first, rest) = hourly.split_first()?;
    let best = rest
        .iter()
        .fold(first, |best, &entry| if better(entry.1, best.1) { entry } else { best });
    Some(best.0)
}
