//! CSV export of hourly prices as `hour,node_id,price` rows.

use gridclear_algo::{ClearingError, ClearingResult};
use gridclear_core::{GridError, HourlyPrices};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub hour: usize,
    pub node_id: String,
    pub price: f64,
}

/// Flatten to records ordered by hour, then node id.
pub fn price_records(prices: &HourlyPrices) -> Vec<PriceRecord> {
    prices
        .iter()
        .flat_map(|(&hour, nodes)| {
            nodes.iter().map(move |(node_id, &price)| PriceRecord {
                hour,
                node_id: node_id.clone(),
                price,
            })
        })
        .collect()
}

pub fn write_prices_csv<W: Write>(writer: W, prices: &HourlyPrices) -> ClearingResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in price_records(prices) {
        wtr.serialize(record).map_err(csv_error)?;
    }
    wtr.flush().map_err(GridError::from)?;
    Ok(())
}

pub fn write_prices_csv_path(path: &Path, prices: &HourlyPrices) -> ClearingResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(GridError::from)?;
    }
    let file = File::create(path).map_err(GridError::from)?;
    write_prices_csv(file, prices)
}

fn csv_error(err: csv::Error) -> ClearingError {
    ClearingError::Grid(GridError::Parse(format!("writing price CSV: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridclear_core::NodePrices;

    fn sample() -> HourlyPrices {
        let mut prices = HourlyPrices::new();
        for hour in [1usize, 0] {
            let nodes: NodePrices = [("N2", 50.0 + hour as f64), ("N1", 30.5)]
                .into_iter()
                .map(|(n, p)| (n.to_string(), p))
                .collect();
            prices.insert(hour, nodes);
        }
        prices
    }

    #[test]
    fn rows_sorted_by_hour_then_node() {
        let mut buffer = Vec::new();
        write_prices_csv(&mut buffer, &sample()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "hour,node_id,price",
                "0,N1,30.5",
                "0,N2,50.0",
                "1,N1,30.5",
                "1,N2,51.0",
            ]
        );
    }

    #[test]
    fn writes_to_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/prices.csv");
        write_prices_csv_path(&path, &sample()).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let records: Vec<PriceRecord> = rdr.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(records, price_records(&sample()));
    }
}
