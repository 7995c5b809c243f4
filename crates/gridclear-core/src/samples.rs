//! Reference networks for demos and tests.

use crate::market::{BidMap, BidSegment};
use crate::{Generator, GeneratorKind, GridError, GridResult, Load, Network, Node, TransmissionLine};

/// Names accepted by [`by_name`]
pub const SAMPLE_NAMES: &[&str] = &["three-bus", "balanced"];

/// Look up a sample network by name.
pub fn by_name(name: &str) -> GridResult<Network> {
    match name {
        "three-bus" | "3bus" => Ok(sample_three_bus()),
        "balanced" | "five-bus" => Ok(balanced_five_bus()),
        other => Err(GridError::UnknownElement {
            kind: "sample",
            id: other.to_string(),
        }),
    }
}

/// A sample network together with its stepped offers, if it has any.
pub fn sample_with_bids(name: &str) -> GridResult<(Network, BidMap)> {
    let network = by_name(name)?;
    let bids = match name {
        "balanced" | "five-bus" => balanced_five_bus_bids(),
        _ => BidMap::new(),
    };
    Ok((network, bids))
}

/// Three buses in a triangle: two thermal units and one hydro unit serving 700 MW.
pub fn sample_three_bus() -> Network {
    let mut network = Network::new("Sample3BusSystem");

    network.add_node(Node::new("N1", "Guangzhou").at(0.0, 0.0));
    network.add_node(Node::new("N2", "Shenzhen").at(1.0, 0.0));
    network.add_node(Node::new("N3", "Zhuhai").at(2.0, 0.0));

    network.add_generator(
        Generator::new("G1", "N1", GeneratorKind::Thermal)
            .with_name("Guangzhou Plant 1")
            .with_limits(0.0, 300.0)
            .with_marginal_cost(280.0),
    );
    network.add_generator(
        Generator::new("G2", "N2", GeneratorKind::Thermal)
            .with_name("Shenzhen Plant 1")
            .with_limits(0.0, 400.0)
            .with_marginal_cost(320.0),
    );
    network.add_generator(
        Generator::new("G3", "N3", GeneratorKind::Hydro)
            .with_name("Zhuhai Plant 1")
            .with_limits(0.0, 200.0)
            .with_marginal_cost(180.0),
    );

    network.add_load(Load::new("L1", "N1", 250.0).with_name("Guangzhou Load"));
    network.add_load(Load::new("L2", "N2", 350.0).with_name("Shenzhen Load"));
    network.add_load(Load::new("L3", "N3", 100.0).with_name("Zhuhai Load"));

    network.add_line(TransmissionLine::new("L12", "N1", "N2", 0.05, 200.0).with_name("Guangzhou-Shenzhen"));
    network.add_line(TransmissionLine::new("L23", "N2", "N3", 0.08, 150.0).with_name("Shenzhen-Zhuhai"));
    network.add_line(TransmissionLine::new("L13", "N1", "N3", 0.10, 120.0).with_name("Guangzhou-Zhuhai"));

    network
}

/// Five buses with ample capacity, including a wind farm and a solar plant.
pub fn balanced_five_bus() -> Network {
    let mut network = Network::new("Balanced5BusSystem");

    network.add_node(Node::new("GZ", "Guangzhou").at(0.0, 0.0));
    network.add_node(Node::new("SZ", "Shenzhen").at(1.0, 0.0));
    network.add_node(Node::new("ZH", "Zhuhai").at(2.0, 0.0));
    network.add_node(Node::new("FS", "Foshan").at(0.0, 1.0));
    network.add_node(Node::new("DG", "Dongguan").at(1.0, 1.0));

    let units = [
        ("GZ_G1", "GZ", GeneratorKind::Thermal, 20.0, 400.0, 280.0),
        ("SZ_G1", "SZ", GeneratorKind::Thermal, 20.0, 500.0, 300.0),
        ("ZH_G1", "ZH", GeneratorKind::Hydro, 10.0, 200.0, 180.0),
        ("ZH_G2", "ZH", GeneratorKind::Wind, 0.0, 150.0, 50.0),
        ("FS_G1", "FS", GeneratorKind::Thermal, 20.0, 300.0, 290.0),
        ("DG_G1", "DG", GeneratorKind::Solar, 0.0, 100.0, 40.0),
        ("DG_G2", "DG", GeneratorKind::Thermal, 15.0, 250.0, 310.0),
    ];
    for (id, node, kind, min, max, cost) in units {
        network.add_generator(
            Generator::new(id, node, kind)
                .with_limits(min, max)
                .with_marginal_cost(cost),
        );
    }

    for (id, node, demand) in [
        ("GZ_L1", "GZ", 180.0),
        ("SZ_L1", "SZ", 250.0),
        ("ZH_L1", "ZH", 120.0),
        ("FS_L1", "FS", 150.0),
        ("DG_L1", "DG", 180.0),
    ] {
        network.add_load(Load::new(id, node, demand));
    }

    for (id, from, to, x, limit) in [
        ("GZ_SZ", "GZ", "SZ", 0.02, 400.0),
        ("SZ_ZH", "SZ", "ZH", 0.03, 300.0),
        ("GZ_FS", "GZ", "FS", 0.02, 350.0),
        ("GZ_DG", "GZ", "DG", 0.04, 300.0),
        ("FS_DG", "FS", "DG", 0.03, 250.0),
    ] {
        network.add_line(TransmissionLine::new(id, from, to, x, limit));
    }

    network
}

/// Stepped offers for [`balanced_five_bus`]: thermal units climb in 100 MW
/// steps, hydro and renewables bid low.
pub fn balanced_five_bus_bids() -> BidMap {
    let mut bids = BidMap::new();
    for gen_id in ["GZ_G1", "SZ_G1", "FS_G1", "DG_G2"] {
        bids.insert(
            gen_id.to_string(),
            vec![
                BidSegment::new(0.0, 100.0, 280.0),
                BidSegment::new(100.0, 200.0, 300.0),
                BidSegment::new(200.0, 300.0, 320.0),
                BidSegment::new(300.0, 400.0, 340.0),
            ],
        );
    }
    bids.insert(
        "ZH_G1".to_string(),
        vec![
            BidSegment::new(0.0, 100.0, 180.0),
            BidSegment::new(100.0, 200.0, 200.0),
        ],
    );
    bids.insert("ZH_G2".to_string(), vec![BidSegment::new(0.0, 150.0, 50.0)]);
    bids.insert("DG_G1".to_string(), vec![BidSegment::new(0.0, 100.0, 40.0)]);
    bids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_valid() {
        for name in SAMPLE_NAMES {
            let network = by_name(name).unwrap();
            assert!(network.validate().is_ok(), "{name} failed validation");
        }
        assert!(by_name("ieee-14").is_err());
    }

    #[test]
    fn only_balanced_sample_carries_offers() {
        let (_, bids) = sample_with_bids("three-bus").unwrap();
        assert!(bids.is_empty());
        let (network, bids) = sample_with_bids("five-bus").unwrap();
        assert_eq!(bids.len(), network.generators().len());
    }

    #[test]
    fn balanced_has_spare_capacity() {
        let network = balanced_five_bus();
        let stats = network.stats();
        assert_eq!(stats.num_nodes, 5);
        assert_eq!(stats.num_generators, 7);
        assert!(stats.total_capacity_mw > 2.0 * stats.total_demand_mw);
        assert!(network
            .validate_with_bids(&balanced_five_bus_bids())
            .is_ok());
    }
}
