//! Transistor count statistics for a PUN/PDN pair.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{CmosNetwork, NetworkNode};

/// Transistors needed per input inverter (one NMOS, one PMOS).
pub const INVERTER_TRANSISTORS: usize = 2;

/// Device totals for one CMOS gate, including input inverters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransistorCount {
    #[serde(alias = "pdn_leaves")]
    pub pdn_transistors: usize,
    #[serde(alias = "pun_leaves")]
    pub pun_transistors: usize,
    #[serde(alias = "inverter_transistors")]
    pub inverter_transistors: usize,
    #[serde(alias = "total")]
    pub total_transistors: usize,
    /// Distinct gate signals used in negated form, sorted
    #[serde(default)]
    pub inverted_inputs: Vec<String>,
}

impl TransistorCount {
    /// Count the devices in both networks.
    pub fn from_network(network: &CmosNetwork) -> Self {
        let pdn_transistors = network.pdn.transistor_count();
        let pun_transistors = network.pun.transistor_count();

        let mut inverted = BTreeSet::new();
        collect_inverted(&network.pdn, &mut inverted);
        collect_inverted(&network.pun, &mut inverted);
        let inverted_inputs: Vec<String> = inverted.into_iter().map(str::to_string).collect();

        let inverter_transistors = INVERTER_TRANSISTORS * inverted_inputs.len();
        Self {
            pdn_transistors,
            pun_transistors,
            inverter_transistors,
            total_transistors: pdn_transistors + pun_transistors + inverter_transistors,
            inverted_inputs,
        }
    }
}

fn collect_inverted<'a>(node: &'a NetworkNode, out: &mut BTreeSet<&'a str>) {
    for leaf in node.leaves() {
        if leaf.gate_inverted {
            out.insert(leaf.gate());
        }
    }
}
