//! Random network trees for property tests.

use proptest::prelude::*;

use super::{DeviceType, NetworkNode};

fn device() -> impl Strategy<Value = DeviceType> {
    prop_oneof![Just(DeviceType::Nmos), Just(DeviceType::Pmos)]
}

/// Arbitrary series/parallel trees, including empty and single-child blocks.
pub(crate) fn network() -> impl Strategy<Value = NetworkNode> {
    let leaf = ("[A-F]", device()).prop_map(|(name, device)| NetworkNode::transistor(name, device));
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(NetworkNode::series),
            prop::collection::vec(inner, 0..4).prop_map(NetworkNode::parallel),
        ]
    })
}
