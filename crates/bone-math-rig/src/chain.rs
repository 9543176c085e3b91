use log::debug;

use crate::armature::{BoneHierarchy, BoneId};

/// Find the first bone of the IK chain that ends at `end`.
///
/// A `chain_count` of 0 follows parents until a bone without one. Otherwise the
/// chain spans `chain_count` bones including `end`; if the hierarchy is shorter
/// the root bone is the start.
pub fn find_chain_start<H: BoneHierarchy + ?Sized>(hierarchy: &H, end: BoneId, chain_count: u32) -> BoneId {
    let mut start = end;

    if chain_count == 0 {
        while let Some(parent) = hierarchy.parent(start) {
            start = parent;
        }
        return start;
    }

    for hop in 0..chain_count - 1 {
        match hierarchy.parent(start) {
            Some(parent) => start = parent,
            None => {
                debug!(
                    "chain of {chain_count} bones from bone {end} reached the root after {hop} hops"
                );
                break;
            }
        }
    }

    start
}
