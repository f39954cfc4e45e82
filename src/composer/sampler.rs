//! Random topology sampling.

use rand::prelude::*;

use crate::schema::{ModelDescriptor, ModelNode, NodeFactory, NodeId, Topology};

/// Random number generator for topology draws.
///
/// Owns the only randomness in the engine: seeding one of these is enough
/// to reproduce an entire search.
pub struct SamplerRng {
    rng: StdRng,
}

impl SamplerRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with entropy from the OS.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform draw from `[1, max]` inclusive.
    fn node_count(&mut self, max: usize) -> usize {
        self.rng.gen_range(1..=max)
    }

    /// Uniform pick from a non-empty candidate list.
    fn pick<'a>(&mut self, candidates: &'a [ModelDescriptor]) -> &'a ModelDescriptor {
        &candidates[self.rng.gen_range(0..candidates.len())]
    }
}

/// Draws random candidate topologies from the requirement lists.
///
/// The grammar is flat: between one and `primary.len()` leaf nodes, drawn
/// with replacement, behind at most one aggregating node. Draws may
/// repeat a descriptor.
pub struct TopologySampler<F> {
    factory: F,
    rng: SamplerRng,
}

impl<F: NodeFactory> TopologySampler<F> {
    /// Sampler around a node factory and an injected rng.
    pub fn new(factory: F, rng: SamplerRng) -> Self {
        Self { factory, rng }
    }

    /// Draw one candidate topology.
    ///
    /// Callers guarantee `primary` is non-empty and `secondary` is
    /// non-empty whenever `primary.len() > 1`; the optimiser validates
    /// both before iterating.
    pub fn sample(
        &mut self,
        primary: &[ModelDescriptor],
        secondary: &[ModelDescriptor],
    ) -> Topology {
        let mut topology = Topology::new();

        let num_primary = self.rng.node_count(primary.len());
        for _ in 0..num_primary {
            let descriptor = self.rng.pick(primary);
            topology.push(self.factory.primary(descriptor));
        }

        // A single leaf stands alone; anything wider gets an aggregator.
        if topology.len() > 1 {
            let descriptor = self.rng.pick(secondary);
            let upstream = upstream_for_secondary(topology.nodes());
            topology.push(self.factory.secondary(descriptor, upstream));
        }

        topology
    }
}

/// Ids the next aggregating node should consume: every node with no
/// upstream of its own, or every node when that filter comes up empty.
///
/// The fallback cannot trigger while topologies carry at most one
/// aggregating node, but it keeps the wiring rule total if the grammar
/// ever grows deeper stacks.
pub(crate) fn upstream_for_secondary(nodes: &[ModelNode]) -> Vec<NodeId> {
    let unconsumed: Vec<NodeId> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.upstream.is_empty())
        .map(|(id, _)| id)
        .collect();

    if unconsumed.is_empty() {
        (0..nodes.len()).collect()
    } else {
        unconsumed
    }
}
