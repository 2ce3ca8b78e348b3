use super::{form, input_at, tag, FeatureExtractor};
use crate::graph::DependencyGraph;
use crate::system::Configuration;

/// Features for arc-eager parsing.
///
/// A subset of the templates of *Transition-based dependency parsing
/// with rich non-local features*, Zhang and Nivre, 2011: the top of
/// the stack (S0), its head, the next three input tokens (N0-N2), the
/// outermost dependents of S0 and N0, the distance between S0 and N0
/// and the left and right valencies.
#[derive(Clone, Copy, Debug, Default)]
pub struct EagerFeatures;

impl FeatureExtractor for EagerFeatures {
    fn extract(&self, config: &Configuration) -> Vec<String> {
        let graph = config.graph();

        let s0 = config.stack_at(0);
        let n0 = input_at(config, 0);
        let n1 = input_at(config, 1);
        let n2 = input_at(config, 2);

        let s0h = s0.and_then(|s0| graph.head(s0)).map(|edge| edge.head());
        let s0l = s0.and_then(|s0| graph.leftmost_dependent(s0).filter(|&dep| dep < s0));
        let s0r = s0.and_then(|s0| graph.rightmost_dependent(s0).filter(|&dep| dep > s0));
        let n0l = n0.and_then(|n0| graph.leftmost_dependent(n0).filter(|&dep| dep < n0));

        let (s0w, s0p) = (form(config, s0), tag(config, s0));
        let (n0w, n0p) = (form(config, n0), tag(config, n0));
        let (n1w, n1p) = (form(config, n1), tag(config, n1));
        let (n2w, n2p) = (form(config, n2), tag(config, n2));
        let (s0hw, s0hp) = (form(config, s0h), tag(config, s0h));
        let (s0lw, s0lp) = (form(config, s0l), tag(config, s0l));
        let (s0rw, s0rp) = (form(config, s0r), tag(config, s0r));
        let (n0lw, n0lp) = (form(config, n0l), tag(config, n0l));

        let d = match (s0, n0) {
            (Some(s0), Some(n0)) => n0 - s0,
            _ => 0,
        };

        let s0vl = s0.map(|s0| left_valency(graph, s0)).unwrap_or(0);
        let s0vr = s0.map(|s0| right_valency(graph, s0)).unwrap_or(0);
        let n0vl = n0.map(|n0| left_valency(graph, n0)).unwrap_or(0);

        vec![
            // Single tokens.
            format!("s0wp={}|{}", s0w, s0p),
            format!("s0w={}", s0w),
            format!("s0p={}", s0p),
            format!("n0wp={}|{}", n0w, n0p),
            format!("n0w={}", n0w),
            format!("n0p={}", n0p),
            format!("n1wp={}|{}", n1w, n1p),
            format!("n1w={}", n1w),
            format!("n1p={}", n1p),
            format!("n2wp={}|{}", n2w, n2p),
            format!("n2w={}", n2w),
            format!("n2p={}", n2p),
            // Token pairs.
            format!("s0wp_n0wp={}|{}|{}|{}", s0w, s0p, n0w, n0p),
            format!("s0wp_n0w={}|{}|{}", s0w, s0p, n0w),
            format!("s0w_n0wp={}|{}|{}", s0w, n0w, n0p),
            format!("s0wp_n0p={}|{}|{}", s0w, s0p, n0p),
            format!("s0p_n0wp={}|{}|{}", s0p, n0w, n0p),
            format!("s0w_n0w={}|{}", s0w, n0w),
            format!("s0p_n0p={}|{}", s0p, n0p),
            format!("n0p_n1p={}|{}", n0p, n1p),
            // Token triples.
            format!("n0p_n1p_n2p={}|{}|{}", n0p, n1p, n2p),
            format!("s0p_n0p_n1p={}|{}|{}", s0p, n0p, n1p),
            format!("s0hp_s0p_n0p={}|{}|{}", s0hp, s0p, n0p),
            format!("s0p_s0lp_n0p={}|{}|{}", s0p, s0lp, n0p),
            format!("s0p_s0rp_n0p={}|{}|{}", s0p, s0rp, n0p),
            format!("s0p_n0p_n0lp={}|{}|{}", s0p, n0p, n0lp),
            // Distance.
            format!("s0w_d={}|{}", s0w, d),
            format!("s0p_d={}|{}", s0p, d),
            format!("n0w_d={}|{}", n0w, d),
            format!("n0p_d={}|{}", n0p, d),
            format!("s0w_n0w_d={}|{}|{}", s0w, n0w, d),
            format!("s0p_n0p_d={}|{}|{}", s0p, n0p, d),
            // Valency.
            format!("s0w_vr={}|{}", s0w, s0vr),
            format!("s0p_vr={}|{}", s0p, s0vr),
            format!("s0w_vl={}|{}", s0w, s0vl),
            format!("s0p_vl={}|{}", s0p, s0vl),
            format!("n0w_vl={}|{}", n0w, n0vl),
            format!("n0p_vl={}|{}", n0p, n0vl),
            // Third-order unigrams.
            format!("s0hw={}", s0hw),
            format!("s0hp={}", s0hp),
            format!("s0lw={}", s0lw),
            format!("s0lp={}", s0lp),
            format!("s0rw={}", s0rw),
            format!("s0rp={}", s0rp),
            format!("n0lw={}", n0lw),
            format!("n0lp={}", n0lp),
        ]
    }
}

fn left_valency(graph: &DependencyGraph, head: usize) -> usize {
    graph.dependents(head).filter(|&dep| dep < head).count()
}

fn right_valency(graph: &DependencyGraph, head: usize) -> usize {
    graph.dependents(head).filter(|&dep| dep > head).count()
}
