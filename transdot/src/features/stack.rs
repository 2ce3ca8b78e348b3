use super::{form, input_at, tag, FeatureExtractor};
use crate::system::Configuration;

/// Features over the three topmost stack tokens.
///
/// Besides the stack tokens, the templates use the next two input
/// tokens and the leftmost and rightmost dependents of the two topmost
/// stack tokens. These are the tokens that arc-standard reductions
/// operate on.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackFeatures;

impl FeatureExtractor for StackFeatures {
    fn extract(&self, config: &Configuration) -> Vec<String> {
        let graph = config.graph();

        let s0 = config.stack_at(0);
        let s1 = config.stack_at(1);
        let s2 = config.stack_at(2);
        let n0 = input_at(config, 0);
        let n1 = input_at(config, 1);

        let s0l = s0.and_then(|s0| graph.leftmost_dependent(s0));
        let s0r = s0.and_then(|s0| graph.rightmost_dependent(s0));
        let s1l = s1.and_then(|s1| graph.leftmost_dependent(s1));
        let s1r = s1.and_then(|s1| graph.rightmost_dependent(s1));

        let (s0w, s0t) = (form(config, s0), tag(config, s0));
        let (s1w, s1t) = (form(config, s1), tag(config, s1));
        let s2t = tag(config, s2);
        let (n0w, n0t) = (form(config, n0), tag(config, n0));
        let n1t = tag(config, n1);

        let dist = match (s0, s1) {
            (Some(s0), Some(s1)) => (s0 - s1).min(5).to_string(),
            _ => "0".to_string(),
        };

        vec![
            format!("s0w={}", s0w),
            format!("s0t={}", s0t),
            format!("s0wt={}|{}", s0w, s0t),
            format!("s1w={}", s1w),
            format!("s1t={}", s1t),
            format!("s1wt={}|{}", s1w, s1t),
            format!("s2t={}", s2t),
            format!("n0w={}", n0w),
            format!("n0t={}", n0t),
            format!("n1t={}", n1t),
            format!("s0w_s1w={}|{}", s0w, s1w),
            format!("s0t_s1t={}|{}", s0t, s1t),
            format!("s0t_s1t_s2t={}|{}|{}", s0t, s1t, s2t),
            format!("s0t_s1t_n0t={}|{}|{}", s0t, s1t, n0t),
            format!("s0t_n0t={}|{}", s0t, n0t),
            format!("s0w_n0t={}|{}", s0w, n0t),
            format!("s1t_s0t_s0lt={}|{}|{}", s1t, s0t, tag(config, s0l)),
            format!("s1t_s0t_s0rt={}|{}|{}", s1t, s0t, tag(config, s0r)),
            format!("s1t_s0t_s1lt={}|{}|{}", s1t, s0t, tag(config, s1l)),
            format!("s1t_s0t_s1rt={}|{}|{}", s1t, s0t, tag(config, s1r)),
            format!("s0t_s1t_d={}|{}|{}", s0t, s1t, dist),
            format!("s0w_s1w_d={}|{}|{}", s0w, s1w, dist),
        ]
    }
}
