//! Arc-eager transition system.
//!
//! Action names differ from Nivre (2003): ARC-LEFT is `ReduceLeft`,
//! ARC-RIGHT is `ReduceRight` and REDUCE is `Pop`. The parse is finished
//! as soon as the input is consumed; tokens that remain on the stack
//! without a head stay unattached.

use super::{Action, Configuration};

pub(super) fn is_terminal(config: &Configuration) -> bool {
    config.input_exhausted()
}

pub(super) fn is_legal(config: &Configuration, action: Action) -> bool {
    let top = config.stack.last().copied();

    match action {
        Action::Shift => !config.input_exhausted(),
        Action::ReduceLeft => match (top, config.next_token()) {
            (Some(top), Some(next)) => {
                top != 0 && !config.graph.has_head(next) && !config.graph.has_head(top)
            }
            _ => false,
        },
        Action::ReduceRight => match (top, config.next_token()) {
            (Some(_), Some(next)) => !config.graph.has_head(next),
            _ => false,
        },
        Action::Pop => top.map(|top| config.graph.has_head(top)).unwrap_or(false),
    }
}

pub(super) fn apply(config: &mut Configuration, action: Action) {
    match action {
        Action::Shift => config.shift(),
        Action::ReduceLeft => {
            let next = config.cursor;
            let top = pop(config);
            config.attach(next, top);
        }
        Action::ReduceRight => {
            let top = *config
                .stack
                .last()
                .unwrap_or_else(|| panic!("REDUCE_RIGHT on an empty stack"));
            config.attach(top, config.cursor);
            config.shift();
        }
        Action::Pop => {
            pop(config);
        }
    }
}

fn pop(config: &mut Configuration) -> usize {
    config
        .stack
        .pop()
        .unwrap_or_else(|| panic!("Pop from an empty stack"))
}

#[cfg(test)]
mod tests {
    use maplit::hashset;

    use crate::sentence::tests::sentence_with_heads;
    use crate::system::{Action, Configuration, TransitionSystem};

    #[test]
    fn reduce_right_stacks_dependent() {
        let sentence = sentence_with_heads(&[0, 1]);
        let mut config = Configuration::new(TransitionSystem::ArcEager, &sentence);
        config.apply(Action::Shift).unwrap();
        config.apply(Action::ReduceRight).unwrap();

        assert_eq!(config.stack(), &[0, 1]);
        assert_eq!(config.cursor(), 2);
        assert_eq!(config.graph().edge_set(), hashset! {(0, 1)});
    }

    #[test]
    fn reduce_left_pops_dependent() {
        let sentence = sentence_with_heads(&[2, 0]);
        let mut config = Configuration::new(TransitionSystem::ArcEager, &sentence);
        config.apply(Action::Shift).unwrap();
        config.apply(Action::Shift).unwrap();
        config.apply(Action::ReduceLeft).unwrap();

        assert_eq!(config.stack(), &[0]);
        assert_eq!(config.cursor(), 2);
        assert_eq!(config.graph().edge_set(), hashset! {(2, 1)});
    }

    #[test]
    fn reduce_left_requires_unattached_top() {
        let sentence = sentence_with_heads(&[0, 1]);
        let mut config = Configuration::new(TransitionSystem::ArcEager, &sentence);
        config.apply(Action::Shift).unwrap();
        config.apply(Action::ReduceRight).unwrap();

        // Token 1 is attached to the root.
        assert!(!config.is_legal(Action::ReduceLeft));
        assert!(config.is_legal(Action::ReduceRight));
        assert!(config.is_legal(Action::Pop));
    }

    #[test]
    fn root_cannot_become_a_dependent() {
        let sentence = sentence_with_heads(&[0]);
        let mut config = Configuration::new(TransitionSystem::ArcEager, &sentence);
        config.apply(Action::Shift).unwrap();

        assert!(!config.is_legal(Action::ReduceLeft));
        assert_eq!(
            config.valid_actions(),
            vec![Action::Shift, Action::ReduceRight]
        );
    }

    #[test]
    fn pop_requires_attached_top() {
        let sentence = sentence_with_heads(&[0, 1]);
        let mut config = Configuration::new(TransitionSystem::ArcEager, &sentence);
        assert!(!config.is_legal(Action::Pop));

        config.apply(Action::Shift).unwrap();
        config.apply(Action::Shift).unwrap();
        assert!(!config.is_legal(Action::Pop));
        assert!(config.apply(Action::Pop).is_err());
    }

    #[test]
    fn terminal_iff_input_consumed() {
        let sentence = sentence_with_heads(&[0, 1]);
        let mut config = Configuration::new(TransitionSystem::ArcEager, &sentence);
        for _ in 0..3 {
            assert!(!config.is_terminal());
            config.apply(Action::Shift).unwrap();
        }

        // Terminal with three unattached trees on the stack.
        assert!(config.is_terminal());
        assert_eq!(config.stack().len(), 3);
        assert!(!config.is_legal(Action::ReduceLeft));
        assert!(!config.is_legal(Action::ReduceRight));
    }

    #[test]
    fn legal_actions_never_assign_two_heads() {
        // Exhaustively explore all legal action sequences of a short
        // sentence and check that every token has at most one head.
        let sentence = sentence_with_heads(&[0, 1, 1]);
        let mut agenda = vec![Configuration::new(TransitionSystem::ArcEager, &sentence)];

        while let Some(config) = agenda.pop() {
            let edges = config.graph().edges().collect::<Vec<_>>();
            let dependents = edges
                .iter()
                .map(|edge| edge.dependent())
                .collect::<std::collections::HashSet<_>>();
            assert_eq!(edges.len(), dependents.len());

            for action in config.valid_actions() {
                let mut next = config.clone();
                next.apply(action).unwrap();
                agenda.push(next);
            }
        }
    }
}
