//! Arc-standard transition system.
//!
//! Reduce actions attach the two topmost stack tokens to each other and
//! leave the head on the stack. The parse is finished when the input is
//! consumed and a single tree remains on the stack.

use super::{Action, Configuration};

pub(super) fn is_terminal(config: &Configuration) -> bool {
    config.input_exhausted() && config.stack.len() == 1
}

pub(super) fn is_legal(config: &Configuration, action: Action) -> bool {
    match action {
        Action::Shift => !config.input_exhausted(),
        // The root is never attached as a dependent.
        Action::ReduceLeft => config.stack.len() >= 2 && config.stack_at(1) != Some(0),
        Action::ReduceRight => config.stack.len() >= 2,
        Action::Pop => false,
    }
}

pub(super) fn apply(config: &mut Configuration, action: Action) {
    match action {
        Action::Shift => config.shift(),
        Action::ReduceLeft => {
            let top = pop(config);
            let second = pop(config);
            config.attach(top, second);
            config.stack.push(top);
        }
        Action::ReduceRight => {
            let top = pop(config);
            let second = pop(config);
            config.attach(second, top);
            config.stack.push(second);
        }
        Action::Pop => unreachable!("POP is not an arc-standard action"),
    }
}

fn pop(config: &mut Configuration) -> usize {
    config
        .stack
        .pop()
        .unwrap_or_else(|| panic!("Reduce on a stack with less than two tokens"))
}
