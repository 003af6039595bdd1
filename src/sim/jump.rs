//! Double-jump state machine
//!
//! Ground → Air → Jumped on taps; only a ground contact resets it.

use serde::{Deserialize, Serialize};

/// Jump availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpState {
    /// Standing on a surface, first jump available
    #[default]
    Ground,
    /// First jump used, second available
    Air,
    /// Both jumps used
    Jumped,
}

/// Which impulse a tap asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    First,
    Double,
}

impl JumpState {
    /// Advance on a tap. Returns the jump to perform, if any.
    pub fn tap(&mut self) -> Option<JumpKind> {
        match *self {
            JumpState::Ground => {
                *self = JumpState::Air;
                Some(JumpKind::First)
            }
            JumpState::Air => {
                *self = JumpState::Jumped;
                Some(JumpKind::Double)
            }
            JumpState::Jumped => None,
        }
    }

    /// Ground contact: both jumps become available again
    pub fn land(&mut self) {
        *self = JumpState::Ground;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_transition_table() {
        let mut s = JumpState::Ground;
        assert_eq!(s.tap(), Some(JumpKind::First));
        assert_eq!(s, JumpState::Air);
        assert_eq!(s.tap(), Some(JumpKind::Double));
        assert_eq!(s, JumpState::Jumped);
        assert_eq!(s.tap(), None);
        assert_eq!(s, JumpState::Jumped);
    }

    #[test]
    fn test_land_resets_from_any_state() {
        for start in [JumpState::Ground, JumpState::Air, JumpState::Jumped] {
            let mut s = start;
            s.land();
            assert_eq!(s, JumpState::Ground);
        }
    }

    proptest! {
        /// Never more than two jumps between landings
        #[test]
        fn prop_no_triple_jump(ops in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut s = JumpState::Ground;
            let mut jumps_since_landing = 0;
            for is_tap in ops {
                if is_tap {
                    if s.tap().is_some() {
                        jumps_since_landing += 1;
                    }
                } else {
                    s.land();
                    jumps_since_landing = 0;
                }
                prop_assert!(jumps_since_landing <= 2);
            }
        }
    }
}
