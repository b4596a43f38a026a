//! Enemy life-cycle finite state machine.
//!
//! Pure functions over `Lifecycle`. No ECS dependency; operates on plain data.
//!
//! ```text
//! Idle (frames 0..=29, looping) --kill--> Dying (30..=59) --> Dead (removed)
//! ```

use campus_core::components::Lifecycle;
use campus_core::constants::*;
use campus_core::enums::LifeState;

/// Output of one frame of the FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleUpdate {
    pub lifecycle: Lifecycle,
    /// Whether the state (not just the frame) changed.
    pub state_changed: bool,
    /// Whether the enemy must leave the active set.
    pub remove: bool,
}

/// Advance one frame.
pub fn advance(current: Lifecycle) -> LifecycleUpdate {
    match current.state {
        LifeState::Idle => {
            let frame = if current.frame >= ENEMY_IDLE_LAST_FRAME {
                0
            } else {
                current.frame + 1
            };
            LifecycleUpdate {
                lifecycle: Lifecycle {
                    state: LifeState::Idle,
                    frame,
                },
                state_changed: false,
                remove: false,
            }
        }
        LifeState::Dying => {
            let frame = current.frame + 1;
            if frame >= ENEMY_DYING_LAST_FRAME {
                LifecycleUpdate {
                    lifecycle: Lifecycle {
                        state: LifeState::Dead,
                        frame,
                    },
                    state_changed: true,
                    remove: true,
                }
            } else {
                LifecycleUpdate {
                    lifecycle: Lifecycle {
                        state: LifeState::Dying,
                        frame,
                    },
                    state_changed: false,
                    remove: false,
                }
            }
        }
        // Terminal
        LifeState::Dead => LifecycleUpdate {
            lifecycle: current,
            state_changed: false,
            remove: true,
        },
    }
}

/// Start the dying animation. Only an idle enemy can be killed; anything
/// else returns `None` so a second hit is a no-op.
pub fn kill(current: Lifecycle) -> Option<Lifecycle> {
    if current.state != LifeState::Idle {
        return None;
    }
    Some(Lifecycle {
        state: LifeState::Dying,
        frame: ENEMY_DYING_FIRST_FRAME,
    })
}
