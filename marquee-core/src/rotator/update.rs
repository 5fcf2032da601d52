use crate::error::Result;
use crate::rotator::{RotatorMessage, TimedRotator};

/// Route one view message into the rotator.
pub fn rotator_update(
    rotator: &mut TimedRotator,
    message: RotatorMessage,
) -> Result<()> {
    match message {
        RotatorMessage::Start { interval } => rotator.start(interval),
        RotatorMessage::Stop => rotator.stop(),
        RotatorMessage::Next => rotator.next(),
        RotatorMessage::Previous => rotator.previous(),
        RotatorMessage::GoTo { index } => rotator.go_to(index),
        RotatorMessage::TimerFired(token) => {
            rotator.on_timer(token);
            Ok(())
        }
        RotatorMessage::Dispose => rotator.dispose(),
    }
}
