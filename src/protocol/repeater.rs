use super::{Command, DeviceAddress, Payload};
use crate::error::EncodeError;
use crate::phy::{BitFramer, Frame};
use tracing::debug;

/// Copies of each payload sent back to back. Covers OOK timing jitter and the
/// receiver's debounce.
pub const FRAME_REPEAT: usize = 2;

/// Payload sequence for `command`: each code repeated [`FRAME_REPEAT`] times,
/// press codes before release codes.
pub fn payload_plan(command: Command) -> Result<Vec<&'static str>, EncodeError> {
    let codes = match command.payload() {
        Some(Payload::Single(code)) => vec![code],
        Some(Payload::PressRelease { press, release }) => vec![press, release],
        None => return Err(EncodeError::UnsupportedCommand(command)),
    };

    Ok(codes
        .into_iter()
        .flat_map(|code| std::iter::repeat_n(code, FRAME_REPEAT))
        .collect())
}

/// Applies the per-command duplication policy on top of [`BitFramer`].
pub struct CommandRepeater {
    framer: BitFramer,
}

impl CommandRepeater {
    pub fn new() -> Self {
        Self {
            framer: BitFramer::new(),
        }
    }

    pub fn frames(
        &self,
        address: Option<&DeviceAddress>,
        command: Command,
    ) -> Result<Vec<Frame>, EncodeError> {
        let plan = payload_plan(command)?;
        let frames = plan
            .iter()
            .map(|payload| self.framer.frame(address, payload))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Command {}: {} frames", command, frames.len());
        Ok(frames)
    }
}

impl Default for CommandRepeater {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> DeviceAddress {
        DeviceAddress::parse("111110011101011011111010010011000011110").unwrap()
    }

    #[test]
    fn test_single_payload_commands() {
        for cmd in [Command::FanSpeed1, Command::FanSpeed2, Command::FanSpeed3] {
            let plan = payload_plan(cmd).unwrap();
            assert_eq!(plan.len(), 2);
            assert_eq!(plan[0], plan[1]);
        }
    }

    #[test]
    fn test_press_release_commands() {
        for cmd in [Command::PowerToggle, Command::FanSpeed0] {
            let plan = payload_plan(cmd).unwrap();
            assert_eq!(plan.len(), 4);
            assert_eq!(plan[0], plan[1]);
            assert_eq!(plan[2], plan[3]);
            assert_ne!(plan[0], plan[2]);
        }
    }

    #[test]
    fn test_pair_unsupported() {
        assert_eq!(
            payload_plan(Command::Pair),
            Err(EncodeError::UnsupportedCommand(Command::Pair))
        );
        let repeater = CommandRepeater::new();
        assert_eq!(
            repeater.frames(Some(&address()), Command::Pair),
            Err(EncodeError::UnsupportedCommand(Command::Pair))
        );
    }

    #[test]
    fn test_frames_follow_plan() {
        let repeater = CommandRepeater::new();
        let addr = address();
        let frames = repeater.frames(Some(&addr), Command::PowerToggle).unwrap();

        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], frames[1]);
        assert_eq!(frames[2], frames[3]);
        assert_ne!(frames[1], frames[2]);
        assert!(frames.iter().all(|f| f.len() == Frame::bit_len(addr.len())));
    }

    #[test]
    fn test_missing_address() {
        let repeater = CommandRepeater::new();
        assert_eq!(
            repeater.frames(None, Command::FanSpeed3),
            Err(EncodeError::MissingAddress)
        );
    }
}
