use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Recording session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderStatus {
    Idle,
    Recording,
    Reviewing,
    Uploading,
    Sent,
}

/// Validate that a status transition is allowed.
///
/// Valid transitions:
/// - Idle -> Recording (start)
/// - Recording -> Reviewing (stop)
/// - Reviewing -> Idle (retry, artifact discarded)
/// - Reviewing -> Uploading (send)
/// - Uploading -> Sent (send succeeded)
/// - Uploading -> Reviewing (send failed, artifact retained)
pub fn validate_transition(from: RecorderStatus, to: RecorderStatus) -> Result<()> {
    use RecorderStatus::*;

    let valid = matches!(
        (from, to),
        (Idle, Recording)
            | (Recording, Reviewing)
            | (Reviewing, Idle)
            | (Reviewing, Uploading)
            | (Uploading, Sent)
            | (Uploading, Reviewing)
    );

    if valid {
        Ok(())
    } else {
        bail!("Invalid recorder transition: {:?} -> {:?}", from, to)
    }
}

/// Render elapsed seconds the way the card shows them, e.g. 3 -> "0:03".
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use RecorderStatus::*;

    #[test]
    fn test_recording_lifecycle_transitions() {
        assert!(validate_transition(Idle, Recording).is_ok());
        assert!(validate_transition(Recording, Reviewing).is_ok());
        assert!(validate_transition(Reviewing, Uploading).is_ok());
        assert!(validate_transition(Uploading, Sent).is_ok());
    }

    #[test]
    fn test_retry_and_failure_transitions() {
        assert!(validate_transition(Reviewing, Idle).is_ok());
        assert!(validate_transition(Uploading, Reviewing).is_ok());
    }

    #[test]
    fn test_sent_is_terminal() {
        assert!(validate_transition(Sent, Idle).is_err());
        assert!(validate_transition(Sent, Recording).is_err());
        assert!(validate_transition(Sent, Uploading).is_err());
    }

    #[test]
    fn test_invalid_shortcuts_rejected() {
        assert!(validate_transition(Idle, Reviewing).is_err());
        assert!(validate_transition(Idle, Uploading).is_err());
        assert!(validate_transition(Recording, Uploading).is_err());
        assert!(validate_transition(Recording, Idle).is_err());
        assert!(validate_transition(Reviewing, Sent).is_err());
    }

    #[test]
    fn test_no_self_transitions() {
        for status in [Idle, Recording, Reviewing, Uploading, Sent] {
            assert!(validate_transition(status, status).is_err());
        }
    }

    #[test]
    fn test_exactly_six_valid_transitions() {
        let all = [Idle, Recording, Reviewing, Uploading, Sent];

        let mut valid_count = 0;
        for from in all {
            for to in all {
                if validate_transition(from, to).is_ok() {
                    valid_count += 1;
                }
            }
        }
        assert_eq!(valid_count, 6);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(3), "0:03");
        assert_eq!(format_elapsed(59), "0:59");
        assert_eq!(format_elapsed(60), "1:00");
        assert_eq!(format_elapsed(125), "2:05");
    }
}
