//! Error types for the live-activity surface boundary.

use super::host::ActivityId;

/// Failures at the surface boundary.
///
/// None of these ever reach the user: the bridge swallows them and the
/// in-app timer keeps working without its external mirror.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// The host has disabled the live-activity capability.
    #[error("live-activity capability is disabled")]
    Disabled,

    /// The addressed surface instance no longer exists.
    #[error("surface instance {0} is gone")]
    InstanceGone(ActivityId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SurfaceError::Disabled.to_string(),
            "live-activity capability is disabled"
        );

        let id = ActivityId::new();
        let message = SurfaceError::InstanceGone(id).to_string();
        assert!(message.starts_with("surface instance "));
        assert!(message.ends_with(" is gone"));
    }
}
