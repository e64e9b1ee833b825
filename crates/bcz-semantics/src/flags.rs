//! Property and function access flags carried by body types.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Flags on a body type property.
    ///
    /// Only `READABLE_AT_DEPLOY_TIME` is interpreted by the nested runtime
    /// access check; the rest are carried through unchanged.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PropertyFlags: u32 {
        const REQUIRED = 1 << 0;
        const READ_ONLY = 1 << 1;
        const WRITE_ONLY = 1 << 2;
        /// Value must be computable at the start of the deployment.
        const DEPLOY_TIME_CONSTANT = 1 << 3;
        /// Value is known without a deployment-time lookup.
        const READABLE_AT_DEPLOY_TIME = 1 << 4;
    }
}

bitflags! {
    /// Flags on an instance or namespace function.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct FunctionFlags: u32 {
        /// Result can only be emitted as a direct runtime lookup, never nested
        /// inside another expression.
        const REQUIRES_INLINING = 1 << 0;
        /// Only usable as the value of a secure module parameter.
        const MODULE_SECURE_PARAMETER_ONLY = 1 << 1;
    }
}

impl PropertyFlags {
    #[must_use]
    pub const fn is_readable_at_deploy_time(self) -> bool {
        self.contains(Self::READABLE_AT_DEPLOY_TIME)
    }
}

impl FunctionFlags {
    #[must_use]
    pub const fn requires_inlining(self) -> bool {
        self.contains(Self::REQUIRES_INLINING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_property_flags_are_not_readable() {
        assert!(!PropertyFlags::default().is_readable_at_deploy_time());
        assert!(!PropertyFlags::REQUIRED.is_readable_at_deploy_time());
        assert!(
            (PropertyFlags::REQUIRED | PropertyFlags::READABLE_AT_DEPLOY_TIME)
                .is_readable_at_deploy_time()
        );
    }

    #[test]
    fn empty_function_flags_do_not_require_inlining() {
        assert!(!FunctionFlags::default().requires_inlining());
        assert!(!FunctionFlags::MODULE_SECURE_PARAMETER_ONLY.requires_inlining());
        assert!(FunctionFlags::REQUIRES_INLINING.requires_inlining());
    }

    #[test]
    fn flags_deserialize_from_names() {
        let flags: PropertyFlags =
            serde_json::from_str("\"REQUIRED | READABLE_AT_DEPLOY_TIME\"").unwrap();
        assert_eq!(
            flags,
            PropertyFlags::REQUIRED | PropertyFlags::READABLE_AT_DEPLOY_TIME
        );
    }
}
