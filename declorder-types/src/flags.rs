use serde::{Deserialize, Serialize};

/// Which ordering policies are active. Passed by value through every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckFlags {
    pub constructor_check: bool,
    pub method_visibility_check: bool,
    pub alphabetical_check: bool,
}

impl Default for CheckFlags {
    fn default() -> Self {
        Self {
            constructor_check: true,
            method_visibility_check: true,
            alphabetical_check: false,
        }
    }
}

impl CheckFlags {
    pub fn with_alphabetical(mut self, on: bool) -> Self {
        self.alphabetical_check = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_placement_checks_only() {
        let flags = CheckFlags::default();
        assert!(flags.constructor_check);
        assert!(flags.method_visibility_check);
        assert!(!flags.alphabetical_check);
    }
}
