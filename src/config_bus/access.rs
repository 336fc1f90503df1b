use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Access types a listener can observe.
    ///
    /// The empty mask is reserved: it listens for nothing and is never kept
    /// in the listener registry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessMask: u8 {
        /// Parameter reads (`get_parameter`, `get_parameters`).
        const READ = 1 << 0;
        /// Parameter writes (`set_parameter`, `set_parameters`, `remove_parameter`).
        const WRITE = 1 << 1;
        /// Both reads and writes.
        const ANY = Self::READ.bits() | Self::WRITE.bits();
    }
}

impl AccessMask {
    /// Returns true when a listener registered with `self` should fire for `access`.
    pub fn matches(self, access: AccessMask) -> bool {
        self.intersects(access)
    }
}

impl fmt::Display for AccessMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if *self == AccessMask::ANY {
            "any"
        } else if *self == AccessMask::READ {
            "read"
        } else if *self == AccessMask::WRITE {
            "write"
        } else {
            "none"
        };

        f.write_str(name)
    }
}
