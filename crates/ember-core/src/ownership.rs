//! Owner-set-once authority handoff.
//!
//! Both tokens start owned by their deployer and allow exactly one
//! irrevocable ownership transfer at wiring time. The state is tagged so
//! the "already handed off" case is unrepresentable as a silent overwrite.

use serde::{Deserialize, Serialize};

use crate::error::OwnershipError;
use crate::types::Address;

/// Ownership state of a token or engine.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub enum Ownership {
    /// Still owned by the deployer; one handoff remains available.
    Initial(Address),
    /// Ownership was handed off once; no further transfer is possible.
    Transferred(Address),
}

impl Ownership {
    /// Ownership held by the deploying address.
    pub fn new(deployer: Address) -> Self {
        Self::Initial(deployer)
    }

    /// The current owner.
    pub fn owner(&self) -> Address {
        match self {
            Self::Initial(addr) | Self::Transferred(addr) => *addr,
        }
    }

    /// Fail with [`OwnershipError::NotOwner`] unless `caller` is the owner.
    pub fn require_owner(&self, caller: Address) -> Result<(), OwnershipError> {
        if caller == self.owner() {
            Ok(())
        } else {
            Err(OwnershipError::NotOwner)
        }
    }

    /// Perform the one permitted ownership handoff.
    ///
    /// # Errors
    ///
    /// - [`OwnershipError::NotOwner`] if `caller` is not the current owner
    /// - [`OwnershipError::OwnerAlreadySet`] if the handoff already happened
    pub fn set_owner_once(&mut self, caller: Address, new_owner: Address) -> Result<(), OwnershipError> {
        self.require_owner(caller)?;
        match self {
            Self::Initial(_) => {
                *self = Self::Transferred(new_owner);
                Ok(())
            }
            Self::Transferred(_) => Err(OwnershipError::OwnerAlreadySet),
        }
    }
}
