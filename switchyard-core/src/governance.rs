//! Governance guard: the single principal allowed to mutate the registry and
//! the capability flags.

use crate::{error::ProxyError, id::Address};

/// The current governance principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Governance {
    principal: Address,
}

impl Governance {
    /// Install `principal`. A zero principal is rejected; use
    /// [`Address::DEAD`] or a later transfer to give up control.
    pub fn new(principal: Address) -> Result<Self, ProxyError> {
        if principal.is_zero() {
            return Err(ProxyError::AddressZero);
        }
        Ok(Self { principal })
    }

    /// The current principal.
    pub fn principal(&self) -> Address {
        self.principal
    }

    /// Fail with [`ProxyError::NotContractOwner`] unless `caller` is the principal.
    pub fn ensure(&self, caller: Address) -> Result<(), ProxyError> {
        // A zero principal means governance was renounced.
        if caller.is_zero() || caller != self.principal {
            return Err(ProxyError::NotContractOwner { caller });
        }
        Ok(())
    }

    /// Hand control to `new`, returning the previous principal.
    ///
    /// Any address is accepted, including burn sentinels from which no call
    /// can ever originate.
    pub fn transfer(&mut self, caller: Address, new: Address) -> Result<Address, ProxyError> {
        self.ensure(caller)?;
        Ok(std::mem::replace(&mut self.principal, new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_principal_may_transfer() {
        let owner = Address::derive("owner");
        let user = Address::derive("user");
        let mut gov = Governance::new(owner).unwrap();

        assert_eq!(
            gov.transfer(user, user),
            Err(ProxyError::NotContractOwner { caller: user })
        );
        assert_eq!(gov.transfer(owner, user), Ok(owner));
        assert_eq!(gov.principal(), user);
        assert!(gov.ensure(owner).is_err());
    }

    #[test]
    fn renounced_governance_admits_nobody() {
        let owner = Address::derive("owner");
        let mut gov = Governance::new(owner).unwrap();
        gov.transfer(owner, Address::ZERO).unwrap();
        assert!(gov.ensure(Address::ZERO).is_err());
        assert!(gov.ensure(owner).is_err());
    }

    #[test]
    fn zero_principal_rejected_at_construction() {
        assert_eq!(Governance::new(Address::ZERO), Err(ProxyError::AddressZero));
    }
}
