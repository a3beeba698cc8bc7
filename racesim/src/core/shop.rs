use crate::core::car::VehicleConfig;
use crate::core::parts::{PartCatalog, PartKind};
use crate::core::session::Profile;
use crate::error::SetupError;
use tracing::info;

/// Shop builds a purchase proposal on a copy of the profile's car configuration. The profile is
/// only changed by commit.
#[derive(Debug)]
pub struct Shop<'a> {
    profile: &'a mut Profile,
    catalog: &'a PartCatalog,
    proposal: VehicleConfig,
}

impl<'a> Shop<'a> {
    pub fn new(profile: &'a mut Profile, catalog: &'a PartCatalog) -> Shop<'a> {
        let proposal = profile.car.to_owned();
        Shop {
            profile,
            catalog,
            proposal,
        }
    }

    /// select puts a part into the proposal. The identifier must exist in the catalog.
    pub fn select(&mut self, kind: PartKind, id: &str) -> Result<(), SetupError> {
        self.catalog.get(kind, id)?;
        self.proposal.set(kind, id);
        Ok(())
    }

    pub fn proposal(&self) -> &VehicleConfig {
        &self.proposal
    }

    /// cost returns the summed price of the proposed parts that differ from the equipped ones.
    /// Parts that are kept are not charged again, so this is not the full price of the proposed
    /// car (see `VehicleConfig::cost` for that).
    pub fn cost(&self) -> Result<i64, SetupError> {
        PartKind::ALL
            .iter()
            .filter(|&&kind| self.proposal.id_of(kind) != self.profile.car.id_of(kind))
            .map(|&kind| {
                self.catalog
                    .get(kind, self.proposal.id_of(kind))
                    .map(|p| p.price)
            })
            .sum()
    }

    pub fn new_balance(&self) -> Result<i64, SetupError> {
        Ok(self.profile.money - self.cost()?)
    }

    /// commit writes the proposal and the new balance back into the profile.
    pub fn commit(self) -> Result<(), SetupError> {
        let new_balance = self.new_balance()?;
        if new_balance < 0 {
            return Err(SetupError::InsufficientFunds(new_balance));
        }

        info!(
            "{} bought {:?}, balance {} -> {}",
            self.profile.name, self.proposal, self.profile.money, new_balance
        );
        self.profile.money = new_balance;
        self.profile.car = self.proposal;
        Ok(())
    }
}
