//! The live appliance set and the priority selection queries.

use std::cmp::Reverse;

use super::types::{Appliance, ApplianceId, ApplianceSpec, ApplianceView, Status};
use crate::error::ValidationError;

/// Fixed set of controllable appliances.
///
/// Disabled appliances never enter the registry. Ids are positions in
/// registry order, which is also the tie-break order of every query.
#[derive(Debug, Default)]
pub struct Registry {
    appliances: Vec<Appliance>,
}

impl Registry {
    /// Builds a registry, dropping disabled appliances and renumbering the rest.
    pub fn new(appliances: Vec<Appliance>) -> Self {
        let mut appliances: Vec<Appliance> = appliances
            .into_iter()
            .filter(|a| a.status() != Status::Disabled)
            .collect();
        for (i, a) in appliances.iter_mut().enumerate() {
            a.reindex(ApplianceId(i));
        }
        Self { appliances }
    }

    /// Validates every spec and builds the registry from the enabled ones.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in an enabled spec.
    pub fn from_specs(specs: &[ApplianceSpec]) -> Result<Self, ValidationError> {
        let appliances = specs
            .iter()
            .filter(|s| s.status != Status::Disabled)
            .enumerate()
            .map(|(i, s)| Appliance::from_spec(ApplianceId(i), s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(appliances))
    }

    pub fn len(&self) -> usize {
        self.appliances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appliances.is_empty()
    }

    pub fn get(&self, id: ApplianceId) -> Option<&Appliance> {
        self.appliances.get(id.0)
    }

    pub fn by_name(&self, name: &str) -> Option<&Appliance> {
        self.appliances.iter().find(|a| a.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Appliance> {
        self.appliances.iter()
    }

    /// Copies the current status of every appliance for one evaluation.
    pub fn snapshot(&self) -> ApplianceSet {
        ApplianceSet::new(self.appliances.iter().map(Appliance::view).collect())
    }
}

/// Consistent view of the appliance set taken at the start of an evaluation.
///
/// All six selection queries run against this copy, so a status update that
/// lands mid-evaluation cannot make two queries disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplianceSet {
    items: Vec<ApplianceView>,
}

impl ApplianceSet {
    pub fn new(items: Vec<ApplianceView>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ApplianceView] {
        &self.items
    }

    fn first(&self, pred: impl Fn(&ApplianceView) -> bool) -> Option<&ApplianceView> {
        self.items.iter().find(|a| pred(a))
    }

    /// First special-tier appliance that is off.
    pub fn special_inactive(&self) -> Option<&ApplianceView> {
        self.first(|a| a.priority.is_special() && a.status == Status::Off)
    }

    /// First special-tier appliance that is on.
    pub fn special_active(&self) -> Option<&ApplianceView> {
        self.first(|a| a.priority.is_special() && a.status == Status::On)
    }

    /// First running appliance outside the baseline tier, in registry order.
    ///
    /// Not sorted by tier: a special-tier appliance listed first is picked
    /// before a less important optional one listed later.
    pub fn any_active_non_zero_tier(&self) -> Option<&ApplianceView> {
        self.first(|a| a.status == Status::On && !a.priority.is_baseline())
    }

    /// Off, non-special appliance with the lowest tier number.
    pub fn normal_inactive(&self) -> Option<&ApplianceView> {
        // min_by_key keeps the first of equal keys
        self.items
            .iter()
            .filter(|a| a.status == Status::Off && !a.priority.is_special())
            .min_by_key(|a| a.priority)
    }

    /// First baseline-tier appliance that is off.
    pub fn zero_inactive(&self) -> Option<&ApplianceView> {
        self.first(|a| a.status == Status::Off && a.priority.is_baseline())
    }

    /// On, non-special appliance with the highest tier number.
    pub fn normal_active(&self) -> Option<&ApplianceView> {
        // max_by_key would keep the last of equal keys
        self.items
            .iter()
            .filter(|a| a.status == Status::On && !a.priority.is_special())
            .min_by_key(|a| Reverse(a.priority))
    }

    /// Whether any special-tier appliance is currently running.
    pub fn has_special_running(&self) -> bool {
        self.special_active().is_some()
    }

    /// Sum of rated power of running appliances.
    pub fn running_kw(&self) -> f32 {
        self.items
            .iter()
            .filter(|a| a.status == Status::On)
            .map(|a| a.kilowatts)
            .sum()
    }
}
