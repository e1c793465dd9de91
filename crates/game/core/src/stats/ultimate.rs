use crate::config::UltimateRules;

/// Charge gating a combatant's ultimate skill.
///
/// The meter fills from damage dealt and taken, saturates at `max`, and can
/// only be spent when completely full.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UltimateMeter {
    charge: f32,
    max: f32,
}

/// Result of adding charge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChargeOutcome {
    Unchanged,
    Charged,
    /// This gain filled the meter.
    BecameReady,
}

impl UltimateMeter {
    pub fn new(max: f32) -> Self {
        Self {
            charge: 0.0,
            max: max.max(0.0),
        }
    }

    pub fn from_rules(rules: &UltimateRules) -> Self {
        Self::new(rules.max_charge)
    }

    #[inline]
    pub fn charge(&self) -> f32 {
        self.charge
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.charge >= self.max
    }

    /// Adds charge. Non-positive amounts and gains on a full meter are ignored.
    pub fn add(&mut self, amount: f32) -> ChargeOutcome {
        if amount.is_nan() || amount <= 0.0 || self.is_ready() {
            return ChargeOutcome::Unchanged;
        }

        self.charge = (self.charge + amount).min(self.max);
        if self.is_ready() {
            ChargeOutcome::BecameReady
        } else {
            ChargeOutcome::Charged
        }
    }

    /// Empties a full meter. Returns `false` and changes nothing otherwise.
    pub fn try_consume(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.charge = 0.0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_and_clamps() {
        let mut meter = UltimateMeter::new(100.0);
        assert_eq!(meter.add(60.0), ChargeOutcome::Charged);
        assert_eq!(meter.add(60.0), ChargeOutcome::BecameReady);
        assert_eq!(meter.charge(), 100.0);
        assert_eq!(meter.add(5.0), ChargeOutcome::Unchanged);
    }

    #[test]
    fn consume_requires_full_meter() {
        let mut meter = UltimateMeter::new(100.0);
        meter.add(99.0);
        assert!(!meter.try_consume());
        assert_eq!(meter.charge(), 99.0);

        meter.add(1.0);
        assert!(meter.try_consume());
        assert_eq!(meter.charge(), 0.0);
    }

    #[test]
    fn ignores_non_positive_gain() {
        let mut meter = UltimateMeter::new(100.0);
        assert_eq!(meter.add(0.0), ChargeOutcome::Unchanged);
        assert_eq!(meter.add(-4.0), ChargeOutcome::Unchanged);
        assert_eq!(meter.add(f32::NAN), ChargeOutcome::Unchanged);
    }
}
