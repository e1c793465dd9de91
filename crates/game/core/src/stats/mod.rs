//! Combatant resources.
//!
//! - [`ResourceLedger`]: health, mana, death and the ultimate meter
//! - [`UltimateMeter`]: the 0–max charge gating ultimates
//! - [`Mana`]: fixed-point mana amounts
mod ledger;
mod mana;
mod ultimate;

pub use ledger::{DamageReceipt, LedgerSpec, ResourceLedger};
pub use mana::Mana;
pub use ultimate::{ChargeOutcome, UltimateMeter};
