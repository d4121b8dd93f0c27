//! Year-over-year capacity fade for the solar array and the battery.
//!
//! Both follow a linear model with operating year 1 at full capacity:
//! PV output fades 0.5 %/year, battery capacity 0.35 % over the 20-year
//! life. The outputs are non-increasing in the operating year, which the
//! dispatch tests rely on.

use crate::units::{MegawattHours, Megawatts};
use crate::{BESS_DEGRADATION_PER_YEAR, DC_AC_RATIO, SOLAR_DEGRADATION_PER_YEAR};

/// AC-side solar capacity available in `operating_year` (1-based), after the
/// DC→AC inverter loading ratio and linear degradation.
///
/// Multiplied against the normalized per-MW-DC profile to get bus-side MW.
///
/// # Panics
/// Operating years are 1-based; `operating_year == 0` is a bug in the caller.
pub fn solar_ac_capacity_mw(solar_dc: Megawatts, operating_year: usize) -> Megawatts {
    assert!(operating_year >= 1, "operating years are 1-based");
    let fade = 1.0 - SOLAR_DEGRADATION_PER_YEAR * (operating_year - 1) as f64;
    Megawatts(solar_dc.value() / DC_AC_RATIO * fade)
}

/// Usable battery energy capacity in `operating_year` (1-based), after
/// linear capacity fade.
///
/// # Panics
/// Operating years are 1-based; `operating_year == 0` is a bug in the caller.
pub fn bess_usable_capacity_mwh(bess_power: Megawatts, hours: f64, operating_year: usize) -> MegawattHours {
    assert!(operating_year >= 1, "operating years are 1-based");
    let fade = 1.0 - BESS_DEGRADATION_PER_YEAR * (operating_year - 1) as f64;
    MegawattHours(bess_power.value() * hours * fade)
}
