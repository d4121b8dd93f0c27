//! Lifetime energy mix and renewable share.

use helios_core::{HeliosError, HeliosResult};
use serde::{Deserialize, Serialize};

use crate::dispatch::AnnualAggregate;

/// Where the plant's energy came from over its whole life, in TWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyMix {
    pub solar_net_twh: f64,
    /// Solar delivered straight to the load (net of what charged the BESS).
    pub solar_to_load_twh: f64,
    pub bess_to_load_twh: f64,
    pub generator_twh: f64,
    pub total_generation_twh: f64,
    pub total_load_twh: f64,
    /// `100 · (1 − generator / load served)`, clamped to [0, 100].
    pub renewable_pct: f64,
}

/// Reduce the 20 annual aggregates to a lifetime mix.
///
/// Errors if no load was served over the whole life (the renewable share is
/// undefined for a zero-load plant).
pub fn lifetime_energy_mix(annual: &[AnnualAggregate]) -> HeliosResult<EnergyMix> {
    let solar_net_twh: f64 = annual
        .iter()
        .map(|a| a.solar_net.to_terawatt_hours())
        .sum();
    let charged_twh: f64 = annual
        .iter()
        .map(|a| a.bess_charged.to_terawatt_hours())
        .sum();
    let bess_to_load_twh: f64 = annual
        .iter()
        .map(|a| a.bess_discharged.to_terawatt_hours())
        .sum();
    let generator_twh: f64 = annual
        .iter()
        .map(|a| a.generator_output.to_terawatt_hours())
        .sum();
    let total_load_twh: f64 = annual
        .iter()
        .map(|a| a.load_served.to_terawatt_hours())
        .sum();

    if total_load_twh <= 0.0 {
        return Err(HeliosError::Config(
            "no load served over the plant life; renewable share is undefined".into(),
        ));
    }

    let renewable_pct = (100.0 * (1.0 - generator_twh / total_load_twh)).clamp(0.0, 100.0);

    Ok(EnergyMix {
        solar_net_twh,
        solar_to_load_twh: solar_net_twh - charged_twh,
        bess_to_load_twh,
        generator_twh,
        total_generation_twh: solar_net_twh + bess_to_load_twh + generator_twh,
        total_load_twh,
        renewable_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{simulate_lifetime, DispatchInputs};
    use crate::PvProfile;
    use helios_core::{GeneratorKind, SystemSizing, HOURS_PER_YEAR};

    fn day_night_profile(day_level: f64) -> PvProfile {
        let values = (0..HOURS_PER_YEAR)
            .map(|h| if h % 24 < 12 { day_level } else { 0.0 })
            .collect();
        PvProfile::new(values).unwrap()
    }

    #[test]
    fn test_generator_only_plant_is_zero_renewable() {
        let inputs = DispatchInputs::new(
            SystemSizing::new(0.0, 0.0, 125.0, 100.0),
            GeneratorKind::GasEngine,
        );
        let result = simulate_lifetime(&PvProfile::flat(0.0), &inputs).unwrap();
        let mix = lifetime_energy_mix(&result.annual).unwrap();
        assert!(mix.renewable_pct.abs() < 1e-9);
        assert!((mix.generator_twh - mix.total_load_twh).abs() < 1e-9);
        assert_eq!(mix.solar_net_twh, 0.0);
    }

    #[test]
    fn test_renewable_share_within_bounds() {
        let inputs = DispatchInputs::new(
            SystemSizing::new(500.0, 100.0, 100.0, 100.0),
            GeneratorKind::GasEngine,
        );
        let result = simulate_lifetime(&day_night_profile(0.9), &inputs).unwrap();
        let mix = lifetime_energy_mix(&result.annual).unwrap();
        assert!(mix.renewable_pct > 0.0 && mix.renewable_pct <= 100.0);
        let expected = 100.0 * (1.0 - mix.generator_twh / mix.total_load_twh);
        assert!((mix.renewable_pct - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_load_rejected() {
        let inputs = DispatchInputs::new(
            SystemSizing::new(100.0, 0.0, 0.0, 0.0),
            GeneratorKind::GasEngine,
        );
        let result = simulate_lifetime(&day_night_profile(0.9), &inputs).unwrap();
        assert!(lifetime_energy_mix(&result.annual).is_err());
    }
}
