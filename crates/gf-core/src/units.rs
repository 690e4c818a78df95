// gf-core/src/units.rs

use uom::si::f64::{Time, Volume, VolumeRate as UomVolumeRate};

// Public canonical unit type (SI, f64)
pub type VolumeRate = UomVolumeRate;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Volumetric rate given in liters per minute.
#[inline]
pub fn lpm(v: f64) -> VolumeRate {
    use uom::si::time::minute;
    use uom::si::volume::liter;
    Volume::new::<liter>(v) / Time::new::<minute>(1.0)
}

/// Cubic meters per day, the rate unit the solver decks are written in.
#[inline]
pub fn to_m3pd(q: VolumeRate) -> f64 {
    use uom::si::volume_rate::cubic_meter_per_second;
    q.get::<cubic_meter_per_second>() * SECONDS_PER_DAY
}
