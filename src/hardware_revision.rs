//! Boot time hardware revision detection.
//!
//! Boards that carry an ID divider identify their revision by the divider ratio.
//! The ratio is sampled together with the internal reference voltage, which removes
//! most of the supply error from the reading.

use embedded_hal::blocking::delay::DelayUs;

use crate::fmt::info;
use crate::hal::IdDetectAdc;

/// Detected board revision, where `0` means undetected or the base revision.
pub type HardwareRevision = u8;

/// Maximum distance from an expected ratio that still matches it.
pub const ID_DETECT_ERROR: u32 = 12;

/// Conversions averaged for one reading.
pub const ID_DETECT_SAMPLES: u32 = 16;

/// Startup time of the internal reference in microseconds.
const VREFINT_STARTUP_US: u32 = 10;

/// Full scale of the 12 bit converter.
const ADC_FULL_SCALE: u32 = 4096;

/// An expected ID divider ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdDetect {
    /// Low side fraction of the divider in permille.
    pub ratio: u32,
    pub revision: HardwareRevision,
}

impl IdDetect {
    /// Returns `true` if `ratio` falls strictly inside this entry's window.
    pub fn matches(&self, ratio: u32) -> bool {
        self.ratio.saturating_sub(ID_DETECT_ERROR) < ratio && ratio < self.ratio.saturating_add(ID_DETECT_ERROR)
    }
}

/// Divider ratio in permille for the `high` and `low` side resistors.
///
/// ```
/// use embedded_flight_motors::hardware_revision::id_ratio;
///
/// assert_eq!(id_ratio(10_000, 10_000), 500);
/// assert_eq!(id_ratio(30_000, 10_000), 250);
/// ```
pub const fn id_ratio(high: u32, low: u32) -> u32 {
    low * 1000 / (low + high)
}

/// Reference compensated ID divider ratio in permille.
///
/// `vrefint_cal` is the factory reading of the internal reference. Returns `None`
/// if it is missing or so small that the ratio does not fit.
pub fn compensated_ratio(id_detect: u32, vrefint: u32, vrefint_cal: u16) -> Option<u32> {
    if vrefint_cal == 0 {
        return None;
    }
    let compensated = id_detect as u64 * vrefint as u64 / vrefint_cal as u64;
    let ratio = compensated.checked_mul(1000)? / ADC_FULL_SCALE as u64;
    u32::try_from(ratio).ok()
}

/// Sample the ID divider and look the ratio up in `table`.
///
/// The first matching entry wins. The converter is released before returning,
/// whether or not a revision was found.
pub fn detect_hardware_revision<A, D>(
    adc: &mut A,
    delay: &mut D,
    vrefint_cal: u16,
    table: &[IdDetect],
) -> HardwareRevision
where
    A: IdDetectAdc,
    D: DelayUs<u32>,
{
    adc.init();
    delay.delay_us(VREFINT_STARTUP_US);

    let mut id_detect = 0;
    let mut vrefint = 0;
    for _ in 0..ID_DETECT_SAMPLES {
        let sample = adc.convert();
        id_detect += sample.id_detect as u32;
        vrefint += sample.vrefint as u32;
    }
    id_detect /= ID_DETECT_SAMPLES;
    vrefint /= ID_DETECT_SAMPLES;

    adc.deinit();

    let revision = compensated_ratio(id_detect, vrefint, vrefint_cal)
        .and_then(|ratio| table.iter().find(|entry| entry.matches(ratio)))
        .map_or(0, |entry| entry.revision);

    info!("hardware revision {}", revision);
    revision
}
