//! STEVAL-FCU001 board constants.

use crate::hardware_revision::{id_ratio, IdDetect};

pub const TARGET_BOARD_IDENTIFIER: &str = "FCU1";

pub const USB_PRODUCT_STRING: &str = "STEVALFCU001";

/// Timer channels available for motor and servo outputs.
pub const USABLE_TIMER_CHANNEL_COUNT: usize = 8;

/// The board is built without digital motor output support.
pub const DSHOT_AVAILABLE: bool = false;

/// Known ID divider ratios.
pub const ID_DETECT_TABLE: [IdDetect; 1] = [IdDetect {
    ratio: id_ratio(10_000, 10_000),
    revision: 1,
}];
