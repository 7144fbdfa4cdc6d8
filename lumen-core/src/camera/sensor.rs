//! Camera sensor models
//!
//! The embedding board reports which sensor is attached either as a name
//! tag or through the chip ID registers. Only the OV5640 carries the
//! autofocus coprocessor.

use core::fmt;
use core::str::FromStr;

use heapless::String;

/// Maximum length kept for an unrecognised sensor name
pub const MAX_SENSOR_NAME_LEN: usize = 16;

/// Chip ID reported by the OV5640 at 0x300A/0x300B
pub const OV5640_CHIP_ID: u16 = 0x5640;

/// Chip ID reported by the OV3660 at 0x300A/0x300B
pub const OV3660_CHIP_ID: u16 = 0x3660;

/// Attached camera sensor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorModel {
    Ov2640,
    Ov3660,
    Ov5640,
    Ov7670,
    Ov7725,
    Nt99141,
    Gc0308,
    Gc032a,
    Bf3005,
    Bf20a6,
    Sc101iq,
    Sc030iq,
    Sc031gs,
    /// Sensor not in the table (name truncated to [`MAX_SENSOR_NAME_LEN`])
    Other(String<MAX_SENSOR_NAME_LEN>),
}

/// Name table, in the order the camera stack reports them
const NAMES: [(&str, SensorModel); 13] = [
    ("OV2640", SensorModel::Ov2640),
    ("OV3660", SensorModel::Ov3660),
    ("OV5640", SensorModel::Ov5640),
    ("OV7670", SensorModel::Ov7670),
    ("OV7725", SensorModel::Ov7725),
    ("NT99141", SensorModel::Nt99141),
    ("GC0308", SensorModel::Gc0308),
    ("GC032A", SensorModel::Gc032a),
    ("BF3005", SensorModel::Bf3005),
    ("BF20A6", SensorModel::Bf20a6),
    ("SC101IQ", SensorModel::Sc101iq),
    ("SC030IQ", SensorModel::Sc030iq),
    ("SC031GS", SensorModel::Sc031gs),
];

impl SensorModel {
    /// Look up a sensor by its reported name
    ///
    /// Names outside the table are kept (truncated) as [`SensorModel::Other`].
    pub fn from_name(name: &str) -> Self {
        for (known, model) in NAMES.iter() {
            if *known == name {
                return model.clone();
            }
        }
        Self::Other(truncated(name))
    }

    /// Map a chip ID read from 0x300A/0x300B
    pub fn from_chip_id(id: u16) -> Self {
        match id {
            OV5640_CHIP_ID => Self::Ov5640,
            OV3660_CHIP_ID => Self::Ov3660,
            _ => Self::Other(truncated("unknown")),
        }
    }

    /// Reported name of this sensor
    pub fn name(&self) -> &str {
        match self {
            Self::Other(name) => name.as_str(),
            model => NAMES
                .iter()
                .find(|(_, m)| m == model)
                .map(|(name, _)| *name)
                .unwrap_or(""),
        }
    }

    /// Whether this sensor has the autofocus coprocessor
    pub fn supports_autofocus(&self) -> bool {
        matches!(self, Self::Ov5640)
    }
}

impl FromStr for SensorModel {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for SensorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Copy as much of `name` as fits, cutting on a char boundary
fn truncated(name: &str) -> String<MAX_SENSOR_NAME_LEN> {
    let mut out = String::new();
    for ch in name.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_names() {
        assert_eq!(SensorModel::from_name("OV5640"), SensorModel::Ov5640);
        assert_eq!(SensorModel::from_name("OV2640"), SensorModel::Ov2640);
        assert_eq!(SensorModel::from_name("GC032A"), SensorModel::Gc032a);
        assert_eq!(SensorModel::Ov5640.name(), "OV5640");
    }

    #[test]
    fn test_name_lookup_is_case_sensitive() {
        assert!(matches!(
            SensorModel::from_name("ov5640"),
            SensorModel::Other(_)
        ));
    }

    #[test]
    fn test_only_ov5640_supports_autofocus() {
        for (_, model) in NAMES.iter() {
            assert_eq!(model.supports_autofocus(), *model == SensorModel::Ov5640);
        }
        assert!(!SensorModel::from_name("IMX219").supports_autofocus());
    }

    #[test]
    fn test_unknown_name_is_truncated() {
        let model = SensorModel::from_name("A-VERY-LONG-SENSOR-NAME-INDEED");
        assert_eq!(model.name().len(), MAX_SENSOR_NAME_LEN);
        assert_eq!(model.name(), "A-VERY-LONG-SENS");
    }

    #[test]
    fn test_chip_id_mapping() {
        assert_eq!(SensorModel::from_chip_id(0x5640), SensorModel::Ov5640);
        assert_eq!(SensorModel::from_chip_id(0x3660), SensorModel::Ov3660);
        assert_eq!(SensorModel::from_chip_id(0x0000).name(), "unknown");
    }

    proptest! {
        #[test]
        fn prop_table_names_round_trip(idx in 0usize..13) {
            let (name, model) = &NAMES[idx];
            prop_assert_eq!(&SensorModel::from_name(name), model);
            prop_assert_eq!(model.name(), *name);
        }

        #[test]
        fn prop_short_unknown_names_preserved(name in "[a-z]{1,16}") {
            let model = SensorModel::from_name(&name);
            prop_assert_eq!(model.name(), name.as_str());
        }
    }
}
