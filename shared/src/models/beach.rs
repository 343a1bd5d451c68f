//! Jeju beaches covered by the daily debris forecast

use serde::Serialize;

use crate::types::GpsCoordinates;

/// A monitored beach
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeachEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl BeachEntry {
    pub fn coordinates(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.latitude, self.longitude)
    }
}

/// Beaches in forecast order, clockwise from the west coast
pub static BEACHES: [BeachEntry; 11] = [
    BeachEntry {
        name: "Hyeopjae",
        description: "협재해수욕장",
        latitude: 33.3940,
        longitude: 126.2396,
    },
    BeachEntry {
        name: "Geumneung",
        description: "금능해수욕장",
        latitude: 33.3903,
        longitude: 126.2353,
    },
    BeachEntry {
        name: "Gwakji",
        description: "곽지해수욕장",
        latitude: 33.4507,
        longitude: 126.3046,
    },
    BeachEntry {
        name: "Iho Tewoo",
        description: "이호테우해수욕장",
        latitude: 33.4976,
        longitude: 126.4531,
    },
    BeachEntry {
        name: "Samyang",
        description: "삼양해수욕장",
        latitude: 33.5257,
        longitude: 126.5869,
    },
    BeachEntry {
        name: "Hamdeok",
        description: "함덕해수욕장",
        latitude: 33.5431,
        longitude: 126.6697,
    },
    BeachEntry {
        name: "Gimnyeong",
        description: "김녕해수욕장",
        latitude: 33.5575,
        longitude: 126.7594,
    },
    BeachEntry {
        name: "Woljeong",
        description: "월정리해수욕장",
        latitude: 33.5563,
        longitude: 126.7958,
    },
    BeachEntry {
        name: "Pyoseon",
        description: "표선해수욕장",
        latitude: 33.3262,
        longitude: 126.8414,
    },
    BeachEntry {
        name: "Jungmun Saekdal",
        description: "중문색달해수욕장",
        latitude: 33.2446,
        longitude: 126.4124,
    },
    BeachEntry {
        name: "Hwasun Geummorae",
        description: "화순금모래해수욕장",
        latitude: 33.2385,
        longitude: 126.3343,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_registry_size() {
        assert_eq!(BEACHES.len(), 11);
    }

    #[test]
    fn test_beaches_are_on_jeju() {
        for beach in &BEACHES {
            assert!(beach.coordinates().validate().is_ok());
            assert!(beach.latitude > 33.1 && beach.latitude < 33.6, "{}", beach.name);
            assert!(beach.longitude > 126.1 && beach.longitude < 127.0, "{}", beach.name);
        }
    }

    #[test]
    fn test_names_unique() {
        for (i, a) in BEACHES.iter().enumerate() {
            for b in &BEACHES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
