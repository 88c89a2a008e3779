use std::{
    env::{self, VarError},
    str::FromStr,
};

use minesweeper_common::models::Density;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error(
        "Board size range {min}..={max} is empty, starts at zero or exceeds {cap}",
        cap = MAX_SUPPORTED_SIZE
    )]
    InvalidSizeRange { min: usize, max: usize },
    #[error("Density percentages must satisfy 0 < low < middle < high < 100, got {low}/{middle}/{high}")]
    InvalidDensity { low: u8, middle: u8, high: u8 },
}

/// Largest board side any configuration may allow.
pub const MAX_SUPPORTED_SIZE: usize = 1000;

/// Cells kept free of mines around the first reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafeZone {
    Cell,
    #[default]
    Neighborhood,
}

impl FromStr for SafeZone {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cell" => Ok(Self::Cell),
            "neighborhood" | "neighbourhood" => Ok(Self::Neighborhood),
            _ => Err(()),
        }
    }
}

/// Percentage of the board covered by mines for each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityTable {
    pub low: u8,
    pub middle: u8,
    pub high: u8,
}

impl Default for DensityTable {
    fn default() -> Self {
        Self {
            low: 5,
            middle: 10,
            high: 20,
        }
    }
}

impl DensityTable {
    pub fn percent(&self, density: Density) -> u8 {
        match density {
            Density::Low => self.low,
            Density::Middle => self.middle,
            Density::High => self.high,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self { low, middle, high } = *self;
        if 0 < low && low < middle && middle < high && high < 100 {
            Ok(())
        } else {
            Err(ConfigError::InvalidDensity { low, middle, high })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub min_size: usize,
    pub max_size: usize,
    pub density: DensityTable,
    pub safe_zone: SafeZone,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            min_size: 5,
            max_size: 50,
            density: DensityTable::default(),
            safe_zone: SafeZone::default(),
        }
    }
}

fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(raw)) => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string_lossy().into_owned(),
        }),
    }
}

impl Rules {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let rules = Self {
            min_size: env_or("BOARD_MIN_SIZE", defaults.min_size)?,
            max_size: env_or("BOARD_MAX_SIZE", defaults.max_size)?,
            density: DensityTable {
                low: env_or("DENSITY_LOW_PERCENT", defaults.density.low)?,
                middle: env_or("DENSITY_MIDDLE_PERCENT", defaults.density.middle)?,
                high: env_or("DENSITY_HIGH_PERCENT", defaults.density.high)?,
            },
            safe_zone: env_or("SAFE_ZONE", defaults.safe_zone)?,
        };
        rules.validate()?;
        debug!("Loaded board rules: {:?}", rules);
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_size == 0
            || self.min_size > self.max_size
            || self.max_size > MAX_SUPPORTED_SIZE
        {
            return Err(ConfigError::InvalidSizeRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        self.density.validate()
    }

    pub fn accepts(&self, width: usize, height: usize) -> bool {
        let range = self.min_size..=self.max_size;
        range.contains(&width) && range.contains(&height)
    }

    /// Mines for a board, rounded up and always leaving one safe cell.
    pub fn mine_count(&self, width: usize, height: usize, density: Density) -> usize {
        let total = width * height;
        let percent = usize::from(self.density.percent(density));
        let count = (total * percent).div_ceil(100);
        count.clamp(1, total.saturating_sub(1).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_are_valid() {
        assert_eq!(Ok(()), Rules::default().validate());
    }

    #[test]
    fn mine_count_rounds_up() {
        let rules = Rules::default();
        assert_eq!(2, rules.mine_count(5, 5, Density::Low));
        assert_eq!(3, rules.mine_count(5, 5, Density::Middle));
        assert_eq!(5, rules.mine_count(5, 5, Density::High));
        assert_eq!(20, rules.mine_count(20, 20, Density::Low));
        assert_eq!(40, rules.mine_count(20, 20, Density::Middle));
        assert_eq!(80, rules.mine_count(20, 20, Density::High));
    }

    #[test]
    fn mine_count_is_monotonic_across_tiers() {
        let rules = Rules::default();
        for size in rules.min_size..=rules.max_size {
            let low = rules.mine_count(size, size, Density::Low);
            let middle = rules.mine_count(size, size, Density::Middle);
            let high = rules.mine_count(size, size, Density::High);
            assert!(low <= middle && middle <= high);
            assert!(high < size * size);
        }
    }

    #[test]
    fn mine_count_leaves_a_safe_cell() {
        let rules = Rules {
            min_size: 1,
            density: DensityTable {
                low: 50,
                middle: 90,
                high: 99,
            },
            ..Default::default()
        };
        assert_eq!(3, rules.mine_count(2, 2, Density::High));
    }

    #[test]
    fn density_must_increase() {
        let table = DensityTable {
            low: 10,
            middle: 10,
            high: 20,
        };
        assert!(matches!(
            table.validate(),
            Err(ConfigError::InvalidDensity { .. })
        ));
    }

    #[test]
    fn size_range_must_be_non_empty() {
        let rules = Rules {
            min_size: 30,
            max_size: 20,
            ..Default::default()
        };
        assert_eq!(
            Err(ConfigError::InvalidSizeRange { min: 30, max: 20 }),
            rules.validate()
        );
    }

    #[test]
    fn size_range_is_capped() {
        let rules = Rules {
            max_size: MAX_SUPPORTED_SIZE + 1,
            ..Default::default()
        };
        assert_eq!(
            Err(ConfigError::InvalidSizeRange {
                min: 5,
                max: MAX_SUPPORTED_SIZE + 1
            }),
            rules.validate()
        );

        let largest = Rules {
            max_size: MAX_SUPPORTED_SIZE,
            ..Default::default()
        };
        assert_eq!(Ok(()), largest.validate());
    }

    #[test]
    fn missing_variable_uses_default() {
        assert_eq!(Ok(42), env_or("MINESWEEPER_TEST_SURELY_UNSET", 42usize));
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_variable_is_rejected() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let key = "MINESWEEPER_TEST_NON_UNICODE";
        // SAFETY: the variable name is unique to this test.
        unsafe { env::set_var(key, OsStr::from_bytes(b"4\xff2")) };
        let result = env_or(key, 50usize);
        unsafe { env::remove_var(key) };

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "MINESWEEPER_TEST_NON_UNICODE", .. })
        ));
    }

    #[test]
    fn accepts_only_sizes_in_range() {
        let rules = Rules::default();
        assert!(rules.accepts(5, 50));
        assert!(!rules.accepts(4, 10));
        assert!(!rules.accepts(10, 51));
    }

    #[test]
    fn safe_zone_parses_both_spellings() {
        assert_eq!(Ok(SafeZone::Cell), "cell".parse());
        assert_eq!(Ok(SafeZone::Neighborhood), "Neighbourhood".parse());
        assert!("ring".parse::<SafeZone>().is_err());
    }
}
