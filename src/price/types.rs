//! Hourly price points and the day table they form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Hours in a day; also the size of a synthesized table.
pub const HOURS_PER_DAY: u8 = 24;

/// Relative price label of an hour within its day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceBand {
    Low,
    #[default]
    Normal,
    High,
}

impl PriceBand {
    /// Index of the band: 0 = Low, 1 = Normal, 2 = High.
    pub fn index(self) -> u8 {
        match self {
            PriceBand::Low => 0,
            PriceBand::Normal => 1,
            PriceBand::High => 2,
        }
    }
}

impl TryFrom<i64> for PriceBand {
    type Error = ValidationError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(PriceBand::Low),
            1 => Ok(PriceBand::Normal),
            2 => Ok(PriceBand::High),
            other => Err(ValidationError::BandOutOfRange(other)),
        }
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Price for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    hour: u8,
    value: f64,
    band: PriceBand,
}

impl PricePoint {
    /// Creates a Normal-band point.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::HourOutOfRange`] unless `hour` is in `0..=23`.
    pub fn new(hour: u32, value: f64) -> Result<Self, ValidationError> {
        if hour >= u32::from(HOURS_PER_DAY) {
            return Err(ValidationError::HourOutOfRange(i64::from(hour)));
        }
        Ok(Self {
            hour: hour as u8,
            value,
            band: PriceBand::Normal,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn band(&self) -> PriceBand {
        self.band
    }

    pub fn set_band(&mut self, band: PriceBand) {
        self.band = band;
    }
}

impl fmt::Display for PricePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hour={:>2} price={:>8.3} band={}",
            self.hour, self.value, self.band
        )
    }
}

/// One day of hourly prices, in feed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DayPrices {
    points: Vec<PricePoint>,
    // true for the zero day standing in for missing data
    #[serde(skip)]
    synthesized: bool,
}

impl DayPrices {
    /// Builds a day from `(hour, price)` pairs.
    ///
    /// An empty input yields 24 zero-priced hours.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::HourOutOfRange`] for any hour outside `0..=23`.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (u32, f64)>,
    ) -> Result<Self, ValidationError> {
        let points = pairs
            .into_iter()
            .map(|(hour, value)| PricePoint::new(hour, value))
            .collect::<Result<Vec<_>, _>>()?;
        if points.is_empty() {
            return Ok(Self::zeroed());
        }
        Ok(Self {
            points,
            synthesized: false,
        })
    }

    /// 24 hours priced at 0, all Normal.
    ///
    /// The day is marked synthesized and banding leaves it all Normal.
    pub fn zeroed() -> Self {
        Self {
            points: (0..HOURS_PER_DAY)
                .map(|hour| PricePoint {
                    hour,
                    value: 0.0,
                    band: PriceBand::Normal,
                })
                .collect(),
            synthesized: true,
        }
    }

    /// Whether this day stands in for missing price data.
    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [PricePoint] {
        &mut self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(PricePoint::value).collect()
    }

    /// Band of `hour`, or Normal when the day has no price for it.
    pub fn band_at(&self, hour: u32) -> PriceBand {
        self.points
            .iter()
            .find(|p| u32::from(p.hour) == hour)
            .map_or(PriceBand::Normal, PricePoint::band)
    }

    /// Hours carrying `band`, in table order.
    pub fn hours_in(&self, band: PriceBand) -> Vec<u8> {
        self.points
            .iter()
            .filter(|p| p.band == band)
            .map(PricePoint::hour)
            .collect()
    }

    /// Copy of this day with every hour labeled Normal.
    pub fn with_all_normal(&self) -> Self {
        let mut day = self.clone();
        for p in &mut day.points {
            p.band = PriceBand::Normal;
        }
        day
    }
}

impl Default for DayPrices {
    fn default() -> Self {
        Self::zeroed()
    }
}
