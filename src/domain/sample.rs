// GPS + inclination sample domain models
use crate::error::PipelineError;

/// One GPS reading with phone inclination, as captured by the client.
///
/// `date_time` is carried verbatim from the capture source and is never
/// reparsed; it is display-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub index: u32,
    pub date_time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub inclination: f64,
}

impl Sample {
    pub fn new(
        index: u32,
        date_time: impl Into<String>,
        latitude: f64,
        longitude: f64,
        inclination: f64,
    ) -> Self {
        Self {
            index,
            date_time: date_time.into(),
            latitude,
            longitude,
            inclination,
        }
    }
}

/// An ordered, non-empty collection of samples submitted or loaded together.
///
/// Order is input order, which also defines the connecting track. A batch is
/// immutable once constructed.
#[derive(Debug, Clone)]
pub struct Batch {
    samples: Vec<Sample>,
}

impl Batch {
    /// Build a batch, rejecting an empty sample set.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self, PipelineError> {
        if samples.is_empty() {
            return Err(PipelineError::EmptyBatch);
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Arithmetic mean of the true coordinates, used to center the map.
    pub fn center(&self) -> (f64, f64) {
        let n = self.samples.len() as f64;
        let lat = self.samples.iter().map(|s| s.latitude).sum::<f64>() / n;
        let lon = self.samples.iter().map(|s| s.longitude).sum::<f64>() / n;
        (lat, lon)
    }

    /// True coordinates in batch order, for the connecting path.
    pub fn track(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .map(|s| (s.latitude, s.longitude))
            .collect()
    }
}
