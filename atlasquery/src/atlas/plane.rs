//! Atlas planes: one value per voxel, stored in the dataset's native type.

/// Storage of one plane.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaneData {
    Byte(Vec<u8>),
    Short(Vec<i16>),
    /// Float values with a brick scale factor; a factor of 0 means 1.
    Float { values: Vec<f32>, factor: f32 },
}

impl PlaneData {
    pub fn len(&self) -> usize {
        match self {
            PlaneData::Byte(v) => v.len(),
            PlaneData::Short(v) => v.len(),
            PlaneData::Float { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_float(&self) -> bool {
        matches!(self, PlaneData::Float { .. })
    }
}

/// One channel of an atlas volume.
///
/// For probabilistic atlases the label names the region the plane holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    label: Option<String>,
    data: PlaneData,
}

impl Plane {
    pub fn new(data: PlaneData) -> Self {
        Self { label: None, data }
    }

    pub fn labeled(label: impl Into<String>, data: PlaneData) -> Self {
        Self {
            label: Some(label.into()),
            data,
        }
    }

    pub fn byte(values: Vec<u8>) -> Self {
        Self::new(PlaneData::Byte(values))
    }

    pub fn short(values: Vec<i16>) -> Self {
        Self::new(PlaneData::Short(values))
    }

    pub fn float(values: Vec<f32>) -> Self {
        Self::new(PlaneData::Float {
            values,
            factor: 1.0,
        })
    }

    /// Sets the plane label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn data(&self) -> &PlaneData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Integer value at `index`, read the way atlas codes are read.
    ///
    /// Float planes are scaled by their factor and truncated. Out of range
    /// reads give 0 (background).
    #[inline]
    pub fn code_at(&self, index: usize) -> i32 {
        match &self.data {
            PlaneData::Byte(v) => v.get(index).map_or(0, |&b| b as i32),
            PlaneData::Short(v) => v.get(index).map_or(0, |&s| s as i32),
            PlaneData::Float { values, factor } => {
                let factor = if *factor == 0.0 { 1.0 } else { *factor };
                values.get(index).map_or(0, |&f| (f * factor) as i32)
            }
        }
    }

    /// Raw stored value at `index` as a float, without any scale factor.
    #[inline]
    pub fn raw_at(&self, index: usize) -> f32 {
        match &self.data {
            PlaneData::Byte(v) => v.get(index).map_or(0.0, |&b| b as f32),
            PlaneData::Short(v) => v.get(index).map_or(0.0, |&s| s as f32),
            PlaneData::Float { values, .. } => values.get(index).copied().unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_at_integer_planes() {
        let byte = Plane::byte(vec![0, 7, 255]);
        assert_eq!(byte.code_at(1), 7);
        assert_eq!(byte.code_at(2), 255);
        let short = Plane::short(vec![-3, 300]);
        assert_eq!(short.code_at(0), -3);
        assert_eq!(short.code_at(1), 300);
    }

    #[test]
    fn test_code_at_float_uses_factor() {
        let plane = Plane::new(PlaneData::Float {
            values: vec![1.9, 2.5],
            factor: 2.0,
        });
        assert_eq!(plane.code_at(0), 3, "1.9 * 2 = 3.8 truncates to 3");
        assert_eq!(plane.code_at(1), 5);

        let zero_factor = Plane::new(PlaneData::Float {
            values: vec![4.2],
            factor: 0.0,
        });
        assert_eq!(zero_factor.code_at(0), 4, "factor 0 should act as 1");
    }

    #[test]
    fn test_out_of_range_reads_background() {
        let plane = Plane::byte(vec![1]);
        assert_eq!(plane.code_at(5), 0);
        assert_eq!(plane.raw_at(5), 0.0);
    }

    #[test]
    fn test_labels() {
        let plane = Plane::float(vec![0.5]).with_label("hOc1");
        assert_eq!(plane.label(), Some("hOc1"));
        assert!(plane.data().is_float());
        assert_eq!(plane.raw_at(0), 0.5);
        assert_eq!(Plane::byte(vec![]).label(), None);
    }
}
