use quarry_common::{QuarryError, Result};

/// A dense three axis array stored in one flat, row-major buffer.
///
/// For shape `[a, b, c]` the element at `[i, j, k]` lives at
/// `(i * b + j) * c + k`, so the last axis is contiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume<T> {
    shape: [usize; 3],
    data: Vec<T>,
}

impl<T: Copy + Default> Volume<T> {
    pub fn new(shape: [usize; 3]) -> Self {
        Self::filled(shape, T::default())
    }

    pub fn filled(shape: [usize; 3], value: T) -> Self {
        Volume {
            shape,
            data: vec![value; shape[0] * shape[1] * shape[2]],
        }
    }

    pub fn from_vec(shape: [usize; 3], data: Vec<T>) -> Result<Self> {
        let expected = shape[0] * shape[1] * shape[2];
        if data.len() != expected {
            return Err(QuarryError::format(format!(
                "volume of shape {:?} needs {} values, got {}",
                shape,
                expected,
                data.len()
            )));
        }
        Ok(Volume { shape, data })
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn offset(&self, [i, j, k]: [usize; 3]) -> Option<usize> {
        let [a, b, c] = self.shape;
        if i < a && j < b && k < c {
            Some((i * b + j) * c + k)
        } else {
            None
        }
    }

    pub fn get(&self, index: [usize; 3]) -> Option<T> {
        self.offset(index).map(|o| self.data[o])
    }

    /// Returns false and leaves the volume untouched when `index` is out of range.
    pub fn set(&mut self, index: [usize; 3], value: T) -> bool {
        match self.offset(index) {
            Some(o) => {
                self.data[o] = value;
                true
            }
            None => false,
        }
    }

    /// Copies `src` into this volume with its origin at `offset`.
    pub fn write_at(&mut self, offset: [usize; 3], src: &Volume<T>) -> Result<()> {
        for axis in 0..3 {
            if offset[axis] + src.shape[axis] > self.shape[axis] {
                return Err(QuarryError::format(format!(
                    "block of shape {:?} at {:?} does not fit in {:?}",
                    src.shape, offset, self.shape
                )));
            }
        }
        let [_, sb, sc] = src.shape;
        for i in 0..src.shape[0] {
            for j in 0..sb {
                let from = (i * sb + j) * sc;
                let to = ((offset[0] + i) * self.shape[1] + offset[1] + j) * self.shape[2] + offset[2];
                self.data[to..to + sc].copy_from_slice(&src.data[from..from + sc]);
            }
        }
        Ok(())
    }

    /// Reads the half-open box `min..max` into a new volume.
    pub fn read_box(&self, min: [usize; 3], max: [usize; 3]) -> Result<Volume<T>> {
        self.check_box(min, max)?;
        let shape = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];
        let mut data = Vec::with_capacity(shape[0] * shape[1] * shape[2]);
        for i in min[0]..max[0] {
            for j in min[1]..max[1] {
                let start = (i * self.shape[1] + j) * self.shape[2];
                data.extend_from_slice(&self.data[start + min[2]..start + max[2]]);
            }
        }
        Ok(Volume { shape, data })
    }

    /// Writes `src` over the half-open box `min..max`; the box and `src` must agree in shape.
    pub fn write_box(&mut self, min: [usize; 3], max: [usize; 3], src: &Volume<T>) -> Result<()> {
        self.check_box(min, max)?;
        let shape = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];
        if shape != src.shape {
            return Err(QuarryError::format(format!(
                "box {:?}..{:?} has shape {:?} but source has {:?}",
                min, max, shape, src.shape
            )));
        }
        self.write_at(min, src)
    }

    fn check_box(&self, min: [usize; 3], max: [usize; 3]) -> Result<()> {
        for axis in 0..3 {
            if min[axis] > max[axis] || max[axis] > self.shape[axis] {
                return Err(QuarryError::format(format!(
                    "box {:?}..{:?} outside volume of shape {:?}",
                    min, max, self.shape
                )));
            }
        }
        Ok(())
    }

    /// Exchanges two axes, the way `ndarray.swapaxes` followed by a contiguous
    /// copy would. The result is again row-major over its new shape.
    pub fn swap_axes(&self, a: usize, b: usize) -> Volume<T> {
        let mut shape = self.shape;
        shape.swap(a, b);
        let mut data = vec![T::default(); self.data.len()];
        let [_, nb, nc] = shape;

        let mut src = 0;
        for i in 0..self.shape[0] {
            for j in 0..self.shape[1] {
                for k in 0..self.shape[2] {
                    let mut index = [i, j, k];
                    index.swap(a, b);
                    data[(index[0] * nb + index[1]) * nc + index[2]] = self.data[src];
                    src += 1;
                }
            }
        }
        Volume { shape, data }
    }
}
