//! Main Field type

use std::sync::Arc;

use ndarray::Array1;

use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::lattice::Lattice;

/// A value at every site of a lattice.
///
/// `Field<T>` is total over its lattice: index `i` of the value array belongs
/// to site `i`. Operators take fields by reference and return new fields;
/// the lattice is shared through an `Arc` so clones are cheap.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use spatmorph_core::{Field, Lattice};
///
/// let lattice = Arc::new(Lattice::hexagon(2)?);
/// let mut field: Field<bool> = Field::new(lattice.clone());
/// field.set(lattice.index_of([0, 0]).unwrap(), true)?;
/// assert_eq!(field.count_foreground(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Field<T: FieldElement> {
    lattice: Arc<Lattice>,
    data: Array1<T>,
}

impl<T: FieldElement> Field<T> {
    /// Create a field with every site set to background
    pub fn new(lattice: Arc<Lattice>) -> Self {
        Self::filled(lattice, T::background())
    }

    /// Create a field with every site set to `value`
    pub fn filled(lattice: Arc<Lattice>, value: T) -> Self {
        let data = Array1::from_elem(lattice.len(), value);
        Self { lattice, data }
    }

    /// Create a field from per-site values in site order
    pub fn from_vec(lattice: Arc<Lattice>, data: Vec<T>) -> Result<Self> {
        if data.len() != lattice.len() {
            return Err(Error::SizeMismatch {
                expected: lattice.len(),
                actual: data.len(),
            });
        }
        Ok(Self {
            lattice,
            data: Array1::from_vec(data),
        })
    }

    /// Create a field by evaluating `f` at every site
    pub fn from_fn<F>(lattice: Arc<Lattice>, f: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        let data = lattice.sites().map(f).collect::<Array1<T>>();
        Self { lattice, data }
    }

    /// A field on the same lattice built from new values
    pub fn with_values<U: FieldElement>(&self, data: Vec<U>) -> Result<Field<U>> {
        Field::from_vec(self.lattice.clone(), data)
    }

    pub fn lattice(&self) -> &Arc<Lattice> {
        &self.lattice
    }

    /// Number of sites
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Value at `site`
    pub fn get(&self, site: usize) -> Result<T> {
        self.data.get(site).copied().ok_or(Error::SiteOutOfBounds {
            site,
            len: self.len(),
        })
    }

    /// Set value at `site`
    pub fn set(&mut self, site: usize, value: T) -> Result<()> {
        let len = self.len();
        let slot = self
            .data
            .get_mut(site)
            .ok_or(Error::SiteOutOfBounds { site, len })?;
        *slot = value;
        Ok(())
    }

    /// Value at `site` without a bounds check on the result type
    ///
    /// # Panics
    /// Panics if `site >= self.len()`.
    pub fn at(&self, site: usize) -> T {
        self.data[site]
    }

    pub fn values(&self) -> &Array1<T> {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data.to_vec()
    }

    /// Apply `f` pointwise, producing a field of a possibly different kind
    pub fn map<U, F>(&self, f: F) -> Field<U>
    where
        U: FieldElement,
        F: FnMut(T) -> U,
    {
        Field {
            lattice: self.lattice.clone(),
            data: self.data.mapv(f),
        }
    }

    /// Whether both fields are defined on the same lattice
    pub fn same_lattice<U: FieldElement>(&self, other: &Field<U>) -> bool {
        Arc::ptr_eq(&self.lattice, &other.lattice) || *self.lattice == *other.lattice
    }

    /// Sites whose value is foreground, in site order
    pub fn foreground_sites(&self) -> Vec<usize> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_foreground())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|v| v.is_foreground()).count()
    }

    /// Foreground mask of this field
    pub fn mask(&self) -> Field<bool> {
        self.map(|v| v.is_foreground())
    }
}

impl Field<bool> {
    /// Logical NOT at every site
    pub fn complement(&self) -> Field<bool> {
        self.map(|v| !v)
    }
}

impl Field<f64> {
    /// Minimum and maximum value, ignoring NaN
    pub fn range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl<T: FieldElement> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_lattice(other) && self.data == other.data
    }
}
