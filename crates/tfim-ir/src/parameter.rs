//! Symbol bindings for parameterized programs.

use rustc_hash::FxHashMap;

use crate::error::{IrError, IrResult};

/// Values for the named parameters of a program, supplied at execution time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: FxHashMap<String, f64>,
}

impl Bindings {
    /// Create an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `names[i]` to `values[i]`.
    ///
    /// The two slices must have the same length; a parameter vector handed
    /// in by an optimizer with the wrong dimension is rejected here.
    pub fn from_vector<S: AsRef<str>>(names: &[S], values: &[f64]) -> IrResult<Self> {
        if names.len() != values.len() {
            return Err(IrError::DimensionMismatch {
                context: "parameter vector".into(),
                expected: names.len(),
                got: values.len(),
            });
        }
        Ok(names
            .iter()
            .zip(values)
            .map(|(name, &value)| (name.as_ref().to_string(), value))
            .collect())
    }

    /// Bind a symbol, replacing any previous value.
    pub fn bind(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Builder form of [`Bindings::bind`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.bind(name, value);
        self
    }

    /// Look up a symbol.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Look up a symbol that must be present.
    pub fn require(&self, name: &str) -> IrResult<f64> {
        self.get(name)
            .ok_or_else(|| IrError::UnboundParameter(name.to_string()))
    }

    /// Check whether a symbol is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of bound symbols.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, f64)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
