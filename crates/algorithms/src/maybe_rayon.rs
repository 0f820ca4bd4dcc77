//! Per-site evaluation that runs on rayon when the `parallel` feature is on.
//!
//! Results are always collected in site order, so enabling the feature never
//! changes an operator's output.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluate `f` at every site index `0..len`, returning the values in order.
#[cfg(feature = "parallel")]
pub(crate) fn map_sites<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..len).into_par_iter().map(f).collect()
}

/// Evaluate `f` at every site index `0..len`, returning the values in order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn map_sites<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..len).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_sites_preserves_order() {
        let values = map_sites(1000, |i| i * 3);
        assert!(values.iter().enumerate().all(|(i, &v)| v == i * 3));
    }
}
