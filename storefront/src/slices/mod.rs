//! Feature slices
//!
//! Each module owns one slice: its data types, its closed action enum and a
//! pure slice reducer. Reducers return `None` whenever the slice would not
//! change, so the store keeps the identical `Arc` and selectors stay cached.

pub mod filters;
pub mod footer;
pub mod hero;
pub mod newsletter;
pub mod offers;
pub mod products;
pub mod sustainability;

use storefront_dispatch::LoadState;

/// Successful load. An identical payload keeps the current reference.
pub(crate) fn load_success<D: Clone + PartialEq>(state: &LoadState<D>, data: &D) -> Option<LoadState<D>> {
    if state.error.is_none() && state.data.as_ref() == Some(data) {
        return None;
    }
    Some(LoadState::loaded(data.clone()))
}

/// Failed load. Prior data stays in place; a repeated error is not a change.
pub(crate) fn load_failure<D: Clone>(state: &LoadState<D>, error: &str) -> Option<LoadState<D>> {
    if state.error.as_deref() == Some(error) {
        return None;
    }
    Some(state.failed(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storefront_dispatch::Slice;

    fn reduce(state: &LoadState<Vec<u8>>, outcome: &Result<Vec<u8>, String>) -> Option<LoadState<Vec<u8>>> {
        match outcome {
            Ok(data) => load_success(state, data),
            Err(error) => load_failure(state, error),
        }
    }

    #[test]
    fn test_identical_payload_keeps_reference() {
        let mut slice = Slice::new("bytes", LoadState::seeded(vec![1, 2]));
        let before = Arc::clone(slice.get());

        assert!(!slice.reduce(&Ok(vec![1, 2]), reduce));
        assert!(Arc::ptr_eq(&before, slice.get()));

        assert!(slice.reduce(&Ok(vec![3]), reduce));
        assert_eq!(slice.get().data, Some(vec![3]));
    }

    #[test]
    fn test_failure_keeps_data_and_dedupes() {
        let mut slice = Slice::new("bytes", LoadState::seeded(vec![1]));

        assert!(slice.reduce(&Err("offline".into()), reduce));
        assert_eq!(slice.get().data, Some(vec![1]));
        assert_eq!(slice.get().error.as_deref(), Some("offline"));

        assert!(!slice.reduce(&Err("offline".into()), reduce));

        // Same data after an error still clears the error
        assert!(slice.reduce(&Ok(vec![1]), reduce));
        assert_eq!(slice.get().error, None);
    }
}
