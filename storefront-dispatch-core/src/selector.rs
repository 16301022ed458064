//! Memoized selectors
//!
//! A [`Selector`] projects its inputs out of the store state and derives a
//! value from them. The derived value is cached together with the inputs it
//! was computed from; as long as every input is the *same* reference as last
//! time, `select` hands back the cached `Arc` without recomputing.
//!
//! Selectors compose: a selector's output is an `Arc<V>`, which is itself an
//! [`Inputs`], so a selector built on top of another one only recomputes
//! when the upstream output changed by reference.
//!
//! ```ignore
//! let offers = Rc::new(Selector::new(
//!     "offers",
//!     |s: &State| Arc::clone(s.offers.get()),
//!     |offers| offers.data.clone().unwrap_or_default(),
//! ));
//! let featured = offers.clone().map("featured", |offers| offers.first().cloned());
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

/// Selector inputs compared by identity.
pub trait Inputs: Clone {
    /// Returns true if `other` refers to exactly the same values.
    fn same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Inputs for Arc<T> {
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<A: Inputs, B: Inputs> Inputs for (A, B) {
    fn same(&self, other: &Self) -> bool {
        self.0.same(&other.0) && self.1.same(&other.1)
    }
}

impl<A: Inputs, B: Inputs, C: Inputs> Inputs for (A, B, C) {
    fn same(&self, other: &Self) -> bool {
        self.0.same(&other.0) && self.1.same(&other.1) && self.2.same(&other.2)
    }
}

/// A pure, memoized projection of the store state.
///
/// Selectors live on the dispatching thread; share them with `Rc`.
pub struct Selector<S, I, V> {
    name: &'static str,
    input: Box<dyn Fn(&S) -> I>,
    compute: Box<dyn Fn(&I) -> V>,
    memo: RefCell<Option<(I, Arc<V>)>>,
    recomputations: Cell<usize>,
}

impl<S, I: Inputs, V> Selector<S, I, V> {
    /// Create a selector from an input projection and a compute function.
    pub fn new(
        name: &'static str,
        input: impl Fn(&S) -> I + 'static,
        compute: impl Fn(&I) -> V + 'static,
    ) -> Self {
        Self {
            name,
            input: Box::new(input),
            compute: Box::new(compute),
            memo: RefCell::new(None),
            recomputations: Cell::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Select the derived value for `state`.
    pub fn select(&self, state: &S) -> Arc<V> {
        let inputs = (self.input)(state);

        if let Some((cached_inputs, cached)) = self.memo.borrow().as_ref() {
            if cached_inputs.same(&inputs) {
                return Arc::clone(cached);
            }
        }

        let value = Arc::new((self.compute)(&inputs));
        self.recomputations.set(self.recomputations.get() + 1);
        tracing::trace!(selector = self.name, "selector recomputed");
        *self.memo.borrow_mut() = Some((inputs, Arc::clone(&value)));
        value
    }

    /// How many times the compute function has run
    pub fn recomputations(&self) -> usize {
        self.recomputations.get()
    }
}

impl<S: 'static, I: Inputs + 'static, V: 'static> Selector<S, I, V> {
    /// Derive a new selector from this selector's output.
    pub fn map<W>(
        self: Rc<Self>,
        name: &'static str,
        f: impl Fn(&V) -> W + 'static,
    ) -> Selector<S, Arc<V>, W> {
        Selector::new(
            name,
            move |state: &S| self.select(state),
            move |v: &Arc<V>| f(v),
        )
    }
}
