use std::sync::Arc;

/// Optional callback shared between threads.
///
/// Cloning shares the same callback. `F` is usually a `dyn Fn(..) + Send + Sync`.
pub struct SharedFn<F: ?Sized + Send + Sync + 'static>(Option<Arc<F>>);

impl<F: ?Sized + Send + Sync + 'static> SharedFn<F> {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn new(f: Arc<F>) -> Self {
        Self(Some(f))
    }

    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    pub fn as_ref(&self) -> Option<&F> {
        self.0.as_deref()
    }
}

impl<F: ?Sized + Send + Sync + 'static> Clone for SharedFn<F> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<F: ?Sized + Send + Sync + 'static> Default for SharedFn<F> {
    fn default() -> Self {
        Self::none()
    }
}

impl<F: ?Sized + Send + Sync + 'static> std::fmt::Debug for SharedFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            None => write!(f, "SharedFn::None"),
            Some(_) => write!(f, "SharedFn::Some(...)"),
        }
    }
}

impl<F: ?Sized + Send + Sync + 'static> From<Arc<F>> for SharedFn<F> {
    fn from(f: Arc<F>) -> Self {
        Self::new(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn clones_share_the_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let f: SharedFn<dyn Fn(usize) + Send + Sync> = SharedFn::new(Arc::new(move |n| {
            counter.fetch_add(n, Ordering::SeqCst);
        }));
        let g = f.clone();

        f.as_ref().unwrap()(2);
        g.as_ref().unwrap()(3);

        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn default_is_none() {
        let f: SharedFn<dyn Fn() + Send + Sync> = SharedFn::default();
        assert!(!f.is_some());
        assert!(f.as_ref().is_none());
    }
}
