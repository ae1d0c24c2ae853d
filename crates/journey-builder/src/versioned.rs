// -------------------------------------------------------------------
// Versioned
// -------------------------------------------------------------------

/// Value paired with a counter that advances on every mutable access.
#[derive(Clone, Debug)]
pub struct Versioned<T> {
    version: u64,
    data: T,
}

impl<T> Versioned<T> {
    pub fn new(data: T) -> Self {
        Self { version: 0, data }
    }
    pub fn get(&self) -> &T {
        &self.data
    }
    pub fn get_mut(&mut self) -> &mut T {
        self.version = self.version.wrapping_add(1);
        &mut self.data
    }
    pub fn set(&mut self, data: T) {
        self.data = data;
        self.version = self.version.wrapping_add(1);
    }
    pub fn version(&self) -> u64 {
        self.version
    }
}

// -------------------------------------------------------------------
// Memoized
// -------------------------------------------------------------------

pub struct Memoized<S, K, V> {
    version: u64,
    cached: Option<(K, V)>,
    get_key: Box<dyn Fn(&S) -> K>,
    calc: Box<dyn Fn(&S) -> V>,
}

impl<S, K, V> Memoized<S, K, V>
where
    K: PartialEq,
{
    pub fn new(
        get_key: impl Fn(&S) -> K + 'static,
        calc: impl Fn(&S) -> V + 'static,
    ) -> Self {
        Self {
            version: 0,
            cached: None,
            get_key: Box::new(get_key),
            calc: Box::new(calc),
        }
    }

    /// Recompute only if the key changed; return a reference to the cached value.
    pub fn get<'a>(&'a mut self, store: &S) -> &'a V {
        self.get_mut(store)
    }

    /// Mutable access to the cached value, recomputing first if stale.
    /// Edits made through this reference survive until the key changes.
    pub fn get_mut<'a>(&'a mut self, store: &S) -> &'a mut V {
        let key = (self.get_key)(store);
        let stale = !matches!(&self.cached, Some((k, _)) if *k == key);
        if stale {
            self.version = self.version.wrapping_add(1);
        }
        let (_, value) = match self.cached.take() {
            Some(entry) if !stale => self.cached.insert(entry),
            _ => self.cached.insert((key, (self.calc)(store))),
        };
        value
    }

    /// Incremented each time the value is recomputed.
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_versioned_bumps_on_mutation() {
        let mut v = Versioned::new(1);
        assert_eq!(v.version(), 0);
        let _ = v.get();
        assert_eq!(v.version(), 0);
        *v.get_mut() += 1;
        v.set(10);
        assert_eq!(v.version(), 2);
        assert_eq!(*v.get(), 10);
    }

    #[test]
    fn test_memoized_recomputes_on_key_change() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut memo: Memoized<Versioned<i32>, u64, i32> = Memoized::new(
            |s: &Versioned<i32>| s.version(),
            move |s: &Versioned<i32>| {
                counter.set(counter.get() + 1);
                s.get() * 2
            },
        );

        let mut source = Versioned::new(3);
        assert_eq!(*memo.get(&source), 6);
        assert_eq!(*memo.get(&source), 6);
        assert_eq!(calls.get(), 1, "unchanged key must hit the cache");

        source.set(5);
        assert_eq!(*memo.get(&source), 10);
        assert_eq!(calls.get(), 2);
        assert_eq!(memo.version(), 2);
    }

    #[test]
    fn test_memoized_keeps_local_edits() {
        let mut memo: Memoized<u64, u64, Vec<u64>> =
            Memoized::new(|s: &u64| *s, |s: &u64| vec![*s]);
        memo.get_mut(&1).push(99);
        assert_eq!(memo.get(&1), &vec![1, 99]);
        assert_eq!(memo.get(&2), &vec![2]);
    }
}
