use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Shared, load-once values available to frame hooks (asset tables, tuning
/// data, score counters).
///
/// Loading happens during setup, before the first frame. A resource type is
/// loaded at most once: a second insert asserts in debug builds and replaces
/// the value in release builds.
#[derive(Debug, Default)]
pub struct Resources {
    values: HashMap<TypeId, Box<dyn Any>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Any>(&mut self, value: T) {
        let previous = self.values.insert(TypeId::of::<T>(), Box::new(value));
        debug_assert!(
            previous.is_none(),
            "resource {} loaded twice",
            std::any::type_name::<T>()
        );
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref())
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|value| value.downcast_mut())
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Score(u32);

    #[test]
    fn insert_and_get() {
        let mut res = Resources::new();
        res.insert(Score(3));
        assert_eq!(res.get::<Score>(), Some(&Score(3)));
        assert!(res.get::<String>().is_none());
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut res = Resources::new();
        res.insert(Score(0));
        res.get_mut::<Score>().unwrap().0 += 5;
        assert_eq!(res.get::<Score>().unwrap().0, 5);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "loaded twice")]
    fn double_load_asserts_in_debug() {
        let mut res = Resources::new();
        res.insert(Score(1));
        res.insert(Score(2));
    }
}
