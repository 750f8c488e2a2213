//! Mark-and-sweep removal shared by the entity registries.

/// Entities that flag themselves for removal instead of being dropped in place.
pub(crate) trait Expiring {
    /// Reports whether the entity is waiting for the next sweep.
    fn can_remove(&self) -> bool;
}

/// Drops every flagged entity while preserving the order of the survivors.
///
/// Returns the number of removed entities.
pub(crate) fn sweep<T: Expiring>(entries: &mut Vec<T>) -> usize {
    let before = entries.len();
    entries.retain(|entry| !entry.can_remove());
    before - entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(bool);

    impl Expiring for Marker {
        fn can_remove(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn sweep_is_idempotent() {
        let mut entries = vec![Marker(false), Marker(true), Marker(false), Marker(true)];

        assert_eq!(sweep(&mut entries), 2);
        assert_eq!(sweep(&mut entries), 0);
        assert_eq!(entries.len(), 2);
    }
}
