use std::collections::BTreeSet;

/// Numéros « chauds ». Les valeurs hors plage sont simplement ignorées à la pondération.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotSet(BTreeSet<u8>);

impl HotSet {
    pub fn new(numbers: impl IntoIterator<Item = u8>) -> Self {
        Self(numbers.into_iter().collect())
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.contains(&number)
    }

    /// Nombre de numéros de `numbers` présents dans l'ensemble.
    pub fn overlap(&self, numbers: &[u8]) -> usize {
        numbers.iter().filter(|n| self.0.contains(n)).count()
    }

    /// Restriction à la plage [1, size].
    pub fn within(&self, size: usize) -> HotSet {
        Self(
            self.0
                .iter()
                .copied()
                .filter(|&n| n >= 1 && (n as usize) <= size)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
