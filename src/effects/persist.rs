//! Effect order persistence.
//!
//! The rack only ever talks to an [`OrderStore`]; where the ids end up
//! (a file, local storage, nowhere) is the host's business. Loading is
//! strict: anything but an exact permutation of the universe is replaced by
//! the factory order.

use tracing::warn;

use crate::error::{ChainError, StoreError};

use super::EffectKind;

pub trait OrderStore: Send {
    /// The saved order, or `None` when nothing was saved yet.
    fn load(&mut self) -> Result<Option<Vec<String>>, StoreError>;

    fn save(&mut self, order: &[String]) -> Result<(), StoreError>;
}

/// Keeps the order in memory. Used when the host has no storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    saved: Option<Vec<String>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(ids: Vec<String>) -> Self {
        Self { saved: Some(ids) }
    }

    pub fn saved(&self) -> Option<&[String]> {
        self.saved.as_deref()
    }
}

impl OrderStore for MemoryOrderStore {
    fn load(&mut self) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, order: &[String]) -> Result<(), StoreError> {
        self.saved = Some(order.to_vec());
        Ok(())
    }
}

/// Check that `order` holds every kind exactly once.
pub fn validate_order(order: &[EffectKind]) -> Result<(), ChainError> {
    if order.len() != EffectKind::COUNT {
        return Err(ChainError::WrongLength {
            expected: EffectKind::COUNT,
            got: order.len(),
        });
    }

    let mut seen = [false; EffectKind::COUNT];
    for kind in order {
        if std::mem::replace(&mut seen[kind.index()], true) {
            return Err(ChainError::Duplicate(*kind));
        }
    }

    match EffectKind::ALL.iter().find(|kind| !seen[kind.index()]) {
        Some(missing) => Err(ChainError::Missing(*missing)),
        None => Ok(()),
    }
}

pub fn decode_order<S: AsRef<str>>(ids: &[S]) -> Result<Vec<EffectKind>, ChainError> {
    if ids.len() != EffectKind::COUNT {
        return Err(ChainError::WrongLength {
            expected: EffectKind::COUNT,
            got: ids.len(),
        });
    }

    let order = ids
        .iter()
        .map(|id| {
            let id = id.as_ref();
            EffectKind::from_id(id).ok_or_else(|| ChainError::UnknownId(id.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_order(&order)?;
    Ok(order)
}

pub fn encode_order(order: &[EffectKind]) -> Vec<String> {
    order.iter().map(|kind| kind.id().to_string()).collect()
}

/// Saved order if it is valid, otherwise the factory order. Never fails.
pub fn load_order(store: &mut dyn OrderStore) -> Vec<EffectKind> {
    match store.load() {
        Ok(Some(ids)) => decode_order(&ids).unwrap_or_else(|err| {
            warn!(%err, "stored effect order rejected, using default");
            EffectKind::ALL.to_vec()
        }),
        Ok(None) => EffectKind::ALL.to_vec(),
        Err(err) => {
            warn!(%err, "effect order unavailable, using default");
            EffectKind::ALL.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(order: &[EffectKind]) -> Vec<String> {
        encode_order(order)
    }

    #[test]
    fn test_accepts_exact_permutation() {
        let mut order = EffectKind::ALL.to_vec();
        order.reverse();
        assert_eq!(decode_order(&ids(&order)).unwrap(), order);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let short = &EffectKind::ALL[..14];
        assert_eq!(
            decode_order(&ids(short)),
            Err(ChainError::WrongLength {
                expected: 15,
                got: 14
            })
        );
    }

    #[test]
    fn test_rejects_duplicates_and_unknowns() {
        let mut order = EffectKind::ALL.to_vec();
        order[14] = EffectKind::Delay;
        assert_eq!(
            validate_order(&order),
            Err(ChainError::Duplicate(EffectKind::Delay))
        );

        let mut names = ids(&EffectKind::ALL);
        names[3] = "flanger".into();
        assert_eq!(
            decode_order(&names),
            Err(ChainError::UnknownId("flanger".into()))
        );
    }

    #[test]
    fn test_load_falls_back_to_default() {
        let mut store = MemoryOrderStore::with_order(vec!["reverb".into(), "delay".into()]);
        assert_eq!(load_order(&mut store), EffectKind::ALL.to_vec());

        let mut empty = MemoryOrderStore::new();
        assert_eq!(load_order(&mut empty), EffectKind::ALL.to_vec());
    }

    #[test]
    fn test_load_survives_store_failure() {
        struct Broken;
        impl OrderStore for Broken {
            fn load(&mut self) -> Result<Option<Vec<String>>, StoreError> {
                Err(StoreError::Unavailable("disk gone".into()))
            }
            fn save(&mut self, _: &[String]) -> Result<(), StoreError> {
                Err(StoreError::Unavailable("disk gone".into()))
            }
        }

        assert_eq!(load_order(&mut Broken), EffectKind::ALL.to_vec());
    }
}
