use crate::model::Item;

/// Items split by whether they end up on the pet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Items rendered on the pet, in input order minus evictions.
    pub worn: Vec<Item>,
    /// Items evicted by a later conflicting item, in eviction order.
    pub closeted: Vec<Item>,
}

/// Partition `items` into worn and closeted sets.
///
/// Items are processed in order and later items win: when item `X` arrives, every already-worn
/// `Y` where `occupies(X) ∩ (occupies(Y) ∪ restricted(Y))` or
/// `occupies(Y) ∩ (occupies(X) ∪ restricted(X))` is non-empty moves to the closet before `X` is
/// worn. Items without an appearance for this body appear in neither list.
pub fn resolve(items: &[Item]) -> Resolution {
    let mut worn: Vec<&Item> = Vec::new();
    let mut closeted: Vec<&Item> = Vec::new();

    for item in items {
        let Some(x) = &item.appearance else {
            tracing::debug!(item = item.id, "skipping item with no appearance");
            continue;
        };
        let x_occupies = x.occupies();
        let x_claims = x.claims();

        // Decide evictions against the worn set as it stood before `item`, then apply them.
        let (evicted, kept): (Vec<&Item>, Vec<&Item>) = worn.into_iter().partition(|worn_item| {
            let Some(y) = &worn_item.appearance else {
                return false;
            };
            let y_occupies = y.occupies();
            !x_occupies.is_disjoint(&y.claims()) || !y_occupies.is_disjoint(&x_claims)
        });

        for evictee in &evicted {
            tracing::debug!(item = evictee.id, by = item.id, "closeting conflicting item");
        }
        closeted.extend(evicted);
        worn = kept;
        worn.push(item);
    }

    Resolution {
        worn: worn.into_iter().cloned().collect(),
        closeted: closeted.into_iter().cloned().collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/outfit/conflict.rs"]
mod tests;
