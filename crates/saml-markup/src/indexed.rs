//! Collections whose members carry an `index` and an `isDefault` flag.
//!
//! How indices are assigned and defaults resolved is an [`IndexPolicy`];
//! collections only guarantee that the policy ran before members are read.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::builder::MarkupBuilder;
use crate::error::{MarkupError, MarkupResult};
use crate::node::XmlNode;
use crate::object::MarkupObject;

/// A member of an indexed collection.
pub trait Indexed {
    /// Position within the owning collection.
    fn index(&self) -> Option<u32>;

    /// Sets the position within the owning collection.
    fn set_index(&mut self, index: u32);

    /// The `isDefault` flag as declared.
    fn is_default(&self) -> Option<bool>;

    /// Sets or clears the `isDefault` flag.
    fn set_default(&mut self, is_default: Option<bool>);

    /// `index` and `isDefault` attributes, in that order, for serialization.
    fn index_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = Vec::with_capacity(2);
        if let Some(index) = self.index() {
            attributes.push(("index", index.to_string()));
        }
        if let Some(is_default) = self.is_default() {
            attributes.push(("isDefault", is_default.to_string()));
        }
        attributes
    }
}

/// Index and default flag of one member, as seen by a policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSlot {
    /// Declared or assigned index.
    pub index: Option<u32>,
    /// Declared default flag.
    pub is_default: Option<bool>,
}

/// Strategy that assigns indices and resolves default flags.
///
/// After `assign` succeeds every slot must carry a unique index and at most
/// one slot may be flagged default.
pub trait IndexPolicy: fmt::Debug + Send + Sync {
    /// Assigns indices and defaults to the slots, given in collection order.
    fn assign(&self, slots: &mut [IndexSlot]) -> MarkupResult<()>;
}

/// Lenient policy: duplicate or missing indices get the next index after the
/// highest one in use, and only the first default flag is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextFreeIndex;

impl IndexPolicy for NextFreeIndex {
    fn assign(&self, slots: &mut [IndexSlot]) -> MarkupResult<()> {
        let mut used = BTreeSet::new();
        for slot in slots.iter_mut() {
            if let Some(index) = slot.index {
                if !used.insert(index) {
                    warn!(index, "duplicate index in collection, reassigning");
                    slot.index = None;
                }
            }
        }
        fill_missing(slots, &mut used)?;

        let mut seen_default = false;
        for slot in slots.iter_mut() {
            if slot.is_default == Some(true) {
                if seen_default {
                    warn!(index = slot.index, "more than one default member, clearing flag");
                    slot.is_default = Some(false);
                }
                seen_default = true;
            }
        }
        Ok(())
    }
}

/// Strict policy: duplicate indices and multiple defaults are errors;
/// missing indices are still assigned.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictIndex;

impl IndexPolicy for StrictIndex {
    fn assign(&self, slots: &mut [IndexSlot]) -> MarkupResult<()> {
        let mut used = BTreeSet::new();
        for index in slots.iter().filter_map(|slot| slot.index) {
            if !used.insert(index) {
                return Err(MarkupError::Index(format!("duplicate index {index}")));
            }
        }
        let defaults = slots
            .iter()
            .filter(|slot| slot.is_default == Some(true))
            .count();
        if defaults > 1 {
            return Err(MarkupError::Index(format!(
                "{defaults} members are flagged as default"
            )));
        }
        fill_missing(slots, &mut used)
    }
}

fn fill_missing(slots: &mut [IndexSlot], used: &mut BTreeSet<u32>) -> MarkupResult<()> {
    let mut next = match used.last() {
        Some(highest) => highest
            .checked_add(1)
            .ok_or_else(|| MarkupError::Index("index space exhausted".to_string()))?,
        None => 0,
    };
    for slot in slots.iter_mut().filter(|slot| slot.index.is_none()) {
        slot.index = Some(next);
        used.insert(next);
        next = next
            .checked_add(1)
            .ok_or_else(|| MarkupError::Index("index space exhausted".to_string()))?;
    }
    Ok(())
}

/// Members ordered by index, normalized by a policy.
#[derive(Debug, Clone)]
pub struct IndexedCollection<T> {
    members: Vec<T>,
    policy: Arc<dyn IndexPolicy>,
}

impl<T: Indexed> IndexedCollection<T> {
    /// Creates a collection using [`NextFreeIndex`].
    pub fn new(members: Vec<T>) -> MarkupResult<Self> {
        Self::with_policy(members, Arc::new(NextFreeIndex))
    }

    /// Creates a collection using the given policy.
    pub fn with_policy(members: Vec<T>, policy: Arc<dyn IndexPolicy>) -> MarkupResult<Self> {
        let mut collection = Self { members, policy };
        collection.normalize()?;
        Ok(collection)
    }

    /// Adds a member; it keeps its index if the policy accepts it.
    ///
    /// On error the collection is left unchanged.
    pub fn push(&mut self, member: T) -> MarkupResult<()> {
        self.members.push(member);
        if let Err(err) = self.normalize() {
            self.members.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Replaces every member, normalizing with this collection's policy.
    ///
    /// On error the collection is left unchanged.
    pub fn replace(&mut self, members: Vec<T>) -> MarkupResult<()> {
        let previous = std::mem::replace(&mut self.members, members);
        if let Err(err) = self.normalize() {
            self.members = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Member with the given index.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&T> {
        self.members.iter().find(|member| member.index() == Some(index))
    }

    /// The member flagged default, or else the first member.
    #[must_use]
    pub fn default_member(&self) -> Option<&T> {
        self.members
            .iter()
            .find(|member| member.is_default() == Some(true))
            .or_else(|| self.members.first())
    }

    /// The member with `index`, or the default when no index is given.
    #[must_use]
    pub fn resolve(&self, index: Option<u32>) -> Option<&T> {
        match index {
            Some(index) => self.get(index),
            None => self.default_member(),
        }
    }

    /// The policy normalizing this collection.
    #[must_use]
    pub fn policy(&self) -> &dyn IndexPolicy {
        self.policy.as_ref()
    }

    fn normalize(&mut self) -> MarkupResult<()> {
        let mut slots: Vec<IndexSlot> = self
            .members
            .iter()
            .map(|member| IndexSlot {
                index: member.index(),
                is_default: member.is_default(),
            })
            .collect();
        self.policy.assign(&mut slots)?;

        for (member, slot) in self.members.iter_mut().zip(&slots) {
            if let Some(index) = slot.index {
                if member.index() != Some(index) {
                    member.set_index(index);
                }
            }
            if member.is_default() != slot.is_default {
                member.set_default(slot.is_default);
            }
        }
        self.members.sort_by_key(|member| member.index());
        Ok(())
    }
}

impl<T: Indexed + Clone> IndexedCollection<T> {
    /// Applies `f` to the member with `index`, then normalizes again.
    ///
    /// Returns `false` when no member has that index. On error the collection
    /// is left unchanged.
    pub fn update(&mut self, index: u32, f: impl FnOnce(&mut T)) -> MarkupResult<bool> {
        let Some(position) = self
            .members
            .iter()
            .position(|member| member.index() == Some(index))
        else {
            return Ok(false);
        };
        let previous = self.members.clone();
        f(&mut self.members[position]);
        if let Err(err) = self.normalize() {
            self.members = previous;
            return Err(err);
        }
        Ok(true)
    }
}

impl<T: Indexed + MarkupObject + Default> IndexedCollection<T> {
    /// Parses one member per node and normalizes with the given policy.
    pub fn from_nodes<'n>(
        nodes: impl IntoIterator<Item = &'n XmlNode>,
        policy: Arc<dyn IndexPolicy>,
    ) -> MarkupResult<Self> {
        let members = nodes
            .into_iter()
            .map(T::from_element)
            .collect::<MarkupResult<Vec<_>>>()?;
        Self::with_policy(members, policy)
    }

    /// Serializes every member in index order.
    pub fn serialize(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        self.members
            .iter()
            .try_for_each(|member| member.serialize(builder))
    }
}

impl<T> IndexedCollection<T> {
    /// Creates an empty collection that will normalize with `policy`.
    #[must_use]
    pub fn empty(policy: Arc<dyn IndexPolicy>) -> Self {
        Self {
            members: Vec::new(),
            policy,
        }
    }

    /// Members in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.members.iter()
    }

    /// Members in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.members
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Consumes the collection, returning its members.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.members
    }
}

impl<T> Default for IndexedCollection<T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            policy: Arc::new(NextFreeIndex),
        }
    }
}

impl<T: PartialEq> PartialEq for IndexedCollection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl<'a, T> IntoIterator for &'a IndexedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
