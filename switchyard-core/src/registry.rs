//! # Module Registry
//!
//! The indexed structure that maps operation codes to modules and back. It
//! keeps three views consistent:
//!
//! - operation → [`RegistryEntry`] (`module` plus the operation's position in
//!   that module's selector list),
//! - module → selector list (unordered, no duplicates),
//! - the set of modules that own at least one operation, with each module's
//!   position in that set.
//!
//! Every primitive is O(1). Removal is swap-with-last followed by an explicit
//! re-index of the element that was moved, then truncation. The re-index is
//! done unconditionally, including when the removed element *is* the last
//! one: skipping it leaves a stale cached position behind, and a later removal
//! through that position deletes the wrong slot.
//!
//! Operations bound to the proxy's own address (the built-in sentinel) can be
//! added but never replaced or removed.

use crate::{
    error::ProxyError,
    event::{CutAction, ModuleCut},
    id::{Address, OperationCode},
};
use std::collections::{HashMap, HashSet};

/// Where an operation is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    /// The module the operation is bound to. Never zero.
    pub module: Address,
    /// Position of the operation in the module's selector list.
    pub position: usize,
}

#[derive(Debug, Clone, Default)]
struct SelectorList {
    selectors: Vec<OperationCode>,
    /// Position of the owning module in the module set.
    position: usize,
}

/// Operation → module routing table.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    builtin: Address,
    entries: HashMap<OperationCode, RegistryEntry>,
    lists: HashMap<Address, SelectorList>,
    modules: Vec<Address>,
}

impl ModuleRegistry {
    /// An empty registry. Operations bound to `builtin` are immutable.
    pub fn new(builtin: Address) -> Self {
        Self {
            builtin,
            entries: HashMap::new(),
            lists: HashMap::new(),
            modules: Vec::new(),
        }
    }

    /// The built-in sentinel address.
    pub fn builtin(&self) -> Address {
        self.builtin
    }

    /// The module an operation is routed to.
    pub fn resolve(&self, op: OperationCode) -> Option<Address> {
        self.entries.get(&op).map(|e| e.module)
    }

    /// The module an operation is routed to, or [`Address::ZERO`].
    pub fn module_of(&self, op: OperationCode) -> Address {
        self.resolve(op).unwrap_or(Address::ZERO)
    }

    /// The full entry for an operation.
    pub fn entry(&self, op: OperationCode) -> Option<RegistryEntry> {
        self.entries.get(&op).copied()
    }

    /// Distinct modules owning at least one operation. The order follows
    /// insertion and swap history and carries no meaning.
    pub fn modules(&self) -> &[Address] {
        &self.modules
    }

    /// Operations currently routed to `module`, in no meaningful order.
    pub fn operations_of(&self, module: Address) -> &[OperationCode] {
        self.lists
            .get(&module)
            .map(|l| l.selectors.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `op` is bound to the built-in sentinel.
    pub fn is_immutable(&self, op: OperationCode) -> bool {
        self.resolve(op) == Some(self.builtin)
    }

    /// Number of registered operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind a new operation to `module`.
    pub fn add(&mut self, op: OperationCode, module: Address) -> Result<(), ProxyError> {
        if module.is_zero() {
            return Err(ProxyError::AddressZero);
        }
        if self.entries.contains_key(&op) {
            return Err(ProxyError::AddFunctionDuplicate(op));
        }
        let position = self.link(op, module);
        self.entries.insert(op, RegistryEntry { module, position });
        Ok(())
    }

    /// Rebind an existing operation to a different module.
    pub fn replace(&mut self, op: OperationCode, module: Address) -> Result<(), ProxyError> {
        if module.is_zero() {
            return Err(ProxyError::AddressZero);
        }
        let current = self
            .entry(op)
            .ok_or(ProxyError::RemoveFunctionDoesNotExist(op))?;
        if current.module == module {
            return Err(ProxyError::ReplaceFunctionSame(op));
        }
        if current.module == self.builtin {
            return Err(ProxyError::RemoveFunctionImmutable(op));
        }
        self.unlink(op, current)?;
        let position = self.link(op, module);
        self.entries.insert(op, RegistryEntry { module, position });
        Ok(())
    }

    /// Unbind an operation.
    pub fn remove(&mut self, op: OperationCode) -> Result<(), ProxyError> {
        let current = self
            .entry(op)
            .ok_or(ProxyError::RemoveFunctionDoesNotExist(op))?;
        if current.module == self.builtin {
            return Err(ProxyError::RemoveFunctionImmutable(op));
        }
        self.unlink(op, current)?;
        self.entries.remove(&op);
        Ok(())
    }

    /// Apply a batch of cut entries all-or-nothing.
    ///
    /// The batch runs against a staged copy that replaces `self` only once
    /// every entry has been applied; on error `self` is untouched.
    pub fn apply_cut(&mut self, cuts: &[ModuleCut]) -> Result<(), ProxyError> {
        let mut staged = self.clone();
        for cut in cuts {
            if cut.selectors.is_empty() {
                return Err(ProxyError::NoSelectorsToCut);
            }
            match cut.action {
                CutAction::Add => {
                    if cut.module.is_zero() {
                        return Err(ProxyError::AddressZero);
                    }
                    for &op in &cut.selectors {
                        staged.add(op, cut.module)?;
                    }
                }
                CutAction::Replace => {
                    if cut.module.is_zero() {
                        return Err(ProxyError::AddressZero);
                    }
                    for &op in &cut.selectors {
                        staged.replace(op, cut.module)?;
                    }
                }
                // The target of a removal is ignored.
                CutAction::Remove => {
                    for &op in &cut.selectors {
                        staged.remove(op)?;
                    }
                }
            }
        }
        *self = staged;
        Ok(())
    }

    /// Append `op` to `module`'s list, registering the module if new.
    /// Returns the operation's position in the list.
    fn link(&mut self, op: OperationCode, module: Address) -> usize {
        let next_position = self.modules.len();
        let list = self.lists.entry(module).or_insert_with(|| SelectorList {
            selectors: Vec::new(),
            position: next_position,
        });
        if list.selectors.is_empty() {
            self.modules.push(module);
        }
        list.selectors.push(op);
        list.selectors.len() - 1
    }

    /// Swap-delete `op` out of its module's list, re-indexing the moved
    /// element, and drop the module from the set once its list is empty.
    ///
    /// The entry for `op` itself is left for the caller to rewrite or delete.
    fn unlink(&mut self, op: OperationCode, entry: RegistryEntry) -> Result<(), ProxyError> {
        let list = self.lists.get_mut(&entry.module).ok_or_else(|| {
            ProxyError::Invariant(format!("{op} points at {} with no list", entry.module))
        })?;
        let removed = entry.position;
        let Some(last_index) = list.selectors.len().checked_sub(1) else {
            return Err(ProxyError::Invariant(format!(
                "{op} points at an empty list"
            )));
        };
        if list.selectors.get(removed) != Some(&op) {
            return Err(ProxyError::Invariant(format!(
                "{op} cached at position {removed} of {}",
                entry.module
            )));
        }

        let last = list.selectors[last_index];
        list.selectors[removed] = last;
        if let Some(moved) = self.entries.get_mut(&last) {
            moved.position = removed;
        }
        list.selectors.truncate(last_index);

        if list.selectors.is_empty() {
            let slot = list.position;
            self.drop_module(entry.module, slot)?;
        }
        Ok(())
    }

    fn drop_module(&mut self, module: Address, slot: usize) -> Result<(), ProxyError> {
        let Some(last_slot) = self.modules.len().checked_sub(1) else {
            return Err(ProxyError::Invariant(format!(
                "{module} dropped from an empty module set"
            )));
        };
        if self.modules.get(slot) != Some(&module) {
            return Err(ProxyError::Invariant(format!(
                "{module} cached at module slot {slot}"
            )));
        }

        let last = self.modules[last_slot];
        self.modules[slot] = last;
        if let Some(moved) = self.lists.get_mut(&last) {
            moved.position = slot;
        }
        self.modules.truncate(last_slot);
        self.lists.remove(&module);
        Ok(())
    }

    /// Check every structural invariant.
    ///
    /// Only reachable as an error if the algorithms above are wrong; used by
    /// the test suites after every mutation.
    pub fn verify(&self) -> Result<(), ProxyError> {
        let fail = |msg: String| Err(ProxyError::Invariant(msg));

        let mut seen_modules = HashSet::new();
        for (slot, module) in self.modules.iter().enumerate() {
            if !seen_modules.insert(*module) {
                return fail(format!("{module} listed twice in the module set"));
            }
            match self.lists.get(module) {
                Some(list) if list.position != slot => {
                    return fail(format!(
                        "{module} caches slot {} but sits at {slot}",
                        list.position
                    ));
                }
                Some(list) if list.selectors.is_empty() => {
                    return fail(format!("{module} is in the module set with no operations"));
                }
                Some(_) => {}
                None => return fail(format!("{module} is in the module set with no list")),
            }
        }
        if self.lists.len() != self.modules.len() {
            return fail(format!(
                "{} selector lists for {} modules",
                self.lists.len(),
                self.modules.len()
            ));
        }

        let mut listed = 0usize;
        for (module, list) in &self.lists {
            let mut seen = HashSet::new();
            for (index, op) in list.selectors.iter().enumerate() {
                if !seen.insert(*op) {
                    return fail(format!("{op} listed twice under {module}"));
                }
                match self.entries.get(op) {
                    Some(e) if e.module != *module => {
                        return fail(format!("{op} listed under {module} but bound to {}", e.module));
                    }
                    Some(e) if e.position != index => {
                        return fail(format!(
                            "{op} caches position {} but sits at {index}",
                            e.position
                        ));
                    }
                    Some(_) => {}
                    None => return fail(format!("{op} listed under {module} with no entry")),
                }
            }
            listed += list.selectors.len();
        }
        if listed != self.entries.len() {
            return fail(format!(
                "{listed} listed operations for {} entries",
                self.entries.len()
            ));
        }
        if let Some((op, _)) = self.entries.iter().find(|(_, e)| e.module.is_zero()) {
            return fail(format!("{op} is bound to the zero address"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(n: u32) -> OperationCode {
        OperationCode::from_bytes(n.to_be_bytes())
    }

    fn module(n: u64) -> Address {
        Address::from_index(n)
    }

    fn sorted(ops: &[OperationCode]) -> Vec<OperationCode> {
        let mut v = ops.to_vec();
        v.sort();
        v
    }

    #[test]
    fn add_and_resolve() {
        let mut reg = ModuleRegistry::new(module(0));
        reg.add(op(1), module(1)).unwrap();
        reg.add(op(2), module(1)).unwrap();
        reg.add(op(3), module(2)).unwrap();
        reg.verify().unwrap();

        assert_eq!(reg.resolve(op(1)), Some(module(1)));
        assert_eq!(reg.module_of(op(9)), Address::ZERO);
        assert_eq!(reg.modules(), &[module(1), module(2)]);
        assert_eq!(reg.operations_of(module(1)), &[op(1), op(2)]);
        assert!(reg.operations_of(module(7)).is_empty());
    }

    #[test]
    fn add_rejects_zero_and_duplicates() {
        let mut reg = ModuleRegistry::new(module(0));
        assert_eq!(reg.add(op(1), Address::ZERO), Err(ProxyError::AddressZero));
        reg.add(op(1), module(1)).unwrap();
        assert_eq!(
            reg.add(op(1), module(2)),
            Err(ProxyError::AddFunctionDuplicate(op(1)))
        );
        reg.verify().unwrap();
    }

    #[test]
    fn swap_delete_reindexes_moved_element() {
        let mut reg = ModuleRegistry::new(module(0));
        for n in [1, 2, 3, 4] {
            reg.add(op(n), module(1)).unwrap();
        }
        reg.remove(op(2)).unwrap();
        reg.verify().unwrap();
        assert_eq!(sorted(reg.operations_of(module(1))), vec![op(1), op(3), op(4)]);
        assert_eq!(reg.entry(op(4)).unwrap().position, 1);

        reg.remove(op(4)).unwrap();
        reg.verify().unwrap();
        assert_eq!(sorted(reg.operations_of(module(1))), vec![op(1), op(3)]);
    }

    #[test]
    fn removing_last_element_and_single_element() {
        let mut reg = ModuleRegistry::new(module(0));
        reg.add(op(1), module(1)).unwrap();
        reg.add(op(2), module(1)).unwrap();
        reg.add(op(3), module(2)).unwrap();

        reg.remove(op(2)).unwrap();
        reg.verify().unwrap();
        reg.remove(op(1)).unwrap();
        reg.verify().unwrap();
        assert_eq!(reg.modules(), &[module(2)]);
        assert_eq!(reg.resolve(op(1)), None);
    }

    #[test]
    fn module_set_swap_delete() {
        let mut reg = ModuleRegistry::new(module(0));
        for n in 1..=4u32 {
            reg.add(op(n), module(n as u64)).unwrap();
        }
        reg.remove(op(2)).unwrap();
        reg.verify().unwrap();
        assert_eq!(reg.modules(), &[module(1), module(4), module(3)]);
        reg.remove(op(4)).unwrap();
        reg.verify().unwrap();
        assert_eq!(reg.modules(), &[module(1), module(3)]);
    }

    #[test]
    fn replace_moves_between_lists() {
        let mut reg = ModuleRegistry::new(module(0));
        reg.add(op(1), module(1)).unwrap();
        reg.add(op(2), module(1)).unwrap();

        assert_eq!(
            reg.replace(op(1), module(1)),
            Err(ProxyError::ReplaceFunctionSame(op(1)))
        );
        assert_eq!(
            reg.replace(op(9), module(2)),
            Err(ProxyError::RemoveFunctionDoesNotExist(op(9)))
        );
        assert_eq!(reg.replace(op(1), Address::ZERO), Err(ProxyError::AddressZero));

        reg.replace(op(1), module(2)).unwrap();
        reg.replace(op(2), module(2)).unwrap();
        reg.verify().unwrap();
        assert_eq!(reg.modules(), &[module(2)]);
        assert_eq!(reg.operations_of(module(2)), &[op(1), op(2)]);
    }

    #[test]
    fn builtin_operations_are_immutable() {
        let builtin = module(0);
        let mut reg = ModuleRegistry::new(builtin);
        reg.add(op(1), builtin).unwrap();
        assert!(reg.is_immutable(op(1)));
        assert_eq!(
            reg.remove(op(1)),
            Err(ProxyError::RemoveFunctionImmutable(op(1)))
        );
        assert_eq!(
            reg.replace(op(1), module(3)),
            Err(ProxyError::RemoveFunctionImmutable(op(1)))
        );
        reg.verify().unwrap();
    }

    #[test]
    fn failed_cut_leaves_registry_untouched() {
        let mut reg = ModuleRegistry::new(module(0));
        reg.add(op(1), module(1)).unwrap();
        let cuts = [
            ModuleCut::add(module(2), vec![op(2), op(3)]),
            ModuleCut::remove(vec![op(1)]),
            ModuleCut::add(module(2), vec![op(2)]),
        ];
        assert_eq!(
            reg.apply_cut(&cuts),
            Err(ProxyError::AddFunctionDuplicate(op(2)))
        );
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.modules(), &[module(1)]);
        reg.verify().unwrap();
    }

    #[test]
    fn cut_validation() {
        let mut reg = ModuleRegistry::new(module(0));
        assert_eq!(
            reg.apply_cut(&[ModuleCut::add(module(1), Vec::<OperationCode>::new())]),
            Err(ProxyError::NoSelectorsToCut)
        );
        assert_eq!(
            reg.apply_cut(&[ModuleCut::add(Address::ZERO, vec![op(1)])]),
            Err(ProxyError::AddressZero)
        );
        assert_eq!(
            reg.apply_cut(&[ModuleCut::remove(vec![op(1)])]),
            Err(ProxyError::RemoveFunctionDoesNotExist(op(1)))
        );
    }
}
