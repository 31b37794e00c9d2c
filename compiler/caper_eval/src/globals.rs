//! Global variable table.
//!
//! Every variable a program uses is declared up front with a type and starts
//! at that type's default value. The table lives as long as its program and
//! is written only by assignment and by `for each` binding.

use rustc_hash::FxHashMap;

use caper_ir::{Name, Value, ValueType};

/// Error returned by `GlobalTable::assign` when a write is refused.
///
/// A refused write leaves the table unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// No variable with that name was declared.
    Undeclared,
    /// The value's type differs from the declared type.
    TypeMismatch { declared: ValueType },
}

#[derive(Clone, Debug)]
struct Slot {
    ty: ValueType,
    value: Value,
}

/// Mapping from name to declared type and current value.
#[derive(Clone, Debug, Default)]
pub struct GlobalTable {
    slots: FxHashMap<Name, Slot>,
}

impl GlobalTable {
    /// Build a table with every declared name at its default value.
    pub fn new(declarations: &[(Name, ValueType)]) -> Self {
        let slots = declarations
            .iter()
            .map(|&(name, ty)| {
                (
                    name,
                    Slot {
                        ty,
                        value: ty.default_value(),
                    },
                )
            })
            .collect();
        Self { slots }
    }

    /// Current value of a variable.
    #[inline]
    pub fn get(&self, name: Name) -> Option<Value> {
        self.slots.get(&name).map(|slot| slot.value)
    }

    /// Declared type of a variable.
    #[inline]
    pub fn declared_type(&self, name: Name) -> Option<ValueType> {
        self.slots.get(&name).map(|slot| slot.ty)
    }

    /// Overwrite a variable, checking its declared type first.
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        let slot = self.slots.get_mut(&name).ok_or(AssignError::Undeclared)?;
        if slot.ty != value.value_type() {
            return Err(AssignError::TypeMismatch { declared: slot.ty });
        }
        slot.value = value;
        Ok(())
    }

    /// All bindings, ordered by name index for stable output.
    pub fn snapshot(&self) -> Vec<(Name, Value)> {
        let mut out: Vec<_> = self
            .slots
            .iter()
            .map(|(name, slot)| (*name, slot.value))
            .collect();
        out.sort_by_key(|(name, _)| *name);
        out
    }
}
