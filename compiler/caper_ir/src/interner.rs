//! String interner for variable names.
//!
//! Strings are reference-counted and owned by the interner, so they are
//! freed together with the program that interned them.

use std::sync::Arc;

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<Arc<str>, u32>,
    /// Storage for string contents.
    strings: Vec<Arc<str>>,
}

impl InternTable {
    fn with_empty() -> Self {
        let empty: Arc<str> = Arc::from("");
        let mut map = FxHashMap::default();
        map.insert(Arc::clone(&empty), 0);
        Self {
            map,
            strings: vec![empty],
        }
    }
}

/// String interner with O(1) lookup.
///
/// Interning takes `&self` so a program under construction can hand out
/// names while its arenas are mutably borrowed.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner holding only the empty string.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(InternTable::with_empty()),
        }
    }

    /// Intern a string, returning its `Name`.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&idx) = self.table.read().map.get(s) {
            return Name::from_raw(idx);
        }

        let mut table = self.table.write();
        // Another writer may have won the race between the two locks.
        if let Some(&idx) = table.map.get(s) {
            return Name::from_raw(idx);
        }
        let owned: Arc<str> = Arc::from(s);
        let idx = u32::try_from(table.strings.len()).unwrap_or(u32::MAX);
        table.strings.push(Arc::clone(&owned));
        table.map.insert(owned, idx);
        Name::from_raw(idx)
    }

    /// Look up a name without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).copied().map(Name::from_raw)
    }

    /// Resolve a name back to its string. Unknown names resolve to `""`.
    pub fn lookup(&self, name: Name) -> Arc<str> {
        let table = self.table.read();
        let idx = if name.index() < table.strings.len() {
            name.index()
        } else {
            Name::EMPTY.index()
        };
        Arc::clone(&table.strings[idx])
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}
