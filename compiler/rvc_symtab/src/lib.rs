//! Scope-aware symbol table.
//!
//! A fixed array of [`TABLE_SIZE`] hash buckets, each a chain of [`Symbol`]s.
//! The front end inserts a symbol for every declaration it parses, tagged
//! with the scope level active at that point (0 is global), and closes a
//! scope with [`ScopeTable::delete_scopes_at_or_above`].
//!
//! # Shadowing
//!
//! Insertion never replaces an existing entry. New symbols go to the head
//! of their chain and lookup returns the first name match, so the most
//! recent declaration of a name is the visible one. When its scope closes,
//! the outer declaration becomes visible again.
//!
//! # Hash
//!
//! The bucket index is the sum of the name's bytes modulo [`TABLE_SIZE`].
//! It distributes poorly (anagrams always collide) but correctness depends
//! only on walking the chain, and the table stays small.
//!
//! A miss is not an error here: [`ScopeTable::lookup`] returns `None` and the
//! caller decides whether that is an undeclared identifier.

use std::fmt;

use rvc_ir::{DataType, VarKind};

/// Number of hash buckets.
pub const TABLE_SIZE: usize = 97;

/// Error from a symbol table mutation.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SymbolTableError {
    #[error("out of memory while declaring `{name}`")]
    AllocationFailed { name: String },
}

/// A declared name and its storage metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub scope_level: u32,
    pub ty: DataType,
    /// Element count for arrays.
    pub size: u32,
    /// Frame slot or storage offset assigned at declaration.
    pub offset: i32,
    pub kind: VarKind,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}, scope {}, size {}, offset {})",
            self.name, self.kind, self.ty, self.scope_level, self.size, self.offset
        )
    }
}

/// Chained hash table from name to [`Symbol`].
pub struct ScopeTable {
    /// Each chain is stored oldest-first; the chain's head is the last element.
    buckets: Box<[Vec<Symbol>]>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    pub fn new() -> Self {
        Self {
            buckets: (0..TABLE_SIZE).map(|_| Vec::new()).collect(),
        }
    }

    /// Bucket a name hashes to.
    pub fn bucket_index(name: &str) -> usize {
        let sum: usize = name.bytes().map(usize::from).sum();
        sum % TABLE_SIZE
    }

    /// Declare `name` at `scope_level`, shadowing any earlier declaration.
    pub fn insert(
        &mut self,
        name: &str,
        scope_level: u32,
        ty: DataType,
        size: u32,
        offset: i32,
        kind: VarKind,
    ) -> Result<(), SymbolTableError> {
        let alloc_failed = || SymbolTableError::AllocationFailed {
            name: name.to_string(),
        };

        let mut owned_name = String::new();
        owned_name.try_reserve_exact(name.len()).map_err(|_| alloc_failed())?;
        owned_name.push_str(name);

        let chain = &mut self.buckets[Self::bucket_index(name)];
        chain.try_reserve(1).map_err(|_| alloc_failed())?;
        chain.push(Symbol {
            name: owned_name,
            scope_level,
            ty,
            size,
            offset,
            kind,
        });

        tracing::trace!(name, scope_level, %kind, "symbol declared");
        Ok(())
    }

    /// Most recently declared symbol named `name`.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.buckets[Self::bucket_index(name)]
            .iter()
            .rev()
            .find(|sym| sym.name == name)
    }

    /// Most recent symbol named `name` declared exactly at `scope_level`.
    ///
    /// Front ends use this to reject a redeclaration within one scope.
    pub fn lookup_in_scope(&self, name: &str, scope_level: u32) -> Option<&Symbol> {
        self.buckets[Self::bucket_index(name)]
            .iter()
            .rev()
            .find(|sym| sym.name == name && sym.scope_level == scope_level)
    }

    /// Remove every symbol declared at `scope_level` or deeper.
    ///
    /// Surviving symbols keep their relative order. Returns how many were
    /// removed.
    pub fn delete_scopes_at_or_above(&mut self, scope_level: u32) -> usize {
        let mut removed = 0;
        for chain in &mut self.buckets {
            let before = chain.len();
            chain.retain(|sym| sym.scope_level < scope_level);
            removed += before - chain.len();
        }
        tracing::trace!(scope_level, removed, "scopes closed");
        removed
    }

    /// Remove every symbol. The buckets themselves are kept.
    pub fn release_all(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
    }

    /// All symbols, in bucket order and newest-first within a bucket.
    pub fn iter(&self) -> Symbols<'_> {
        let empty: &[Symbol] = &[];
        Symbols {
            buckets: self.buckets.iter(),
            chain: empty.iter().rev(),
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

impl fmt::Debug for ScopeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a ScopeTable {
    type Item = &'a Symbol;
    type IntoIter = Symbols<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over every symbol in a [`ScopeTable`]. See [`ScopeTable::iter`].
pub struct Symbols<'a> {
    buckets: std::slice::Iter<'a, Vec<Symbol>>,
    chain: std::iter::Rev<std::slice::Iter<'a, Symbol>>,
}

impl<'a> Iterator for Symbols<'a> {
    type Item = &'a Symbol;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(sym) = self.chain.next() {
                return Some(sym);
            }
            self.chain = self.buckets.next()?.iter().rev();
        }
    }
}
