//! Interned identifiers with dialect spellings.
//!
//! An [`Identifier`] is a 32-bit handle to a shared, immutable name record
//! holding three spellings: the internal (emit) name and the TTCN-3 and
//! ASN.1 display names. The mapping from a raw source spelling to the
//! internal name is a pure function of `(dialect, raw)`:
//!
//! - TTCN-3: every `_` is doubled;
//! - ASN.1: every `-` becomes `__`;
//! - internal: taken verbatim.
//!
//! Spellings listed in the static reserved-word table take the table's
//! internal form instead, and any result that is still a reserved word gets a
//! trailing `_`. Two raw spellings that map to the same internal name share
//! one record, so handle equality is name equality.

mod keywords;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

pub use keywords::{is_reserved_word, reserved_words};

/// Source dialect a raw spelling was written in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Dialect {
    Ttcn,
    Asn1,
    /// Already an internal name (synthesized by the checker or an embedder).
    Internal,
}

impl Dialect {
    const fn index(self) -> usize {
        match self {
            Dialect::Ttcn => 0,
            Dialect::Asn1 => 1,
            Dialect::Internal => 2,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Ttcn => "TTCN-3",
            Dialect::Asn1 => "ASN.1",
            Dialect::Internal => "internal",
        })
    }
}

/// Interned identifier.
///
/// Copyable handle; compare and hash by value. Resolve the spellings through
/// the [`IdentifierTable`] that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Identifier(u32);

impl Identifier {
    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

/// Error when interning an identifier fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// The table exceeded capacity (over 4 billion names).
    Overflow { count: usize },
    /// The raw spelling was empty.
    Empty { dialect: Dialect },
}

impl fmt::Display for InternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "identifier table exceeded capacity: {count} names, max is {}",
                u32::MAX
            ),
            InternError::Empty { dialect } => {
                write!(f, "cannot intern an empty {dialect} identifier")
            }
        }
    }
}

impl std::error::Error for InternError {}

/// Map a TTCN-3 spelling to its internal name.
pub fn ttcn_to_name(raw: &str) -> String {
    let name = match keywords::table().ttcn_to_name(raw) {
        Some(name) => name.to_owned(),
        None => raw.replace('_', "__"),
    };
    guard_reserved(name)
}

/// Map an ASN.1 spelling to its internal name.
pub fn asn_to_name(raw: &str) -> String {
    let name = match keywords::table().asn_to_name(raw) {
        Some(name) => name.to_owned(),
        None => raw.replace('-', "__"),
    };
    guard_reserved(name)
}

/// TTCN-3 display spelling of an internal name.
pub fn name_to_ttcn(name: &str) -> String {
    match keywords::table().name_to_ttcn(name) {
        Some(display) => display.to_owned(),
        None => name.replace("__", "_"),
    }
}

/// ASN.1 display spelling of an internal name.
pub fn name_to_asn(name: &str) -> String {
    match keywords::table().name_to_asn(name) {
        Some(display) => display.to_owned(),
        None => name.replace("__", "-"),
    }
}

fn guard_reserved(mut name: String) -> String {
    if keywords::table().is_reserved(&name) {
        name.push('_');
    }
    name
}

/// Map a raw spelling to its internal name.
pub fn to_internal(dialect: Dialect, raw: &str) -> String {
    match dialect {
        Dialect::Ttcn => ttcn_to_name(raw),
        Dialect::Asn1 => asn_to_name(raw),
        Dialect::Internal => guard_reserved(raw.to_owned()),
    }
}

/// The three spellings of one identifier.
#[derive(Copy, Clone, Debug)]
struct NameRecord {
    name: &'static str,
    ttcn: &'static str,
    asn: &'static str,
}

struct TableInner {
    /// Internal name to handle.
    by_name: FxHashMap<&'static str, Identifier>,
    /// Raw spelling to handle per dialect, so repeated spellings skip escaping.
    spellings: [FxHashMap<&'static str, Identifier>; 3],
    records: Vec<NameRecord>,
}

/// Append-only identifier table.
///
/// Strings are leaked to get `'static` lifetime; a table lives for the
/// process, like the names it hands out.
///
/// # Thread Safety
/// Uses a single `RwLock`. Lookups of already-interned spellings only take
/// the read lock.
pub struct IdentifierTable {
    inner: RwLock<TableInner>,
}

impl IdentifierTable {
    pub fn new() -> Self {
        IdentifierTable {
            inner: RwLock::new(TableInner {
                by_name: FxHashMap::default(),
                spellings: std::array::from_fn(|_| FxHashMap::default()),
                records: Vec::with_capacity(256),
            }),
        }
    }

    /// Try to intern a raw spelling, returning its identifier or an error.
    pub fn try_intern(&self, dialect: Dialect, raw: &str) -> Result<Identifier, InternError> {
        if raw.is_empty() {
            return Err(InternError::Empty { dialect });
        }

        // Fast path: spelling seen before
        if let Some(&id) = self.inner.read().spellings[dialect.index()].get(raw) {
            return Ok(id);
        }

        let name = to_internal(dialect, raw);
        let mut guard = self.inner.write();

        // Double-check after acquiring write lock
        if let Some(&id) = guard.spellings[dialect.index()].get(raw) {
            return Ok(id);
        }

        let existing = guard.by_name.get(name.as_str()).copied();
        let id = match existing {
            Some(id) => id,
            None => {
                let raw_index = u32::try_from(guard.records.len()).map_err(|_| {
                    InternError::Overflow {
                        count: guard.records.len(),
                    }
                })?;
                let id = Identifier(raw_index);
                let record = NameRecord {
                    ttcn: leak(name_to_ttcn(&name)),
                    asn: leak(name_to_asn(&name)),
                    name: leak(name),
                };
                guard.records.push(record);
                guard.by_name.insert(record.name, id);
                id
            }
        };
        guard.spellings[dialect.index()].insert(leak(raw.to_owned()), id);
        Ok(id)
    }

    /// Intern a raw spelling.
    ///
    /// # Panics
    /// Panics if `raw` is empty or the table exceeds capacity. Use
    /// `try_intern` for fallible interning.
    pub fn intern(&self, dialect: Dialect, raw: &str) -> Identifier {
        self.try_intern(dialect, raw)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up an identifier by internal name without interning it.
    pub fn lookup(&self, name: &str) -> Option<Identifier> {
        self.inner.read().by_name.get(name).copied()
    }

    fn record(&self, id: Identifier) -> Option<NameRecord> {
        self.inner.read().records.get(id.0 as usize).copied()
    }

    /// Internal (emit) name. Unknown handles yield `""`.
    pub fn name(&self, id: Identifier) -> &'static str {
        self.record(id).map_or("", |r| r.name)
    }

    /// TTCN-3 display name.
    pub fn ttcn_name(&self, id: Identifier) -> &'static str {
        self.record(id).map_or("", |r| r.ttcn)
    }

    /// ASN.1 display name.
    pub fn asn_name(&self, id: Identifier) -> &'static str {
        self.record(id).map_or("", |r| r.asn)
    }

    /// Spelling of `id` for the given dialect.
    pub fn display(&self, id: Identifier, dialect: Dialect) -> &'static str {
        match dialect {
            Dialect::Ttcn => self.ttcn_name(id),
            Dialect::Asn1 => self.asn_name(id),
            Dialect::Internal => self.name(id),
        }
    }

    /// Number of distinct internal names.
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IdentifierTable {
    fn default() -> Self {
        Self::new()
    }
}

fn leak(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

/// Cheaply clonable handle to a shared [`IdentifierTable`].
#[derive(Clone, Default)]
pub struct SharedIdentifierTable(Arc<IdentifierTable>);

impl SharedIdentifierTable {
    pub fn new() -> Self {
        SharedIdentifierTable(Arc::new(IdentifierTable::new()))
    }
}

impl std::ops::Deref for SharedIdentifierTable {
    type Target = IdentifierTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
