//! Static reserved-name table.
//!
//! Two families of words cannot be used verbatim as internal names:
//! - TTCN-3 keywords, which are legal ASN.1 identifiers but must be spelled
//!   with a trailing `_` when shown in TTCN-3;
//! - names reserved by the emitted runtime, which are legal in both source
//!   dialects and keep their spelling there.
//!
//! Both map to an internal name with a single trailing `_`. Escaped names
//! only ever contain even runs of `_`, so a table entry can never collide
//! with a name produced by escaping.

use std::sync::OnceLock;

use rustc_hash::{FxHashMap, FxHashSet};

/// TTCN-3 keywords that are valid ASN.1 value/field identifiers.
const TTCN_KEYWORDS: &[&str] = &[
    "action", "activate", "address", "alive", "all", "alt", "altstep", "and", "and4b", "any",
    "anytype", "bitstring", "boolean", "call", "case", "catch", "char", "charstring", "check",
    "clear", "complement", "component", "connect", "const", "control", "create", "deactivate",
    "default", "disconnect", "display", "do", "done", "else", "encode", "enumerated", "error",
    "except", "exception", "execute", "extends", "extension", "external", "fail", "false", "float",
    "for", "friend", "from", "function", "getcall", "getreply", "getverdict", "goto", "group",
    "hexstring", "if", "ifpresent", "import", "in", "inconc", "infinity", "inout", "integer",
    "interleave", "kill", "killed", "label", "language", "length", "log", "map", "match",
    "message", "mixed", "mod", "modifies", "module", "modulepar", "mtc", "noblock", "none", "not",
    "not4b", "nowait", "null", "objid", "octetstring", "of", "omit", "on", "optional", "or",
    "or4b", "out", "override", "param", "pass", "pattern", "port", "private", "procedure",
    "public", "raise", "read", "receive", "record", "recursive", "rem", "repeat", "reply",
    "return", "running", "runs", "select", "self", "send", "sender", "set", "setverdict",
    "signature", "start", "stop", "subset", "superset", "system", "template", "testcase",
    "timeout", "timer", "to", "trigger", "true", "type", "union", "universal", "unmap", "value",
    "valueof", "var", "variant", "verdicttype", "while", "with", "xor", "xor4b",
];

/// Names reserved by the emitted runtime that both dialects accept.
const RUNTIME_RESERVED: &[&str] = &[
    "asm", "auto", "bool", "break", "class", "const_cast", "continue", "delete", "double",
    "dynamic_cast", "explicit", "export", "extern", "inline", "int", "long", "mutable",
    "namespace", "new", "operator", "protected", "register", "reinterpret_cast", "short",
    "signed", "sizeof", "static", "static_cast", "struct", "switch", "this", "throw", "try",
    "typedef", "typeid", "typename", "unsigned", "using", "virtual", "void", "volatile",
    "wchar_t", "main", "errno", "exit", "fclose", "fopen", "printf", "stderr", "stdin", "stdout",
];

/// Immutable lookup structure built once from the static word lists.
pub(crate) struct KeywordTable {
    ttcn_to_name: FxHashMap<String, String>,
    asn_to_name: FxHashMap<&'static str, String>,
    name_to_ttcn: FxHashMap<String, String>,
    name_to_asn: FxHashMap<String, &'static str>,
    reserved: FxHashSet<&'static str>,
}

impl KeywordTable {
    fn build() -> Self {
        let mut table = KeywordTable {
            ttcn_to_name: FxHashMap::default(),
            asn_to_name: FxHashMap::default(),
            name_to_ttcn: FxHashMap::default(),
            name_to_asn: FxHashMap::default(),
            reserved: FxHashSet::default(),
        };

        for &word in TTCN_KEYWORDS {
            let name = format!("{word}_");
            // A TTCN-3 keyword can only be written in TTCN-3 with the suffix.
            table.ttcn_to_name.insert(name.clone(), name.clone());
            table.asn_to_name.insert(word, name.clone());
            table.name_to_ttcn.insert(name.clone(), name.clone());
            table.name_to_asn.insert(name, word);
            table.reserved.insert(word);
        }

        for &word in RUNTIME_RESERVED {
            let name = format!("{word}_");
            table.ttcn_to_name.insert(word.to_owned(), name.clone());
            table.asn_to_name.insert(word, name.clone());
            table.name_to_ttcn.insert(name.clone(), word.to_owned());
            table.name_to_asn.insert(name, word);
            table.reserved.insert(word);
        }

        table
    }

    /// Table entry for a TTCN-3 spelling.
    pub(crate) fn ttcn_to_name(&self, raw: &str) -> Option<&str> {
        self.ttcn_to_name.get(raw).map(String::as_str)
    }

    /// Table entry for an ASN.1 spelling.
    pub(crate) fn asn_to_name(&self, raw: &str) -> Option<&str> {
        self.asn_to_name.get(raw).map(String::as_str)
    }

    /// TTCN-3 display spelling of a table-defined internal name.
    pub(crate) fn name_to_ttcn(&self, name: &str) -> Option<&str> {
        self.name_to_ttcn.get(name).map(String::as_str)
    }

    /// ASN.1 display spelling of a table-defined internal name.
    pub(crate) fn name_to_asn(&self, name: &str) -> Option<&'static str> {
        self.name_to_asn.get(name).copied()
    }

    /// Whether `name` is a reserved word that must never be an internal name.
    pub(crate) fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }
}

/// The process-wide keyword table.
pub(crate) fn table() -> &'static KeywordTable {
    static TABLE: OnceLock<KeywordTable> = OnceLock::new();
    TABLE.get_or_init(KeywordTable::build)
}

/// Whether `word` is reserved in either family.
pub fn is_reserved_word(word: &str) -> bool {
    table().is_reserved(word)
}

/// Every reserved word, TTCN-3 keywords first.
pub fn reserved_words() -> impl Iterator<Item = &'static str> {
    TTCN_KEYWORDS.iter().chain(RUNTIME_RESERVED).copied()
}
