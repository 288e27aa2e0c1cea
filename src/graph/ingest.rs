//! C6: ingestor, and C7: undefined gatherer.
//!
//! Consumes the record stream produced by [`crate::scan`] (kept as a
//! separate, graph-agnostic module per SPEC_FULL §4.9) and builds up the
//! object/symbol/xref arenas. Grounded on the original `scan_file` /
//! `fixupObj` / `gatherDanglingUndefs` in `original_source/ldep.c`.

use log::warn;

use crate::ids::ObjId;
use crate::graph::LinkGraph;
use crate::graph::library::DuplicateLibraryMember;
use crate::graph::object::Object;
use crate::graph::symtab::{SymbolType, UnknownSymbolType};
use crate::graph::xref::{ExportXRef, ImportXRef};

/// One parsed record handed to the ingestor, as produced by the symbol-dump
/// scanner (§4.9).
#[derive(Debug, Clone, Copy)]
pub enum Record<'a> {
    /// `raw_name` is the header text with the trailing `:` already stripped.
    ObjectHeader(&'a str),
    SymbolEntry { name: &'a str, type_char: char },
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("misformed archive member name: '{0}', 'library[member]' expected")]
    MalformedObjectName(String),

    #[error("unknown symbol type {0:?}")]
    UnknownType(char),

    #[error(transparent)]
    DuplicateLibraryMember(#[from] DuplicateLibraryMember),
}

/// Splits a raw object/library header name the way `splitName` does in the
/// original source: a trailing `]` makes it `library[member]`; anything else
/// is a plain object name.
pub(crate) fn split_library_member(raw_name: &str) -> Result<(Option<&str>, &str), IngestError> {
    let Some(rest) = raw_name.strip_suffix(']') else {
        return Ok((None, raw_name));
    };

    match rest.rfind('[') {
        Some(open) => Ok((Some(&rest[..open]), &rest[open + 1..])),
        None => Err(IngestError::MalformedObjectName(raw_name.to_string())),
    }
}

/// Drives ingestion of one input stream's worth of [`Record`]s into a
/// [`LinkGraph`]. A fresh [`Ingestor`] should be created per input file so
/// that a missing leading object header is correctly synthesized from that
/// file's name (§4.3).
pub struct Ingestor<'g, 'arena> {
    graph: &'g mut LinkGraph<'arena>,
    current: Option<ObjId>,
    input_name: String,
    force: bool,
}

impl<'g, 'arena> Ingestor<'g, 'arena> {
    pub fn new(graph: &'g mut LinkGraph<'arena>, input_name: impl Into<String>, force: bool) -> Self {
        Self {
            graph,
            current: None,
            input_name: input_name.into(),
            force,
        }
    }

    /// Feeds one record. Returns the object a newly-opened header created,
    /// if any.
    pub fn feed(&mut self, record: Record<'_>) -> Result<Option<ObjId>, IngestError> {
        match record {
            Record::ObjectHeader(raw_name) => self.open_object(raw_name).map(Some),
            Record::SymbolEntry { name, type_char } => {
                self.add_symbol(name, type_char)?;
                Ok(None)
            }
        }
    }

    fn open_object(&mut self, raw_name: &str) -> Result<ObjId, IngestError> {
        self.fixup_current();

        let (lib_name, member_name) = split_library_member(raw_name)?;

        let member_name = self.graph.arena.intern(member_name);
        let lib = lib_name.map(|name| {
            let name = self.graph.arena.intern(name);
            self.graph.libraries.get_or_create(name)
        });

        let obj = self.graph.objects.push(Object::new(member_name, lib));

        if let Some(lib) = lib {
            self.graph.libraries.add_member(lib, member_name, obj)?;
        }

        self.current = Some(obj);
        Ok(obj)
    }

    /// Synthesizes `<input_name>.o` the way the original scanner does when a
    /// symbol line appears with no preceding object header: the first `/`-
    /// free suffix after the last `.` is replaced, or `.o` is appended if
    /// there is no extension (or the only `.` precedes a `/`).
    fn synth_object_name(&self) -> String {
        let name = &self.input_name;
        let dot = name.rfind('.');
        let slash = name.rfind('/');
        match dot {
            Some(dot_pos) if slash.is_none_or(|slash_pos| slash_pos < dot_pos) => {
                format!("{}o", &name[..=dot_pos])
            }
            _ => format!("{name}.o"),
        }
    }

    fn current_object(&mut self) -> ObjId {
        if let Some(obj) = self.current {
            return obj;
        }

        warn!("Symbol without object file?? -> substituting symbol file name...");
        let synthesized = self.synth_object_name();
        let name = self.graph.arena.intern(&synthesized);
        let obj = self.graph.objects.push(Object::new(name, None));
        self.current = Some(obj);
        obj
    }

    fn add_symbol(&mut self, name: &str, type_char: char) -> Result<(), IngestError> {
        let obj = self.current_object();

        let normalized = if self.force {
            type_char.to_ascii_uppercase()
        } else {
            type_char
        };

        let typ = if normalized == '?' {
            if self.force {
                SymbolType::Undefined
            } else {
                return Err(IngestError::UnknownType(type_char));
            }
        } else {
            SymbolType::try_from(normalized).map_err(|UnknownSymbolType(c)| {
                IngestError::UnknownType(c)
            })?
        };

        let name = self.graph.arena.intern(name);
        let (sym_id, created) = self.graph.symbols.intern(name);
        let symbol = self.graph.symbols.get(sym_id);

        if created {
            symbol.set_type(typ);
        } else if symbol.typ() != typ {
            if symbol.typ() == SymbolType::Undefined {
                symbol.set_type(typ);
            } else if typ != SymbolType::Undefined {
                warn!(
                    "type mismatch between multiply defined symbols: {} known as {}, is now {}",
                    symbol.name(),
                    char::from(symbol.typ()),
                    char::from(typ),
                );
            }
        }

        if typ.is_export() {
            let xref = ExportXRef::new(sym_id, obj, typ.is_weak());
            let id = self.graph.export_xrefs.push(xref);
            self.graph.objects.get_mut(obj).push_export(id);
        } else {
            let xref = ImportXRef::new(sym_id, obj);
            let id = self.graph.import_xrefs.push(xref);
            self.graph.objects.get_mut(obj).push_import(id);
        }

        Ok(())
    }

    /// Appends every export XRef the just-completed object accumulated to
    /// the tail of its symbol's exporter list (§4.3's fixup step). A no-op
    /// if no object is currently open.
    fn fixup_current(&mut self) {
        let Some(obj) = self.current else { return };
        self.fixup(obj);
    }

    fn fixup(&mut self, obj: ObjId) {
        let export_ids: Vec<_> = self.graph.objects.get(obj).exports().to_vec();
        for id in export_ids {
            let sym = self.graph.export_xrefs.get(id).sym;
            let symbol = self.graph.symbols.get(sym);
            let (head, tail) =
                self.graph
                    .export_xrefs
                    .push_back(symbol.exporter_head(), symbol.exporter_tail(), id);
            symbol.set_exporters(head, tail);
        }
    }

    /// Finishes this input stream: fixes up whatever object was last open.
    /// Must be called once all records for this input have been fed.
    pub fn finish(mut self) {
        self.fixup_current();
    }
}

impl<'arena> LinkGraph<'arena> {
    /// C7: walks the symbol table in name order; every symbol with no
    /// exporter becomes an export of the sentinel `U*` object. Must run
    /// exactly once, after every input file has been ingested.
    pub fn gather_dangling_undefs(&mut self) {
        let undefined: Vec<_> = self
            .symbols
            .walk()
            .filter(|&sym| self.symbols.get(sym).is_undefined())
            .collect();

        for sym in undefined {
            let xref = ExportXRef::new(sym, self.sentinel(), false);
            let id = self.export_xrefs.push(xref);
            self.objects.get_mut(self.sentinel()).push_export(id);
        }

        self.fixup_sentinel();
    }

    fn fixup_sentinel(&mut self) {
        let sentinel = self.sentinel();
        let export_ids: Vec<_> = self.objects.get(sentinel).exports().to_vec();
        for id in export_ids {
            let sym = self.export_xrefs.get(id).sym;
            let symbol = self.symbols.get(sym);
            // Every symbol here had an empty exporter list, so this always
            // appends as the sole (head == tail) exporter.
            debug_assert!(symbol.exporter_head().is_none());
            symbol.set_exporters(Some(id), Some(id));
        }
    }
}
