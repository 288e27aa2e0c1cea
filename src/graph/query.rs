//! C12: name-based object lookup for the interactive shell and the
//! removal-list driver. Grounded on `fileListFind` / `objcmp` in
//! `original_source/ldep.c`, which additionally sorts the file list and
//! binary-searches it; a linear scan is used here instead, since the
//! object count this tool deals with does not warrant the extra
//! machinery.

use crate::ids::ObjId;
use crate::graph::LinkGraph;
use crate::graph::ingest::{split_library_member, IngestError};

impl<'arena> LinkGraph<'arena> {
    /// Resolves a (possibly `library[member]`-qualified) name to every
    /// matching object. An unqualified name matches an object of that name
    /// in *any* library, or with none; a qualified name matches only within
    /// the named library. Since member names are unique within one
    /// library, a qualified query can return at most one match; an
    /// unqualified one may return several if the same name is used as a
    /// bare object and/or appears in more than one library.
    pub fn find_objects(&self, query: &str) -> Result<Vec<ObjId>, IngestError> {
        let (lib_name, obj_name) = split_library_member(query)?;

        // `lib[member]` with a non-empty `lib` must match exactly that
        // library. A bare `[member]` parses to `Some("")` (the "any-library"
        // sentinel of §4.8) and, like the bracket-less `objectname` form,
        // matches the member name in every library.
        let matches = match lib_name {
            Some(lib_name) if !lib_name.is_empty() => self
                .libraries
                .find(lib_name)
                .and_then(|lib| {
                    self.libraries
                        .get(lib)
                        .members()
                        .iter()
                        .copied()
                        .find(|&m| self.objects.get(m).name() == obj_name)
                })
                .into_iter()
                .collect(),
            _ => self
                .objects
                .ids()
                .filter(|&obj| obj != self.sentinel() && self.objects.get(obj).name() == obj_name)
                .collect(),
        };

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NameArena;
    use crate::graph::ingest::{Ingestor, Record};

    #[test]
    fn unqualified_name_matches_across_libraries() {
        let arena = NameArena::new();
        let mut graph = LinkGraph::new(&arena);

        let mut ingestor = Ingestor::new(&mut graph, "in.nm", false);
        ingestor.feed(Record::ObjectHeader("liba.a[util.o]")).unwrap();
        ingestor
            .feed(Record::SymbolEntry { name: "a", type_char: 'T' })
            .unwrap();
        ingestor.feed(Record::ObjectHeader("libb.a[util.o]")).unwrap();
        ingestor
            .feed(Record::SymbolEntry { name: "b", type_char: 'T' })
            .unwrap();
        ingestor.finish();

        let matches = graph.find_objects("util.o").unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn qualified_name_matches_only_that_library() {
        let arena = NameArena::new();
        let mut graph = LinkGraph::new(&arena);

        let mut ingestor = Ingestor::new(&mut graph, "in.nm", false);
        ingestor.feed(Record::ObjectHeader("liba.a[util.o]")).unwrap();
        ingestor
            .feed(Record::SymbolEntry { name: "a", type_char: 'T' })
            .unwrap();
        ingestor.feed(Record::ObjectHeader("libb.a[util.o]")).unwrap();
        ingestor
            .feed(Record::SymbolEntry { name: "b", type_char: 'T' })
            .unwrap();
        ingestor.finish();

        let matches = graph.find_objects("liba.a[util.o]").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(graph.objects().get(matches[0]).library().unwrap(), graph.libraries().find("liba.a").unwrap());
    }

    #[test]
    fn bracketed_empty_library_matches_any_library() {
        let arena = NameArena::new();
        let mut graph = LinkGraph::new(&arena);

        let mut ingestor = Ingestor::new(&mut graph, "in.nm", false);
        ingestor.feed(Record::ObjectHeader("libc.a[printf.o]")).unwrap();
        ingestor
            .feed(Record::SymbolEntry { name: "printf", type_char: 'T' })
            .unwrap();
        ingestor.feed(Record::ObjectHeader("libmine.a[printf.o]")).unwrap();
        ingestor
            .feed(Record::SymbolEntry { name: "printf2", type_char: 'T' })
            .unwrap();
        ingestor.finish();

        assert_eq!(graph.find_objects("[printf.o]").unwrap().len(), 2);
        assert_eq!(graph.find_objects("libc.a[printf.o]").unwrap().len(), 1);
    }

    #[test]
    fn unknown_name_matches_nothing() {
        let arena = NameArena::new();
        let graph = LinkGraph::new(&arena);
        assert!(graph.find_objects("nope.o").unwrap().is_empty());
    }
}
