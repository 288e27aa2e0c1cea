//! Integration tests for the six literal end-to-end scenarios in
//! SPEC_FULL.md's testable-properties section, driven entirely through the
//! public `arena`/`graph`/`pipeline` API the way a consumer embedding this
//! crate as a library would.

use std::io::Cursor;

use depclose::arena::NameArena;
use depclose::graph::LinkGraph;
use depclose::graph::linkset::LinkSetKind;
use depclose::pipeline::ingest_reader;

fn obj_named<'a>(graph: &'a LinkGraph<'_>, name: &str) -> depclose::ids::ObjId {
    graph
        .objects()
        .ids()
        .find(|&id| graph.objects().get(id).name() == name)
        .unwrap_or_else(|| panic!("no object named '{name}'"))
}

#[test]
fn mandatory_pulls_optional() {
    let arena = NameArena::new();
    let mut graph = LinkGraph::new(&arena);

    let last_mandatory = ingest_reader(
        &mut graph,
        "a.nm",
        Cursor::new("a.o:\nmain T 0 10\nputs U\n"),
        false,
    )
    .unwrap()
    .unwrap();

    ingest_reader(&mut graph, "b.nm", Cursor::new("b.o:\nputs T 0 5\n"), false).unwrap();

    graph.gather_dangling_undefs();
    graph.link_all(last_mandatory);

    let a = obj_named(&graph, "a.o");
    let b = obj_named(&graph, "b.o");
    assert_eq!(graph.objects().get(a).link_set(), Some(LinkSetKind::Application));
    assert_eq!(graph.objects().get(b).link_set(), Some(LinkSetKind::Application));

    let puts = graph.symbols().find("puts").unwrap();
    let symbol = graph.symbols().get(puts);

    let exporters: Vec<_> = graph
        .export_xrefs()
        .iter_from(symbol.exporter_head())
        .map(|(_, x)| x.obj)
        .collect();
    assert_eq!(exporters, vec![b]);

    let importers: Vec<_> = graph
        .import_xrefs()
        .iter_from(symbol.importer_head())
        .map(|(_, x)| x.obj)
        .collect();
    assert_eq!(importers, vec![a]);

    // No undefined symbols: the sentinel exports nothing.
    assert!(graph.objects().get(graph.sentinel()).exports().is_empty());
}

#[test]
fn dangling_undef_is_reported_and_survives_unlink_undefs() {
    let arena = NameArena::new();
    let mut graph = LinkGraph::new(&arena);

    let last_mandatory = ingest_reader(
        &mut graph,
        "a.nm",
        Cursor::new("a.o:\nmain T\nxyz U\n"),
        false,
    )
    .unwrap()
    .unwrap();

    graph.gather_dangling_undefs();
    graph.link_all(last_mandatory);

    let a = obj_named(&graph, "a.o");
    assert_eq!(graph.objects().get(a).link_set(), Some(LinkSetKind::Application));

    let xyz = graph.symbols().find("xyz").unwrap();
    let symbol = graph.symbols().get(xyz);
    let exporter = graph.export_xrefs().get(symbol.exporter_head().unwrap()).obj;
    assert_eq!(exporter, graph.sentinel());

    // a.o is mandatory, so unlinkUndefs must not be able to remove it.
    graph.unlink_undefs();
    assert_eq!(graph.objects().get(a).link_set(), Some(LinkSetKind::Application));
}

#[test]
fn optional_unreachable_object_is_removable_via_a_removal_list() {
    let arena = NameArena::new();
    let mut graph = LinkGraph::new(&arena);

    let last_mandatory = ingest_reader(&mut graph, "a.nm", Cursor::new("a.o:\nmain T\n"), false)
        .unwrap()
        .unwrap();
    ingest_reader(&mut graph, "b.nm", Cursor::new("b.o:\norphan T\n"), false).unwrap();

    graph.gather_dangling_undefs();
    graph.link_all(last_mandatory);

    let b = obj_named(&graph, "b.o");
    assert_eq!(graph.objects().get(b).link_set(), Some(LinkSetKind::Optional));

    // unlinkUndefs has no effect: nothing depends on an undefined symbol here.
    graph.unlink_undefs();
    assert_eq!(graph.objects().get(b).link_set(), Some(LinkSetKind::Optional));

    // A removal-list-style query-then-unlink against "b.o" succeeds.
    let matches = graph.find_objects("b.o").unwrap();
    assert_eq!(matches, vec![b]);
    assert!(!graph.unlink_obj(b));
    assert_eq!(graph.objects().get(b).link_set(), None);
    assert!(graph.link_sets().get(LinkSetKind::Optional).head().is_none());
}

#[test]
fn multiple_definitions_are_reported_once_and_common_suppresses_it() {
    let arena = NameArena::new();
    let mut graph = LinkGraph::new(&arena);

    let last_mandatory = ingest_reader(
        &mut graph,
        "ab.nm",
        Cursor::new("a.o:\ndup T\nb.o:\ndup T\n"),
        false,
    )
    .unwrap()
    .unwrap();

    graph.gather_dangling_undefs();
    graph.link_all(last_mandatory);

    assert_eq!(graph.check_multiple_defs(LinkSetKind::Application), 1);

    // A second scan doesn't re-report past findings incorrectly, and all
    // visited flags must have been cleared by the first scan (I5).
    for id in graph.objects().ids() {
        assert!(!graph.objects().get(id).visited());
    }

    // Common (`C`) tentative definitions of the same name are not a clash.
    let arena2 = NameArena::new();
    let mut graph2 = LinkGraph::new(&arena2);
    let last_mandatory2 = ingest_reader(
        &mut graph2,
        "ab2.nm",
        Cursor::new("a.o:\ntentative C\nb.o:\ntentative C\n"),
        false,
    )
    .unwrap()
    .unwrap();
    graph2.gather_dangling_undefs();
    graph2.link_all(last_mandatory2);
    assert_eq!(graph2.check_multiple_defs(LinkSetKind::Application), 0);
}

#[test]
fn import_export_cycle_is_walked_exactly_once_each_direction() {
    use depclose::graph::traverse::WalkMode;

    let arena = NameArena::new();
    let mut graph = LinkGraph::new(&arena);

    let last_mandatory = ingest_reader(
        &mut graph,
        "cycle.nm",
        Cursor::new("a.o:\nx T\ny U\nb.o:\ny T\nx U\n"),
        false,
    )
    .unwrap()
    .unwrap();

    graph.gather_dangling_undefs();
    graph.link_all(last_mandatory);

    let a = obj_named(&graph, "a.o");
    let b = obj_named(&graph, "b.o");
    assert_eq!(graph.objects().get(a).link_set(), Some(LinkSetKind::Application));
    assert_eq!(graph.objects().get(b).link_set(), Some(LinkSetKind::Application));

    let exports_from_a = graph.walk_build_list(a, WalkMode::EXPORTS | WalkMode::BUILD_LIST);
    let seen: Vec<_> = exports_from_a.iter().collect();
    assert_eq!(seen.len(), 2);
    assert!(seen.contains(&a) && seen.contains(&b));
    exports_from_a.release(&graph);

    let imports_from_b = graph.walk_build_list(b, WalkMode::BUILD_LIST);
    let seen: Vec<_> = imports_from_b.iter().collect();
    assert_eq!(seen.len(), 2);
    assert!(seen.contains(&a) && seen.contains(&b));
    imports_from_b.release(&graph);

    for id in graph.objects().ids() {
        assert!(!graph.objects().get(id).visited());
    }
}

#[test]
fn library_qualified_lookup_disambiguates_same_named_members() {
    let arena = NameArena::new();
    let mut graph = LinkGraph::new(&arena);

    ingest_reader(
        &mut graph,
        "libs.nm",
        Cursor::new("libc.a[printf.o]:\nprintf T\nlibmine.a[printf.o]:\nprintf2 T\n"),
        false,
    )
    .unwrap();

    assert_eq!(graph.find_objects("[printf.o]").unwrap().len(), 2);
    assert_eq!(graph.find_objects("libc.a[printf.o]").unwrap().len(), 1);
}
