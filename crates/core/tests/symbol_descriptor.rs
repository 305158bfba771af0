use symbridge_core::backends::InMemoryDatabase;
use symbridge_core::db::MemoryAnnotationStore;
use symbridge_core::model::{ImportEntry, Segment, SegmentPermissions, Xref, XrefKind};
use symbridge_core::symbols::{SymbolDescriptor, SymbolError, SymbolResolutionFactory};
use symbridge_core::types::CTypeSystem;

fn resolve_name(db: &InMemoryDatabase, address: u64) -> String {
    let store = MemoryAnnotationStore::new();
    let factory = SymbolResolutionFactory::new(db, &store, &CTypeSystem);
    factory.resolve(address).expect("named address").name()
}

#[test]
fn resolve_requires_a_non_empty_name() {
    let db = InMemoryDatabase::new().with_name(0x1000, "start").with_name(0x2000, "");
    let store = MemoryAnnotationStore::new();
    let factory = SymbolResolutionFactory::new(&db, &store, &CTypeSystem);

    let symbol = factory.resolve(0x1000).expect("named address");
    assert_eq!(symbol.address(), 0x1000);
    assert_eq!(symbol.raw_name(), "start");
    assert!(factory.resolve(0x2000).is_none());
    assert!(factory.resolve(0x3000).is_none());
}

#[test]
fn is_function_only_at_entry() {
    let db = InMemoryDatabase::new()
        .with_function(0x401000, 0x401040)
        .with_name(0x401000, "foo")
        .with_name(0x401010, "loc_401010");

    assert!(SymbolDescriptor::new(&db, 0x401000, "foo").is_function());
    assert!(!SymbolDescriptor::new(&db, 0x401010, "loc_401010").is_function());
    assert!(!SymbolDescriptor::new(&db, 0x500000, "data").is_function());
}

#[test]
fn function_size_reports_range_or_fails() {
    let db = InMemoryDatabase::new().with_function(0x401000, 0x401040);

    assert_eq!(SymbolDescriptor::new(&db, 0x401000, "foo").function_size().unwrap(), 0x40);
    match SymbolDescriptor::new(&db, 0x401010, "loc_401010").function_size() {
        Err(SymbolError::SymbolIsNotAFunction(name)) => assert_eq!(name, "loc_401010"),
        other => panic!("expected SymbolIsNotAFunction, got {other:?}"),
    }
}

#[test]
fn label_needs_a_jump_before_any_data_reference() {
    let target = 0x401020;
    let jump_after_flow = InMemoryDatabase::new()
        .with_xref(target, Xref::new(0x40101c, XrefKind::Flow))
        .with_xref(target, Xref::new(0x401000, XrefKind::Jump));
    assert!(SymbolDescriptor::new(&jump_after_flow, target, "loc").is_label());

    let call_only = InMemoryDatabase::new().with_xref(target, Xref::new(0x402000, XrefKind::Call));
    assert!(!SymbolDescriptor::new(&call_only, target, "loc").is_label());

    let data_first = InMemoryDatabase::new()
        .with_xref(target, Xref::new(0x403000, XrefKind::DataRead))
        .with_xref(target, Xref::new(0x401000, XrefKind::Jump));
    assert!(!SymbolDescriptor::new(&data_first, target, "loc").is_label());

    let no_refs = InMemoryDatabase::new();
    assert!(!SymbolDescriptor::new(&no_refs, target, "loc").is_label());
}

#[test]
fn label_follows_new_references() {
    let db = InMemoryDatabase::new().with_xref(0x10, Xref::new(0x0, XrefKind::Flow));
    let symbol = SymbolDescriptor::new(&db, 0x10, "loc_10");
    assert!(!symbol.is_label());

    db.add_xref(0x10, Xref::new(0x40, XrefKind::Jump));
    assert!(symbol.is_label());
}

#[test]
fn read_only_follows_segment_name_and_permissions() {
    let r = SegmentPermissions::READ;
    let w = SegmentPermissions::WRITE;
    let x = SegmentPermissions::EXEC;
    let db = InMemoryDatabase::new()
        .with_segment(Segment::new(".text", 0x1000, 0x2000, r | x))
        .with_segment(Segment::new(".rdata", 0x2000, 0x3000, r))
        .with_segment(Segment::new(".data", 0x3000, 0x4000, r | w))
        .with_segment(Segment::new(".bss", 0x4000, 0x5000, r | w))
        .with_segment(Segment::new(".wx", 0x5000, 0x6000, r | w | x))
        .with_segment(Segment::new(".exec", 0x6000, 0x7000, x));

    let ro = |address| SymbolDescriptor::new(&db, address, "sym").is_read_only();
    assert!(ro(0x1000));
    assert!(ro(0x2800));
    assert!(ro(0x3000));
    assert!(!ro(0x4000));
    assert!(!ro(0x5000));
    assert!(!ro(0x6000));
    assert!(!ro(0x9000));
}

fn import_db() -> InMemoryDatabase {
    InMemoryDatabase::new()
        .with_name(0x5000, "CreateFileW")
        .with_name(0x5008, "createfilew")
        .with_import_module("KERNEL32", [ImportEntry::named(0x5000, "CreateFileW")])
        .with_import_module(
            "USER32",
            [
                ImportEntry { address: 0x5100, name: None, ordinal: 7 },
                ImportEntry::named(0x5108, "MessageBoxW"),
            ],
        )
}

#[test]
fn imports_are_matched_exactly_across_modules() {
    let db = import_db();
    assert!(SymbolDescriptor::new(&db, 0x5000, "CreateFileW").is_import());
    assert!(!SymbolDescriptor::new(&db, 0x5008, "createfilew").is_import());

    db.set_name(0x5108, "MessageBoxW");
    assert!(SymbolDescriptor::new(&db, 0x5108, "MessageBoxW").is_import());
}

#[test]
fn import_prefix_is_added_once() {
    let db = import_db();
    assert_eq!(resolve_name(&db, 0x5000), "__imp_CreateFileW");

    db.set_name(0x5000, "__imp_CreateFileW");
    let symbol = SymbolDescriptor::new(&db, 0x5000, "__imp_CreateFileW");
    assert!(symbol.is_import());
    assert_eq!(symbol.name(), "__imp_CreateFileW");
}

#[test]
fn import_check_uses_current_database_name() {
    let db = import_db().with_name(0x6000, "my_helper");
    let symbol = SymbolDescriptor::new(&db, 0x6000, "my_helper");
    assert!(!symbol.is_import());

    db.set_name(0x6000, "__imp_CreateFileW");
    assert!(symbol.is_import());
    assert_eq!(symbol.name(), "__imp_my_helper");
}

#[test]
fn default_function_names_pass_through() {
    let db = InMemoryDatabase::new()
        .with_name(0x401000, "sub_401000")
        .with_cleanup("sub_401000", Some("should_not_be_used".to_string()));
    assert_eq!(resolve_name(&db, 0x401000), "sub_401000");
}

#[test]
fn demangled_names_drop_parameter_lists() {
    let db = InMemoryDatabase::new()
        .with_name(0x401000, "_Z3fooiv")
        .with_function(0x401000, 0x401040)
        .with_demangling("_Z3fooiv", "foo(int, void)");
    assert_eq!(resolve_name(&db, 0x401000), "foo");
}

#[test]
fn rust_symbols_demangle_without_hash() {
    let db = InMemoryDatabase::new().with_name(0x1000, "_ZN4core3fmt5write17h0123456789abcdefE");
    assert_eq!(resolve_name(&db, 0x1000), "core::fmt::write");
}

#[test]
fn cleanup_result_is_used_unless_it_fails() {
    let db = InMemoryDatabase::new()
        .with_name(0x10, "?weird@@name")
        .with_cleanup("?weird@@name", Some("weird_name".to_string()))
        .with_name(0x20, "?broken@@")
        .with_cleanup("?broken@@", None)
        .with_name(0x30, "plain");

    assert_eq!(resolve_name(&db, 0x10), "weird_name");
    assert_eq!(resolve_name(&db, 0x20), "?broken@@");
    assert_eq!(resolve_name(&db, 0x30), "plain");
}

#[test]
fn demangling_to_a_bare_parameter_list_keeps_the_name() {
    let db = InMemoryDatabase::new().with_name(0x10, "odd").with_demangling("odd", "(void)");
    assert_eq!(resolve_name(&db, 0x10), "odd");
}
