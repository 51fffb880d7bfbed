//! End-to-end tests for the picgraph pipeline.

mod common;

use std::collections::HashSet;
use std::fs;

use picgraph::{
    AnalysisOptions, Error, ExportConfig, FunctionStats, ListingError, Pipeline, analyze_listing,
    export_graphs,
};

use common::{FIRMWARE, fixture, write_file};

#[test]
fn test_functions_and_names() {
    let fx = fixture();
    let pipeline = analyze_listing(&fx.listing, &fx.options()).unwrap();
    let result = pipeline.result("test").unwrap();

    // call targets first, then named seeds in address order (duplicates kept)
    assert_eq!(result.entries, vec![0x0210, 0x0220, 0x0200, 0x0220, 0x0300]);
    let entries: Vec<u16> = result.functions.iter().map(|f| f.entry).collect();
    assert_eq!(entries, vec![0x0210, 0x0220, 0x0200, 0x0300]);

    assert_eq!(pipeline.program.function_name(0x0200), Some("main"));
    assert_eq!(pipeline.program.function_name(0x0220), Some("delay"));
    assert_eq!(pipeline.program.function_name(0x0300), Some("isr"));
    assert_eq!(pipeline.program.function_name(0x0210), None);
}

#[test]
fn test_block_structure() {
    let fx = fixture();
    let pipeline = analyze_listing(&fx.listing, &fx.options()).unwrap();
    let result = pipeline.result("test").unwrap();

    assert_eq!(result.blocks.len(), 6);

    let head = result.blocks.get(0x0200).unwrap();
    assert_eq!(head.successors, vec![0x0208, 0x0204]);

    let call_block = result.blocks.get(0x0204).unwrap();
    assert_eq!(call_block.successors, vec![0x0208]);
    assert!(call_block.join_return);
    assert_eq!(call_block.owned_addresses().collect::<Vec<_>>(), vec![0x0204, 0x0206]);

    let delay = result.blocks.get(0x0220).unwrap();
    assert!(delay.successors.is_empty());
    assert_eq!(delay.instructions.len(), 1);
}

#[test]
fn test_graph_invariants() {
    let fx = fixture();
    let pipeline = analyze_listing(&fx.listing, &fx.options()).unwrap();
    let result = pipeline.result("test").unwrap();

    let mut owned = HashSet::new();
    for block in result.blocks.iter() {
        for addr in block.owned_addresses() {
            assert!(owned.insert(addr), "{addr:#06x} owned twice");
        }
    }
    for &start in &result.boundaries {
        assert!(result.blocks.contains(start), "no block at {start:#06x}");
    }
}

#[test]
fn test_call_graph() {
    let fx = fixture();
    let pipeline = analyze_listing(&fx.listing, &fx.options()).unwrap();
    let result = pipeline.result("test").unwrap();

    assert_eq!(
        result.call_graph.edges().collect::<Vec<_>>(),
        vec![(0x0200, 0x0210), (0x0200, 0x0220)]
    );
    assert_eq!(result.call_graph.callees(0x0220).map(|c| c.len()), Some(0));
    assert_eq!(result.call_graph.len(), 4);
}

#[test]
fn test_stats() {
    let fx = fixture();
    let stats = analyze_listing(&fx.listing, &fx.options())
        .unwrap()
        .stats("sub_")
        .unwrap();

    assert_eq!(stats.instructions, 16);
    assert_eq!(stats.blocks, 6);
    assert_eq!(
        stats.functions[2],
        FunctionStats {
            name: "sub_main".to_string(),
            entry: 0x0200,
            blocks: 3,
            callees: 2,
        }
    );
}

#[test]
fn test_export_graphs() {
    let fx = fixture();
    let out = fx.output_dir();
    let summary = export_graphs(
        &fx.listing,
        &fx.options(),
        ExportConfig::default().with_output_dir(&out).with_jobs(2),
    )
    .unwrap();

    assert_eq!(summary.file_count(), 5);
    for name in ["sub_0210", "sub_delay", "sub_main", "sub_isr", "Functions"] {
        assert!(out.join(format!("{name}.dot")).exists(), "{name}.dot missing");
    }

    let main = fs::read_to_string(out.join("sub_main.dot")).unwrap();
    assert!(main.starts_with("strict digraph \"sub_main\" {"));
    assert!(main.contains("\"0x0200\" -> \"0x0204\" [color=\"red\"];"));
    assert!(main.contains("\"0x0200\" -> \"0x0208\" [color=\"green\"];"));
    assert!(main.contains("\"0x0204\" -> \"0x0208\";"));
    assert!(main.contains("[call sub_0210()]"));
    assert!(main.contains("[call sub_delay()]"));
    assert!(main.contains("fontname=\"Monospace\""));

    let helper = fs::read_to_string(out.join("sub_0210.dot")).unwrap();
    assert!(helper.contains("mov #0x8100, w0    [Hi!]\\l"));

    let calls = fs::read_to_string(out.join("Functions.dot")).unwrap();
    assert!(calls.contains("\"sub_main\" -> \"sub_0210\";"));
    assert!(calls.contains("\"sub_main\" -> \"sub_delay\";"));
}

#[test]
fn test_annotated_listing() {
    let fx = fixture();
    let pipeline = Pipeline::load(&fx.listing, &fx.options()).unwrap();
    let mut out = Vec::new();
    pipeline.write_listing(&mut out, "sub_").unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.lines().count(), 16);
    assert!(text.contains("0x0100: [0x00006948] nop    \t\t\t[Hi!]\n"));
    assert!(text.contains("0x0200: [0x00070007] rcall 0x210    [call sub_0210()]\n"));
}

#[test]
fn test_listing_without_tables() {
    let dir = tempfile::tempdir().unwrap();
    let listing = write_file(dir.path(), "fw.lst", FIRMWARE);
    let pipeline = analyze_listing(&listing, &AnalysisOptions::default()).unwrap();
    let entries: Vec<u16> = pipeline
        .result("test")
        .unwrap()
        .functions
        .iter()
        .map(|f| f.entry)
        .collect();
    assert_eq!(entries, vec![0x0210, 0x0220]);
}

#[test]
fn test_malformed_opcode_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let listing = write_file(dir.path(), "bad.lst", "0x0000: 0x00000000 nop\n0x0002: 0x123 nop\n");
    let err = analyze_listing(&listing, &AnalysisOptions::default()).err().unwrap();
    assert!(matches!(err, Error::Listing(ListingError::InFile { .. })));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_address_out_of_range_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let listing = write_file(dir.path(), "big.lst", "0x10000: 0x00000000 nop\n");
    let err = analyze_listing(&listing, &AnalysisOptions::default()).err().unwrap();
    assert!(err.to_string().contains("does not fit in 16 bits"));
}

#[test]
fn test_malformed_alias_row_is_fatal() {
    let fx = fixture();
    let aliases = write_file(fx.dir.path(), "bad.csv", "0x0200\n");
    let options = AnalysisOptions::new().with_aliases(&aliases);
    let err = analyze_listing(&fx.listing, &options).err().unwrap();
    assert!(err.to_string().contains("expected `address,name`"));
}

#[test]
fn test_missing_listing() {
    let dir = tempfile::tempdir().unwrap();
    let err = analyze_listing(dir.path().join("nope.lst"), &AnalysisOptions::default())
        .err()
        .unwrap();
    assert!(matches!(err, Error::Listing(ListingError::Io { .. })));
}
