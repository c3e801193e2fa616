use codeshape_model::{CoverageMap, DeclKind, SourceFile};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const CCN: &str = include_str!("fixtures/ccn.php");

// ============ CCN ============

#[test]
fn method_ccn_counts_decision_points() {
    let file = SourceFile::from_source("ccn.php", CCN);
    let stream = file.stream().unwrap();
    let class = file.declarations().unwrap().child("Ccn").unwrap();

    let ccn: Vec<(&str, u32)> = class
        .methods()
        .map(|m| (m.name.as_str(), m.ccn(stream)))
        .collect();
    assert_eq!(
        ccn,
        vec![("noBody", 1), ("hasIf", 2), ("ifOnIf", 3), ("mixed", 9)]
    );
    assert_eq!(class.ccn(stream), 15);
    assert_eq!(file.declarations().unwrap().ccn(stream), 15);
}

#[test]
fn empty_types_and_files_have_ccn_one() {
    let file = SourceFile::from_source("e.php", "<?php class E {}");
    let stream = file.stream().unwrap();
    assert_eq!(file.declarations().unwrap().child("E").unwrap().ccn(stream), 1);

    let empty = SourceFile::from_source("n.php", "<p>no code</p>");
    assert_eq!(empty.declarations().unwrap().ccn(empty.stream().unwrap()), 1);
}

// ============ coverage / CRAP ============

#[test]
fn coverage_map_keys_methods_by_owner() {
    let file = SourceFile::from_source("ccn.php", CCN);
    let stream = file.stream().unwrap();
    let decls = file.declarations().unwrap();

    let mut coverage = CoverageMap::new(0.0);
    coverage.insert("Ccn::hasIf", 100.0);
    coverage.insert("Ccn", 50.0);
    coverage.apply(decls);

    let class = decls.child("Ccn").unwrap();
    assert_eq!(class.coverage(), 50.0);
    assert_eq!(class.child("hasIf").unwrap().crap(stream), 2.0);
    // 3² × 1³ + 3
    assert_eq!(class.child("ifOnIf").unwrap().crap(stream), 12.0);
}

#[test]
fn coverage_can_change_after_ccn_is_cached() {
    let file = SourceFile::from_source("ccn.php", CCN);
    let stream = file.stream().unwrap();
    let method = file
        .declarations()
        .unwrap()
        .child("Ccn")
        .and_then(|c| c.child("noBody"))
        .unwrap();

    assert_eq!(method.crap(stream), 2.0);
    method.set_coverage(100.0);
    assert_eq!(method.crap(stream), 1.0);
    method.set_coverage(250.0);
    assert_eq!(method.coverage(), 100.0);
}

// ============ report records ============

#[test]
fn report_mirrors_the_tree() {
    let file = SourceFile::from_source("ccn.php", CCN);
    let report = file.report().unwrap();

    assert_eq!(report.kind, DeclKind::File);
    assert_eq!(report.ccn, 15);
    let class = &report.children[0];
    assert_eq!(class.name, "Ccn");
    assert_eq!(class.children.len(), 4);
    assert_eq!(class.children[1].signature, "hasIf($a)");
    assert_eq!(class.children[1].crap, 6.0);
}

#[test]
fn report_serializes_to_json() {
    let file = SourceFile::from_source("t.php", "<?php\n/** doc */\nfunction f(int $a) {}\n");
    let json = serde_json::to_value(file.report().unwrap()).unwrap();

    let f = &json["children"][0];
    assert_eq!(f["kind"], "Function");
    assert_eq!(f["name"], "f");
    assert_eq!(f["start_line"], 3);
    assert_eq!(f["doc_comment"], "/** doc */");
    assert_eq!(f["parameters"][0]["name"], "a");
    assert_eq!(f["parameters"][0]["ty"], "int");
    assert_eq!(f["ccn"], 1);
    assert!(f.get("children").is_none());
}

// ============ properties ============

proptest! {
    #[test]
    fn functions_are_found_with_their_ccn(ifs in prop::collection::vec(0usize..5, 1..8)) {
        let mut src = String::from("<?php\n");
        for (i, count) in ifs.iter().enumerate() {
            src.push_str(&format!("function f{i}($x) {{\n"));
            for _ in 0..*count {
                src.push_str("    if ($x) { $x--; }\n");
            }
            src.push_str("}\n");
        }

        let file = SourceFile::from_source("gen.php", &src);
        let stream = file.stream().unwrap();
        let decls = file.declarations().unwrap();
        prop_assert_eq!(decls.functions().count(), ifs.len());
        for (decl, count) in decls.functions().zip(&ifs) {
            prop_assert!(!decl.incomplete);
            prop_assert!(decl.start_line <= decl.end_line);
            prop_assert_eq!(decl.end_line - decl.start_line, *count as u32 + 1);
            prop_assert_eq!(decl.ccn(stream), 1 + *count as u32);
        }
    }
}
