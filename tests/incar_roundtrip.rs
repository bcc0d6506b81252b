//! End-to-end INCAR codec properties

use indoc::indoc;
use pretty_assertions::assert_eq;
use vaspfile::incar::{config_to_text, parse_config_text};
use vaspfile::{ConfigEntry, Incar};

#[test]
fn parse_serialize_parse_is_stable() {
    let _ = env_logger::builder().is_test(true).try_init();

    let text = indoc! {r#"
        SYSTEM = "bulk Si" # title
        PREC = Accurate
        ENCUT = 520 ! plane wave cutoff
        ISMEAR = 0 ; SIGMA = 0.05 # gaussian smearing
        MAGMOM = 2*1.0 \
          2*0.5 \
          4*0.0
        NOTES = "
        first line
        second line
        " # block comment
    "#};

    let first = parse_config_text(text);
    let second = parse_config_text(&config_to_text(&first));

    // Every (name, value, comment) triple survives one round trip.
    assert_eq!(second, first);
}

#[test]
fn single_line_quoted_values_lose_quotes_once() {
    let doc = parse_config_text(r#"SYSTEM = "bulk Si" # title"#);
    let rendered = config_to_text(&doc);
    assert_eq!(rendered, "SYSTEM = bulk Si # title");

    // After that first pass the form is a fixpoint.
    let again = config_to_text(&parse_config_text(&rendered));
    assert_eq!(again, rendered);
}

#[test]
fn continuation_equals_inline_form() {
    let merged = parse_config_text("A = 1 \\\nB = 2");
    let inline = parse_config_text("A = 1 B = 2");
    assert_eq!(merged, inline);
    assert_eq!(merged.get("A").map(|e| e.value.as_str()), Some("1"));
    assert_eq!(merged.get("B").map(|e| e.value.as_str()), Some("2"));
}

#[test]
fn statement_comment_attaches_to_last_statement_only() {
    let doc = parse_config_text("X=1; Y=2 # note");
    assert_eq!(doc.get("X"), Some(&ConfigEntry::new("1", "")));
    assert_eq!(doc.get("Y"), Some(&ConfigEntry::new("2", "note")));
}

#[test]
fn multiline_block_value_and_comment() {
    let doc = parse_config_text("X = \"\nfoo\nbar\n\" # tail");
    assert_eq!(doc.get("X"), Some(&ConfigEntry::new("foo\nbar", "tail")));
}

#[test]
fn document_order_survives_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let mut incar = Incar::with_base_dir(dir.path());
    incar.set_value("ALGO", "Fast");
    incar.set_value("ENCUT", "520");
    incar.set_value("AMIX", "0.2");
    incar.save(None).unwrap();

    let mut reread = Incar::with_base_dir(dir.path());
    reread.load(None).unwrap();

    let names: Vec<&str> = reread.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["ALGO", "ENCUT", "AMIX"]);
}

#[test]
fn template_workflow() {
    let mut incar = Incar::new();
    incar.set_value("ENCUT", "400");

    incar.apply_template("relax", false).unwrap();
    // Existing keys kept when not overwriting.
    assert_eq!(incar.get("ENCUT"), Some(&ConfigEntry::bare("400")));
    assert!(incar.contains("IBRION"));

    incar.apply_template("relax", true).unwrap();
    assert_eq!(incar.get("ENCUT"), Some(&ConfigEntry::bare("520")));
}
