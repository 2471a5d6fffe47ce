use std::fs;
use std::path::Path;

use mixtecan_cldf::{CldfDataset, Concept, CldfWriter, Language, Segments};
use mixtecan_ingest::{
    cognate_judgments, ConceptList, Converter, Dataset, LanguageRegistry, WordlistRow,
};
use proptest::prelude::*;

fn write_dataset(root: &Path) {
    fs::create_dir_all(root.join("raw")).unwrap();
    fs::create_dir_all(root.join("etc")).unwrap();
    fs::write(
        root.join("metadata.json"),
        r#"{"id": "mixtecansubgrouping", "title": "Mixtecan subgrouping"}"#,
    )
    .unwrap();
    fs::write(
        root.join("etc/concepts.tsv"),
        "NUMBER\tENGLISH\tSPANISH\tCONCEPTICON_ID\tCONCEPTICON_GLOSS\n\
         5\thand\tmano\t1277\tHAND\n\
         6\twater\tagua\t948\tWATER\n",
    )
    .unwrap();
    fs::write(
        root.join("etc/languages.csv"),
        "ID,Name,Glottocode,Latitude,Longitude,Location,SubGroup\n\
         Mixtec,Mixtec_A,mixt1427,17.1,-97.6,Oaxaca,Mixtec\n\
         ,Mixtec_B,,,,,Mixtec\n\
         Trique,Trique,triq1251,17.2,-97.9,Copala,Trique\n",
    )
    .unwrap();
    fs::write(root.join("raw/sources.bib"), "@book{Jos83, title={x}}\n").unwrap();
    fs::write(
        root.join("raw/sm3_mixtecan_cognates.tsv"),
        "ID\tDOCULECT\tCONCEPT\tVALUE\tFORM\tTOKENS\tSOURCE\tCOGIDS_BROAD\tCOGIDS_FINE\n\
         1\tMixtec_A\thand\tndaʔa\tndaʔa\tn d a ʔ a\tJos83\t12\t12\n\
         2\tMixtec_B\twater\tndute\tndute\tn d u + t e\tJos83\t3 4\t3 5\n\
         3\tTrique\thand\tra³\tra\tr a\tJos83\t12 13\t\n\
         4\tCuicatec\thand\tnda\tnda\tn d a\t\t12\t\n\
         5\tTrique\tfoot\tkoʔ\tkoʔ\tk o ʔ\t\t1\t\n\
         6\tTrique\twater\t\t\t\t\t\t\n",
    )
    .unwrap();
}

#[test]
fn makecldf_writes_dataset_and_reports_warnings() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    let dataset = Dataset::open(dir.path()).unwrap();
    let report = dataset.make_cldf(None).unwrap();

    assert_eq!(report.rows, 6);
    assert_eq!(report.forms, 3);
    assert_eq!(report.empty_forms, 1);
    assert_eq!(
        report.numbered(),
        vec![
            "   1 concept missing foot".to_string(),
            "   2 language missing Cuicatec".to_string(),
            "   3 partial cognates: 3 / r a / ".to_string(),
            "   4 partial cognates: 3 / r a / 12 13".to_string(),
        ]
    );

    let cldf = CldfDataset::discover(&dir.path().join("cldf")).unwrap();
    assert_eq!(cldf.id(), Some("mixtecansubgrouping"));

    let languages = cldf.rows("LanguageTable", &["id", "name"]).unwrap();
    assert_eq!(languages.len(), 2, "Mixtec_B collapses onto Mixtec");

    let forms = cldf
        .rows("FormTable", &["id", "languageReference", "Local_ID"])
        .unwrap();
    let ids: Vec<_> = forms.iter().map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, vec!["Mixtec-5_hand-1", "Mixtec-6_water-1", "Trique-5_hand-1"]);
    assert_eq!(forms[1]["Local_ID"], "2");

    let cognates = cldf
        .rows("CognateTable", &["id", "cognatesetReference", "Cognate_Coding"])
        .unwrap();
    let summary: Vec<_> = cognates
        .iter()
        .map(|r| (r["id"].as_str(), r["Cognate_Coding"].as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Mixtec-5_hand-1-1", "broad fine"),
            ("Mixtec-6_water-1-1", "broad fine"),
            ("Mixtec-6_water-1-2", "broad"),
            ("Mixtec-6_water-1-2-fine", "fine"),
            ("Trique-5_hand-1-1", "broad"),
            ("Trique-5_hand-1-2", "broad"),
        ]
    );

    assert!(dir.path().join("cldf/sources.bib").is_file());
}

#[test]
fn makecldf_accepts_an_explicit_wordlist() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let other = dir.path().join("raw/mixt_complist_clean.tsv");
    fs::write(&other, "DOCULECT\tCONCEPT\tFORM\nTrique\twater\tnne\n").unwrap();

    let report = Dataset::open(dir.path())
        .unwrap()
        .make_cldf(Some(&other))
        .unwrap();
    assert_eq!(report.forms, 1);
    assert!(report.warnings.is_empty());
}

#[test]
fn empty_cognate_cell_is_still_checked_against_segments() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let other = dir.path().join("raw/blank_cogids.tsv");
    fs::write(
        &other,
        "ID\tDOCULECT\tCONCEPT\tFORM\tTOKENS\tCOGIDS_BROAD\n\
         7\tMixtec_A\thand\tndaʔa\tn d a ʔ a\t\n",
    )
    .unwrap();

    let report = Dataset::open(dir.path())
        .unwrap()
        .make_cldf(Some(&other))
        .unwrap();
    assert_eq!(report.forms, 1);
    assert_eq!(report.cognates, 0);
    assert_eq!(
        report.numbered(),
        vec!["   1 partial cognates: 7 / n d a ʔ a / ".to_string()]
    );
}

#[test]
fn byte_order_mark_keeps_row_ids() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let other = dir.path().join("raw/bom.tsv");
    fs::write(
        &other,
        "\u{feff}ID\tDOCULECT\tCONCEPT\tFORM\tTOKENS\tCOGIDS_BROAD\n\
         7\tMixtec_A\thand\tndaʔa\tn d a ʔ a\t12\n",
    )
    .unwrap();

    Dataset::open(dir.path())
        .unwrap()
        .make_cldf(Some(&other))
        .unwrap();
    let cldf = CldfDataset::discover(&dir.path().join("cldf")).unwrap();
    let forms = cldf.rows("FormTable", &["id", "Local_ID"]).unwrap();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["Local_ID"], "7");
}

#[test]
fn missing_wordlist_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    fs::remove_file(dir.path().join("raw/sm3_mixtecan_cognates.tsv")).unwrap();

    assert!(Dataset::open(dir.path()).unwrap().make_cldf(None).is_err());
    assert!(!dir.path().join("cldf").exists());
}

fn cogids() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[1-9][0-9]{0,2}", 0..5)
}

proptest! {
    #[test]
    fn every_row_with_known_references_is_emitted(
        morphemes in 1usize..4,
        broad in cogids(),
    ) {
        let mut concepts = ConceptList::default();
        concepts.insert(Concept {
            id: "5_hand".into(),
            name: "hand".into(),
            number: "5".into(),
            ..Concept::default()
        });
        let mut languages = LanguageRegistry::default();
        languages.register(Language { name: "Trique".into(), ..Language::default() });

        let tokens = vec!["a"; morphemes].join(" + ");
        let row = WordlistRow {
            key: "1".into(),
            doculect: "Trique".into(),
            concept: "hand".into(),
            form: "a".into(),
            tokens: Segments::parse(&tokens),
            cogids_broad: Some(broad.join(" ")),
            ..WordlistRow::default()
        };

        let mut writer = CldfWriter::new();
        let report = Converter::new(&concepts, &languages).convert([row], &mut writer).unwrap();

        prop_assert_eq!(report.forms, 1);
        prop_assert_eq!(writer.cognates().len(), broad.len());
        let misaligned = broad.len() != morphemes;
        prop_assert_eq!(report.warnings.len(), usize::from(misaligned));
    }

    #[test]
    fn judgments_cover_every_broad_token_and_unique_fine_ids(
        broad in cogids(),
        fine in cogids(),
    ) {
        let b = broad.join(" ");
        let f = fine.join(" ");
        let judgments = cognate_judgments("F", Some(&b), Some(&f));

        let fine_only = fine.iter().filter(|id| !broad.contains(id)).count();
        prop_assert_eq!(judgments.len(), broad.len() + fine_only);
        for (i, id) in broad.iter().enumerate() {
            prop_assert_eq!(&judgments[i].cognateset_id, id);
            prop_assert_eq!(judgments[i].morpheme_index, i);
        }
    }
}
