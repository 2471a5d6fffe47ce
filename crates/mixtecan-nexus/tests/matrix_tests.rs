use std::collections::BTreeSet;

use mixtecan_cldf::{
    CldfDataset, CldfWriter, CodingScheme, Cognate, Concept, DatasetInfo, Language, NewForm,
};
use mixtecan_nexus::{
    Ascertainment, CharacterState, CodingFilter, CognateSets, NexusDocument, NexusError,
    PartitionMap,
};
use proptest::prelude::*;

fn judgment() -> impl Strategy<Value = (String, String, String)> {
    (
        prop_oneof![Just("Mixtec"), Just("Trique"), Just("Cuicatec"), Just("Amuzgo")],
        prop_oneof![Just("hand"), Just("water"), Just("tree"), Just("two")],
        "[1-9]{1,2}",
    )
        .prop_map(|(d, c, s)| (d.to_string(), c.to_string(), s))
}

fn sets_from(judgments: &[(String, String, String)]) -> CognateSets {
    let mut sets = CognateSets::new();
    for (d, c, s) in judgments {
        sets.add(d, c, s);
    }
    sets
}

proptest! {
    #[test]
    fn every_cell_follows_the_three_rules(judgments in proptest::collection::vec(judgment(), 1..40)) {
        let sets = sets_from(&judgments);
        let doc = NexusDocument::build(&sets, &Ascertainment::None).unwrap();

        prop_assert_eq!(doc.matrix.nchar(), sets.cognates.len());
        for ((concept, cognateset), members) in &sets.cognates {
            let label = format!("{concept}_{cognateset}");
            for d in &sets.doculects {
                let expected = if members.contains(d) {
                    CharacterState::Present
                } else if sets.words[concept].contains(d) {
                    CharacterState::Absent
                } else {
                    CharacterState::Missing
                };
                prop_assert_eq!(doc.matrix.state(d, &label), expected);
            }
        }
    }

    #[test]
    fn output_ignores_input_order(judgments in proptest::collection::vec(judgment(), 1..40)) {
        let mut reversed = judgments.clone();
        reversed.reverse();

        let a = NexusDocument::build(&sets_from(&judgments), &Ascertainment::Word).unwrap().render();
        let b = NexusDocument::build(&sets_from(&reversed), &Ascertainment::Word).unwrap().render();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn word_correction_tracks_attestation(judgments in proptest::collection::vec(judgment(), 1..40)) {
        let sets = sets_from(&judgments);
        let doc = NexusDocument::build(&sets, &Ascertainment::Word).unwrap();
        for (word, attesting) in &sets.words {
            let label = format!("{word}_0ascertainment");
            for d in &sets.doculects {
                let expected = if attesting.contains(d) { '0' } else { '?' };
                prop_assert_eq!(doc.matrix.state(d, &label).symbol(), expected);
            }
        }
        let expected = if sets.words.len() < 2 { 0 } else { sets.words.len() };
        prop_assert_eq!(doc.partitions.len(), expected);
    }
}

fn write_dataset(dir: &std::path::Path) {
    let mut w = CldfWriter::new();
    for name in ["Mixtec", "Trique"] {
        w.add_language(Language {
            id: name.into(),
            name: name.into(),
            ..Language::default()
        })
        .unwrap();
    }
    for (id, name) in [("5_hand", "hand"), ("6_water", "water")] {
        w.add_concept(Concept {
            id: id.into(),
            name: name.into(),
            ..Concept::default()
        })
        .unwrap();
    }
    let forms = [
        ("Mixtec", "5_hand", "12", vec![CodingScheme::Broad, CodingScheme::Fine]),
        ("Trique", "5_hand", "13", vec![CodingScheme::Broad]),
        ("Trique", "6_water", "3", vec![CodingScheme::Fine]),
    ];
    for (language, parameter, cogid, coding) in forms {
        let form_id = w
            .add_form(NewForm {
                language_id: language.into(),
                parameter_id: parameter.into(),
                form: "x".into(),
                ..NewForm::default()
            })
            .unwrap()
            .id
            .clone();
        w.add_cognate(Cognate {
            id: format!("{form_id}-1"),
            form_id,
            cognateset_id: cogid.into(),
            coding,
            morpheme_index: 0,
        })
        .unwrap();
    }
    w.write(dir, &DatasetInfo::default()).unwrap();
}

#[test]
fn coding_filter_selects_judgments() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let ds = CldfDataset::discover(dir.path()).unwrap();

    let broad = CognateSets::from_dataset(&ds, CodingFilter::Broad).unwrap();
    let fine = CognateSets::from_dataset(&ds, CodingFilter::Fine).unwrap();
    let any = CognateSets::from_dataset(&ds, CodingFilter::Any).unwrap();

    let keys = |s: &CognateSets| {
        s.cognates
            .keys()
            .map(|(c, k)| format!("{c}_{k}"))
            .collect::<Vec<_>>()
    };
    assert_eq!(keys(&broad), vec!["hand_12", "hand_13"]);
    assert_eq!(keys(&fine), vec!["hand_12", "water_3"]);
    assert_eq!(keys(&any), vec!["hand_12", "hand_13", "water_3"]);
    assert_eq!(
        fine.doculects,
        BTreeSet::from(["Mixtec".to_string(), "Trique".to_string()])
    );
}

#[test]
fn rendered_dataset_matches_expected_text() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let ds = CldfDataset::discover(dir.path()).unwrap();

    let doc = NexusDocument::from_dataset(&ds, CodingFilter::Any, &Ascertainment::Word).unwrap();
    let text = doc.render();
    assert!(text.contains("\nbegin data;\n    dimensions ntax=2 nchar=5;\n"));
    // hand_0ascertainment hand_12 hand_13 water_0ascertainment water_3
    assert!(text.contains("\nMixtec 010??\n"));
    assert!(text.contains("\nTrique 00101\n"));
    assert!(text.ends_with(
        "\nbegin sets;\n\tcharset hand = 1, 2, 3;\n\tcharset water = 4, 5;\nend;\n\n"
    ));
}

#[test]
fn two_partitions_abort_before_matrix() {
    let mut map = PartitionMap::new();
    map.assign("body", "hand", "12").unwrap();
    let err = map.assign("nature", "hand", "12").unwrap_err();
    assert!(matches!(err, NexusError::TwoPartitions { .. }));
}

#[test]
fn dataset_without_cognates_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("cldf-metadata.json"),
        r#"{"tables": [
            {"url": "forms.csv", "dc:conformsTo": "http://cldf.clld.org/v1.0/terms.rdf#FormTable", "tableSchema": {"columns": []}},
            {"url": "parameters.csv", "dc:conformsTo": "http://cldf.clld.org/v1.0/terms.rdf#ParameterTable", "tableSchema": {"columns": []}}
        ]}"#,
    )
    .unwrap();
    let ds = CldfDataset::discover(dir.path()).unwrap();
    let err =
        NexusDocument::from_dataset(&ds, CodingFilter::Broad, &Ascertainment::None).unwrap_err();
    assert!(err.to_string().ends_with("no CognateTable"));
}
