//! The standard catalog wired into models.

use std::collections::HashSet;

use thicket_core::{Alignment, Datum, DatumKind, GenerateError, ModelError};
use thicket_generators::{
    Coalescent, FilterMissingSites, NodeCount, Normal, Sample, StandardLibrary, TreeLength,
};
use thicket_graph::{Model, Registry, Sampler, SamplerConfig};
use thicket_test_utils::seeded_rng;

#[test]
fn registry_lists_whole_catalog() {
    let registry = Registry::from_extensions(&[&StandardLibrary]).unwrap();
    let distributions: Vec<&str> = registry.distribution_names().collect();
    assert_eq!(
        distributions,
        vec![
            "Coalescent",
            "BirthDeathSerialSampling",
            "Exp",
            "Normal",
            "LogNormal",
            "Uniform",
            "sample",
            "FilterMissingSites",
        ]
    );
    let functions: Vec<&str> = registry.function_names().collect();
    assert_eq!(
        functions,
        vec!["exp", "sort", "repArray", "treeLength", "nodeCount", "taxa"]
    );
}

#[test]
fn registry_generator_samples() {
    let registry = Registry::from_extensions(&[&StandardLibrary]).unwrap();
    let mut m = Model::new();
    let g = m.add_boxed(registry.create("Coalescent").unwrap());
    m.set_param(g, "theta", 2.0).unwrap();
    m.set_param(g, "n", 6i64).unwrap();
    m.validate(g).unwrap();
    let tree = m.random_variable(g, Some("psi")).unwrap();
    let sampled = m.sample(tree, &mut seeded_rng(5)).unwrap();
    assert_eq!(sampled.as_tree().unwrap().n_taxa(), 6);
    assert_eq!(
        m.code_string(tree.id()).unwrap(),
        "psi ~ Coalescent(theta=2.0, n=6);"
    );
}

#[test]
fn tree_summaries_follow_the_tree() {
    let mut m = Model::new();
    let theta = m.constant("theta", 5.0);
    let n = m.constant("n", 7i64);
    let g = m.generator(Coalescent, &[("theta", theta), ("n", n)]).unwrap();
    let tree = m.random_variable(g, Some("tree")).unwrap().id();
    let l = m.generator(TreeLength, &[("tree", tree)]).unwrap();
    let length = m.derive(l, Some("length")).unwrap();
    let c = m.generator(NodeCount, &[("tree", tree)]).unwrap();
    let count = m.derive(c, Some("count")).unwrap();

    let mut sampler = Sampler::new(SamplerConfig {
        seed: 21,
        replicates: 3,
    })
    .unwrap();
    sampler
        .run(&mut m, &[length, count], |_, model| {
            let t = model.value(tree).unwrap().as_tree().unwrap();
            assert_eq!(
                model.value(length).unwrap(),
                &Datum::Real(t.tree_length())
            );
            assert_eq!(model.value(count).unwrap(), &Datum::Integer(13));
        })
        .unwrap();
    assert_eq!(
        m.program(length).unwrap(),
        "theta = 5.0;\nn = 7;\ntree ~ Coalescent(theta=theta, n=n);\nlength = treeLength(tree=tree);"
    );
}

#[test]
fn sample_without_replacement_is_distinct() {
    let mut m = Model::new();
    let names: Vec<String> = ["a", "b", "c", "d", "e"].map(String::from).into();
    let arr = m.constant("arr", names);
    let size = m.constant("size", 3i64);
    let g = m.generator(Sample, &[("arr", arr), ("size", size)]).unwrap();
    let picked = m.random_variable(g, Some("picked")).unwrap();
    assert_eq!(m.kind(picked.id()).unwrap(), DatumKind::TextArray);

    for seed in 0..20 {
        m.reset();
        let out = m.sample(picked, &mut seeded_rng(seed)).unwrap();
        let names = out.as_text_array().unwrap();
        assert_eq!(names.len(), 3);
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), 3);
    }
}

#[test]
fn sample_with_replacement_keeps_size() {
    let mut m = Model::new();
    let arr = m.constant("arr", vec![1.0, 2.0]);
    let size = m.constant("size", 2i64);
    let replace = m.constant("replace", true);
    let g = m
        .generator(Sample, &[("arr", arr), ("size", size), ("replace", replace)])
        .unwrap();
    let picked = m.random_variable(g, None).unwrap();
    let out = m.sample(picked, &mut seeded_rng(2)).unwrap();
    let values = out.to_real_vec().unwrap();
    assert_eq!(values.len(), 2);
    assert!(values.iter().all(|v| *v == 1.0 || *v == 2.0));
}

#[test]
fn sample_size_checked_at_construction() {
    let mut m = Model::new();
    let arr = m.constant("arr", vec![1.0, 2.0]);
    let size = m.constant("size", 3i64);
    assert!(matches!(
        m.generator(Sample, &[("arr", arr), ("size", size)]),
        Err(ModelError::Generator {
            reason: GenerateError::InvalidParameter { .. },
            ..
        })
    ));
}

fn alignment() -> Alignment {
    Alignment::from_rows(
        vec!["a".into(), "b".into()],
        vec![vec![0, 9, 1], vec![1, 9, 9]],
        9,
    )
    .unwrap()
}

#[test]
fn filter_missing_sites_in_model() {
    let mut m = Model::new();
    let threshold = m.constant("threshold", 0.5);
    let data = m.constant("data", alignment());
    let g = m
        .generator(FilterMissingSites, &[("threshold", threshold), ("alignment", data)])
        .unwrap();
    let filtered = m.random_variable(g, Some("filtered")).unwrap();
    let out = m.sample(filtered, &mut seeded_rng(0)).unwrap();
    assert_eq!(out.as_alignment().unwrap().n_sites(), 2);
}

#[test]
fn filter_threshold_of_one_rejected_at_construction() {
    let mut m = Model::new();
    let threshold = m.constant("threshold", 1.0);
    let data = m.constant("data", alignment());
    let err = m
        .generator(FilterMissingSites, &[("threshold", threshold), ("alignment", data)])
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::Generator {
            ref name,
            reason: GenerateError::InvalidParameter { .. },
        } if name == "FilterMissingSites"
    ));
}

#[test]
fn alignment_has_no_inline_literal() {
    let mut m = Model::new();
    let threshold = m.constant("threshold", 0.1);
    let g = m.add_generator(FilterMissingSites);
    m.set_input(g, "threshold", threshold).unwrap();
    m.set_param(g, "alignment", alignment()).unwrap();
    let out = m.random_variable(g, Some("out")).unwrap();
    assert!(matches!(
        m.code_string(out.id()),
        Err(ModelError::Unrepresentable { .. })
    ));
}

#[test]
fn normal_prior_on_theta_makes_tree_random() {
    let mut m = Model::new();
    let mean = m.constant("mean", 3.0);
    let sd = m.constant("sd", 0.1);
    let prior = m.generator(Normal, &[("mean", mean), ("sd", sd)]).unwrap();
    let theta = m.random_variable(prior, Some("theta")).unwrap().id();
    let n = m.constant("n", 4i64);
    let g = m.generator(Coalescent, &[("theta", theta), ("n", n)]).unwrap();
    let tree = m.random_variable(g, Some("tree")).unwrap().id();

    assert!(m.has_random_parameters(g).unwrap());
    assert!(m.is_random(tree).unwrap());
    assert!(!m.is_random(n).unwrap());
    m.sample(tree, &mut seeded_rng(4)).unwrap();
    assert!(m.log_density(theta).unwrap().is_finite());
    assert!(m.log_density(tree).unwrap().is_finite());
}

#[test]
fn sample_three_of_five_both_ways() {
    for replace in [false, true] {
        let mut m = Model::new();
        let arr = m.constant("arr", vec![1i64, 2, 3, 4, 5]);
        let size = m.constant("size", 3i64);
        let replace_flag = m.constant("replace", replace);
        let g = m
            .generator(
                Sample,
                &[("arr", arr), ("size", size), ("replace", replace_flag)],
            )
            .unwrap();
        let picked = m.random_variable(g, Some("picked")).unwrap();
        for seed in 0..10 {
            m.reset();
            let Datum::IntegerArray(v) = m.sample(picked, &mut seeded_rng(seed)).unwrap() else {
                panic!("sample changed the array kind");
            };
            assert_eq!(v.len(), 3);
            assert!(v.iter().all(|x| (1..=5).contains(x)));
            if !replace {
                let unique: HashSet<i64> = v.iter().copied().collect();
                assert_eq!(unique.len(), 3);
            }
        }
    }
}
