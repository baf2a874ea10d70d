use super::config::{GenerationConfig, Mode};
use super::emitter::generate;
use rstest::rstest;
use std::collections::BTreeSet;

/// collects the ids of all `AssertionFailed("<id>")` markers in a program
fn failure_ids(text: &str) -> Vec<u32> {
    text.split("AssertionFailed(\"")
        .skip(1)
        .map(|s| {
            let end = s.find('"').expect("closing quote");
            s[..end].parse().expect("numeric id")
        })
        .collect()
}

fn count(text: &str, needle: &str) -> usize {
    text.matches(needle).count()
}

#[rstest]
#[case(Mode::Stateless, 0)]
#[case(Mode::Stateless, 1234)]
#[case(Mode::Stateful, 0)]
#[case(Mode::Stateful, 99)]
fn test_deterministic(#[case] mode: Mode, #[case] seed: u64) {
    let cfg = GenerationConfig::new(mode).with_seed(seed);
    let a = generate(&cfg).unwrap();
    let b = generate(&cfg).unwrap();
    assert_eq!(a, b);
}

#[rstest]
#[case(Mode::Stateless)]
#[case(Mode::Stateful)]
fn test_seed_changes_output(#[case] mode: Mode) {
    let a = generate(&GenerationConfig::new(mode).with_seed(1)).unwrap();
    let b = generate(&GenerationConfig::new(mode).with_seed(2)).unwrap();
    assert_ne!(a.text(), b.text());
}

#[rstest]
#[case(GenerationConfig::stateless())]
#[case(GenerationConfig::stateless().with_seed(5).with_return_probability(0.3))]
#[case(GenerationConfig::stateless().with_depth(0, 3).with_return_probability(0.0))]
#[case(GenerationConfig::stateful())]
#[case(GenerationConfig::stateful().with_seed(17).with_dimensions(4, 9))]
#[case(GenerationConfig::stateful().with_depth(0, 2).with_external_inputs(["msg.value"]))]
fn test_failure_ids_dense(#[case] cfg: GenerationConfig) {
    let artifact = generate(&cfg).unwrap();
    let ids = failure_ids(artifact.text());
    let unique: BTreeSet<u32> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "repeated failure id");
    let expect: BTreeSet<u32> = (0..artifact.leaf_count()).collect();
    assert_eq!(unique, expect);
    assert!(
        artifact
            .text()
            .contains(&format!("/// failure markers: {}\n", artifact.leaf_count()))
    );
}

#[test]
fn test_full_tree_program() {
    let cfg = GenerationConfig::stateless()
        .with_depth(0, 3)
        .with_return_probability(0.0);
    let artifact = generate(&cfg).unwrap();
    let text = artifact.text();
    assert_eq!(artifact.leaf_count(), 8);
    assert_eq!(count(text, "if ("), 7);
    assert_eq!(count(text, "} else {"), 7);
    assert_eq!(count(text, "return 0;"), 8);
    // the deepest guard is nested three levels below the root
    assert!(text.contains("\n            emit AssertionFailed(\""));
    assert!(!text.contains("\n              emit"));
}

#[test]
fn test_stateless_uses_externals() {
    let mut saw_external = false;
    for seed in 0..10 {
        let text = generate(&GenerationConfig::stateless().with_seed(seed))
            .unwrap()
            .into_text();
        saw_external |= text.contains("uint64(msg.value)")
            || text.contains("uint64(tx.gasprice)")
            || text.contains("uint64(block.number)");
    }
    assert!(saw_external);
}

#[test]
fn test_stateful_default_has_no_externals() {
    let text = generate(&GenerationConfig::stateful()).unwrap().into_text();
    assert!(!text.contains("msg.value"));
    assert!(!text.contains("tx.gasprice"));
    assert!(!text.contains("block.number"));
}

#[test]
fn test_default_maze_scenario() {
    let cfg = GenerationConfig::stateful();
    assert_eq!(cfg.seed, 0);
    let artifact = generate(&cfg).unwrap();
    let text = artifact.text();

    assert!(text.contains("function moveNorth("));
    assert!(text.contains("function moveSouth("));
    assert!(text.contains("function moveEast("));
    assert!(text.contains("function moveWest("));
    assert!(text.contains("function step("));

    assert_eq!(artifact.cell_count(), 49);
    for x in 0..7 {
        for y in 0..7 {
            assert_eq!(count(text, &format!("if (x == {x} && y == {y}) {{")), 1);
        }
    }
    assert!(text.contains("      if (x == 0 && y == 0) {\n        // start\n        return 0;\n"));
    assert_eq!(count(text, "// start"), 1);

    let walls = count(text, "require(false);  // wall");
    assert_eq!(walls as u32, artifact.wall_count());
    assert_eq!(count(text, "// bug"), artifact.leaf_count() as usize);
    assert_eq!(walls + artifact.leaf_count() as usize, 48);
    assert!(text.contains("      return 49;\n"));
}

#[test]
fn test_constants_bounded_in_program() {
    let cfg = GenerationConfig::stateful().with_max_const(3).with_seed(8);
    let text = generate(&cfg).unwrap().into_text();
    for s in text.split("uint64(").skip(1) {
        let end = s.find(')').expect("closing paren");
        if let Ok(c) = s[..end].parse::<u64>() {
            assert!(c <= 3, "constant {c} out of range");
        }
    }
}
