#![no_main]
use arbitrary::Arbitrary;
use daedaluzz::condition::OperandSpace;
use daedaluzz::context::GenerationContext;
use daedaluzz::tree::build_tree;
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

#[derive(Arbitrary, Debug)]
struct Input {
    seed: u64,
    num_params: u8,
    max_const: u64,
    // kept small, a full tree has 2^depth leaves
    max_depth: u8,
    return_probability: u8,
    use_externals: bool,
}

fuzz_target!(|input: Input| {
    let externals = if input.use_externals {
        vec!["msg.value".to_string(), "block.number".to_string()]
    } else {
        vec![]
    };
    let space = OperandSpace {
        num_params: input.num_params as usize,
        max_const: input.max_const,
        external_inputs: &externals,
    };
    if space.is_empty() {
        return;
    }
    let max_depth = (input.max_depth % 13) as u32;
    let p = input.return_probability as f64 / 255.0;

    let mut ctx = GenerationContext::new(input.seed);
    let tree = build_tree(&mut ctx, &space, max_depth, p);

    assert!(tree.depth() <= max_depth);
    let leaves = tree.leaves();
    assert_eq!(leaves, (0..ctx.failures.count()).collect::<Vec<_>>());
    let paths: HashSet<_> = tree.paths().into_iter().map(|(p, _)| p).collect();
    assert_eq!(paths.len(), leaves.len());

    // same seed, same tree
    let mut ctx2 = GenerationContext::new(input.seed);
    assert_eq!(build_tree(&mut ctx2, &space, max_depth, p), tree);
});
