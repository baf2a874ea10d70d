#![no_main]
use arbitrary::Arbitrary;
use daedaluzz::{GenerationConfig, generate};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    seed: u64,
    num_params: u8,
    max_const: u64,
    dim_x: u8,
    dim_y: u8,
    min_depth: u8,
    max_depth: u8,
    use_externals: bool,
}

fuzz_target!(|input: Input| {
    let mut cfg = GenerationConfig::stateful()
        .with_seed(input.seed)
        .with_params(input.num_params as usize % 16)
        .with_max_const(input.max_const)
        .with_dimensions(input.dim_x as u32 % 16, input.dim_y as u32 % 16)
        .with_depth(input.min_depth as u32 % 32, input.max_depth as u32 % 32);
    if input.use_externals {
        cfg = cfg.with_external_inputs(["msg.value", "tx.gasprice"]);
    }

    let Ok(artifact) = generate(&cfg) else {
        assert!(cfg.validate().is_err());
        return;
    };
    assert_eq!(artifact, generate(&cfg).expect("second run"));
    assert_eq!(artifact.cell_count(), cfg.cell_count());

    let text = artifact.text();
    assert_eq!(text.matches("// start").count(), 1);
    assert_eq!(
        text.matches("// wall").count(),
        artifact.wall_count() as usize
    );
    assert_eq!(
        text.matches("// bug").count(),
        artifact.leaf_count() as usize
    );
    for id in 0..artifact.leaf_count() {
        assert_eq!(text.matches(&format!("AssertionFailed(\"{id}\")")).count(), 1);
    }
    assert_eq!(
        artifact.leaf_count() as u64 + artifact.wall_count() as u64 + 1,
        artifact.cell_count()
    );
});
