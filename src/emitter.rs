use crate::condition::OperandSpace;
use crate::config::{GenerationConfig, Mode};
use crate::context::GenerationContext;
use crate::error::{GenError, Result};
use crate::maze::build_maze;
use crate::tree::build_tree;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tera::{Context, Tera};

// the decision tree is rendered inside `contract { function { unchecked {`
const TREE_LEVEL: usize = 3;

// both skeletons end on the closing brace, `fill_skeleton` adds the newline
pub const TREE_SKELETON: &str = r#"pragma solidity ^0.8.19;
/// automatically generated by Daedaluzz
/// failure markers: {{ LeafCount }}
contract C {
  event AssertionFailed(string message);
  function f({{ ParamsStr }}) payable external returns (uint64) {
    unchecked {
{{ BodyStr }}
    }
  }
}"#;

pub const MAZE_SKELETON: &str = r#"pragma solidity ^0.8.19;
/// automatically generated by Daedaluzz
/// failure markers: {{ LeafCount }}
contract Maze {
  event AssertionFailed(string message);
  uint64 private x;
  uint64 private y;
  function moveNorth({{ ParamsStr }}) payable external returns (int64) {
    uint64 ny = y + 1;
    require(ny < {{ DimY }});
    y = ny;
    return step({{ ArgsStr }});
  }
  function moveSouth({{ ParamsStr }}) payable external returns (int64) {
    require(0 < y);
    uint64 ny = y - 1;
    y = ny;
    return step({{ ArgsStr }});
  }
  function moveEast({{ ParamsStr }}) payable external returns (int64) {
    uint64 nx = x + 1;
    require(nx < {{ DimX }});
    x = nx;
    return step({{ ArgsStr }});
  }
  function moveWest({{ ParamsStr }}) payable external returns (int64) {
    require(0 < x);
    uint64 nx = x - 1;
    x = nx;
    return step({{ ArgsStr }});
  }
  function step({{ ParamsStr }}) internal returns (int64) {
    unchecked {
{{ BodyStr }}      return {{ CellCount }};
    }
  }
}"#;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Placeholders<'a> {
    params_str: &'a str,
    args_str: &'a str,
    dim_x: u32,
    dim_y: u32,
    body_str: &'a str,
    leaf_count: u32,
    cell_count: u64,
}

/// One generated program. Created once by `generate()` and never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramArtifact {
    mode: Mode,
    text: String,
    leaf_count: u32,
    wall_count: u32,
    cell_count: u64,
}

impl ProgramArtifact {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// number of distinct failure markers in the program
    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    pub fn wall_count(&self) -> u32 {
        self.wall_count
    }

    /// number of maze cells, zero in stateless mode
    pub fn cell_count(&self) -> u64 {
        self.cell_count
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut out = File::create(path)?;
        out.write_all(self.text.as_bytes())?;
        out.flush()?;
        info!("wrote {} bytes to {}", self.text.len(), path.display());
        Ok(())
    }
}

/// Runs the body builder selected by `cfg.mode` and fills the matching
/// program skeleton. The output is a pure function of `cfg`.
pub fn generate(cfg: &GenerationConfig) -> Result<ProgramArtifact> {
    cfg.validate()?;

    let mut ctx = GenerationContext::from_config(cfg);
    let space = OperandSpace {
        num_params: cfg.num_params,
        max_const: cfg.max_const,
        external_inputs: &cfg.external_inputs,
    };

    let (skeleton_name, skeleton, body, wall_count, cell_count) = match cfg.mode {
        Mode::Stateless => {
            let tree = build_tree(&mut ctx, &space, cfg.max_depth, cfg.return_probability);
            ("tree.sol", TREE_SKELETON, tree.render(TREE_LEVEL), 0, 0)
        }
        Mode::Stateful => {
            let maze = build_maze(
                &mut ctx,
                &space,
                cfg.dim_x,
                cfg.dim_y,
                cfg.min_depth,
                cfg.max_depth,
            );
            (
                "maze.sol",
                MAZE_SKELETON,
                maze.render(),
                maze.wall_count(),
                maze.cell_count(),
            )
        }
    };

    let params = cfg.params_decl();
    let args = cfg.args_list();
    let placeholders = Placeholders {
        params_str: &params,
        args_str: &args,
        dim_x: cfg.dim_x,
        dim_y: cfg.dim_y,
        body_str: &body,
        leaf_count: ctx.failures.count(),
        cell_count,
    };
    let text = fill_skeleton(skeleton_name, skeleton, &placeholders)?;

    info!(
        "generated {} program (seed {}): {} failure markers, {} walls, {} cells",
        cfg.mode,
        cfg.seed,
        ctx.failures.count(),
        wall_count,
        cell_count
    );
    Ok(ProgramArtifact {
        mode: cfg.mode,
        text,
        leaf_count: ctx.failures.count(),
        wall_count,
        cell_count,
    })
}

/// Registers `skeleton` under `name` and renders it with `placeholders`,
/// whose serialized field names are the template variables.
fn fill_skeleton<T: Serialize>(name: &str, skeleton: &str, placeholders: &T) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(name, skeleton).map_err(GenError::TemplateParse)?;
    let context = Context::from_serialize(placeholders).map_err(GenError::Substitution)?;
    let mut text = tera.render(name, &context).map_err(GenError::Substitution)?;
    text.push('\n');
    Ok(text)
}

/// `generate()` followed by writing the program to `path`
pub fn generate_to_file<P: AsRef<Path>>(
    cfg: &GenerationConfig,
    path: P,
) -> Result<ProgramArtifact> {
    let artifact = generate(cfg)?;
    artifact.write_to(path)?;
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn full_placeholders() -> Placeholders<'static> {
        Placeholders {
            params_str: "uint64 p0",
            args_str: "p0",
            dim_x: 2,
            dim_y: 3,
            body_str: "",
            leaf_count: 0,
            cell_count: 6,
        }
    }

    #[rstest]
    #[case("tree.sol", TREE_SKELETON)]
    #[case("maze.sol", MAZE_SKELETON)]
    fn test_skeletons_fill(#[case] name: &str, #[case] skeleton: &str) {
        let text = fill_skeleton(name, skeleton, &full_placeholders()).expect("skeleton");
        assert!(!text.contains("{{"));
        assert!(!text.contains("}}"));
        assert!(text.contains("/// failure markers: 0\n"));
        assert!(text.ends_with("}\n}\n"));
    }

    #[rstest]
    #[case("{{ ParamsStr")]
    #[case("{% if %}")]
    #[case("{{ DimX + }}")]
    fn test_bad_skeleton(#[case] skeleton: &str) {
        let err = fill_skeleton("bad.sol", skeleton, &full_placeholders()).unwrap_err();
        assert!(matches!(err, GenError::TemplateParse(_)), "{err}");
    }

    #[rstest]
    #[case("{{ NoSuchName }}")]
    #[case("{{ DimX.field }}")]
    fn test_missing_placeholder(#[case] skeleton: &str) {
        let err = fill_skeleton("bad.sol", skeleton, &full_placeholders()).unwrap_err();
        assert!(matches!(err, GenError::Substitution(_)), "{err}");
    }

    #[test]
    fn test_placeholders_must_be_a_map() {
        let err = fill_skeleton("list.sol", "{{ DimX }}", &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, GenError::Substitution(_)), "{err}");
    }

    #[test]
    fn test_stateless_program() {
        let cfg = GenerationConfig::stateless().with_params(2).with_depth(0, 0);
        let artifact = generate(&cfg).unwrap();
        let expect = r#"pragma solidity ^0.8.19;
/// automatically generated by Daedaluzz
/// failure markers: 1
contract C {
  event AssertionFailed(string message);
  function f(uint64 p0, uint64 p1) payable external returns (uint64) {
    unchecked {
      emit AssertionFailed("0"); assert(false); return 0;
    }
  }
}"#;
        assert_eq!(artifact.text(), expect);
        assert_eq!(artifact.leaf_count(), 1);
        assert_eq!(artifact.cell_count(), 0);
        assert_eq!(artifact.mode(), Mode::Stateless);
    }

    #[test]
    fn test_single_cell_maze() {
        let cfg = GenerationConfig::stateful()
            .with_params(1)
            .with_dimensions(1, 1);
        let artifact = generate(&cfg).unwrap();
        let text = artifact.text();
        assert!(text.contains("contract Maze {"));
        assert!(text.contains("function moveNorth(uint64 p0) payable external returns (int64) {"));
        assert!(text.contains("    return step(p0);\n"));
        assert!(text.contains("    require(ny < 1);\n"));
        assert!(text.contains("    require(nx < 1);\n"));
        let tail = r#"      if (x == 0 && y == 0) {
        // start
        return 0;
      }
      return 1;
    }
  }
}
"#;
        assert!(text.ends_with(tail));
        assert_eq!(artifact.leaf_count(), 0);
        assert_eq!(artifact.cell_count(), 1);
    }

    #[test]
    fn test_dimensions_not_swapped() {
        let cfg = GenerationConfig::stateful().with_dimensions(3, 5);
        let text = generate(&cfg).unwrap().into_text();
        assert!(text.contains("require(ny < 5);"));
        assert!(text.contains("require(nx < 3);"));
        assert!(text.contains("      return 15;\n"));
    }

    #[test]
    fn test_invalid_config() {
        let cfg = GenerationConfig::stateful().with_dimensions(0, 0);
        assert!(matches!(generate(&cfg), Err(GenError::InvalidConfig(_))));
    }

    #[test]
    fn test_oversized_grid() {
        let cfg = GenerationConfig::stateful().with_dimensions(u32::MAX, u32::MAX);
        assert!(matches!(generate(&cfg), Err(GenError::InvalidConfig(_))));
    }

    #[test]
    fn test_write_to_missing_directory() {
        let cfg = GenerationConfig::stateful().with_dimensions(2, 2);
        let artifact = generate(&cfg).unwrap();
        let path = std::env::temp_dir()
            .join("daedaluzz-no-such-directory")
            .join("out.sol");
        assert!(matches!(artifact.write_to(&path), Err(GenError::Io(_))));
    }

    #[test]
    fn test_write_to() {
        let cfg = GenerationConfig::stateless().with_seed(3);
        let path = std::env::temp_dir().join(format!("daedaluzz-test-{}.sol", std::process::id()));
        let artifact = generate_to_file(&cfg, &path).unwrap();
        let on_disk = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(on_disk, artifact.text());
    }
}
