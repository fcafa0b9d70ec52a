// Constants and command-line options for the tracer

use crate::trace::StructureKind;

/// Suggested playback duration for an ordinary step (milliseconds)
pub const STEP_DURATION_MS: u64 = 800;

/// Suggested duration for a step that visits or highlights a single node
pub const VISIT_DURATION_MS: u64 = 600;

/// Suggested duration for a summary step at the end of an operation
pub const SUMMARY_DURATION_MS: u64 = 1200;

/// Suggested duration for a no-op explanation
pub const NOOP_DURATION_MS: u64 = 1000;

/// Centre of the circle graph vertices are laid out on
pub const GRAPH_LAYOUT_CENTER: (f64, f64) = (400.0, 300.0);

/// Radius of the graph layout circle
pub const GRAPH_LAYOUT_RADIUS: f64 = 200.0;

/// Default memory budget for recorded replay frames (64 MB)
pub const DEFAULT_HISTORY_LIMIT: usize = 64 * 1024 * 1024;

/// Autoplay interval in the terminal UI
pub const AUTOPLAY_INTERVAL_MS: u64 = 1000;

/// Options accepted by the `structty` binary
#[derive(Debug, Clone)]
pub struct CliOptions {
    pub script_path: String,
    pub default_kind: StructureKind,
    pub json: bool,
    pub history_limit: usize,
}

impl CliOptions {
    /// Parse `structty <script> [--kind <kind>] [--json] [--history-limit <MB>]`
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut script_path = None;
        let mut default_kind = StructureKind::Stack;
        let mut json = false;
        let mut history_limit = DEFAULT_HISTORY_LIMIT;

        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--json" => json = true,
                "--kind" => {
                    let name = iter.next().ok_or("--kind requires a value")?;
                    default_kind = StructureKind::from_name(name)
                        .ok_or_else(|| format!("Unknown structure kind '{}'", name))?;
                }
                "--history-limit" => {
                    let mb = iter.next().ok_or("--history-limit requires a value")?;
                    let mb: usize = mb
                        .parse()
                        .map_err(|_| format!("Invalid history limit '{}'", mb))?;
                    history_limit = mb
                        .checked_mul(1024 * 1024)
                        .ok_or_else(|| format!("History limit '{}' is too large", mb))?;
                }
                other if other.starts_with("--") => {
                    return Err(format!("Unknown option '{}'", other));
                }
                other => {
                    if script_path.is_some() {
                        return Err(format!("Unexpected argument '{}'", other));
                    }
                    script_path = Some(other.to_string());
                }
            }
        }

        Ok(CliOptions {
            script_path: script_path.ok_or("No input file provided")?,
            default_kind,
            json,
            history_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("structty")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_defaults() {
        let opts = CliOptions::parse(&args(&["demo.py"])).unwrap();
        assert_eq!(opts.script_path, "demo.py");
        assert_eq!(opts.default_kind, StructureKind::Stack);
        assert!(!opts.json);
        assert_eq!(opts.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_parse_flags() {
        let opts =
            CliOptions::parse(&args(&["--kind", "bst", "g.py", "--json", "--history-limit", "2"]))
                .unwrap();
        assert_eq!(opts.default_kind, StructureKind::BinarySearchTree);
        assert!(opts.json);
        assert_eq!(opts.history_limit, 2 * 1024 * 1024);
    }

    #[test]
    fn test_parse_errors() {
        assert!(CliOptions::parse(&args(&[])).is_err());
        assert!(CliOptions::parse(&args(&["a.py", "--kind", "heap"])).is_err());
        assert!(CliOptions::parse(&args(&["a.py", "--frobnicate"])).is_err());
    }

    #[test]
    fn test_parse_oversized_history_limit() {
        let huge = usize::MAX.to_string();
        let err = CliOptions::parse(&args(&["a.py", "--history-limit", &huge])).unwrap_err();
        assert!(err.contains("too large"));
    }
}
