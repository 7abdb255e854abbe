// launch.rs
use std::{env, ffi::OsString, fmt, path::PathBuf};

/// Flags accepted by the `deck-replay` tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayArgs {
    pub scene: PathBuf,
    /// App id for the per-run log directory; stderr logging when absent.
    pub log: Option<String>,
}

/// Errors when parsing replay flags.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq)]
pub enum LaunchArgError {
    MissingScene,
    MissingValue(String),
    UnknownFlag(String),
}

impl fmt::Display for LaunchArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LaunchArgError::*;
        match self {
            MissingScene => write!(f, "missing -scene"),
            MissingValue(flag) => write!(f, "missing value after {flag}"),
            UnknownFlag(flag) => write!(f, "unknown flag '{flag}'"),
        }
    }
}

impl std::error::Error for LaunchArgError {}

/// Parse from the current process argv (skips argv[0]).
pub fn parse_launch_args() -> Result<ReplayArgs, LaunchArgError> {
    parse_from(env::args_os().skip(1))
}

/// Parse from any iterator of OsString.
pub fn parse_from<I>(it: I) -> Result<ReplayArgs, LaunchArgError>
where
    I: Iterator<Item = OsString>,
{
    let args: Vec<String> = it.map(|s| s.to_string_lossy().into_owned()).collect();

    let mut scene = None;
    let mut log = None;
    let mut i = 0;
    while let Some(flag) = args.get(i) {
        let slot = match flag.as_str() {
            "-scene" => &mut scene,
            "-log" => &mut log,
            other => return Err(LaunchArgError::UnknownFlag(other.to_string())),
        };
        let value = args
            .get(i + 1)
            .filter(|v| !v.starts_with('-'))
            .ok_or_else(|| LaunchArgError::MissingValue(flag.clone()))?;
        *slot = Some(value.clone());
        i += 2;
    }

    Ok(ReplayArgs {
        scene: scene.map(PathBuf::from).ok_or(LaunchArgError::MissingScene)?,
        log,
    })
}
