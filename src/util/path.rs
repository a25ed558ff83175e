use std::path::{Path, PathBuf};

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is returned unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

pub trait PathExt {
    fn is_json_file(&self) -> bool;
    fn expanded(&self) -> PathBuf;
}

impl PathExt for Path {
    fn is_json_file(&self) -> bool {
        self.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }

    fn expanded(&self) -> PathBuf {
        PathBuf::from(expand_env_vars(&self.to_string_lossy()))
    }
}
