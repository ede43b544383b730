use crate::model::{SpecFormat, SpecSource};
use std::path::{Path, PathBuf};

/// Extensions tried, in order, when a library name has none.
const SPEC_FORMATS: [SpecFormat; 2] = [SpecFormat::Xml, SpecFormat::Json];

/// Looks for `<name>.xml`, then `<name>.json`, in `directory`. A name that
/// already carries a spec extension is used as the file name.
#[must_use]
pub fn find_from_directory(directory: &Path, name: &str) -> Option<SpecSource> {
    if name.is_empty() {
        return None;
    }
    if SpecFormat::from_path(Path::new(name)).is_some() {
        return existing_file(directory.join(name));
    }
    SPEC_FORMATS
        .iter()
        .find_map(|format| existing_file(directory.join(format!("{name}.{}", format.extension()))))
}

/// First hit among the pythonpath entries that are directories.
#[must_use]
pub fn find_from_pythonpath(paths: &[PathBuf], name: &str) -> Option<SpecSource> {
    paths
        .iter()
        .filter(|path| path.is_dir())
        .find_map(|path| find_from_directory(path, name))
}

/// Entries of the `PYTHONPATH` environment variable.
#[must_use]
pub fn pythonpath_from_env() -> Vec<PathBuf> {
    std::env::var_os("PYTHONPATH")
        .map(|value| {
            std::env::split_paths(&value)
                .filter(|path| !path.as_os_str().is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn existing_file(path: PathBuf) -> Option<SpecSource> {
    if path.is_file() {
        SpecSource::file(path)
    } else {
        None
    }
}
