use std::path::{Path, PathBuf};

use crate::error::{GeneratorError, GeneratorResult};

pub const CSS_FILE_NAME: &str = "screen.css";
pub const SORTTABLE_FILE_NAME: &str = "sorttable.js";

const EMBEDDED_CSS: &str = include_str!("../../resources/screen.css");
const EMBEDDED_SORTTABLE: &str = include_str!("../../resources/sorttable.js");

/// Place the website's static files.
///
/// The stylesheet is always replaced; the sort script is only written when
/// missing. A file of the same name in `resources_dir` takes precedence over
/// the embedded copy.
pub fn write_static_assets(website_dir: &Path, resources_dir: Option<&Path>) -> GeneratorResult<()> {
    let css = website_dir.join(CSS_FILE_NAME);
    if css.exists() {
        std::fs::remove_file(&css).map_err(|source| asset_error(&css, source))?;
    }
    copy_resource(CSS_FILE_NAME, EMBEDDED_CSS, resources_dir, &css)?;

    let sorttable = website_dir.join(SORTTABLE_FILE_NAME);
    if !sorttable.exists() {
        copy_resource(SORTTABLE_FILE_NAME, EMBEDDED_SORTTABLE, resources_dir, &sorttable)?;
    }
    Ok(())
}

fn copy_resource(
    file_name: &str,
    embedded: &str,
    resources_dir: Option<&Path>,
    destination: &Path,
) -> GeneratorResult<()> {
    let override_file: Option<PathBuf> = resources_dir
        .map(|dir| dir.join(file_name))
        .filter(|p| p.is_file());

    let result = match override_file {
        Some(source) => std::fs::copy(&source, destination).map(|_| ()),
        None => std::fs::write(destination, embedded),
    };
    result.map_err(|source| asset_error(destination, source))
}

fn asset_error(path: &Path, source: std::io::Error) -> GeneratorError {
    GeneratorError::Asset {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_assets() {
        let dir = tempfile::tempdir().unwrap();
        write_static_assets(dir.path(), None).unwrap();
        let css = std::fs::read_to_string(dir.path().join(CSS_FILE_NAME)).unwrap();
        assert_eq!(css, EMBEDDED_CSS);
        assert!(dir.path().join(SORTTABLE_FILE_NAME).is_file());
    }

    #[test]
    fn test_css_replaced_but_sorttable_kept() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CSS_FILE_NAME), "old css").unwrap();
        std::fs::write(dir.path().join(SORTTABLE_FILE_NAME), "custom js").unwrap();
        write_static_assets(dir.path(), None).unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join(CSS_FILE_NAME)).unwrap(),
            EMBEDDED_CSS
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join(SORTTABLE_FILE_NAME)).unwrap(),
            "custom js"
        );
    }

    #[test]
    fn test_resources_dir_overrides_embedded_copy() {
        let resources = tempfile::tempdir().unwrap();
        std::fs::write(resources.path().join(CSS_FILE_NAME), "body {}").unwrap();
        let site = tempfile::tempdir().unwrap();
        write_static_assets(site.path(), Some(resources.path())).unwrap();

        assert_eq!(
            std::fs::read_to_string(site.path().join(CSS_FILE_NAME)).unwrap(),
            "body {}"
        );
        assert_eq!(
            std::fs::read_to_string(site.path().join(SORTTABLE_FILE_NAME)).unwrap(),
            EMBEDDED_SORTTABLE
        );
    }

    #[test]
    fn test_missing_website_dir_is_an_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            write_static_assets(&dir.path().join("missing"), None),
            Err(GeneratorError::Asset { .. })
        ));
    }
}
