use std::{fs, io, path::Path};

use anyhow::bail;
use nondestructive::yaml;

/// A scalar value to store in a profile.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Scalar<'a> {
    Str(&'a str),
    Int(i64),
}

/// Set `profiles.<profile>.<key>` in the config file at `path`, keeping
/// comments and formatting intact. Creates the file (and its parent
/// directory) if it doesn't exist yet.
pub(crate) fn set_profile_value(
    path: &Path,
    profile: &str,
    key: &str,
    value: Scalar<'_>,
) -> anyhow::Result<()> {
    let content = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    // A file with nothing but comments parses as null; start a fresh document
    // below the comments.
    let is_null = matches!(
        serde_yaml::from_str::<serde_yaml::Value>(&content),
        Ok(serde_yaml::Value::Null)
    );

    if content.trim().is_empty() || is_null {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let value = match value {
            Scalar::Str(s) => serde_yaml::Value::from(s),
            Scalar::Int(v) => serde_yaml::Value::from(v),
        };

        let mut entry = serde_yaml::Mapping::new();
        entry.insert(key.into(), value);
        let mut profiles = serde_yaml::Mapping::new();
        profiles.insert(profile.into(), entry.into());
        let mut root = serde_yaml::Mapping::new();
        root.insert("profiles".into(), profiles.into());

        let mut out: String = content
            .lines()
            .filter(|line| line.trim_start().starts_with('#'))
            .flat_map(|line| [line, "\n"])
            .collect();
        out.push_str(&serde_yaml::to_string(&root)?);

        fs::write(path, out)?;
        return Ok(());
    }

    edit(path, content, |doc| {
        let mut m = mapping_at_path(doc, &["profiles", profile])?;
        match value {
            Scalar::Str(s) => upsert_str(&mut m, key, s),
            Scalar::Int(v) => upsert_i64(&mut m, key, v),
        }

        Ok(())
    })
}

/// Parse a YAML document, apply edits via a closure, and write it back to
/// `path`.
fn edit(
    path: &Path,
    content: String,
    f: impl FnOnce(&mut yaml::Document) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let mut doc = yaml::from_slice(content)?;

    f(&mut doc)?;

    fs::write(path, doc.to_string())?;
    Ok(())
}

/// Navigate into a nested YAML mapping by key path, creating any missing
/// intermediate mappings along the way. Returns a `MappingMut` pointing at
/// the innermost mapping.
///
/// `path` must be non-empty.
fn mapping_at_path<'a>(
    doc: &'a mut yaml::Document,
    path: &[&str],
) -> anyhow::Result<yaml::MappingMut<'a>> {
    assert!(!path.is_empty());

    let Some(mut current) = doc.as_mut().into_mapping_mut() else {
        bail!("invalid config file: not a dictionary");
    };

    for &key in path {
        if current.as_ref().get(key).is_none() {
            let _ = current.insert(key, yaml::Separator::Auto).make_mapping();
        }

        let Some(next) = current.get_into_mut(key).and_then(|v| v.into_mapping_mut()) else {
            bail!("key {key:?} exists, but is not a dictionary");
        };

        current = next
    }

    Ok(current)
}

fn upsert_str(m: &mut yaml::MappingMut<'_>, key: &str, value: &str) {
    if let Some(mut v) = m.get_mut(key) {
        v.set_string(value);
    } else {
        m.insert_str(key, value);
    }
}

fn upsert_i64(m: &mut yaml::MappingMut<'_>, key: &str, value: i64) {
    if let Some(mut v) = m.get_mut(key) {
        v.set_i64(value);
    } else {
        m.insert_i64(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_at_path_create() -> anyhow::Result<()> {
        let mut doc = yaml::from_slice("root: 1\n")?;
        let mut m = mapping_at_path(&mut doc, &["profiles", "mirror"])?;
        m.insert_str("api_endpoint", "http://localhost:8080");

        let output = doc.to_string();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&output)?;
        assert_eq!(
            parsed["profiles"]["mirror"]["api_endpoint"].as_str(),
            Some("http://localhost:8080")
        );
        assert_eq!(parsed["root"].as_i64(), Some(1));

        Ok(())
    }

    #[test]
    fn set_keeps_comments() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sedbuilder.yaml");
        fs::write(
            &path,
            "\
# my settings
profiles:
  default:
    timeout: 10 # seconds
",
        )?;

        set_profile_value(&path, "default", "timeout", Scalar::Int(30))?;
        set_profile_value(&path, "default", "api_endpoint", Scalar::Str("http://x"))?;

        let output = fs::read_to_string(&path)?;
        assert!(output.contains("# my settings"));
        assert!(output.contains("timeout: 30"));

        let parsed: serde_yaml::Value = serde_yaml::from_str(&output)?;
        assert_eq!(parsed["profiles"]["default"]["api_endpoint"].as_str(), Some("http://x"));

        Ok(())
    }

    #[test]
    fn set_on_comment_only_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sedbuilder.yaml");
        fs::write(&path, "# profiles go here\n")?;

        set_profile_value(&path, "default", "timeout", Scalar::Int(5))?;

        let output = fs::read_to_string(&path)?;
        assert!(output.starts_with("# profiles go here\n"));

        let parsed: serde_yaml::Value = serde_yaml::from_str(&output)?;
        assert_eq!(parsed["profiles"]["default"]["timeout"].as_i64(), Some(5));

        Ok(())
    }

    #[test]
    fn set_creates_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(".config/sedbuilder.yaml");

        set_profile_value(&path, "mirror", "timeout", Scalar::Int(5))?;

        let parsed: serde_yaml::Value = serde_yaml::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(parsed["profiles"]["mirror"]["timeout"].as_i64(), Some(5));

        Ok(())
    }
}
