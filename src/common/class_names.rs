use std::path::Path;
use anyhow::{Context, Result};
use regex::Regex;
use crate::utils;

/// Read-only lookup from class index to human readable name, fixed once a model is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassNames(Vec<String>);

impl From<Vec<String>> for ClassNames {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<&[&str]> for ClassNames {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|x| x.to_string()).collect())
    }
}

impl ClassNames {
    /// Reads one class name per line, skipping blank lines.
    pub fn from_labels_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let lines = utils::file_to_vec(path)
            .with_context(|| format!("Failed to read labels file {}", path.display()))?;
        Ok(Self(lines.into_iter()
            .map(|x| x.trim().to_string())
            .filter(|x| !x.is_empty())
            .collect()))
    }

    /// Parses the `names` entry Ultralytics writes into ONNX metadata.
    ///
    /// String format: `{0: 'person', 1: 'bicycle', 2: 'sports ball', ..., 27: "yellow_lady's_slipper"}`
    pub fn from_metadata(names: &str) -> Option<Self> {
        let re = Regex::new(r#"(['"])([-()\w '"]+)(['"])"#).ok()?;
        let names: Vec<String> = re.captures_iter(names)
            .map(|x| x.extract())
            .map(|(_, [_, name, _])| name.to_string())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(Self(names))
        }
    }

    /// Picks the class table from user supplied names and names parsed from the model.
    /// User names win, but must have as many entries as the model's when both exist.
    pub fn reconcile(user: Option<Vec<String>>, parsed: Option<ClassNames>) -> Result<Option<Self>> {
        match (user, parsed) {
            (Some(user), Some(parsed)) if user.len() != parsed.len() => anyhow::bail!(
                "The lengths of parsed class names: {} and user-defined class names: {} do not match.",
                parsed.len(),
                user.len(),
            ),
            (Some(user), _) => Ok(Some(Self(user))),
            (None, parsed) => Ok(parsed),
        }
    }

    /// Placeholder names `# 0`, `# 1`, ... for models shipped without labels.
    pub fn placeholders(n: usize) -> Self {
        Self((0..n).map(|x| format!("# {}", x)).collect())
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.0.get(class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
