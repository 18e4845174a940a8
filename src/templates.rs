use std::{fs, io, path::Path, str::FromStr};

use tracing::{debug, info, warn};

use crate::{error::LifeError, pattern::Pattern};

/// A named reference shape, kept with its four quarter-turn rotations.
#[derive(Clone, Debug)]
pub struct Template {
    name: String,
    rotations: [Pattern; 4],
}

impl Template {
    pub fn new(name: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            name: name.into(),
            rotations: pattern.rotations(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shape as defined.
    pub fn pattern(&self) -> &Pattern {
        &self.rotations[0]
    }

    /// 0°, 90°, 180° and 270°, in that order.
    pub fn rotations(&self) -> &[Pattern; 4] {
        &self.rotations
    }

    /// Whether `group` equals this template at any rotation.
    pub fn matches(&self, group: &Pattern) -> bool {
        self.rotations.iter().any(|r| r == group)
    }
}

/// An ordered set of templates. Order is insertion order and decides which
/// name wins when a group matches more than one template.
#[derive(Clone, Debug, Default)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, LifeError> {
        let mut library = Self::new();
        library.load(dir)?;
        Ok(library)
    }

    /// Replaces the whole set with the `*.txt` files in `dir`, each named by
    /// its file stem and loaded in file-name order. Returns the number of
    /// templates loaded.
    ///
    /// A missing directory gives an empty set. Files with no live cells are
    /// skipped. Read failures and ragged files are errors, and leave the
    /// current set untouched.
    pub fn load(&mut self, dir: impl AsRef<Path>) -> Result<usize, LifeError> {
        let dir = dir.as_ref();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(dir = %dir.display(), "template directory missing, no templates loaded");
                self.templates.clear();
                return Ok(0);
            }
            Err(e) => return Err(LifeError::io(dir, e)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| LifeError::io(dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = Self::new();
        for path in paths {
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            match read_pattern(&path) {
                Ok(pattern) => {
                    debug!(%name, width = pattern.width(), height = pattern.height(), "loaded template");
                    loaded.insert(name, pattern);
                }
                Err(LifeError::Template { source, .. })
                    if matches!(*source, LifeError::NoLiveCells | LifeError::EmptyBlock) =>
                {
                    warn!(path = %path.display(), "template has no live cells, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        info!(dir = %dir.display(), count = loaded.len(), "loaded templates");
        self.templates = loaded.templates;
        Ok(self.templates.len())
    }

    /// Adds a template at the end, or replaces the one with the same name in
    /// place.
    pub fn insert(&mut self, name: impl Into<String>, pattern: Pattern) {
        let template = Template::new(name, pattern);
        match self.templates.iter_mut().find(|t| t.name == template.name) {
            Some(slot) => *slot = template,
            None => self.templates.push(template),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn clear(&mut self) {
        self.templates.clear();
    }
}

fn read_pattern(path: &Path) -> Result<Pattern, LifeError> {
    let text = fs::read_to_string(path).map_err(|e| LifeError::io(path, e))?;
    Pattern::from_str(&text).map_err(|e| LifeError::Template {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn pattern(s: &str) -> Pattern {
        Pattern::from_str(s).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("torus-life-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_from_dir() {
        let dir = scratch_dir("load");
        fs::write(dir.join("tub.txt"), ".0.\n0.0\n.0.\n").unwrap();
        fs::write(dir.join("block.txt"), "00\n00\n").unwrap();
        fs::write(dir.join("notes.md"), "not a template").unwrap();

        let library = TemplateLibrary::from_dir(&dir).unwrap();
        let names: Vec<_> = library.iter().map(Template::name).collect();
        assert_eq!(names, ["block", "tub"]);
        assert_eq!(library.get("block").unwrap().pattern(), &pattern("00\n00"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_replaces_everything() {
        let first = scratch_dir("replace-a");
        fs::write(first.join("block.txt"), "00\n00").unwrap();
        let second = scratch_dir("replace-b");
        fs::write(second.join("blinker.txt"), "000").unwrap();

        let mut library = TemplateLibrary::from_dir(&first).unwrap();
        library.insert("extra", pattern("0"));
        assert_eq!(library.load(&second).unwrap(), 1);
        assert!(library.get("block").is_none());
        assert!(library.get("extra").is_none());
        assert!(library.get("blinker").is_some());

        for dir in [first, second] {
            fs::remove_dir_all(dir).unwrap();
        }
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let mut library = TemplateLibrary::new();
        library.insert("block", pattern("00\n00"));
        let missing = std::env::temp_dir().join("torus-life-no-such-dir-for-templates");
        assert_eq!(library.load(&missing).unwrap(), 0);
        assert!(library.is_empty());
    }

    #[test]
    fn test_unreadable_source_is_an_error() {
        let dir = scratch_dir("not-a-dir");
        let file = dir.join("shapes");
        fs::write(&file, "00\n00").unwrap();

        assert!(matches!(TemplateLibrary::from_dir(&file), Err(LifeError::Io { .. })));

        let mut library = TemplateLibrary::new();
        library.insert("kept", pattern("0"));
        let err = library.load(&file).unwrap_err();
        assert!(matches!(err, LifeError::Io { .. }));
        assert!(err.to_string().contains("shapes"));
        assert!(library.get("kept").is_some());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_ragged_file_is_an_error() {
        let dir = scratch_dir("ragged");
        fs::write(dir.join("block.txt"), "00\n00").unwrap();
        fs::write(dir.join("broken.txt"), "000\n0").unwrap();

        let mut library = TemplateLibrary::new();
        library.insert("kept", pattern("0"));
        let err = library.load(&dir).unwrap_err();
        assert!(matches!(err, LifeError::Template { .. }));
        assert!(err.to_string().contains("broken.txt"));
        // A failed load leaves the old set in place.
        assert!(library.get("kept").is_some());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_blank_file_is_skipped() {
        let dir = scratch_dir("blank");
        fs::write(dir.join("empty.txt"), "").unwrap();
        fs::write(dir.join("dots.txt"), "...\n...").unwrap();
        fs::write(dir.join("dot.txt"), "0").unwrap();
        fs::write(dir.join("pair.txt"), "00\n\n").unwrap();

        let library = TemplateLibrary::from_dir(&dir).unwrap();
        let names: Vec<_> = library.iter().map(Template::name).collect();
        assert_eq!(names, ["dot", "pair"]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut library = TemplateLibrary::new();
        library.insert("a", pattern("0"));
        library.insert("b", pattern("00"));
        library.insert("a", pattern("000"));
        let names: Vec<_> = library.iter().map(Template::name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(library.get("a").unwrap().pattern(), &pattern("000"));
    }

    #[test]
    fn test_template_matches_any_rotation() {
        let glider = Template::new("glider", pattern(".0.\n..0\n000"));
        assert!(glider.matches(&pattern(".00\n0.0\n..0")));
        assert!(glider.matches(&pattern("000\n0..\n.0.")));
        assert!(glider.matches(&pattern(".0.\n..0\n000")));
        // Mirror image is not a rotation.
        assert!(!glider.matches(&pattern(".0.\n0..\n000")));
    }
}
