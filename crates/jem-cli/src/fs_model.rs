//! Resolves mementos against projects laid out on disk.
//!
//! Projects are directories of the workspace root. Roots are folders or archives, located
//! relative to the project, through a `[classpath]` variable, or by absolute path. Packages,
//! compilation units and class files are looked up inside the root. Members below a file are
//! not modeled and always decode as placeholders.

use std::path::{Path, PathBuf};

use jem_archive::Archive;
use jem_config::JemConfig;
use jem_memento::{ChildFactory, Node, RootResolver, RootSegment};

const TRACE_TARGET: &str = "jem.cli";

#[derive(Debug, Clone)]
pub enum FsElement {
    Project(PathBuf),
    Root(Archive),
    Package { root: Archive, dir: String },
    File { root: Archive, entry: String },
}

impl FsElement {
    /// Human readable location on disk (`archive!/entry` inside archives).
    pub fn location(&self) -> String {
        match self {
            FsElement::Project(dir) => dir.display().to_string(),
            FsElement::Root(root) => root.path().display().to_string(),
            FsElement::Package { root, dir } | FsElement::File { root, entry: dir } => {
                entry_location(root, dir)
            }
        }
    }
}

fn entry_location(root: &Archive, entry: &str) -> String {
    if root.path().is_dir() {
        root.path().join(entry).display().to_string()
    } else {
        format!("{}!/{}", root.path().display(), entry)
    }
}

pub struct FsModel<'a> {
    workspace_root: PathBuf,
    config: &'a JemConfig,
}

impl<'a> FsModel<'a> {
    pub fn new(workspace_root: impl Into<PathBuf>, config: &'a JemConfig) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            config,
        }
    }

    fn root_location(&self, project: &Path, root: &RootSegment) -> PathBuf {
        if root.path.is_empty() {
            return project.to_path_buf();
        }
        let path = Path::new(&root.path);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.config
            .expand_variable(&root.path)
            .unwrap_or_else(|| project.join(path))
    }
}

fn package_dir(name: &str) -> String {
    name.replace('.', "/")
}

fn join_entry(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// Archive lookups fail for unreadable archives; those count as missing.
fn present(result: anyhow::Result<bool>, root: &Archive) -> bool {
    match result {
        Ok(found) => found,
        Err(err) => {
            tracing::debug!(
                target: TRACE_TARGET,
                archive = %root.path().display(),
                error = %format!("{err:#}"),
                "archive lookup failed"
            );
            false
        }
    }
}

impl RootResolver for FsModel<'_> {
    type Element = FsElement;

    fn project(&self, name: &str) -> Option<FsElement> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return None;
        }
        let dir = self.workspace_root.join(name);
        dir.is_dir().then_some(FsElement::Project(dir))
    }

    fn root(&self, project: &FsElement, root: &RootSegment) -> Option<FsElement> {
        let FsElement::Project(project_dir) = project else {
            return None;
        };
        if root.module.is_some() {
            tracing::debug!(
                target: TRACE_TARGET,
                path = %root.path,
                "module image roots are not resolvable on disk"
            );
            return None;
        }
        let location = self.root_location(project_dir, root);
        tracing::trace!(
            target: TRACE_TARGET,
            root = %root.path,
            location = %location.display(),
            kind = ?root.kind(),
            "resolved root location"
        );
        let archive = Archive::new(location);
        archive.exists().then_some(FsElement::Root(archive))
    }
}

impl ChildFactory<FsElement> for FsModel<'_> {
    fn child(&self, parent: &FsElement, node: &Node) -> Option<FsElement> {
        match (parent, node) {
            (FsElement::Root(root), Node::PackageFragment { name }) => {
                let dir = package_dir(name);
                present(root.contains_dir(&dir), root).then(|| FsElement::Package {
                    root: root.clone(),
                    dir,
                })
            }
            (FsElement::Package { root, dir }, Node::CompilationUnit { name })
                if root.path().is_dir() =>
            {
                self.file(root, dir, name)
            }
            (FsElement::Package { root, dir }, Node::ClassFile { name }) => {
                self.file(root, dir, name)
            }
            (FsElement::Package { root, dir }, Node::ModularClassFile) => {
                self.file(root, dir, "module-info.class")
            }
            _ => None,
        }
    }
}

impl FsModel<'_> {
    fn file(&self, root: &Archive, dir: &str, name: &str) -> Option<FsElement> {
        let entry = join_entry(dir, name);
        present(root.contains_file(&entry), root).then(|| FsElement::File {
            root: root.clone(),
            entry,
        })
    }
}
