//! Value types for the segments of a handle path.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::sigil::Sigil;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Project,
    Root,
    PackageFragment,
    CompilationUnit,
    ClassFile,
    ModularClassFile,
    Module,
    Type,
    Method,
    Field,
    Initializer,
    ImportContainer,
    ImportDeclaration,
    PackageDeclaration,
    TypeParameter,
    Annotation,
    LocalVariable,
    LambdaExpression,
}

impl NodeKind {
    pub const ALL: [NodeKind; 18] = [
        NodeKind::Project,
        NodeKind::Root,
        NodeKind::PackageFragment,
        NodeKind::CompilationUnit,
        NodeKind::ClassFile,
        NodeKind::ModularClassFile,
        NodeKind::Module,
        NodeKind::Type,
        NodeKind::Method,
        NodeKind::Field,
        NodeKind::Initializer,
        NodeKind::ImportContainer,
        NodeKind::ImportDeclaration,
        NodeKind::PackageDeclaration,
        NodeKind::TypeParameter,
        NodeKind::Annotation,
        NodeKind::LocalVariable,
        NodeKind::LambdaExpression,
    ];

    pub const fn sigil(self) -> Sigil {
        match self {
            NodeKind::Project => Sigil::Project,
            NodeKind::Root => Sigil::Root,
            NodeKind::PackageFragment => Sigil::PackageFragment,
            NodeKind::CompilationUnit => Sigil::CompilationUnit,
            NodeKind::ClassFile => Sigil::ClassFile,
            NodeKind::ModularClassFile => Sigil::ModularClassFile,
            NodeKind::Module => Sigil::Module,
            NodeKind::Type => Sigil::Type,
            NodeKind::Method => Sigil::Method,
            NodeKind::Field => Sigil::Field,
            NodeKind::Initializer => Sigil::Initializer,
            NodeKind::ImportContainer | NodeKind::ImportDeclaration => Sigil::Import,
            NodeKind::PackageDeclaration => Sigil::PackageDeclaration,
            NodeKind::TypeParameter => Sigil::TypeParameter,
            NodeKind::Annotation => Sigil::Annotation,
            NodeKind::LocalVariable => Sigil::LocalVariable,
            NodeKind::LambdaExpression => Sigil::LambdaExpression,
        }
    }

    /// Containment table: whether `child` may directly follow `self` in a handle path.
    pub fn can_contain(self, child: NodeKind) -> bool {
        use NodeKind::*;

        match self {
            Project => matches!(child, Root),
            Root => matches!(child, PackageFragment),
            PackageFragment => matches!(child, CompilationUnit | ClassFile | ModularClassFile),
            CompilationUnit => matches!(child, PackageDeclaration | ImportContainer | Type | Module),
            ClassFile => matches!(child, Type),
            ModularClassFile => matches!(child, Module),
            ImportContainer => matches!(child, ImportDeclaration),
            Type => matches!(
                child,
                Type | Method | Field | Initializer | TypeParameter | Annotation
            ),
            Method => matches!(
                child,
                Type | TypeParameter | LocalVariable | Annotation | LambdaExpression
            ),
            Initializer => matches!(child, Type | LocalVariable | LambdaExpression),
            Field => matches!(child, Type | Annotation | LambdaExpression),
            LambdaExpression => matches!(child, Type | LocalVariable | LambdaExpression),
            LocalVariable | PackageDeclaration => matches!(child, Annotation),
            Module | ImportDeclaration | TypeParameter | Annotation => false,
        }
    }

    /// Kinds whose segment is meaningless without a name; an empty one reads back as incomplete.
    pub const fn requires_name(self) -> bool {
        matches!(
            self,
            NodeKind::CompilationUnit
                | NodeKind::ClassFile
                | NodeKind::Module
                | NodeKind::Method
                | NodeKind::Field
                | NodeKind::ImportDeclaration
                | NodeKind::PackageDeclaration
                | NodeKind::TypeParameter
                | NodeKind::Annotation
                | NodeKind::LocalVariable
        )
    }

    /// Kinds whose memento carries an `!N` suffix for duplicate siblings.
    pub const fn has_occurrence_suffix(self) -> bool {
        matches!(
            self,
            NodeKind::Type
                | NodeKind::Method
                | NodeKind::Field
                | NodeKind::ImportDeclaration
                | NodeKind::PackageDeclaration
                | NodeKind::TypeParameter
                | NodeKind::Annotation
                | NodeKind::LocalVariable
        )
    }
}

/// Syntactic classification of a package fragment root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootKind {
    /// Project-relative folder (including the project folder itself).
    SourceFolder,
    /// Class folder outside the project.
    LibraryFolder,
    /// Archive inside the workspace.
    Archive,
    /// Archive outside the workspace.
    ExternalArchive,
    /// One module of a runtime image (`jrt-fs.jar` style roots).
    ModuleImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClasspathAttribute {
    pub name: String,
    pub value: String,
}

impl ClasspathAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The root segment: a path, an optional module and ordered classpath attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RootSegment {
    /// Project-relative for roots inside the project, absolute otherwise. Empty when the project
    /// folder itself is the root.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ClasspathAttribute>,
}

impl RootSegment {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            module: None,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(ClasspathAttribute::new(name, value));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn kind(&self) -> RootKind {
        if self.module.is_some() {
            return RootKind::ModuleImage;
        }
        let lower = self.path.to_ascii_lowercase();
        let is_archive = [".jar", ".zip", ".jmod"]
            .iter()
            .any(|ext| lower.ends_with(ext));
        match (is_archive, is_absolute(&self.path)) {
            (true, true) => RootKind::ExternalArchive,
            (true, false) => RootKind::Archive,
            (false, true) => RootKind::LibraryFolder,
            (false, false) => RootKind::SourceFolder,
        }
    }
}

fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    match bytes {
        [b'/' | b'\\', ..] => true,
        [drive, b':', ..] => drive.is_ascii_alphabetic(),
        _ => false,
    }
}

/// A local variable or method parameter.
///
/// The annotated type signature is informational: it is not part of the memento and does not
/// take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalVariable {
    pub name: String,
    pub declaration_start: u32,
    pub declaration_end: u32,
    pub name_start: u32,
    pub name_end: u32,
    pub type_signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotated_type_signature: Option<String>,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub is_parameter: bool,
    #[serde(default = "first_occurrence")]
    pub occurrence: u32,
}

impl LocalVariable {
    fn identity(&self) -> (&str, [u32; 4], &str, u32, bool, u32) {
        (
            &self.name,
            [
                self.declaration_start,
                self.declaration_end,
                self.name_start,
                self.name_end,
            ],
            &self.type_signature,
            self.flags,
            self.is_parameter,
            self.occurrence,
        )
    }
}

impl PartialEq for LocalVariable {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for LocalVariable {}

impl Hash for LocalVariable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LambdaParameter {
    pub type_signature: String,
    pub name: String,
}

/// The functional interface method a lambda expression implements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LambdaMethod {
    pub selector: String,
    #[serde(default)]
    pub parameters: Vec<LambdaParameter>,
    pub return_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LambdaExpression {
    /// Name of the functional interface type.
    pub interface_name: String,
    pub source_start: u32,
    pub source_end: u32,
    pub arrow_position: u32,
    pub method: LambdaMethod,
}

pub(crate) fn first_occurrence() -> u32 {
    1
}

/// One segment of a [`HandlePath`](crate::HandlePath).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Project {
        name: String,
    },
    Root(RootSegment),
    PackageFragment {
        name: String,
    },
    CompilationUnit {
        name: String,
    },
    ClassFile {
        name: String,
    },
    ModularClassFile,
    Module {
        name: String,
    },
    Type {
        name: String,
        #[serde(default = "first_occurrence")]
        occurrence: u32,
    },
    Method {
        name: String,
        #[serde(default)]
        parameter_types: Vec<String>,
        #[serde(default = "first_occurrence")]
        occurrence: u32,
    },
    Field {
        name: String,
        #[serde(default = "first_occurrence")]
        occurrence: u32,
    },
    /// Initializers have no name; the 1-based occurrence count identifies them.
    Initializer {
        #[serde(default = "first_occurrence")]
        occurrence: u32,
    },
    ImportContainer,
    ImportDeclaration {
        name: String,
        #[serde(default = "first_occurrence")]
        occurrence: u32,
    },
    PackageDeclaration {
        name: String,
        #[serde(default = "first_occurrence")]
        occurrence: u32,
    },
    TypeParameter {
        name: String,
        #[serde(default = "first_occurrence")]
        occurrence: u32,
    },
    Annotation {
        name: String,
        #[serde(default = "first_occurrence")]
        occurrence: u32,
    },
    LocalVariable(LocalVariable),
    LambdaExpression(LambdaExpression),
}

impl Node {
    pub fn project(name: impl Into<String>) -> Self {
        Node::Project { name: name.into() }
    }

    pub fn root(path: impl Into<String>) -> Self {
        Node::Root(RootSegment::new(path))
    }

    pub fn package(name: impl Into<String>) -> Self {
        Node::PackageFragment { name: name.into() }
    }

    pub fn compilation_unit(name: impl Into<String>) -> Self {
        Node::CompilationUnit { name: name.into() }
    }

    pub fn class_file(name: impl Into<String>) -> Self {
        Node::ClassFile { name: name.into() }
    }

    pub fn module(name: impl Into<String>) -> Self {
        Node::Module { name: name.into() }
    }

    pub fn ty(name: impl Into<String>) -> Self {
        Node::Type {
            name: name.into(),
            occurrence: 1,
        }
    }

    /// An anonymous type.
    pub fn anonymous() -> Self {
        Node::ty("")
    }

    pub fn method<I, S>(name: impl Into<String>, parameter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Node::Method {
            name: name.into(),
            parameter_types: parameter_types.into_iter().map(Into::into).collect(),
            occurrence: 1,
        }
    }

    pub fn field(name: impl Into<String>) -> Self {
        Node::Field {
            name: name.into(),
            occurrence: 1,
        }
    }

    pub fn initializer(occurrence: u32) -> Self {
        Node::Initializer { occurrence }
    }

    pub fn import(name: impl Into<String>) -> Self {
        Node::ImportDeclaration {
            name: name.into(),
            occurrence: 1,
        }
    }

    pub fn package_declaration(name: impl Into<String>) -> Self {
        Node::PackageDeclaration {
            name: name.into(),
            occurrence: 1,
        }
    }

    pub fn type_parameter(name: impl Into<String>) -> Self {
        Node::TypeParameter {
            name: name.into(),
            occurrence: 1,
        }
    }

    pub fn annotation(name: impl Into<String>) -> Self {
        Node::Annotation {
            name: name.into(),
            occurrence: 1,
        }
    }

    /// Replaces the occurrence count of kinds that carry one; other kinds are returned as is.
    #[must_use]
    pub fn with_occurrence(mut self, occurrence: u32) -> Self {
        if let Some(slot) = self.occurrence_mut() {
            *slot = occurrence;
        }
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Project { .. } => NodeKind::Project,
            Node::Root(_) => NodeKind::Root,
            Node::PackageFragment { .. } => NodeKind::PackageFragment,
            Node::CompilationUnit { .. } => NodeKind::CompilationUnit,
            Node::ClassFile { .. } => NodeKind::ClassFile,
            Node::ModularClassFile => NodeKind::ModularClassFile,
            Node::Module { .. } => NodeKind::Module,
            Node::Type { .. } => NodeKind::Type,
            Node::Method { .. } => NodeKind::Method,
            Node::Field { .. } => NodeKind::Field,
            Node::Initializer { .. } => NodeKind::Initializer,
            Node::ImportContainer => NodeKind::ImportContainer,
            Node::ImportDeclaration { .. } => NodeKind::ImportDeclaration,
            Node::PackageDeclaration { .. } => NodeKind::PackageDeclaration,
            Node::TypeParameter { .. } => NodeKind::TypeParameter,
            Node::Annotation { .. } => NodeKind::Annotation,
            Node::LocalVariable(_) => NodeKind::LocalVariable,
            Node::LambdaExpression(_) => NodeKind::LambdaExpression,
        }
    }

    /// The element name as the model presents it (`None` for unnamed kinds).
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Project { name }
            | Node::PackageFragment { name }
            | Node::CompilationUnit { name }
            | Node::ClassFile { name }
            | Node::Module { name }
            | Node::Type { name, .. }
            | Node::Method { name, .. }
            | Node::Field { name, .. }
            | Node::ImportDeclaration { name, .. }
            | Node::PackageDeclaration { name, .. }
            | Node::TypeParameter { name, .. }
            | Node::Annotation { name, .. } => Some(name),
            Node::Root(root) => Some(&root.path),
            Node::LocalVariable(var) => Some(&var.name),
            Node::LambdaExpression(lambda) => Some(&lambda.interface_name),
            Node::ModularClassFile | Node::ImportContainer | Node::Initializer { .. } => None,
        }
    }

    pub fn occurrence(&self) -> u32 {
        match self {
            Node::Type { occurrence, .. }
            | Node::Method { occurrence, .. }
            | Node::Field { occurrence, .. }
            | Node::Initializer { occurrence }
            | Node::ImportDeclaration { occurrence, .. }
            | Node::PackageDeclaration { occurrence, .. }
            | Node::TypeParameter { occurrence, .. }
            | Node::Annotation { occurrence, .. } => *occurrence,
            Node::LocalVariable(var) => var.occurrence,
            _ => 1,
        }
    }

    pub(crate) fn occurrence_mut(&mut self) -> Option<&mut u32> {
        match self {
            Node::Type { occurrence, .. }
            | Node::Method { occurrence, .. }
            | Node::Field { occurrence, .. }
            | Node::Initializer { occurrence }
            | Node::ImportDeclaration { occurrence, .. }
            | Node::PackageDeclaration { occurrence, .. }
            | Node::TypeParameter { occurrence, .. }
            | Node::Annotation { occurrence, .. } => Some(occurrence),
            Node::LocalVariable(var) => Some(&mut var.occurrence),
            _ => None,
        }
    }
}
