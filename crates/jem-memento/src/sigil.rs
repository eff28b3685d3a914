//! Reserved characters of the memento grammar.
//!
//! Every path segment starts with a sigil that names the kind of the segment. The table is
//! `const` data; adding a new kind requires reserving a character that is not used yet.

use crate::node::NodeKind;

/// Escape character. Any reserved character inside a payload is prefixed with it.
pub const ESCAPE: char = '\\';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sigil {
    /// `=`: project name; always the first segment.
    Project,
    /// `=/`: delimits the key, value and end of a classpath attribute block on a root.
    ClasspathAttribute,
    /// `/`: package fragment root path.
    Root,
    /// `<`: package fragment (dotted name, empty for the default package).
    PackageFragment,
    /// `{`: compilation unit.
    CompilationUnit,
    /// `(`: class file.
    ClassFile,
    /// `'`: `module-info.class`.
    ModularClassFile,
    /// `` ` ``: module description, or the module of a module image root.
    Module,
    /// `[`: type (empty name for anonymous types).
    Type,
    /// `~`: method name and each of its parameter signatures.
    Method,
    /// `^`: field.
    Field,
    /// `|`: initializer, followed by its occurrence count.
    Initializer,
    /// `!`: occurrence count and numeric sub-fields.
    Count,
    /// `#`: import container and import declarations.
    Import,
    /// `%`: package declaration.
    PackageDeclaration,
    /// `@`: local variable.
    LocalVariable,
    /// `]`: type parameter.
    TypeParameter,
    /// `}`: annotation.
    Annotation,
    /// `)`: lambda expression.
    LambdaExpression,
    /// `&`: the functional method implemented by a lambda expression.
    LambdaMethod,
    /// `"`: string sub-fields of a lambda method.
    String,
}

impl Sigil {
    pub const ALL: [Sigil; 21] = [
        Sigil::Project,
        Sigil::ClasspathAttribute,
        Sigil::Root,
        Sigil::PackageFragment,
        Sigil::CompilationUnit,
        Sigil::ClassFile,
        Sigil::ModularClassFile,
        Sigil::Module,
        Sigil::Type,
        Sigil::Method,
        Sigil::Field,
        Sigil::Initializer,
        Sigil::Count,
        Sigil::Import,
        Sigil::PackageDeclaration,
        Sigil::LocalVariable,
        Sigil::TypeParameter,
        Sigil::Annotation,
        Sigil::LambdaExpression,
        Sigil::LambdaMethod,
        Sigil::String,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Sigil::Project => "=",
            Sigil::ClasspathAttribute => "=/",
            Sigil::Root => "/",
            Sigil::PackageFragment => "<",
            Sigil::CompilationUnit => "{",
            Sigil::ClassFile => "(",
            Sigil::ModularClassFile => "'",
            Sigil::Module => "`",
            Sigil::Type => "[",
            Sigil::Method => "~",
            Sigil::Field => "^",
            Sigil::Initializer => "|",
            Sigil::Count => "!",
            Sigil::Import => "#",
            Sigil::PackageDeclaration => "%",
            Sigil::LocalVariable => "@",
            Sigil::TypeParameter => "]",
            Sigil::Annotation => "}",
            Sigil::LambdaExpression => ")",
            Sigil::LambdaMethod => "&",
            Sigil::String => "\"",
        }
    }

    /// Looks up the single-character sigil starting with `byte`.
    ///
    /// `=` always maps to [`Sigil::Project`]; the tokenizer recognizes the two-character
    /// [`Sigil::ClasspathAttribute`] delimiter itself.
    #[inline]
    pub const fn from_byte(byte: u8) -> Option<Sigil> {
        if byte >= 128 {
            return None;
        }
        SIGIL_TABLE[byte as usize]
    }

    #[inline]
    pub fn from_char(c: char) -> Option<Sigil> {
        u8::try_from(c).ok().and_then(Sigil::from_byte)
    }

    /// The node kind a segment introduced by this sigil produces.
    ///
    /// Sigils that only delimit sub-fields (`=/`, `!`, `&`, `"`) have no node kind of their own.
    pub const fn node_kind(self) -> Option<NodeKind> {
        Some(match self {
            Sigil::Project => NodeKind::Project,
            Sigil::Root => NodeKind::Root,
            Sigil::PackageFragment => NodeKind::PackageFragment,
            Sigil::CompilationUnit => NodeKind::CompilationUnit,
            Sigil::ClassFile => NodeKind::ClassFile,
            Sigil::ModularClassFile => NodeKind::ModularClassFile,
            Sigil::Module => NodeKind::Module,
            Sigil::Type => NodeKind::Type,
            Sigil::Method => NodeKind::Method,
            Sigil::Field => NodeKind::Field,
            Sigil::Initializer => NodeKind::Initializer,
            Sigil::Import => NodeKind::ImportContainer,
            Sigil::PackageDeclaration => NodeKind::PackageDeclaration,
            Sigil::LocalVariable => NodeKind::LocalVariable,
            Sigil::TypeParameter => NodeKind::TypeParameter,
            Sigil::Annotation => NodeKind::Annotation,
            Sigil::LambdaExpression => NodeKind::LambdaExpression,
            Sigil::ClasspathAttribute | Sigil::Count | Sigil::LambdaMethod | Sigil::String => {
                return None
            }
        })
    }
}

const SIGIL_TABLE: [Option<Sigil>; 128] = build_sigil_table();

const fn build_sigil_table() -> [Option<Sigil>; 128] {
    let mut table = [None; 128];
    let mut i = 0;
    while i < Sigil::ALL.len() {
        let sigil = Sigil::ALL[i];
        let bytes = sigil.as_str().as_bytes();
        if bytes.len() == 1 {
            table[bytes[0] as usize] = Some(sigil);
        }
        i += 1;
    }
    table
}

/// Returns `true` when `c` must be escaped inside a payload.
#[inline]
pub fn is_reserved(c: char) -> bool {
    c == ESCAPE || Sigil::from_char(c).is_some()
}
