//! Type surface of compiled .NET modules.
//!
//! Images are decoded with `dotscope`; this module narrows its type registry
//! down to the declared types (TypeDef rows) with their namespace, simple
//! name, and attribute flags. Nothing else a type inventory does not need is
//! carried over.

mod error;


use std::fmt;
use std::fs;
use std::path::Path;

use dotscope::CilObject;

pub use error::MetadataError;

/// Token table id of `TypeDef` rows; registry entries from other tables are
/// references, specs, or synthesized primitives.
const TYPE_DEF_TABLE: u32 = 0x02;

const VISIBILITY_MASK: u32 = 0x0000_0007;

/// Accessibility recorded in the low bits of a type's attribute flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeVisibility {
    NotPublic,
    Public,
    NestedPublic,
    NestedPrivate,
    NestedFamily,
    NestedAssembly,
    NestedFamilyAndAssembly,
    NestedFamilyOrAssembly,
}

impl TypeVisibility {
    #[must_use]
    pub fn from_flags(flags: u32) -> Self {
        match flags & VISIBILITY_MASK {
            0 => Self::NotPublic,
            1 => Self::Public,
            2 => Self::NestedPublic,
            3 => Self::NestedPrivate,
            4 => Self::NestedFamily,
            5 => Self::NestedAssembly,
            6 => Self::NestedFamilyAndAssembly,
            _ => Self::NestedFamilyOrAssembly,
        }
    }

    #[must_use]
    pub fn flags(self) -> u32 {
        match self {
            Self::NotPublic => 0,
            Self::Public => 1,
            Self::NestedPublic => 2,
            Self::NestedPrivate => 3,
            Self::NestedFamily => 4,
            Self::NestedAssembly => 5,
            Self::NestedFamilyAndAssembly => 6,
            Self::NestedFamilyOrAssembly => 7,
        }
    }

    #[must_use]
    pub fn is_nested(self) -> bool {
        !matches!(self, Self::NotPublic | Self::Public)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotPublic => "not-public",
            Self::Public => "public",
            Self::NestedPublic => "nested-public",
            Self::NestedPrivate => "nested-private",
            Self::NestedFamily => "nested-family",
            Self::NestedAssembly => "nested-assembly",
            Self::NestedFamilyAndAssembly => "nested-family-and-assembly",
            Self::NestedFamilyOrAssembly => "nested-family-or-assembly",
        }
    }
}

impl fmt::Display for TypeVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared type as reported by the metadata tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    namespace: String,
    name: String,
    flags: u32,
}

impl TypeDescriptor {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, flags: u32) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            flags,
        }
    }

    pub fn with_visibility(
        namespace: impl Into<String>,
        name: impl Into<String>,
        visibility: TypeVisibility,
    ) -> Self {
        Self::new(namespace, name, visibility.flags())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn visibility(&self) -> TypeVisibility {
        TypeVisibility::from_flags(self.flags)
    }

    /// True only for top-level public types. Nested types report their own
    /// `Nested*` visibility and never count as public here.
    pub fn is_public(&self) -> bool {
        self.visibility() == TypeVisibility::Public
    }

    /// Namespace-qualified metadata name, arity suffix included.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// Types declared by one module, in table order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleDefinition {
    name: String,
    types: Vec<TypeDescriptor>,
}

impl ModuleDefinition {
    pub fn new(name: impl Into<String>, types: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            types,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }
}

/// A loaded assembly image. Only the manifest module is read; modules that
/// the File table lists beside it are not followed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assembly {
    modules: Vec<ModuleDefinition>,
}

impl Assembly {
    pub fn from_modules(modules: Vec<ModuleDefinition>) -> Self {
        Self { modules }
    }

    /// Read and decode the image at `path`. The module is named after the
    /// file.
    ///
    /// # Errors
    /// Returns a [`MetadataError`] when the file cannot be read or is not a
    /// well-formed managed module.
    pub fn read(path: &Path) -> Result<Self, MetadataError> {
        let bytes = fs::read(path).map_err(|err| {
            MetadataError::new(format!("failed to read image: {err}")).with_path(path)
        })?;
        let size = bytes.len();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let assembly = Self::decode(name, bytes).map_err(|err| err.with_path(path))?;
        tracing::debug!(
            target: "pipeline",
            stage = "metadata.read",
            path = %path.display(),
            bytes = size,
            types = assembly.modules.iter().map(|module| module.types.len()).sum::<usize>()
        );
        Ok(assembly)
    }

    /// Decode an in-memory PE image into an unnamed module.
    ///
    /// # Errors
    /// Returns a [`MetadataError`] when the bytes are not a well-formed
    /// managed module.
    pub fn parse(bytes: &[u8]) -> Result<Self, MetadataError> {
        Self::decode(String::new(), bytes.to_vec())
    }

    fn decode(name: String, bytes: Vec<u8>) -> Result<Self, MetadataError> {
        let image = CilObject::from_mem(bytes)
            .map_err(|err| MetadataError::new(format!("invalid managed image: {err}")))?;

        let mut declared: Vec<_> = image
            .types()
            .all_types()
            .into_iter()
            .filter(|ty| ty.token.value() >> 24 == TYPE_DEF_TABLE)
            .collect();
        declared.sort_by_key(|ty| ty.token.value());

        let types = declared
            .iter()
            .map(|ty| TypeDescriptor::new(ty.namespace.as_str(), ty.name.as_str(), ty.flags))
            .collect();
        Ok(Self::from_modules(vec![ModuleDefinition::new(name, types)]))
    }

    pub fn modules(&self) -> &[ModuleDefinition] {
        &self.modules
    }
}

/// Source of assemblies for the forwarding pipeline.
pub trait MetadataLoader {
    /// Load the assembly at `path`.
    ///
    /// # Errors
    /// Returns a [`MetadataError`] when the assembly cannot be loaded.
    fn load(&self, path: &Path) -> Result<Assembly, MetadataError>;
}

/// Loads assemblies from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileLoader;

impl MetadataLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Assembly, MetadataError> {
        Assembly::read(path)
    }
}
