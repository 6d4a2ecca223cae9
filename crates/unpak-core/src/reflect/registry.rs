//! Class, enum and property-remap tables.
//!
//! A [`TypeRegistry`] is filled once at startup by every module that knows
//! about a set of classes, then only read. The process-wide instance behind
//! [`global`] is guarded by an `RwLock` so registration may also happen from
//! several threads.

use super::builtin::register_core_types;
use super::descriptor::{strip_category, PropertyDescriptor, TypeDescriptor};
use crate::error::{Error, Result};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

/// Sentinel returned by enum value lookups that find nothing
pub const ENUM_UNKNOWN: i32 = -1;

/// Produces the descriptor of a registered class
pub type TypeFactory = fn() -> Arc<TypeDescriptor>;

/// One class table entry
#[derive(Debug, Clone)]
pub struct ClassEntry {
    /// Registered name, including the category prefix
    pub name: String,
    /// Descriptor factory; `None` is a registration error reported at lookup
    pub factory: Option<TypeFactory>,
}

impl ClassEntry {
    /// Creates an entry
    pub fn new(name: impl Into<String>, factory: TypeFactory) -> Self {
        Self {
            name: name.into(),
            factory: Some(factory),
        }
    }

    fn descriptor(&self) -> Result<Arc<TypeDescriptor>> {
        let factory = self
            .factory
            .ok_or_else(|| Error::missing_factory(&self.name))?;
        Ok(factory())
    }
}

/// Value/label table of one enum
#[derive(Debug, Clone)]
pub struct EnumEntry {
    /// Enum name without the `#` marker
    pub name: String,
    /// Values in registration order
    pub values: Vec<(i32, String)>,
}

#[derive(Debug, Clone)]
struct PropertyPatch {
    class_name: String,
    old_name: String,
    new_name: String,
}

/// Registered classes, enums and property remaps
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    classes: Vec<ClassEntry>,
    enums: Vec<EnumEntry>,
    patches: Vec<PropertyPatch>,
}

impl TypeRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the core math structures already registered
    pub fn with_core_types() -> Self {
        let mut registry = Self::new();
        register_core_types(&mut registry);
        registry
    }

    /// Appends classes; an entry whose name is already registered replaces
    /// the existing one in place
    pub fn register_classes(&mut self, entries: impl IntoIterator<Item = ClassEntry>) {
        let mut added = 0;
        let mut replaced = 0;
        for entry in entries {
            match self.classes.iter_mut().find(|c| c.name == entry.name) {
                Some(slot) => {
                    trace!("Overriding class {}", entry.name);
                    *slot = entry;
                    replaced += 1;
                }
                None => {
                    self.classes.push(entry);
                    added += 1;
                }
            }
        }
        debug!(
            "Registered {} classes ({} overridden), {} total",
            added + replaced,
            replaced,
            self.classes.len()
        );
    }

    /// Removes every class whose bare name is `name`; with `whole_tree`, also
    /// every class derived from it
    pub fn unregister_class(&mut self, name: &str, whole_tree: bool) -> Result<usize> {
        let before = self.classes.len();
        let mut keep = Vec::with_capacity(before);
        for entry in &self.classes {
            let matches = strip_category(&entry.name) == name
                || (whole_tree && entry.descriptor()?.is_a(name));
            if matches {
                trace!("Unregister {}", entry.name);
            }
            keep.push(!matches);
        }
        let mut keep = keep.into_iter();
        self.classes.retain(|_| keep.next().unwrap_or(true));
        Ok(before - self.classes.len())
    }

    /// Finds a class (`is_class = true`, queried by bare name) or a structure
    /// (`is_class = false`, queried by full name), case-insensitively.
    ///
    /// Returns `Ok(None)` when nothing matches.
    pub fn find_class_type(
        &self,
        name: &str,
        is_class: bool,
    ) -> Result<Option<Arc<TypeDescriptor>>> {
        for entry in &self.classes {
            let candidate = if is_class {
                strip_category(&entry.name)
            } else {
                entry.name.as_str()
            };
            if !candidate.eq_ignore_ascii_case(name) {
                continue;
            }
            let descriptor = entry.descriptor()?;
            if descriptor.is_class != is_class {
                continue;
            }
            trace!(
                "Found {} {} as {}",
                if is_class { "class" } else { "struct" },
                name,
                descriptor.name
            );
            return Ok(Some(descriptor));
        }
        trace!("No {} named {}", if is_class { "class" } else { "struct" }, name);
        Ok(None)
    }

    /// Finds a structure by full name
    pub fn find_struct_type(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>> {
        self.find_class_type(name, false)
    }

    /// Registered class names in table order
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.name.as_str())
    }

    /// Number of registered classes and structures
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Registers an enum's value/label table
    pub fn register_enum<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = (i32, S)>,
    ) {
        let entry = EnumEntry {
            name: name.into(),
            values: values.into_iter().map(|(v, l)| (v, l.into())).collect(),
        };
        debug!("Registered enum {} ({} values)", entry.name, entry.values.len());
        self.enums.push(entry);
    }

    /// Finds an enum by exact name
    pub fn find_enum(&self, name: &str) -> Option<&EnumEntry> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Number of registered enums
    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    /// Label of `value` in enum `enum_name`
    pub fn enum_label_for(&self, enum_name: &str, value: i32) -> Option<&str> {
        self.find_enum(enum_name)?
            .values
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, label)| label.as_str())
    }

    /// Value of `label` (case-insensitive) in enum `enum_name`, or
    /// [`ENUM_UNKNOWN`]
    pub fn enum_value_for(&self, enum_name: &str, label: &str) -> i32 {
        self.find_enum(enum_name)
            .and_then(|e| e.values.iter().find(|(_, l)| l.eq_ignore_ascii_case(label)))
            .map_or(ENUM_UNKNOWN, |(v, _)| *v)
    }

    /// Translates property `old_name` of `class_name` to `new_name` on lookup
    pub fn remap_property(
        &mut self,
        class_name: impl Into<String>,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
    ) {
        self.patches.push(PropertyPatch {
            class_name: class_name.into(),
            old_name: old_name.into(),
            new_name: new_name.into(),
        });
    }

    /// Finds a property on `ty` or its ancestors after applying remaps.
    ///
    /// A patch applies when its class name equals the type's full name, or,
    /// for classes, its bare name.
    pub fn find_property<'t>(
        &self,
        ty: &'t TypeDescriptor,
        name: &str,
    ) -> Option<&'t PropertyDescriptor> {
        let name = self
            .patches
            .iter()
            .find(|p| {
                let class_matches = p.class_name.eq_ignore_ascii_case(&ty.name)
                    || (ty.is_class && p.class_name.eq_ignore_ascii_case(ty.bare_name()));
                class_matches && p.old_name.eq_ignore_ascii_case(name)
            })
            .map_or(name, |p| p.new_name.as_str());
        ty.find_declared_property(name)
    }
}

static GLOBAL: OnceLock<RwLock<TypeRegistry>> = OnceLock::new();

/// The process-wide registry, created with the core types on first use
pub fn global() -> &'static RwLock<TypeRegistry> {
    GLOBAL.get_or_init(|| RwLock::new(TypeRegistry::with_core_types()))
}

/// Shared access to the process-wide registry
pub fn read() -> RwLockReadGuard<'static, TypeRegistry> {
    global().read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> RwLockWriteGuard<'static, TypeRegistry> {
    global().write().unwrap_or_else(PoisonError::into_inner)
}

/// Registers classes in the process-wide registry
pub fn register_classes(entries: impl IntoIterator<Item = ClassEntry>) {
    write().register_classes(entries);
}

/// Removes classes from the process-wide registry
pub fn unregister_class(name: &str, whole_tree: bool) -> Result<usize> {
    write().unregister_class(name, whole_tree)
}

/// Registers an enum in the process-wide registry
pub fn register_enum<S: Into<String>>(
    name: impl Into<String>,
    values: impl IntoIterator<Item = (i32, S)>,
) {
    write().register_enum(name, values);
}

/// Adds a property remap to the process-wide registry
pub fn remap_property(
    class_name: impl Into<String>,
    old_name: impl Into<String>,
    new_name: impl Into<String>,
) {
    write().remap_property(class_name, old_name, new_name);
}

/// Finds a class or structure in the process-wide registry
pub fn find_class_type(name: &str, is_class: bool) -> Result<Option<Arc<TypeDescriptor>>> {
    read().find_class_type(name, is_class)
}

/// Finds a structure in the process-wide registry
pub fn find_struct_type(name: &str) -> Result<Option<Arc<TypeDescriptor>>> {
    read().find_struct_type(name)
}

/// Finds a property through the process-wide remap table
pub fn find_property(ty: &TypeDescriptor, name: &str) -> Option<PropertyDescriptor> {
    read().find_property(ty, name).cloned()
}

/// Enum label lookup in the process-wide registry
pub fn enum_label_for(enum_name: &str, value: i32) -> Option<String> {
    read().enum_label_for(enum_name, value).map(str::to_string)
}

/// Enum value lookup in the process-wide registry
pub fn enum_value_for(enum_name: &str, label: &str) -> i32 {
    read().enum_value_for(enum_name, label)
}
