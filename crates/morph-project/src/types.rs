//! Wrappers for resolved types and signatures.

use std::fmt;
use std::hash::{Hash, Hasher};

use la_arena::{Arena, Idx};
use morph_check::TypeData;
use rustc_hash::FxHashMap;

use crate::error::{Error, OrNotFound as _, Result};
use crate::node::Node;
use crate::project::Project;
use crate::symbol::Symbol;

pub(crate) struct TypeSlot {
    generation: u64,
    data: TypeData,
    /// Rendered eagerly; the symbols inside `data` go stale with the generation.
    text: String,
}

#[derive(Default)]
pub(crate) struct TypeCache {
    slots: Arena<TypeSlot>,
    generation: u64,
    current: FxHashMap<TypeData, Idx<TypeSlot>>,
}

/// One distinct type of one checker generation.
#[derive(Clone, Copy)]
pub struct Type<'p> {
    project: &'p Project,
    id: Idx<TypeSlot>,
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.project, other.project) && self.id == other.id
    }
}

impl Eq for Type<'_> {}

impl Hash for Type<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Type").field(&self.text()).finish()
    }
}

impl<'p> Type<'p> {
    pub(crate) fn wrap(project: &'p Project, data: TypeData) -> Self {
        let generation = project.generation();
        {
            let mut cache = project.types.borrow_mut();
            if cache.generation != generation {
                cache.current.clear();
                cache.generation = generation;
            }
            if let Some(&id) = cache.current.get(&data) {
                return Self { project, id };
            }
        }

        let text = project.with_program(|program| program.type_text(&data));
        let mut cache = project.types.borrow_mut();
        let id = cache.slots.alloc(TypeSlot { generation, data: data.clone(), text });
        cache.current.insert(data, id);
        Self { project, id }
    }

    fn slot<R>(self, f: impl FnOnce(&TypeSlot) -> R) -> R {
        f(&self.project.types.borrow().slots[self.id])
    }

    /// The type's data, if the files have not changed since it was resolved.
    fn data(self) -> Result<TypeData> {
        let (generation, data) = self.slot(|slot| (slot.generation, slot.data.clone()));
        if generation != self.project.generation() {
            return Err(Error::StaleSymbol { name: self.text() });
        }
        Ok(data)
    }

    /// The type as it would be written in source.
    pub fn text(self) -> String {
        self.slot(|slot| slot.text.clone())
    }

    pub fn is_any(self) -> bool {
        self.slot(|slot| slot.data.is_any())
    }

    /// `string`, `number`, `boolean`, `void`, `undefined`, `null` or a literal.
    pub fn is_primitive(self) -> bool {
        self.slot(|slot| slot.data.is_primitive())
    }

    pub fn is_class(self) -> bool {
        self.slot(|slot| slot.data.is_class())
    }

    pub fn is_interface(self) -> bool {
        self.slot(|slot| slot.data.is_interface())
    }

    pub fn symbol(self) -> Result<Option<Symbol<'p>>> {
        let symbol = self.data()?.symbol();
        Ok(symbol.map(|symbol| Symbol::wrap(self.project, symbol)))
    }

    pub fn array_element_type(self) -> Result<Option<Type<'p>>> {
        let element = self.data()?.array_element().cloned();
        Ok(element.map(|element| Type::wrap(self.project, element)))
    }

    /// The members of a union; empty for other types.
    pub fn union_types(self) -> Result<Vec<Type<'p>>> {
        let data = self.data()?;
        Ok(data.union_members().iter().map(|ty| Type::wrap(self.project, ty.clone())).collect())
    }

    /// The types a class or interface extends.
    pub fn base_types(self) -> Result<Vec<Type<'p>>> {
        let Some(symbol) = self.data()?.symbol() else { return Ok(Vec::new()) };
        let base_types = self.project.with_program(|program| program.base_types(symbol));
        Ok(base_types.into_iter().map(|ty| Type::wrap(self.project, ty)).collect())
    }
}

/// The signature of one function-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature<'p> {
    declaration: Node<'p>,
}

impl<'p> Signature<'p> {
    pub(crate) fn new(declaration: Node<'p>) -> Self {
        Self { declaration }
    }

    pub fn declaration(self) -> Node<'p> {
        self.declaration
    }

    fn data(self) -> Result<morph_check::SignatureData> {
        let (file, index) = (self.declaration.file(), self.declaration.index()?);
        self.declaration
            .project()
            .with_program(|program| program.signature(file, index))
            .or_not_found(|| {
                format!("Expected to find a signature for {:?}.", self.declaration.kind())
            })
    }

    pub fn parameters(self) -> Result<Vec<Symbol<'p>>> {
        let project = self.declaration.project();
        let parameters = self.data()?.parameters;
        Ok(parameters.into_iter().map(|parameter| Symbol::wrap(project, parameter)).collect())
    }

    pub fn return_type(self) -> Result<Type<'p>> {
        Ok(Type::wrap(self.declaration.project(), self.data()?.return_type))
    }
}
