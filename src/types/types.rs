use std::collections::{BTreeMap, HashMap};

/// Width given to integers whose width is not fixed by anything else.
pub const DEFAULT_INT_WIDTH: u32 = 32;

/// Handle to a type owned by the [`TypeUniverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructType {
    /// Field types in written order
    pub fields: Vec<TypeId>,
    /// Names of the named fields, mapped to their position in `fields`
    pub names: BTreeMap<String, usize>,
}

impl StructType {
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, position)| **position == index)
            .map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int(u32),
    Bool,
    /// Placeholder for literals and reads whose width is decided later
    Flexible,
    Struct(StructType),
}

/// Result of promoting two types to a common one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    Resolved(TypeId),
    /// Neither side fixes a width; callers pick the default integer
    StillFlexible,
    Incompatible,
}

/// Owns every type created during a compilation.
///
/// Primitive types are interned so handles can be compared directly:
/// `get_int(8) == get_int(8)` always holds. Struct types are interned on
/// their full structure as well.
#[derive(Debug, Default)]
pub struct TypeUniverse {
    types: Vec<Type>,
    ints: HashMap<u32, TypeId>,
    structs: HashMap<StructType, TypeId>,
    boolean: Option<TypeId>,
    flexible: Option<TypeId>,
}

impl TypeUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get_bool(&mut self) -> TypeId {
        match self.boolean {
            Some(id) => id,
            None => {
                let id = self.push(Type::Bool);
                self.boolean = Some(id);
                id
            }
        }
    }

    pub fn get_flexible(&mut self) -> TypeId {
        match self.flexible {
            Some(id) => id,
            None => {
                let id = self.push(Type::Flexible);
                self.flexible = Some(id);
                id
            }
        }
    }

    pub fn get_int(&mut self, width: u32) -> TypeId {
        if let Some(id) = self.ints.get(&width) {
            return *id;
        }

        let id = self.push(Type::Int(width));
        self.ints.insert(width, id);
        id
    }

    pub fn get_default_int(&mut self) -> TypeId {
        self.get_int(DEFAULT_INT_WIDTH)
    }

    pub fn get_struct(&mut self, fields: Vec<TypeId>, names: BTreeMap<String, usize>) -> TypeId {
        let struct_type = StructType { fields, names };
        if let Some(id) = self.structs.get(&struct_type) {
            return *id;
        }

        let id = self.push(Type::Struct(struct_type.clone()));
        self.structs.insert(struct_type, id);
        id
    }

    pub fn is_flexible(&self, id: TypeId) -> bool {
        matches!(self.get(id), Type::Flexible)
    }

    pub fn is_bool(&self, id: TypeId) -> bool {
        matches!(self.get(id), Type::Bool)
    }

    pub fn as_struct(&self, id: TypeId) -> Option<&StructType> {
        match self.get(id) {
            Type::Struct(struct_type) => Some(struct_type),
            _ => None,
        }
    }

    /// Width in bits, `None` for the flexible placeholder.
    pub fn bit_width(&self, id: TypeId) -> Option<u32> {
        match self.get(id) {
            Type::Int(width) => Some(*width),
            Type::Bool => Some(1),
            Type::Flexible => None,
            Type::Struct(struct_type) => struct_type
                .fields
                .iter()
                .map(|field| self.bit_width(*field))
                .sum(),
        }
    }

    pub fn common_type(&mut self, left: TypeId, right: TypeId) -> Promotion {
        if left == right {
            return if self.is_flexible(left) {
                Promotion::StillFlexible
            } else {
                Promotion::Resolved(left)
            };
        }

        if self.as_struct(left).is_some() || self.as_struct(right).is_some() {
            return Promotion::Incompatible;
        }

        let width = [left, right]
            .iter()
            .filter_map(|id| match self.get(*id) {
                Type::Int(width) => Some(*width),
                _ => None,
            })
            .max();

        match width {
            Some(width) => Promotion::Resolved(self.get_int(width)),
            None => Promotion::StillFlexible,
        }
    }

    pub fn describe(&self, id: TypeId) -> String {
        match self.get(id) {
            Type::Int(width) => format!("int({})", width),
            Type::Bool => String::from("bool"),
            Type::Flexible => String::from("flexible"),
            Type::Struct(struct_type) => {
                let fields = struct_type
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(index, field)| match struct_type.field_name(index) {
                        Some(name) => format!("{}: {}", name, self.describe(*field)),
                        None => self.describe(*field),
                    })
                    .collect::<Vec<String>>();
                format!("struct{{{}}}", fields.join(", "))
            }
        }
    }
}
