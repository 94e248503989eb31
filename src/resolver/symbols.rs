use crate::types::types::TypeId;

/// Handle to a symbol owned by the [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// The kind of statement that introduced a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Definition {
    Declaration,
    Assignment,
    LoopVariable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    /// Set exactly once, by the type checker
    pub ty: Option<TypeId>,
    /// Stands in for a link to the defining statement; trees are rebuilt by
    /// value each stage, so only the kind is kept.
    pub definition: Definition,
}

/// Append-only arena of every symbol in a compilation.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, definition: Definition) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            name: String::from(name),
            ty: None,
            definition,
        });
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn get_type(&self, id: SymbolId) -> Option<TypeId> {
        self.symbols[id.index()].ty
    }

    /// Fixes the type of a symbol. Returns `false` if it already had one.
    pub fn set_type(&mut self, id: SymbolId, ty: TypeId) -> bool {
        let symbol = &mut self.symbols[id.index()];
        if symbol.ty.is_some() {
            return false;
        }
        symbol.ty = Some(ty);
        true
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| (SymbolId(index as u32), symbol))
    }
}
