use crate::{resolver::symbols::SymbolId, types::types::TypeId};

/// An expression together with the type the checker gave it.
///
/// `ty` is `None` until the type checker visits the node. After that it is
/// only ever changed for flexible nodes, which receive their final type when
/// a demand reaches them from the surrounding expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLit(u64),
    Id {
        name: String,
        symbol: Option<SymbolId>,
    },
    /// `input(0)`, reads one integer from the runtime
    Input,
    Unary {
        operator: String,
        operand: Box<Expr>,
    },
    Binary {
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Representation change to the node's own type
    Conversion(Box<Expr>),
    /// Load of the value stored at the inner expression's address
    LValToRVal(Box<Expr>),
    /// Struct literal
    Glue(Vec<GlueField>),
    Dot {
        base: Box<Expr>,
        field: String,
        index: Option<usize>,
    },
    Index {
        base: Box<Expr>,
        index: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlueField {
    pub name: Option<String>,
    pub value: Expr,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr { kind, ty: None }
    }

    pub fn int(value: u64) -> Self {
        Expr::new(ExprKind::IntLit(value))
    }

    pub fn id(name: &str) -> Self {
        Expr::new(ExprKind::Id {
            name: String::from(name),
            symbol: None,
        })
    }

    pub fn input() -> Self {
        Expr::new(ExprKind::Input)
    }

    pub fn unary(operator: &str, operand: Expr) -> Self {
        Expr::new(ExprKind::Unary {
            operator: String::from(operator),
            operand: Box::new(operand),
        })
    }

    pub fn binary(operator: &str, left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Binary {
            operator: String::from(operator),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn glue(fields: Vec<GlueField>) -> Self {
        Expr::new(ExprKind::Glue(fields))
    }

    pub fn dot(base: Expr, field: &str) -> Self {
        Expr::new(ExprKind::Dot {
            base: Box::new(base),
            field: String::from(field),
            index: None,
        })
    }

    pub fn index(base: Expr, index: usize) -> Self {
        Expr::new(ExprKind::Index {
            base: Box::new(base),
            index,
        })
    }

    /// Whether lowering this node yields an address rather than a value.
    pub fn denotes_storage(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Id { .. } | ExprKind::Dot { .. } | ExprKind::Index { .. } | ExprKind::Glue(_)
        )
    }
}

impl GlueField {
    pub fn named(name: &str, value: Expr) -> Self {
        GlueField {
            name: Some(String::from(name)),
            value,
        }
    }

    pub fn positional(value: Expr) -> Self {
        GlueField { name: None, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    Arithmetic,
    Relational,
}

impl OperatorClass {
    pub fn of(operator: &str) -> Option<OperatorClass> {
        match operator {
            "+" | "-" | "*" | "/" | "&&" | "||" => Some(OperatorClass::Arithmetic),
            "<" | ">" | "<=" | ">=" | "==" | "!=" => Some(OperatorClass::Relational),
            _ => None,
        }
    }
}
